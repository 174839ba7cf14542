use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::db::now_timestamp;
use crate::domain::{LoanDuration, LoanStatus, PaymentMethod};
use crate::entities::{loan_applications, prelude::*, users};
use crate::models::{
    Applicant, BorrowerDetails, DerivedTerms, LoanApplication, LoanFilter, LoanRequest,
    NewLoanApplication,
};

/// Repository for loan application operations
pub struct LoanRepository {
    conn: DatabaseConnection,
}

impl LoanRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(
        model: loan_applications::Model,
        owner: Option<users::Model>,
    ) -> Result<LoanApplication> {
        let status = model
            .status
            .parse::<LoanStatus>()
            .with_context(|| format!("Loan {} has an invalid stored status", model.id))?;
        let loan_duration = model
            .loan_duration
            .parse::<LoanDuration>()
            .with_context(|| format!("Loan {} has an invalid stored duration", model.id))?;
        let downpayment_method = model
            .downpayment_method
            .parse::<PaymentMethod>()
            .with_context(|| format!("Loan {} has an invalid stored payment method", model.id))?;

        let applicant = owner.map(|u| Applicant {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
        });

        let borrower = BorrowerDetails {
            full_name: model.full_name,
            date_of_birth: model.date_of_birth,
            phone_number: model.phone_number,
            address: model.address,
            national_id_number: model.national_id_number,
            nid_front_url: model.nid_front_url,
            nid_back_url: model.nid_back_url,
            salary_amount: model.salary_amount,
            job_type: model.job_type,
            bank_account_number: model.bank_account_number,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_phone: model.emergency_contact_phone,
        };

        let request = LoanRequest {
            loan_amount: model.loan_amount,
            loan_duration,
            downpayment_method,
            downpayment_screenshot_url: model.downpayment_screenshot_url,
        };

        let terms =
            DerivedTerms::restore(model.emi_amount, model.total_repayment, model.interest_rate);

        Ok(LoanApplication::from_stored(
            model.id,
            model.user_id,
            applicant,
            borrower,
            request,
            status,
            terms,
            model.applied_at,
            model.status_changed_at,
            model.updated_at,
        ))
    }

    // ========================================================================
    // Loan Application Operations
    // ========================================================================

    /// Persist a new application as Pending.
    pub async fn insert(&self, application: &NewLoanApplication) -> Result<i32> {
        let borrower = &application.borrower;
        let request = &application.request;
        let terms = application.terms();
        let now = now_timestamp();

        let active = loan_applications::ActiveModel {
            user_id: Set(application.user_id),
            full_name: Set(borrower.full_name.clone()),
            date_of_birth: Set(borrower.date_of_birth.clone()),
            phone_number: Set(borrower.phone_number.clone()),
            address: Set(borrower.address.clone()),
            national_id_number: Set(borrower.national_id_number.clone()),
            nid_front_url: Set(borrower.nid_front_url.clone()),
            nid_back_url: Set(borrower.nid_back_url.clone()),
            salary_amount: Set(borrower.salary_amount),
            job_type: Set(borrower.job_type.clone()),
            bank_account_number: Set(borrower.bank_account_number.clone()),
            emergency_contact_name: Set(borrower.emergency_contact_name.clone()),
            emergency_contact_phone: Set(borrower.emergency_contact_phone.clone()),
            loan_amount: Set(request.loan_amount),
            loan_duration: Set(request.loan_duration.as_str().to_string()),
            downpayment_method: Set(request.downpayment_method.as_str().to_string()),
            downpayment_screenshot_url: Set(request.downpayment_screenshot_url.clone()),
            status: Set(LoanStatus::Pending.as_str().to_string()),
            emi_amount: Set(terms.emi_amount()),
            total_repayment: Set(terms.total_repayment()),
            interest_rate: Set(terms.interest_rate()),
            applied_at: Set(now.clone()),
            status_changed_at: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };

        let res = LoanApplications::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert loan application")?;

        debug!(loan_id = res.last_insert_id, "Inserted loan application");
        Ok(res.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<LoanApplication>> {
        let row = LoanApplications::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query loan application")?;

        row.map(|(loan, owner)| Self::map_model(loan, owner))
            .transpose()
    }

    /// Most recently applied first.
    pub async fn list(&self, filter: LoanFilter) -> Result<Vec<LoanApplication>> {
        let mut query = LoanApplications::find();

        if let Some(owner) = filter.owner {
            query = query.filter(loan_applications::Column::UserId.eq(owner));
        }

        if let Some(status) = filter.status {
            query = query.filter(loan_applications::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(loan_applications::Column::AppliedAt)
            .order_by_desc(loan_applications::Column::Id)
            .find_also_related(Users)
            .all(&self.conn)
            .await
            .context("Failed to list loan applications")?
            .into_iter()
            .map(|(loan, owner)| Self::map_model(loan, owner))
            .collect()
    }

    /// Overwrite the status. Only `status`, `status_changed_at` and
    /// `updated_at` are written; the repayment columns are never touched.
    ///
    /// Returns `false` if the application does not exist.
    pub async fn update_status(
        &self,
        id: i32,
        status: LoanStatus,
        changed_at: Option<String>,
    ) -> Result<bool> {
        let Some(model) = LoanApplications::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query loan application for status update")?
        else {
            return Ok(false);
        };

        let mut active: loan_applications::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        if let Some(changed_at) = changed_at {
            active.status_changed_at = Set(Some(changed_at));
        }
        active.updated_at = Set(now_timestamp());
        active
            .update(&self.conn)
            .await
            .context("Failed to update loan status")?;

        Ok(true)
    }
}
