//! `SeaORM` implementation of the `LoanService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::db::{Store, now_timestamp};
use crate::domain::access::loan_list_scope;
use crate::domain::{
    Caller, Capability, DEFAULT_INTEREST_RATE, LoanStatus, LoanTerms, StatusPolicy, authorize,
    authorize_loan_read,
};
use crate::models::{LoanApplication, LoanFilter, NewLoanApplication};
use crate::services::loan_service::{
    LoanError, LoanQuery, LoanQuote, LoanService, LoanSubmission,
};
use crate::services::settings_service::SettingsService;

pub struct SeaOrmLoanService {
    store: Store,
    settings: Arc<dyn SettingsService>,
    policy: StatusPolicy,
    down_payment_ratio: f64,
}

impl SeaOrmLoanService {
    #[must_use]
    pub fn new(
        store: Store,
        settings: Arc<dyn SettingsService>,
        policy: StatusPolicy,
        down_payment_ratio: f64,
    ) -> Self {
        Self {
            store,
            settings,
            policy,
            down_payment_ratio,
        }
    }

    async fn fetch(&self, id: i32) -> Result<LoanApplication, LoanError> {
        self.store.get_loan(id).await?.ok_or(LoanError::NotFound)
    }
}

/// Presence and sign checks that do not depend on settings.
fn validate_submission(submission: &LoanSubmission) -> Result<(), LoanError> {
    let b = &submission.borrower;
    let r = &submission.request;

    let required = [
        ("full_name", &b.full_name),
        ("date_of_birth", &b.date_of_birth),
        ("phone_number", &b.phone_number),
        ("address", &b.address),
        ("national_id_number", &b.national_id_number),
        ("nid_front_url", &b.nid_front_url),
        ("nid_back_url", &b.nid_back_url),
        ("job_type", &b.job_type),
        ("bank_account_number", &b.bank_account_number),
        ("emergency_contact_name", &b.emergency_contact_name),
        ("emergency_contact_phone", &b.emergency_contact_phone),
        ("downpayment_screenshot_url", &r.downpayment_screenshot_url),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(LoanError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    if !b.salary_amount.is_finite() || b.salary_amount < 0.0 {
        return Err(LoanError::Validation(
            "salary_amount must be a non-negative number".to_string(),
        ));
    }

    if !r.loan_amount.is_finite() || r.loan_amount <= 0.0 {
        return Err(LoanError::Validation(
            "loan_amount must be a positive number".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl LoanService for SeaOrmLoanService {
    async fn submit(
        &self,
        caller: &Caller,
        submission: LoanSubmission,
    ) -> Result<LoanApplication, LoanError> {
        authorize(caller, Capability::SubmitLoan)?;
        validate_submission(&submission)?;

        let settings = self
            .settings
            .current()
            .await
            .map_err(|e| LoanError::Internal(e.to_string()))?;

        let amount = submission.request.loan_amount;
        if !settings.limits.contains(amount) {
            return Err(LoanError::AmountOutOfRange {
                min: settings.limits.min,
                max: settings.limits.max,
            });
        }

        let application = NewLoanApplication::new(
            caller.user_id,
            submission.borrower,
            submission.request,
            settings.interest_rate,
        );
        if application.terms().total_repayment() <= 0.0 {
            return Err(LoanError::Validation(
                "loan_amount is too large to compute repayment terms".to_string(),
            ));
        }
        let id = self.store.insert_loan(&application).await?;

        info!(
            loan_id = id,
            user_id = caller.user_id,
            amount,
            duration = %application.request.loan_duration,
            "Loan application submitted"
        );

        self.fetch(id).await
    }

    async fn list(
        &self,
        caller: &Caller,
        query: LoanQuery,
    ) -> Result<Vec<LoanApplication>, LoanError> {
        authorize(caller, Capability::ViewOwnLoans)?;

        let filter = LoanFilter {
            owner: loan_list_scope(caller, query.user_id),
            status: query.status,
        };

        Ok(self.store.list_loans(filter).await?)
    }

    async fn get(&self, caller: &Caller, id: i32) -> Result<LoanApplication, LoanError> {
        authorize(caller, Capability::ViewOwnLoans)?;

        let loan = self.fetch(id).await?;
        authorize_loan_read(caller, loan.user_id)?;
        Ok(loan)
    }

    async fn set_status(
        &self,
        caller: &Caller,
        id: i32,
        status: LoanStatus,
    ) -> Result<LoanApplication, LoanError> {
        authorize(caller, Capability::ChangeLoanStatus)?;

        let current = self.fetch(id).await?;
        self.policy.check(current.status, status)?;

        let changed_at = status.is_decision().then(now_timestamp);
        if !self.store.update_loan_status(id, status, changed_at).await? {
            return Err(LoanError::NotFound);
        }

        info!(
            loan_id = id,
            from = %current.status,
            to = %status,
            actor = caller.user_id,
            "Loan status changed"
        );

        self.fetch(id).await
    }

    async fn quote(&self, amount: f64, duration_months: u32) -> LoanQuote {
        let rate = match self.settings.current().await {
            Ok(settings) => settings.interest_rate,
            Err(e) => {
                warn!(error = %e, "Settings unavailable, quoting at the default rate");
                DEFAULT_INTEREST_RATE
            }
        };

        let terms = LoanTerms::compute(amount, duration_months, rate);
        LoanQuote {
            down_payment: terms.down_payment(self.down_payment_ratio),
            terms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoanDuration, PaymentMethod};
    use crate::models::{BorrowerDetails, LoanRequest};

    fn submission(amount: f64) -> LoanSubmission {
        LoanSubmission {
            borrower: BorrowerDetails {
                full_name: "Farhana Akter".to_string(),
                date_of_birth: "1994-02-11".to_string(),
                phone_number: "01711111111".to_string(),
                address: "House 4, Road 7, Dhanmondi".to_string(),
                national_id_number: "1994123456789".to_string(),
                nid_front_url: "nid_front.jpg".to_string(),
                nid_back_url: "nid_back.jpg".to_string(),
                salary_amount: 45_000.0,
                job_type: "Salaried".to_string(),
                bank_account_number: "1234567890".to_string(),
                emergency_contact_name: "Rashed Akter".to_string(),
                emergency_contact_phone: "01822222222".to_string(),
            },
            request: LoanRequest {
                loan_amount: amount,
                loan_duration: LoanDuration::ThreeMonths,
                downpayment_method: PaymentMethod::BKash,
                downpayment_screenshot_url: "bkash_receipt.png".to_string(),
            },
        }
    }

    #[test]
    fn test_complete_submission_is_valid() {
        assert!(validate_submission(&submission(10_000.0)).is_ok());
    }

    #[test]
    fn test_missing_fields_are_named() {
        let mut s = submission(10_000.0);
        s.borrower.nid_back_url = " ".to_string();
        s.request.downpayment_screenshot_url.clear();

        let Err(LoanError::Validation(msg)) = validate_submission(&s) else {
            panic!("expected a validation error");
        };
        assert!(msg.contains("nid_back_url"));
        assert!(msg.contains("downpayment_screenshot_url"));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(matches!(
            validate_submission(&submission(0.0)),
            Err(LoanError::Validation(_))
        ));
        assert!(matches!(
            validate_submission(&submission(-50.0)),
            Err(LoanError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_submission_with_uncomputable_terms_is_rejected() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let defaults = crate::config::LoanConfig::default();
        store
            .update_loan_limits(
                crate::models::LoanLimits {
                    min: 0.0,
                    max: f64::MAX,
                },
                &defaults,
            )
            .await
            .unwrap();

        let settings = Arc::new(crate::services::SeaOrmSettingsService::new(
            store.clone(),
            defaults,
        ));
        let service = SeaOrmLoanService::new(store.clone(), settings, StatusPolicy::default(), 0.1);
        let caller = Caller::new(1, crate::domain::Role::User);

        let result = service.submit(&caller, submission(f64::MAX)).await;
        assert!(matches!(result, Err(LoanError::Validation(msg)) if msg.contains("too large")));
        assert!(store.list_loans(LoanFilter::default()).await.unwrap().is_empty());

        let quote = service.quote(1e307, 6).await;
        assert!(quote.terms.emi_amount.is_finite());
        assert!(quote.terms.total_repayment.is_finite());
    }

    #[test]
    fn test_range_error_message() {
        let err = LoanError::AmountOutOfRange {
            min: 5000.0,
            max: 100_000.0,
        };
        assert_eq!(err.to_string(), "Loan amount must be between 5000 and 100000");
    }
}
