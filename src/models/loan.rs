use serde::Serialize;

use crate::domain::{LoanDuration, LoanStatus, LoanTerms, PaymentMethod};

/// Identity, employment and contact details supplied by the borrower.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorrowerDetails {
    pub full_name: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub address: String,
    pub national_id_number: String,
    pub nid_front_url: String,
    pub nid_back_url: String,
    pub salary_amount: f64,
    pub job_type: String,
    pub bank_account_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

/// What is being borrowed and how the down payment was made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRequest {
    pub loan_amount: f64,
    pub loan_duration: LoanDuration,
    pub downpayment_method: PaymentMethod,
    pub downpayment_screenshot_url: String,
}

/// Repayment figures fixed when the application is created.
///
/// There is no setter: the only ways to obtain one are deriving it from a
/// request or restoring it from storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedTerms {
    emi_amount: f64,
    total_repayment: f64,
    interest_rate: f64,
}

impl DerivedTerms {
    #[must_use]
    pub fn derive(request: &LoanRequest, interest_rate: f64) -> Self {
        let terms = LoanTerms::for_duration(request.loan_amount, request.loan_duration, interest_rate);
        Self {
            emi_amount: terms.emi_amount,
            total_repayment: terms.total_repayment,
            interest_rate,
        }
    }

    pub(crate) const fn restore(emi_amount: f64, total_repayment: f64, interest_rate: f64) -> Self {
        Self {
            emi_amount,
            total_repayment,
            interest_rate,
        }
    }

    #[must_use]
    pub const fn emi_amount(&self) -> f64 {
        self.emi_amount
    }

    #[must_use]
    pub const fn total_repayment(&self) -> f64 {
        self.total_repayment
    }

    #[must_use]
    pub const fn interest_rate(&self) -> f64 {
        self.interest_rate
    }
}

/// A validated application ready to be persisted as Pending.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoanApplication {
    pub user_id: i32,
    pub borrower: BorrowerDetails,
    pub request: LoanRequest,
    terms: DerivedTerms,
}

impl NewLoanApplication {
    #[must_use]
    pub fn new(
        user_id: i32,
        borrower: BorrowerDetails,
        request: LoanRequest,
        interest_rate: f64,
    ) -> Self {
        let terms = DerivedTerms::derive(&request, interest_rate);
        Self {
            user_id,
            borrower,
            request,
            terms,
        }
    }

    #[must_use]
    pub const fn terms(&self) -> &DerivedTerms {
        &self.terms
    }
}

/// Short owner summary embedded in loan listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplication {
    pub id: i32,
    pub user_id: i32,
    pub applicant: Option<Applicant>,
    pub borrower: BorrowerDetails,
    pub request: LoanRequest,
    pub status: LoanStatus,
    terms: DerivedTerms,
    pub applied_at: String,
    pub status_changed_at: Option<String>,
    pub updated_at: String,
}

impl LoanApplication {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn from_stored(
        id: i32,
        user_id: i32,
        applicant: Option<Applicant>,
        borrower: BorrowerDetails,
        request: LoanRequest,
        status: LoanStatus,
        terms: DerivedTerms,
        applied_at: String,
        status_changed_at: Option<String>,
        updated_at: String,
    ) -> Self {
        Self {
            id,
            user_id,
            applicant,
            borrower,
            request,
            status,
            terms,
            applied_at,
            status_changed_at,
            updated_at,
        }
    }

    #[must_use]
    pub const fn terms(&self) -> &DerivedTerms {
        &self.terms
    }
}

/// Listing filter. `owner` is already scoped by the access gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub owner: Option<i32>,
    pub status: Option<LoanStatus>,
}
