use serde::{Deserialize, Serialize};

use crate::domain::{LoanStatus, Role};
use crate::models::{
    Applicant, BorrowerDetails, DerivedTerms, LoanApplication, LoanRequest, User,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Public profile. Never carries the credential hash or the session token.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone_number: user.phone_number,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

impl From<User> for AuthResponse {
    fn from(user: User) -> Self {
        let token = user.api_key.clone();
        Self {
            user: user.into(),
            token,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: String,
}

// ============================================================================
// Loans
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LoanDto {
    pub id: i32,
    pub user_id: i32,
    pub applicant: Option<Applicant>,
    #[serde(flatten)]
    pub borrower: BorrowerDetails,
    #[serde(flatten)]
    pub request: LoanRequest,
    pub status: LoanStatus,
    #[serde(flatten)]
    pub terms: DerivedTerms,
    pub applied_at: String,
    pub status_changed_at: Option<String>,
    pub updated_at: String,
}

impl From<LoanApplication> for LoanDto {
    fn from(loan: LoanApplication) -> Self {
        let terms = *loan.terms();
        Self {
            id: loan.id,
            user_id: loan.user_id,
            applicant: loan.applicant,
            borrower: loan.borrower,
            request: loan.request,
            status: loan.status,
            terms,
            applied_at: loan.applied_at,
            status_changed_at: loan.status_changed_at,
            updated_at: loan.updated_at,
        }
    }
}

/// Application form. Every field defaults so that absent fields are reported
/// together by `missing_fields` rather than one at a time by the parser.
/// Derived repayment figures are not accepted here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplyLoanRequest {
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
    pub loan_amount: f64,
    pub loan_duration: String,
    pub downpayment_method: String,
    pub downpayment_screenshot_url: String,
}

impl ApplyLoanRequest {
    /// Names of text fields left blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full_name", &self.full_name),
            ("date_of_birth", &self.date_of_birth),
            ("phone_number", &self.phone_number),
            ("address", &self.address),
            ("national_id_number", &self.national_id_number),
            ("nid_front_url", &self.nid_front_url),
            ("nid_back_url", &self.nid_back_url),
            ("job_type", &self.job_type),
            ("bank_account_number", &self.bank_account_number),
            ("emergency_contact_name", &self.emergency_contact_name),
            ("emergency_contact_phone", &self.emergency_contact_phone),
            ("loan_duration", &self.loan_duration),
            ("downpayment_method", &self.downpayment_method),
            ("downpayment_screenshot_url", &self.downpayment_screenshot_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoanListQuery {
    pub status: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Calculator inputs are taken as raw text and parsed leniently.
#[derive(Debug, Default, Deserialize)]
pub struct CalculateQuery {
    pub amount: Option<String>,
    pub duration: Option<String>,
}
