//! Domain service for loan applications: submission, scoped reads, staff
//! status changes and the repayment calculator.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{AccessDenied, Caller, LoanStatus, LoanTerms, TransitionError};
use crate::models::{BorrowerDetails, LoanApplication, LoanRequest};

#[derive(Debug, Error)]
pub enum LoanError {
    /// Carries the limits in force so clients can show them.
    #[error("Loan amount must be between {min} and {max}")]
    AmountOutOfRange { min: f64, max: f64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Loan application not found")]
    NotFound,

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for LoanError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LoanError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Everything a borrower sends when applying.
#[derive(Debug, Clone)]
pub struct LoanSubmission {
    pub borrower: BorrowerDetails,
    pub request: LoanRequest,
}

/// Listing filter as requested by the caller, before scoping.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanQuery {
    pub status: Option<LoanStatus>,
    pub user_id: Option<i32>,
}

/// Calculator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanQuote {
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub down_payment: f64,
}

#[async_trait::async_trait]
pub trait LoanService: Send + Sync {
    /// Validates and stores a new application as `Pending` for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::Validation`] for missing fields or a non-positive
    /// amount and [`LoanError::AmountOutOfRange`] when the amount falls
    /// outside the current limits.
    async fn submit(
        &self,
        caller: &Caller,
        submission: LoanSubmission,
    ) -> Result<LoanApplication, LoanError>;

    /// Most recent first. A `User` only ever sees its own applications.
    async fn list(&self, caller: &Caller, query: LoanQuery)
    -> Result<Vec<LoanApplication>, LoanError>;

    async fn get(&self, caller: &Caller, id: i32) -> Result<LoanApplication, LoanError>;

    /// Staff-only status write. Entering Approved or Rejected stamps the
    /// status-changed time; the repayment figures are never recomputed.
    async fn set_status(
        &self,
        caller: &Caller,
        id: i32,
        status: LoanStatus,
    ) -> Result<LoanApplication, LoanError>;

    /// Terms at the current rate. Never fails: non-positive input gives zeros
    /// and an unreadable settings record falls back to the default rate.
    async fn quote(&self, amount: f64, duration_months: u32) -> LoanQuote;
}
