//! Domain primitives for the loan desk: roles, the access gate and the loan
//! lifecycle. Nothing in here touches storage or HTTP.

pub mod access;
pub mod loan;
pub mod role;

pub use access::{AccessDenied, Caller, Capability, authorize, authorize_loan_read};
pub use loan::{
    DEFAULT_INTEREST_RATE, InvalidValue, LoanDuration, LoanStatus, LoanTerms, PaymentMethod,
    StatusPolicy, TransitionError, round_cents,
};
pub use role::{Role, UnknownRole};
