pub mod loan;
pub mod settings;
pub mod user;

pub use loan::{
    Applicant, BorrowerDetails, DerivedTerms, LoanApplication, LoanFilter, LoanRequest,
    NewLoanApplication,
};
pub use settings::{LoanLimits, LoanSettings, PaymentNumbers};
pub use user::{NewUser, User, normalize_email};
