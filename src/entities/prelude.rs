pub use super::loan_applications::Entity as LoanApplications;
pub use super::settings::Entity as Settings;
pub use super::users::Entity as Users;
