pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Registration};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod settings_service;
pub mod settings_service_impl;
pub use settings_service::{SettingsError, SettingsService};
pub use settings_service_impl::SeaOrmSettingsService;

pub mod loan_service;
pub mod loan_service_impl;
pub use loan_service::{LoanError, LoanQuery, LoanQuote, LoanService, LoanSubmission};
pub use loan_service_impl::SeaOrmLoanService;
