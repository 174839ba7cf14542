pub mod prelude;

pub mod loan_applications;
pub mod settings;
pub mod users;
