pub mod loan;
pub mod settings;
pub mod user;
