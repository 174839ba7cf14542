mod quote;
mod users;

pub use quote::{cmd_quote, format_quote};
pub use users::cmd_list_users;
