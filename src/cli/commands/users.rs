//! List users command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        println!(
            "{:>4}  {:<32} {:<12} {}",
            user.id,
            user.email,
            user.role.as_str(),
            user.full_name
        );
    }

    Ok(())
}
