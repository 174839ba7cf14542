//! CLI module - Command-line interface for loandesk
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// loandesk - Loan application desk
/// Borrower submissions, staff review and admin-managed loan settings
#[derive(Parser)]
#[command(name = "loandesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    #[command(alias = "daemon", alias = "-d", alias = "--daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Show repayment terms for an amount and duration
    #[command(alias = "q")]
    Quote {
        /// Principal
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Duration in months
        #[arg(allow_negative_numbers = true)]
        duration: i64,
        /// Monthly flat interest rate (defaults to the configured rate)
        #[arg(long)]
        rate: Option<f64>,
    },

    /// List registered accounts
    #[command(alias = "ls")]
    Users,
}

pub use commands::*;
