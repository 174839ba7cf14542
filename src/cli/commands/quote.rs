//! Offline repayment calculator

use crate::config::Config;
use crate::domain::LoanTerms;

pub fn cmd_quote(config: &Config, amount: f64, duration: i64, rate: Option<f64>) {
    let rate = rate.unwrap_or(config.loans.interest_rate);
    let months = u32::try_from(duration).unwrap_or(0);
    let terms = LoanTerms::compute(amount, months, rate);

    print!("{}", format_quote(&terms, config.loans.down_payment_ratio));
}

#[must_use]
pub fn format_quote(terms: &LoanTerms, down_payment_ratio: f64) -> String {
    let rows = [
        ("Principal", format!("{:.2}", terms.principal)),
        ("Duration", format!("{} months", terms.duration_months)),
        (
            "Interest rate",
            format!("{:.2}% per month", terms.interest_rate * 100.0),
        ),
        ("Total interest", format!("{:.2}", terms.total_interest)),
        ("Total repayment", format!("{:.2}", terms.total_repayment)),
        ("Monthly EMI", format!("{:.2}", terms.emi_amount)),
        (
            "Down payment",
            format!("{:.2}", terms.down_payment(down_payment_ratio)),
        ),
    ];

    rows.iter().fold(String::new(), |mut out, (label, value)| {
        use std::fmt::Write;
        let _ = writeln!(out, "{label:<16} {value}");
        out
    })
}
