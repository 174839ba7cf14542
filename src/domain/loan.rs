//! Loan lifecycle primitives: the enumerated value sets, the flat-rate
//! repayment terms and the status transition policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Interest rate used whenever the settings record cannot supply one.
pub const DEFAULT_INTEREST_RATE: f64 = 0.03;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: '{value}'. Expected one of: {expected}")]
pub struct InvalidValue {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl InvalidValue {
    fn new(field: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl LoanStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Paid];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Paid => "Paid",
        }
    }

    /// Entering one of these states stamps the status-changed timestamp.
    #[must_use]
    pub const fn is_decision(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| InvalidValue::new("status", s, "Pending, Approved, Rejected, Paid"))
    }
}

/// Repayment period. Serialized as the month count string ("3" / "6").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanDuration {
    #[serde(rename = "3")]
    ThreeMonths,
    #[serde(rename = "6")]
    SixMonths,
}

impl LoanDuration {
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThreeMonths => "3",
            Self::SixMonths => "6",
        }
    }
}

impl fmt::Display for LoanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanDuration {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3" => Ok(Self::ThreeMonths),
            "6" => Ok(Self::SixMonths),
            other => Err(InvalidValue::new("loan duration", other, "3, 6")),
        }
    }
}

/// Mobile payment channel used for the down payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "bKash")]
    BKash,
    Nagad,
    Rocket,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BKash => "bKash",
            Self::Nagad => "Nagad",
            Self::Rocket => "Rocket",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bKash" => Ok(Self::BKash),
            "Nagad" => Ok(Self::Nagad),
            "Rocket" => Ok(Self::Rocket),
            other => Err(InvalidValue::new(
                "down payment method",
                other,
                "bKash, Nagad, Rocket",
            )),
        }
    }
}

/// Round to the cent, half away from zero. Magnitudes too large to scale
/// carry no fractional cents and are returned as is.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

/// Flat-rate repayment terms.
///
/// Interest is charged once on the full principal for every month of the
/// term; the installment is the total spread evenly across the months.
/// Non-positive (or non-finite) principal or month count yields all-zero
/// terms instead of an error, so the calculator can always render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanTerms {
    pub principal: f64,
    pub duration_months: u32,
    pub interest_rate: f64,
    pub total_interest: f64,
    pub total_repayment: f64,
    pub emi_amount: f64,
}

impl LoanTerms {
    #[must_use]
    pub fn compute(principal: f64, duration_months: u32, interest_rate: f64) -> Self {
        if !principal.is_finite() || principal <= 0.0 || duration_months == 0 {
            return Self::zero(principal.max(0.0), duration_months, interest_rate);
        }

        let months = f64::from(duration_months);
        let total_interest = principal * interest_rate * months;
        let total_repayment = principal + total_interest;
        let emi_amount = total_repayment / months;

        if !(total_interest.is_finite() && total_repayment.is_finite() && emi_amount.is_finite())
        {
            return Self::zero(principal, duration_months, interest_rate);
        }

        Self {
            principal,
            duration_months,
            interest_rate,
            total_interest: round_cents(total_interest),
            total_repayment: round_cents(total_repayment),
            emi_amount: round_cents(emi_amount),
        }
    }

    const fn zero(principal: f64, duration_months: u32, interest_rate: f64) -> Self {
        Self {
            principal,
            duration_months,
            interest_rate,
            total_interest: 0.0,
            total_repayment: 0.0,
            emi_amount: 0.0,
        }
    }

    #[must_use]
    pub fn for_duration(principal: f64, duration: LoanDuration, interest_rate: f64) -> Self {
        Self::compute(principal, duration.months(), interest_rate)
    }

    /// Upfront payment shown to the borrower; not part of the repayment.
    #[must_use]
    pub fn down_payment(&self, ratio: f64) -> f64 {
        let down_payment = self.principal * ratio;
        if self.principal <= 0.0 || !down_payment.is_finite() {
            return 0.0;
        }
        round_cents(down_payment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot move a loan from {from} to {to}")]
pub struct TransitionError {
    pub from: LoanStatus,
    pub to: LoanStatus,
}

/// How staff status writes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any status may be written at any time; last write wins.
    #[default]
    Permissive,
    /// Pending -> Approved | Rejected, Approved -> Paid. Nothing else.
    Strict,
}

impl StatusPolicy {
    #[must_use]
    pub const fn from_enforce_flag(enforce: bool) -> Self {
        if enforce { Self::Strict } else { Self::Permissive }
    }

    pub fn check(self, from: LoanStatus, to: LoanStatus) -> Result<(), TransitionError> {
        let allowed = match self {
            Self::Permissive => true,
            Self::Strict => matches!(
                (from, to),
                (
                    LoanStatus::Pending,
                    LoanStatus::Approved | LoanStatus::Rejected
                ) | (LoanStatus::Approved, LoanStatus::Paid)
            ),
        };

        if allowed {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_three_months() {
        let terms = LoanTerms::compute(10_000.0, 3, 0.03);
        assert_eq!(terms.total_interest, 900.0);
        assert_eq!(terms.total_repayment, 10_900.0);
        assert_eq!(terms.emi_amount, 3633.33);
    }

    #[test]
    fn test_terms_six_months() {
        let terms = LoanTerms::for_duration(50_000.0, LoanDuration::SixMonths, 0.03);
        assert_eq!(terms.total_interest, 9000.0);
        assert_eq!(terms.total_repayment, 59_000.0);
        assert_eq!(terms.emi_amount, 9833.33);
    }

    #[test]
    fn test_terms_stay_finite_for_huge_principal() {
        let terms = LoanTerms::compute(1e307, 6, 0.03);
        assert!(terms.total_interest.is_finite());
        assert!(terms.total_repayment.is_finite());
        assert!(terms.emi_amount.is_finite());
        assert!(terms.down_payment(0.10).is_finite());

        let terms = LoanTerms::compute(f64::MAX, 6, 0.03);
        assert_eq!(terms.total_interest, 0.0);
        assert_eq!(terms.total_repayment, 0.0);
        assert_eq!(terms.emi_amount, 0.0);
        assert_eq!(terms.down_payment(10.0), 0.0);
    }

    #[test]
    fn test_round_cents_keeps_unscalable_values() {
        assert_eq!(round_cents(1e307), 1e307);
    }

    #[test]
    fn test_terms_zero_for_non_positive_inputs() {
        for (principal, months) in [(0.0, 3), (-500.0, 6), (10_000.0, 0), (f64::NAN, 3)] {
            let terms = LoanTerms::compute(principal, months, 0.03);
            assert_eq!(terms.total_interest, 0.0);
            assert_eq!(terms.total_repayment, 0.0);
            assert_eq!(terms.emi_amount, 0.0);
        }
    }

    #[test]
    fn test_emi_times_months_tracks_total_repayment() {
        // Each installment is rounded to the cent, so the schedule drifts by
        // at most half a cent per month.
        let mut principal = 1.0;
        while principal < 250_000.0 {
            for duration in [LoanDuration::ThreeMonths, LoanDuration::SixMonths] {
                let terms = LoanTerms::for_duration(principal, duration, DEFAULT_INTEREST_RATE);
                let months = f64::from(duration.months());
                let drift = (terms.emi_amount * months - terms.total_repayment).abs();
                assert!(
                    drift <= 0.005 * months + 1e-6,
                    "principal {principal} duration {duration}: drift {drift}"
                );
            }
            principal = principal * 1.37 + 13.0;
        }
    }

    #[test]
    fn test_down_payment() {
        let terms = LoanTerms::compute(25_000.0, 3, 0.03);
        assert_eq!(terms.down_payment(0.10), 2500.0);
        assert_eq!(LoanTerms::compute(0.0, 3, 0.03).down_payment(0.10), 0.0);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(3633.333_333), 3633.33);
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(12.0), 12.0);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Approved".parse::<LoanStatus>(), Ok(LoanStatus::Approved));
        assert!("approved".parse::<LoanStatus>().is_err());
        assert_eq!("6".parse::<LoanDuration>(), Ok(LoanDuration::SixMonths));
        assert!("12".parse::<LoanDuration>().is_err());
        assert_eq!("bKash".parse::<PaymentMethod>(), Ok(PaymentMethod::BKash));
        assert!("PayPal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_enum_serde() {
        assert_eq!(
            serde_json::to_string(&LoanDuration::ThreeMonths).unwrap(),
            "\"3\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BKash).unwrap(),
            "\"bKash\""
        );
        assert_eq!(
            serde_json::to_string(&LoanStatus::Paid).unwrap(),
            "\"Paid\""
        );
    }

    #[test]
    fn test_permissive_policy_allows_everything() {
        let policy = StatusPolicy::Permissive;
        for from in LoanStatus::ALL {
            for to in LoanStatus::ALL {
                assert!(policy.check(from, to).is_ok());
            }
        }
    }

    #[test]
    fn test_strict_policy() {
        let policy = StatusPolicy::from_enforce_flag(true);
        assert!(policy.check(LoanStatus::Pending, LoanStatus::Approved).is_ok());
        assert!(policy.check(LoanStatus::Pending, LoanStatus::Rejected).is_ok());
        assert!(policy.check(LoanStatus::Approved, LoanStatus::Paid).is_ok());
        assert!(policy.check(LoanStatus::Pending, LoanStatus::Paid).is_err());
        assert!(policy.check(LoanStatus::Approved, LoanStatus::Rejected).is_err());
        assert!(policy.check(LoanStatus::Rejected, LoanStatus::Approved).is_err());
        assert!(policy.check(LoanStatus::Paid, LoanStatus::Pending).is_err());
    }

    #[test]
    fn test_decision_states() {
        assert!(LoanStatus::Approved.is_decision());
        assert!(LoanStatus::Rejected.is_decision());
        assert!(!LoanStatus::Paid.is_decision());
        assert!(!LoanStatus::Pending.is_decision());
    }
}
