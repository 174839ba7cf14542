use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanLimits {
    pub min: f64,
    pub max: f64,
}

impl LoanLimits {
    /// Inclusive range check. An inverted range (min > max) admits nothing.
    #[must_use]
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

/// Receiving account number per down-payment channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNumbers {
    #[serde(rename = "bKash")]
    pub bkash: String,
    #[serde(rename = "Nagad")]
    pub nagad: String,
    #[serde(rename = "Rocket")]
    pub rocket: String,
}

/// The singleton settings record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSettings {
    pub limits: LoanLimits,
    pub payment_numbers: PaymentNumbers,
    pub interest_rate: f64,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_inclusive() {
        let limits = LoanLimits {
            min: 5000.0,
            max: 100_000.0,
        };
        assert!(limits.contains(5000.0));
        assert!(limits.contains(100_000.0));
        assert!(!limits.contains(4999.99));
        assert!(!limits.contains(100_000.01));
    }

    #[test]
    fn test_inverted_limits_admit_nothing() {
        let limits = LoanLimits {
            min: 10.0,
            max: 5.0,
        };
        assert!(limits.is_inverted());
        assert!(!limits.contains(7.0));
    }

    #[test]
    fn test_payment_numbers_wire_names() {
        let numbers = PaymentNumbers {
            bkash: "017".to_string(),
            nagad: "018".to_string(),
            rocket: "019".to_string(),
        };
        let json = serde_json::to_value(&numbers).unwrap();
        assert_eq!(json["bKash"], "017");
        assert_eq!(json["Nagad"], "018");
        assert_eq!(json["Rocket"], "019");
    }
}
