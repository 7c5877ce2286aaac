use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LendingError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as percentages (2.5 = 2.5% per period). Never as decimals.
pub type Percent = Decimal;

/// Interest model applied to a loan contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestModel {
    /// Interest computed once on the principal, split evenly across rows.
    Simple,
    /// Price table: flat installment, interest decomposed against a
    /// declining balance.
    Compound,
}

impl fmt::Display for InterestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Compound => write!(f, "compound"),
        }
    }
}

impl FromStr for InterestModel {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "compound" => Ok(Self::Compound),
            other => Err(LendingError::InvalidInput {
                field: "interest_model".into(),
                reason: format!("Unknown interest model '{other}'; expected 'simple' or 'compound'."),
            }),
        }
    }
}

/// Payment frequency. Each variant maps to a fixed day offset between
/// consecutive due dates; "monthly" is exactly 30 days, not one calendar
/// month. Schedules already generated with these offsets depend on them
/// staying fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Days between consecutive due dates.
    pub fn offset_days(&self) -> u64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Biweekly => 15,
            Self::Monthly => 30,
            Self::Quarterly => 90,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Frequency {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(LendingError::InvalidInput {
                field: "frequency".into(),
                reason: format!(
                    "Unknown frequency '{other}'; expected daily, weekly, biweekly, monthly, or quarterly."
                ),
            }),
        }
    }
}

/// Daily penalty applied to an overdue installment. Not part of the
/// schedule arithmetic itself; carried through to each row so downstream
/// accrual and display can read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LateFeePolicy {
    pub enabled: bool,
    pub daily_rate_percent: Percent,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_offsets() {
        assert_eq!(Frequency::Daily.offset_days(), 1);
        assert_eq!(Frequency::Weekly.offset_days(), 7);
        assert_eq!(Frequency::Biweekly.offset_days(), 15);
        assert_eq!(Frequency::Monthly.offset_days(), 30);
        assert_eq!(Frequency::Quarterly.offset_days(), 90);
    }

    #[test]
    fn test_frequency_round_trip() {
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::Monthly,
            Frequency::Quarterly,
        ] {
            assert_eq!(freq.to_string().parse::<Frequency>().unwrap(), freq);
        }
    }

    #[test]
    fn test_interest_model_parse() {
        assert_eq!("simple".parse::<InterestModel>().unwrap(), InterestModel::Simple);
        assert_eq!("Compound".parse::<InterestModel>().unwrap(), InterestModel::Compound);
        assert!("price".parse::<InterestModel>().is_err());
    }

    #[test]
    fn test_frequency_parse_rejects_unknown() {
        assert!("fortnightly".parse::<Frequency>().is_err());
    }
}
