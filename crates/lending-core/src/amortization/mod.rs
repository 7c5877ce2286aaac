//! Loan amortization engine: installment schedules under simple and
//! compound ("Price") interest, fixed-offset due-date projection, and
//! daily late-fee accrual. All math in `rust_decimal::Decimal`.

pub mod due_dates;
pub mod late_fee;

pub use due_dates::project_due_date;
pub use late_fee::{days_overdue, late_fee_amount, project_late_fee};

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LendingError;
use crate::types::{
    with_metadata, ComputationOutput, Frequency, InterestModel, LateFeePolicy, Money, Percent,
};
use crate::LendingResult;

pub(crate) const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Terms of a loan contract, as captured at signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount lent, excluding interest.
    pub principal: Money,
    /// Interest rate per installment period, as a percentage (2.5 = 2.5%).
    /// Not annualized.
    pub period_rate_percent: Percent,
    /// Simple or compound (Price) interest.
    pub interest_model: InterestModel,
    /// Number of installments.
    pub installment_count: u32,
    /// Spacing between due dates.
    pub frequency: Frequency,
    /// Date of signing.
    pub contract_date: NaiveDate,
    /// Anchor for due-date projection; installment n falls
    /// `offset_days * (n - 1)` days after this date.
    pub first_installment_date: NaiveDate,
    /// Optional daily penalty on overdue installments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_fee: Option<LateFeePolicy>,
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based sequential number.
    pub number: u32,
    pub due_date: NaiveDate,
    /// Flat payment amount, identical on every row of a schedule.
    pub installment_value: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance after this payment, floored at zero.
    pub remaining_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_fee: Option<LateFeePolicy>,
}

/// A full amortization schedule with summary totals. The summary scalars
/// are rounded to currency precision (2 dp); row values are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub installments: Vec<Installment>,
    pub installment_value: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_receivable: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the full amortization schedule for a set of loan terms.
///
/// Simple interest charges `P * (r/100) * n` once and splits it evenly
/// across rows. Compound interest grows the receivable to
/// `P * (1 + r/100)^n` and walks a declining balance to decompose each
/// flat payment into principal and interest.
///
/// The compound walk starts the balance at the total receivable, so
/// per-period interest accrues on the outstanding receivable rather than
/// the declining principal of the textbook Price system. Every schedule
/// the original product persisted was generated on this basis; changing
/// it would disagree with stored rows, so it is kept and surfaced in the
/// envelope's `assumptions`.
///
/// A zero principal is not an error: it yields an empty, zeroed schedule
/// with a warning.
pub fn compute_schedule(terms: &LoanTerms) -> LendingResult<ComputationOutput<Schedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(terms)?;

    if terms.first_installment_date < terms.contract_date {
        warnings.push("First installment date precedes the contract date.".into());
    }

    if terms.principal.is_zero() {
        warnings.push("Principal is zero; schedule is empty.".into());
        let schedule = Schedule {
            installments: Vec::new(),
            installment_value: Decimal::ZERO,
            total_principal: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_receivable: Decimal::ZERO,
        };
        let elapsed = start.elapsed().as_micros() as u64;
        return Ok(finish(terms, warnings, elapsed, schedule));
    }

    let periods = Decimal::from(terms.installment_count);
    let rate = terms.period_rate_percent / HUNDRED;

    let (total_receivable, total_interest) = match terms.interest_model {
        InterestModel::Simple => {
            // J = P * i * n
            let interest = terms.principal * rate * periods;
            (terms.principal + interest, interest)
        }
        InterestModel::Compound => {
            // M = P * (1 + i)^n
            let receivable =
                terms.principal * (Decimal::ONE + rate).powu(u64::from(terms.installment_count));
            (receivable, receivable - terms.principal)
        }
    };
    let installment_value = total_receivable / periods;

    if terms.interest_model == InterestModel::Compound && rate * periods > Decimal::ONE {
        warnings.push(
            "Period rate times installment count exceeds 100%; early interest portions \
             exceed the flat installment and the balance will not decline monotonically."
                .into(),
        );
    }

    // Simple model: equal interest split, never re-rated on the balance.
    let flat_interest = total_interest / periods;
    let row_late_fee = terms.late_fee.filter(|policy| policy.enabled);

    let mut balance = total_receivable;
    let mut total_principal = Decimal::ZERO;
    let mut installments = Vec::with_capacity(terms.installment_count as usize);

    for number in 1..=terms.installment_count {
        let interest_portion = match terms.interest_model {
            InterestModel::Simple => flat_interest,
            InterestModel::Compound => balance * rate,
        };
        let principal_portion = installment_value - interest_portion;
        balance = (balance - principal_portion).max(Decimal::ZERO);
        total_principal += principal_portion;

        installments.push(Installment {
            number,
            due_date: project_due_date(terms.first_installment_date, terms.frequency, number)?,
            installment_value,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
            late_fee: row_late_fee,
        });
    }

    let schedule = Schedule {
        installments,
        installment_value: installment_value.round_dp(2),
        total_principal: total_principal.round_dp(2),
        total_interest: total_interest.round_dp(2),
        total_receivable: total_receivable.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(finish(terms, warnings, elapsed, schedule))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_terms(terms: &LoanTerms) -> LendingResult<()> {
    if terms.principal < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative.".into(),
        });
    }
    if terms.period_rate_percent < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "period_rate_percent".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if terms.installment_count < 1 {
        return Err(LendingError::InvalidInput {
            field: "installment_count".into(),
            reason: "At least one installment is required.".into(),
        });
    }
    if let Some(policy) = &terms.late_fee {
        if policy.daily_rate_percent < Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: "late_fee.daily_rate_percent".into(),
                reason: "Late-fee rate cannot be negative.".into(),
            });
        }
    }
    Ok(())
}

fn finish(
    terms: &LoanTerms,
    warnings: Vec<String>,
    elapsed_us: u64,
    schedule: Schedule,
) -> ComputationOutput<Schedule> {
    let methodology = match terms.interest_model {
        InterestModel::Simple => "Simple interest (flat installment, equal interest split)",
        InterestModel::Compound => "Price table (flat installment, receivable-basis decomposition)",
    };
    let assumptions = serde_json::json!({
        "frequency": terms.frequency.to_string(),
        "frequency_offset_days": terms.frequency.offset_days(),
        "compound_interest_basis": "declining total receivable",
        "rounding": "summary scalars at 2 dp; rows unrounded",
    });
    with_metadata(methodology, &assumptions, warnings, elapsed_us, schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(1000),
            period_rate_percent: dec!(2),
            interest_model: InterestModel::Simple,
            installment_count: 5,
            frequency: Frequency::Monthly,
            contract_date: date(2024, 1, 1),
            first_installment_date: date(2024, 1, 10),
            late_fee: None,
        }
    }

    #[test]
    fn test_simple_interest_totals() {
        let output = compute_schedule(&sample_terms()).unwrap();
        let schedule = &output.result;

        // J = 1000 * 0.02 * 5 = 100
        assert_eq!(schedule.total_interest, dec!(100));
        assert_eq!(schedule.total_receivable, dec!(1100));
        assert_eq!(schedule.installment_value, dec!(220));
        assert_eq!(schedule.total_principal, dec!(1000));
        assert_eq!(schedule.installments.len(), 5);
    }

    #[test]
    fn test_simple_interest_rows_split_evenly() {
        let output = compute_schedule(&sample_terms()).unwrap();
        for row in &output.result.installments {
            assert_eq!(row.interest_portion, dec!(20));
            assert_eq!(row.principal_portion, dec!(200));
            assert_eq!(row.installment_value, dec!(220));
        }
    }

    #[test]
    fn test_zero_rate_splits_principal_only() {
        let terms = LoanTerms {
            period_rate_percent: dec!(0),
            installment_count: 4,
            ..sample_terms()
        };
        let output = compute_schedule(&terms).unwrap();
        let schedule = &output.result;

        assert_eq!(schedule.total_interest, dec!(0));
        assert_eq!(schedule.installment_value, dec!(250));
        assert_eq!(schedule.installments.last().unwrap().remaining_balance, dec!(0));
    }

    #[test]
    fn test_zero_principal_is_degenerate_not_error() {
        let terms = LoanTerms {
            principal: dec!(0),
            ..sample_terms()
        };
        let output = compute_schedule(&terms).unwrap();
        let schedule = &output.result;

        assert_eq!(schedule.total_interest, dec!(0));
        assert_eq!(schedule.installment_value, dec!(0));
        assert_eq!(schedule.total_receivable, dec!(0));
        assert!(schedule.installments.is_empty());
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_negative_principal_rejected() {
        let terms = LoanTerms {
            principal: dec!(-1),
            ..sample_terms()
        };
        assert!(matches!(
            compute_schedule(&terms),
            Err(LendingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_installments_rejected() {
        let terms = LoanTerms {
            installment_count: 0,
            ..sample_terms()
        };
        assert!(matches!(
            compute_schedule(&terms),
            Err(LendingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_late_fee_rate_rejected() {
        let terms = LoanTerms {
            late_fee: Some(LateFeePolicy {
                enabled: true,
                daily_rate_percent: dec!(-0.1),
            }),
            ..sample_terms()
        };
        assert!(matches!(
            compute_schedule(&terms),
            Err(LendingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_first_due_before_contract_warns() {
        let terms = LoanTerms {
            first_installment_date: date(2023, 12, 20),
            ..sample_terms()
        };
        let output = compute_schedule(&terms).unwrap();
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("precedes the contract date")));
    }

    #[test]
    fn test_late_fee_policy_carried_only_when_enabled() {
        let enabled = LoanTerms {
            late_fee: Some(LateFeePolicy {
                enabled: true,
                daily_rate_percent: dec!(0.033),
            }),
            ..sample_terms()
        };
        let output = compute_schedule(&enabled).unwrap();
        for row in &output.result.installments {
            assert_eq!(row.late_fee.unwrap().daily_rate_percent, dec!(0.033));
        }

        let disabled = LoanTerms {
            late_fee: Some(LateFeePolicy {
                enabled: false,
                daily_rate_percent: dec!(0.033),
            }),
            ..sample_terms()
        };
        let output = compute_schedule(&disabled).unwrap();
        for row in &output.result.installments {
            assert!(row.late_fee.is_none());
        }
    }

    #[test]
    fn test_envelope_names_the_receivable_basis() {
        let terms = LoanTerms {
            interest_model: InterestModel::Compound,
            ..sample_terms()
        };
        let output = compute_schedule(&terms).unwrap();
        assert_eq!(
            output.assumptions["compound_interest_basis"],
            "declining total receivable"
        );
    }
}
