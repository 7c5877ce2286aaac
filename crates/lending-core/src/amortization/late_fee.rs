use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Installment, HUNDRED};
use crate::error::LendingError;
use crate::types::{Money, Percent};
use crate::LendingResult;

/// Whole days an installment is overdue as of `as_of`. Never negative.
pub fn days_overdue(due_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - due_date).num_days().max(0)
}

/// Daily penalty accrued on an overdue installment:
/// `value * (rate/100) * days_overdue`. Zero when `as_of` is on or
/// before the due date.
pub fn late_fee_amount(
    installment_value: Money,
    due_date: NaiveDate,
    as_of: NaiveDate,
    daily_rate_percent: Percent,
) -> LendingResult<Money> {
    if daily_rate_percent < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "daily_rate_percent".into(),
            reason: "Late-fee rate cannot be negative.".into(),
        });
    }

    let days = Decimal::from(days_overdue(due_date, as_of));
    Ok(installment_value * (daily_rate_percent / HUNDRED) * days)
}

/// Accrue the late fee for a schedule row.
pub fn project_late_fee(
    installment: &Installment,
    as_of: NaiveDate,
    daily_rate_percent: Percent,
) -> LendingResult<Money> {
    late_fee_amount(
        installment.installment_value,
        installment.due_date,
        as_of,
        daily_rate_percent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_thirty_days_overdue() {
        // 500 * 0.033% * 30 days = 4.95
        let fee =
            late_fee_amount(dec!(500), date(2024, 1, 1), date(2024, 1, 31), dec!(0.033)).unwrap();
        assert_eq!(fee, dec!(4.95));
    }

    #[test]
    fn test_zero_on_or_before_due_date() {
        let due = date(2024, 1, 15);
        assert_eq!(late_fee_amount(dec!(500), due, due, dec!(0.033)).unwrap(), dec!(0));
        assert_eq!(
            late_fee_amount(dec!(500), due, date(2024, 1, 10), dec!(0.033)).unwrap(),
            dec!(0)
        );
    }

    #[test]
    fn test_days_overdue_floors_at_zero() {
        assert_eq!(days_overdue(date(2024, 1, 15), date(2024, 1, 10)), 0);
        assert_eq!(days_overdue(date(2024, 1, 15), date(2024, 1, 16)), 1);
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(
            late_fee_amount(dec!(500), date(2024, 1, 1), date(2024, 2, 1), dec!(-1)).is_err()
        );
    }

    #[test]
    fn test_project_from_installment_row() {
        let row = Installment {
            number: 1,
            due_date: date(2024, 1, 1),
            installment_value: dec!(500),
            principal_portion: dec!(450),
            interest_portion: dec!(50),
            remaining_balance: dec!(0),
            late_fee: None,
        };
        let fee = project_late_fee(&row, date(2024, 1, 31), dec!(0.033)).unwrap();
        assert_eq!(fee, dec!(4.95));
    }
}
