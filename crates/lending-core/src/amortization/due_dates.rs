use chrono::{Days, NaiveDate};

use crate::error::LendingError;
use crate::types::Frequency;
use crate::LendingResult;

/// Due date of installment `number` (1-based), anchored at the first
/// installment date and stepped by the frequency's fixed day offset.
///
/// Plain day arithmetic: month and year rollover come from the calendar,
/// but "monthly" never snaps to a calendar month boundary.
pub fn project_due_date(
    first_installment_date: NaiveDate,
    frequency: Frequency,
    number: u32,
) -> LendingResult<NaiveDate> {
    if number < 1 {
        return Err(LendingError::InvalidInput {
            field: "number".into(),
            reason: "Installment numbers start at 1.".into(),
        });
    }

    let offset = frequency.offset_days() * u64::from(number - 1);
    first_installment_date
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| {
            LendingError::DateError(format!(
                "Due date out of range: {} + {} days",
                first_installment_date, offset
            ))
        })
}
