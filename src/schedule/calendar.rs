//! Month-end dates for the repayment timeline

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{LoanError, Result};

/// `count` month-ends starting at `year`-`month`, `step` months apart
pub fn month_end_series(year: i32, month: u32, count: u32, step: u32) -> Result<Vec<NaiveDate>> {
    let out_of_calendar = || {
        LoanError::invalid(
            "start_year",
            format!(
                "{}-{:02} plus {} months is not a valid date",
                year,
                month,
                count.saturating_mul(step)
            ),
        )
    };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_calendar)?;
    (0..count)
        .map(|i| {
            // Offset from the first of the month so short months never clamp
            i.checked_mul(step)
                .and_then(|offset| offset.checked_add(1))
                .and_then(|offset| first.checked_add_months(Months::new(offset)))
                .and_then(|next_first| next_first.pred_opt())
                .ok_or_else(out_of_calendar)
        })
        .collect()
}

/// `YYYY-MM` label of a date
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// True when both dates fall in the same calendar month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
