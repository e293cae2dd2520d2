//! Schedule composer: monthly + bonus sub-schedules on one calendar

mod calendar;
mod composer;

pub use calendar::{month_end_series, month_label, same_month};
pub use composer::{
    compose, LoanSchedule, MergedScheduleRow, ScheduleSummary, BONUS_INTERVAL_MONTHS,
    FIRST_BONUS_MONTH, FIRST_MONTHLY_MONTH,
};
