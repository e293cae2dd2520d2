//! Merge the monthly and bonus sub-schedules onto one monthly calendar

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::calendar::{month_end_series, month_label, same_month};
use crate::amortization::{amortize, AmortizationSchedule, PeriodRecord};
use crate::error::{LoanError, Result};
use crate::loan::LoanScenario;

/// Month in which the first monthly installment falls
pub const FIRST_MONTHLY_MONTH: u32 = 1;
/// Month in which the first bonus installment falls
pub const FIRST_BONUS_MONTH: u32 = 6;
/// Months between bonus installments
pub const BONUS_INTERVAL_MONTHS: u32 = 6;

/// One calendar month of the combined repayment ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedScheduleRow {
    /// Position in the ledger (1-indexed)
    pub month_index: u32,

    /// Month-end payment date
    pub date: NaiveDate,

    // Components
    pub monthly_payment: i64,
    pub bonus_payment: i64,
    /// A bonus installment was joined onto this month (its payment may floor to 0)
    pub has_bonus: bool,

    // Combined installment
    pub payment: i64,
    pub principal_portion: i64,
    pub interest_portion: i64,

    // Running totals
    pub cumulative_payment: i64,
    pub cumulative_principal: i64,
    pub cumulative_interest: i64,

    /// Lifetime payments still to be made
    pub remaining_balance: i64,
    /// Principal disbursed and not yet repaid
    pub remaining_principal_balance: i64,
    /// Lifetime interest still to be paid
    pub remaining_interest: i64,
}

impl MergedScheduleRow {
    fn new(
        month_index: u32,
        date: NaiveDate,
        monthly: Option<&PeriodRecord>,
        bonus: Option<&PeriodRecord>,
    ) -> Self {
        let part = |r: Option<&PeriodRecord>| {
            r.map(|r| (r.payment, r.principal_portion, r.interest_portion))
                .unwrap_or((0, 0, 0))
        };
        let (m_pay, m_prin, m_int) = part(monthly);
        let (b_pay, b_prin, b_int) = part(bonus);

        Self {
            month_index,
            date,
            monthly_payment: m_pay,
            bonus_payment: b_pay,
            has_bonus: bonus.is_some(),
            payment: m_pay + b_pay,
            principal_portion: m_prin + b_prin,
            interest_portion: m_int + b_int,
            cumulative_payment: 0,
            cumulative_principal: 0,
            cumulative_interest: 0,
            remaining_balance: 0,
            remaining_principal_balance: 0,
            remaining_interest: 0,
        }
    }

    pub fn is_bonus_month(&self) -> bool {
        self.has_bonus
    }

    /// `YYYY-MM`
    pub fn month_label(&self) -> String {
        month_label(self.date)
    }
}

/// Left-join the bonus schedule onto the monthly calendar and derive the
/// running balance columns.
///
/// Monthly installments fall on consecutive month-ends from January of
/// `start_year`; bonus installments every six months from June. Months
/// without a bonus installment contribute zero. The ledger has one row per
/// monthly installment; when the monthly sub-loan is empty it spans the
/// bonus installments instead.
pub fn compose(
    monthly: &AmortizationSchedule,
    bonus: &AmortizationSchedule,
    start_year: i32,
    total_principal: i64,
) -> Result<Vec<MergedScheduleRow>> {
    let month_count = if monthly.is_empty() {
        bonus.len() as u32 * BONUS_INTERVAL_MONTHS
    } else {
        monthly.len() as u32
    };

    let monthly_dates = month_end_series(start_year, FIRST_MONTHLY_MONTH, month_count, 1)?;
    let bonus_dates = month_end_series(
        start_year,
        FIRST_BONUS_MONTH,
        bonus.len() as u32,
        BONUS_INTERVAL_MONTHS,
    )?;
    let mut bonus_dated = bonus_dates.into_iter().zip(bonus.records.iter()).peekable();

    let mut rows = Vec::with_capacity(month_count as usize);
    for (i, date) in monthly_dates.into_iter().enumerate() {
        // Bonus dates earlier than the calendar cursor have no monthly row to join
        while let Some((_, record)) =
            bonus_dated.next_if(|(bonus_date, _)| *bonus_date < date && !same_month(*bonus_date, date))
        {
            debug!("bonus installment {} before {} dropped", record.period_index, month_label(date));
        }
        let bonus_record = bonus_dated
            .next_if(|(bonus_date, _)| same_month(*bonus_date, date))
            .map(|(_, record)| record);
        if let Some(record) = bonus_record {
            debug!("{}: bonus installment {} merged", month_label(date), record.period_index);
        }

        rows.push(MergedScheduleRow::new(
            i as u32 + 1,
            date,
            monthly.records.get(i),
            bonus_record,
        ));
    }

    let total_payment: i64 = rows.iter().map(|r| r.payment).sum();
    let total_interest: i64 = rows.iter().map(|r| r.interest_portion).sum();

    let (mut cum_payment, mut cum_principal, mut cum_interest) = (0_i64, 0_i64, 0_i64);
    for row in &mut rows {
        cum_payment += row.payment;
        cum_principal += row.principal_portion;
        cum_interest += row.interest_portion;

        row.cumulative_payment = cum_payment;
        row.cumulative_principal = cum_principal;
        row.cumulative_interest = cum_interest;
        row.remaining_balance = total_payment - cum_payment;
        row.remaining_principal_balance = total_principal - cum_principal;
        row.remaining_interest = total_interest - cum_interest;
    }

    Ok(rows)
}

/// Combined repayment schedule for one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub scenario: LoanScenario,

    /// Ordinary monthly sub-loan
    pub monthly: AmortizationSchedule,

    /// Semi-annual bonus sub-loan
    pub bonus: AmortizationSchedule,

    /// Calendar ledger, one row per month
    pub rows: Vec<MergedScheduleRow>,
}

impl LoanSchedule {
    /// Amortize both sub-loans and merge them
    pub fn from_scenario(scenario: &LoanScenario) -> Result<Self> {
        let monthly = amortize(
            scenario.periodic_rate,
            scenario.monthly_periods(),
            scenario.monthly_principal(),
        )?;
        monthly.verify()?;

        let bonus = amortize(
            scenario.bonus_periodic_rate,
            scenario.bonus_periods(),
            scenario.bonus_principal,
        )?;
        bonus.verify()?;

        let rows = compose(&monthly, &bonus, scenario.start_year, scenario.principal)?;

        info!(
            "{}: {} months, monthly payment {}, bonus payment {}, total paid {}",
            scenario.label,
            rows.len(),
            monthly.level_payment(),
            bonus.level_payment(),
            rows.last().map(|r| r.cumulative_payment).unwrap_or(0),
        );

        Ok(Self {
            scenario: scenario.clone(),
            monthly,
            bonus,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by 0-based index
    pub fn row(&self, index: usize) -> Result<&MergedScheduleRow> {
        self.rows.get(index).ok_or(LoanError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Last row of the given elapsed year (index `12 * years - 1`)
    pub fn row_at_years(&self, years: u32) -> Result<&MergedScheduleRow> {
        if years == 0 {
            return Err(LoanError::invalid("years", "must be at least 1"));
        }
        self.row(years as usize * 12 - 1)
    }

    pub fn final_row(&self) -> Option<&MergedScheduleRow> {
        self.rows.last()
    }

    /// Lifetime totals
    pub fn summary(&self) -> ScheduleSummary {
        let total_payment: i64 = self.rows.iter().map(|r| r.payment).sum();
        let total_principal: i64 = self.rows.iter().map(|r| r.principal_portion).sum();
        let total_interest: i64 = self.rows.iter().map(|r| r.interest_portion).sum();

        let final_row = self.rows.last();

        ScheduleSummary {
            label: self.scenario.label.clone(),
            total_months: self.rows.len() as u32,
            principal: self.scenario.principal,
            bonus_principal: self.scenario.bonus_principal,
            monthly_payment: self.monthly.level_payment(),
            bonus_payment: self.bonus.level_payment(),
            total_payment,
            total_principal,
            total_interest,
            final_remaining_balance: final_row.map(|r| r.remaining_balance).unwrap_or(0),
            final_remaining_principal: final_row
                .map(|r| r.remaining_principal_balance)
                .unwrap_or(self.scenario.principal),
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub label: String,
    pub total_months: u32,
    pub principal: i64,
    pub bonus_principal: i64,
    /// Level monthly installment
    pub monthly_payment: i64,
    /// Level bonus installment (June and December)
    pub bonus_payment: i64,
    pub total_payment: i64,
    pub total_principal: i64,
    pub total_interest: i64,
    pub final_remaining_balance: i64,
    pub final_remaining_principal: i64,
}
