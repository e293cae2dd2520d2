//! Side-by-side comparison of two offers at an elapsed-year horizon
//!
//! The position of a scenario at a month is
//! `amount - remaining principal balance - cumulative payment`, where
//! `amount` is the loan amount without fees. The higher position is the
//! better offer: less still owed plus less already paid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::Result;
use crate::schedule::{LoanSchedule, MergedScheduleRow};

/// Which side of a comparison comes out ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Favored {
    First,
    Second,
    Tie,
}

/// One scenario's standing at the comparison horizon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPosition {
    pub label: String,
    /// Month-end date of the horizon row
    pub date: NaiveDate,
    pub remaining_principal_balance: i64,
    pub cumulative_payment: i64,
    /// Principal paid down so far relative to the fee-free amount
    pub balance_reduction: i64,
    pub net_position: i64,
}

impl ScenarioPosition {
    fn at(amount: i64, label: &str, row: &MergedScheduleRow) -> Self {
        Self {
            label: label.to_string(),
            date: row.date,
            remaining_principal_balance: row.remaining_principal_balance,
            cumulative_payment: row.cumulative_payment,
            balance_reduction: amount - row.remaining_principal_balance,
            net_position: net_position(amount, row),
        }
    }
}

/// Result of comparing two schedules after `years` years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub years: u32,
    pub first: ScenarioPosition,
    pub second: ScenarioPosition,
    /// `first.net_position - second.net_position`
    pub difference: i64,
    pub favored: Favored,
}

impl ComparisonResult {
    /// Absolute advantage of the favored side
    pub fn advantage(&self) -> i64 {
        self.difference.abs()
    }

    pub fn favored_label(&self) -> Option<&str> {
        match self.favored {
            Favored::First => Some(&self.first.label),
            Favored::Second => Some(&self.second.label),
            Favored::Tie => None,
        }
    }
}

fn net_position(amount: i64, row: &MergedScheduleRow) -> i64 {
    amount - row.remaining_principal_balance - row.cumulative_payment
}

/// Compare two schedules at the end of elapsed year `years`
pub fn compare_at_years(
    amount: i64,
    years: u32,
    first: &LoanSchedule,
    second: &LoanSchedule,
) -> Result<ComparisonResult> {
    let first_row = first.row_at_years(years)?;
    let second_row = second.row_at_years(years)?;

    let first = ScenarioPosition::at(amount, &first.scenario.label, first_row);
    let second = ScenarioPosition::at(amount, &second.scenario.label, second_row);

    let difference = first.net_position - second.net_position;
    let favored = match difference.cmp(&0) {
        Ordering::Greater => Favored::First,
        Ordering::Less => Favored::Second,
        Ordering::Equal => Favored::Tie,
    };

    Ok(ComparisonResult {
        years,
        first,
        second,
        difference,
        favored,
    })
}

/// Month-by-month advantage of `first` over `second`
/// (positive when `first` is ahead), over the months both schedules cover
pub fn advantage_series(amount: i64, first: &LoanSchedule, second: &LoanSchedule) -> Vec<(NaiveDate, i64)> {
    first
        .rows
        .iter()
        .zip(&second.rows)
        .map(|(a, b)| (a.date, net_position(amount, a) - net_position(amount, b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;
    use crate::loan::{LoanOffer, LoanScenario, LoanTerms};

    const AMOUNT: i64 = 80_000_000;

    fn schedules() -> (LoanSchedule, LoanSchedule) {
        let terms = LoanTerms::new(AMOUNT, 10, 35, 2025);
        let high_fee = LoanOffer::new("high fee", 1_760_000, 0.425);
        let low_fee = LoanOffer::new("low fee", 330_000, 0.836);
        (
            LoanSchedule::from_scenario(&LoanScenario::from_offer(&terms, &high_fee).unwrap()).unwrap(),
            LoanSchedule::from_scenario(&LoanScenario::from_offer(&terms, &low_fee).unwrap()).unwrap(),
        )
    }

    #[test]
    fn test_ten_year_comparison() {
        let (a, b) = schedules();
        let result = compare_at_years(AMOUNT, 10, &a, &b).unwrap();

        assert_eq!(result.first.remaining_principal_balance, 59_627_010);
        assert_eq!(result.first.cumulative_payment, 25_146_600);
        assert_eq!(result.second.remaining_principal_balance, 59_722_251);
        assert_eq!(result.second.cumulative_payment, 26_484_620);

        assert_eq!(result.first.net_position, -4_773_610);
        assert_eq!(result.second.net_position, -6_206_871);
        assert_eq!(result.difference, 1_433_261);
        assert_eq!(result.favored, Favored::First);
        assert_eq!(result.favored_label(), Some("high fee"));
        assert_eq!(result.first.balance_reduction, AMOUNT - 59_627_010);
    }

    #[test]
    fn test_low_fee_ahead_early() {
        // The financed fee dominates until the rate difference catches up
        let (a, b) = schedules();
        let result = compare_at_years(AMOUNT, 1, &a, &b).unwrap();

        assert_eq!(result.first.remaining_principal_balance, 79_588_779);
        assert_eq!(result.second.remaining_principal_balance, 78_345_842);
        assert_eq!(result.difference, -1_109_135);
        assert_eq!(result.favored, Favored::Second);
        assert_eq!(result.favored_label(), Some("low fee"));
    }

    #[test]
    fn test_lower_cost_has_smaller_balance_plus_paid() {
        let (a, b) = schedules();
        for years in [5, 10, 20, 35] {
            let result = compare_at_years(AMOUNT, years, &a, &b).unwrap();
            let first = result.first.remaining_principal_balance + result.first.cumulative_payment;
            let second = result.second.remaining_principal_balance + result.second.cumulative_payment;
            assert!(first < second, "year {}", years);
            assert_eq!(result.favored, Favored::First);
        }
    }

    #[test]
    fn test_full_term_comparison() {
        let (a, b) = schedules();
        let result = compare_at_years(AMOUNT, 35, &a, &b).unwrap();

        assert_eq!(result.first.remaining_principal_balance, 0);
        assert_eq!(result.first.cumulative_payment, 88_013_022);
        assert_eq!(result.second.cumulative_payment, 92_695_970);
        assert_eq!(result.advantage(), 4_682_948);
    }

    #[test]
    fn test_identical_schedules_tie() {
        let (a, _) = schedules();
        let result = compare_at_years(AMOUNT, 3, &a, &a).unwrap();
        assert_eq!(result.favored, Favored::Tie);
        assert_eq!(result.difference, 0);
        assert_eq!(result.favored_label(), None);
    }

    #[test]
    fn test_horizon_past_term_is_out_of_range() {
        let (a, b) = schedules();
        let err = compare_at_years(AMOUNT, 36, &a, &b).unwrap_err();
        assert!(matches!(err, LoanError::IndexOutOfRange { index: 431, len: 420 }));

        let err = compare_at_years(AMOUNT, 0, &a, &b).unwrap_err();
        assert!(matches!(err, LoanError::InvalidParameter { .. }));
    }

    #[test]
    fn test_advantage_series_matches_point_comparison() {
        let (a, b) = schedules();
        let series = advantage_series(AMOUNT, &a, &b);

        assert_eq!(series.len(), 420);
        let (date, value) = series[119];
        assert_eq!(date, NaiveDate::from_ymd_opt(2034, 12, 31).unwrap());
        assert_eq!(value, 1_433_261);

        let reverse = advantage_series(AMOUNT, &b, &a);
        assert_eq!(reverse[119].1, -1_433_261);
    }
}
