//! Equal-installment amortization with floor rounding and final-period correction

use log::debug;
use serde::{Deserialize, Serialize};

use super::annuity;
use crate::error::{LoanError, Result};

/// Largest principal amortized; keeps every balance exact in `f64`
pub const MAX_PRINCIPAL: i64 = 1_000_000_000_000_000;

/// Largest `(1 + rate)^periods` accepted. Floor rounding drift compounds
/// by the same factor, so steeper terms stop producing meaningful schedules.
pub const MAX_GROWTH_FACTOR: f64 = 1e9;

/// One installment of a sub-schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Installment number (1-indexed)
    pub period_index: u32,

    /// Total paid this period (principal + interest)
    pub payment: i64,

    pub principal_portion: i64,

    pub interest_portion: i64,
}

/// Complete installment ledger for one sub-loan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Amount amortized
    pub principal: i64,

    /// Rate per period as a fraction
    pub periodic_rate: f64,

    /// Floored level payment (every record but the last pays this)
    pub level_payment: i64,

    pub records: Vec<PeriodRecord>,
}

impl AmortizationSchedule {
    fn empty(principal: i64, periodic_rate: f64) -> Self {
        Self {
            principal,
            periodic_rate,
            level_payment: 0,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn level_payment(&self) -> i64 {
        self.level_payment
    }

    /// Payment of the final installment (absorbs rounding drift)
    pub fn final_payment(&self) -> i64 {
        self.records.last().map(|r| r.payment).unwrap_or(0)
    }

    pub fn total_payment(&self) -> i64 {
        self.records.iter().map(|r| r.payment).sum()
    }

    pub fn total_principal(&self) -> i64 {
        self.records.iter().map(|r| r.principal_portion).sum()
    }

    pub fn total_interest(&self) -> i64 {
        self.records.iter().map(|r| r.interest_portion).sum()
    }

    /// Check that every record balances and principal is fully repaid
    pub fn verify(&self) -> Result<()> {
        for record in &self.records {
            let parts = record.principal_portion + record.interest_portion;
            if record.payment != parts {
                return Err(LoanError::RoundingInvariantViolation {
                    expected: record.payment,
                    actual: parts,
                });
            }
        }

        let repaid = self.total_principal();
        let expected = if self.records.is_empty() { 0 } else { self.principal };
        if repaid != expected {
            return Err(LoanError::RoundingInvariantViolation {
                expected,
                actual: repaid,
            });
        }
        Ok(())
    }
}

/// Reject rate/period pairs whose compounding factor is non-finite or
/// exceeds [`MAX_GROWTH_FACTOR`], reporting the failure against `field`
pub fn check_compounding(periodic_rate: f64, period_count: u32, field: &str) -> Result<()> {
    let growth = annuity::growth_factor(periodic_rate, period_count);
    if !growth.is_finite() || growth > MAX_GROWTH_FACTOR {
        return Err(LoanError::invalid(
            field,
            format!(
                "{} periods at {} per period compound by {:e}, above {:e}",
                period_count, periodic_rate, growth, MAX_GROWTH_FACTOR
            ),
        ));
    }
    Ok(())
}

/// Amortize `principal` over `period_count` periods at `periodic_rate`.
///
/// The level payment is `floor(PMT)`. Each period's interest is
/// `floor(IPMT)` of the current balance over the periods still remaining,
/// and the principal portion is the rest of the level payment. The last
/// installment repays exactly the principal still outstanding, so the
/// principal portions always add up to `principal`.
///
/// Zero periods or zero principal give an empty schedule. Principals above
/// [`MAX_PRINCIPAL`] and terms failing [`check_compounding`] are rejected.
pub fn amortize(periodic_rate: f64, period_count: u32, principal: i64) -> Result<AmortizationSchedule> {
    if !periodic_rate.is_finite() || periodic_rate < 0.0 {
        return Err(LoanError::invalid(
            "periodic_rate",
            format!("{} is not a non-negative rate", periodic_rate),
        ));
    }
    if principal < 0 {
        return Err(LoanError::invalid("principal", "must not be negative"));
    }
    if principal > MAX_PRINCIPAL {
        return Err(LoanError::invalid(
            "principal",
            format!("{} exceeds {}", principal, MAX_PRINCIPAL),
        ));
    }
    if period_count == 0 || principal == 0 {
        return Ok(AmortizationSchedule::empty(principal, periodic_rate));
    }
    check_compounding(periodic_rate, period_count, "period_count")?;

    let payment = annuity::pmt(periodic_rate, period_count, principal as f64);
    if !payment.is_finite() {
        return Err(LoanError::invalid(
            "periodic_rate",
            format!("level payment at {} is not finite", periodic_rate),
        ));
    }
    let level_payment = payment.floor() as i64;

    let mut records = Vec::with_capacity(period_count as usize);
    let mut balance = principal;
    for period_index in 1..=period_count {
        let remaining = period_count - period_index + 1;
        let interest = annuity::ipmt(periodic_rate, 1, remaining, balance as f64).floor() as i64;

        records.push(PeriodRecord {
            period_index,
            payment: level_payment,
            principal_portion: level_payment - interest,
            interest_portion: interest,
        });

        balance = balance
            .checked_sub(level_payment)
            .and_then(|b| b.checked_add(interest))
            .ok_or_else(|| {
                LoanError::invalid("principal", format!("balance overflows in period {}", period_index))
            })?;
    }

    // Final installment repays whatever principal is left
    let repaid_before_last: i64 = records[..records.len() - 1]
        .iter()
        .map(|r| r.principal_portion)
        .sum();
    if let Some(last) = records.last_mut() {
        last.principal_portion = principal - repaid_before_last;
        last.payment = last.principal_portion + last.interest_portion;
    }

    debug!(
        "amortized {} over {} periods at {:.8}: level payment {}, final payment {}",
        principal,
        period_count,
        periodic_rate,
        level_payment,
        records.last().map(|r| r.payment).unwrap_or(0),
    );

    Ok(AmortizationSchedule {
        principal,
        periodic_rate,
        level_payment,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(schedule: &AmortizationSchedule) {
        schedule.verify().unwrap();
        assert_eq!(schedule.total_principal(), schedule.principal);
        for record in &schedule.records[..schedule.len() - 1] {
            assert_eq!(record.payment, schedule.level_payment);
        }
        for (i, record) in schedule.records.iter().enumerate() {
            assert_eq!(record.period_index as usize, i + 1);
            assert_eq!(record.payment, record.principal_portion + record.interest_portion);
        }
    }

    #[test]
    fn test_small_schedule_exact_values() {
        let schedule = amortize(0.01, 12, 1_000).unwrap();

        assert_eq!(schedule.level_payment, 88);
        let interest: Vec<i64> = schedule.records.iter().map(|r| r.interest_portion).collect();
        assert_eq!(interest, vec![10, 9, 8, 7, 6, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(schedule.records[0].principal_portion, 78);
        assert_eq!(schedule.records[11].principal_portion, 93);
        assert_eq!(schedule.final_payment(), 93);
        assert_invariants(&schedule);
    }

    #[test]
    fn test_monthly_sub_loan_reference_values() {
        // 72,000,000 over 35 years at 0.425% nominal
        let rate = 0.425 / 100.0 / 12.0;
        let schedule = amortize(rate, 420, 72_000_000).unwrap();

        let expected_level = {
            let temp = (1.0_f64 + rate).powf(420.0);
            (72_000_000.0 * temp / ((temp - 1.0) / rate)).floor() as i64
        };
        assert_eq!(schedule.level_payment, expected_level);
        assert_eq!(schedule.level_payment, 184_524);
        assert_eq!(schedule.records[0].interest_portion, 25_500);
        assert_eq!(schedule.records[0].principal_portion, 159_024);
        assert_eq!(schedule.final_payment(), 184_675);
        assert_invariants(&schedule);
    }

    #[test]
    fn test_bonus_sub_loan_reference_values() {
        let rate = 0.425 / 100.0 / 2.0;
        let schedule = amortize(rate, 70, 8_000_000).unwrap();

        assert_eq!(schedule.level_payment, 123_117);
        assert_eq!(schedule.records[0].interest_portion, 17_000);
        assert_eq!(schedule.records[69].principal_portion, 122_856);
        assert_eq!(schedule.final_payment(), 123_117);
        assert_invariants(&schedule);
    }

    #[test]
    fn test_zero_rate() {
        let schedule = amortize(0.0, 12, 1_000).unwrap();

        assert_eq!(schedule.level_payment, 83);
        assert!(schedule.records.iter().all(|r| r.interest_portion == 0));
        assert_eq!(schedule.final_payment(), 87);
        assert_eq!(schedule.total_interest(), 0);
        assert_invariants(&schedule);
    }

    #[test]
    fn test_zero_periods_is_empty() {
        let schedule = amortize(0.01, 0, 1_000).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_payment(), 0);
        schedule.verify().unwrap();
    }

    #[test]
    fn test_zero_principal_is_empty() {
        let schedule = amortize(0.01, 24, 0).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.final_payment(), 0);
    }

    #[test]
    fn test_single_period_repays_everything() {
        let schedule = amortize(0.02, 1, 500).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.records[0].principal_portion, 500);
        assert_eq!(schedule.records[0].interest_portion, 10);
        assert_eq!(schedule.records[0].payment, 510);
    }

    #[test]
    fn test_principal_conserved_across_grid() {
        for &principal in &[1_i64, 7, 999, 123_457, 35_000_000, 99_999_999] {
            for &rate in &[0.0, 0.0001, 0.00035, 0.0025, 0.01, 0.05] {
                for &periods in &[1_u32, 2, 13, 70, 420] {
                    let schedule = amortize(rate, periods, principal).unwrap();
                    assert_invariants(&schedule);
                }
            }
        }
    }

    #[test]
    fn test_rejects_negative_inputs() {
        assert!(amortize(-0.01, 12, 1_000).is_err());
        assert!(amortize(0.01, 12, -1).is_err());
        assert!(amortize(f64::INFINITY, 12, 1_000).is_err());
    }

    #[test]
    fn test_rejects_runaway_compounding() {
        // 80% a year over 1000 years overflows (1 + r)^n
        let err = amortize(0.8 / 12.0, 12_000, 72_000_000).unwrap_err();
        assert!(matches!(err, LoanError::InvalidParameter { ref field, .. } if field == "period_count"));

        let err = amortize(1.0 / 12.0, 264, 1_000).unwrap_err();
        assert!(matches!(err, LoanError::InvalidParameter { ref field, .. } if field == "period_count"));
    }

    #[test]
    fn test_steepest_accepted_term_keeps_invariants() {
        // 100% a year over 21 years compounds by about 5.7e8
        check_compounding(1.0 / 12.0, 252, "period_count").unwrap();
        let schedule = amortize(1.0 / 12.0, 252, 72_000_000).unwrap();
        assert_eq!(schedule.len(), 252);
        assert!(schedule.records.iter().all(|r| r.interest_portion >= 0));
        assert!(schedule.final_payment() > schedule.level_payment);
        assert_invariants(&schedule);

        let schedule = amortize(1.0 / 12.0, 252, MAX_PRINCIPAL).unwrap();
        assert_invariants(&schedule);
    }

    #[test]
    fn test_rejects_principal_above_limit() {
        let err = amortize(0.01, 12, MAX_PRINCIPAL + 1).unwrap_err();
        assert!(matches!(err, LoanError::InvalidParameter { ref field, .. } if field == "principal"));
    }

    #[test]
    fn test_verify_detects_leak() {
        let mut schedule = amortize(0.01, 12, 1_000).unwrap();
        schedule.records[3].principal_portion += 1;
        schedule.records[3].payment += 1;
        let err = schedule.verify().unwrap_err();
        assert!(matches!(
            err,
            LoanError::RoundingInvariantViolation { expected: 1_000, actual: 1_001 }
        ));
    }
}
