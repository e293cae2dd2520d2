//! Simulator for running several offers against the same loan terms
//!
//! Each offer is amortized independently, so batches run in parallel and a
//! rejected offer never affects the others.

use chrono::NaiveDate;
use log::{info, warn};
use rayon::prelude::*;

use crate::comparison::{advantage_series, compare_at_years, ComparisonResult};
use crate::error::Result;
use crate::loan::{LoanOffer, LoanScenario, LoanTerms};
use crate::schedule::LoanSchedule;

/// Runs offers over shared loan terms
///
/// # Example
/// ```
/// use loan_compare::{LoanOffer, LoanTerms, Simulator};
///
/// let simulator = Simulator::new(LoanTerms::new(80_000_000, 10, 35, 2025));
/// let schedule = simulator.run(&LoanOffer::new("A", 1_760_000, 0.425)).unwrap();
/// assert_eq!(schedule.len(), 420);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    terms: LoanTerms,
}

impl Simulator {
    pub fn new(terms: LoanTerms) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Build the scenario for one offer without amortizing it
    pub fn scenario(&self, offer: &LoanOffer) -> Result<LoanScenario> {
        LoanScenario::from_offer(&self.terms, offer)
    }

    /// Compute the combined schedule for one offer
    pub fn run(&self, offer: &LoanOffer) -> Result<LoanSchedule> {
        let scenario = self.scenario(offer)?;
        LoanSchedule::from_scenario(&scenario)
    }

    /// Compute schedules for many offers in parallel, preserving order
    pub fn run_all(&self, offers: &[LoanOffer]) -> Vec<Result<LoanSchedule>> {
        offers
            .par_iter()
            .map(|offer| {
                let result = self.run(offer);
                if let Err(ref e) = result {
                    warn!("offer '{}' rejected: {}", offer.label, e);
                }
                result
            })
            .collect()
    }

    /// Run two offers and compare them after `years` years
    pub fn compare(&self, first: &LoanOffer, second: &LoanOffer, years: u32) -> Result<ComparisonResult> {
        let (first_schedule, second_schedule) = rayon::join(|| self.run(first), || self.run(second));
        let result = compare_at_years(self.terms.amount, years, &first_schedule?, &second_schedule?)?;

        info!(
            "after {} years: {} {} vs {} {} (difference {})",
            years,
            result.first.label,
            result.first.net_position,
            result.second.label,
            result.second.net_position,
            result.difference,
        );
        Ok(result)
    }

    /// Month-end advantage of `first` over `second` across the whole term
    pub fn advantage_series(&self, first: &LoanOffer, second: &LoanOffer) -> Result<Vec<(NaiveDate, i64)>> {
        let (first_schedule, second_schedule) = rayon::join(|| self.run(first), || self.run(second));
        Ok(advantage_series(self.terms.amount, &first_schedule?, &second_schedule?))
    }
}
