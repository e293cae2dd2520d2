//! Simulation configuration loaded from JSON
//!
//! Every field has a default, so a partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{LoanError, Result};
use crate::loan::{LoanOffer, LoanTerms};

fn default_amount() -> i64 { 80_000_000 }
fn default_bonus_ratio_pct() -> u32 { 10 }
fn default_term_years() -> u32 { 35 }
fn default_start_year() -> i32 { 2025 }
fn default_offers() -> Vec<LoanOffer> {
    vec![
        LoanOffer::new("Offer 1", 1_760_000, 0.425),
        LoanOffer::new("Offer 2", 330_000, 0.836),
    ]
}

/// Inputs for a two-offer comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Amount borrowed, excluding fees
    #[serde(default = "default_amount")]
    pub amount: i64,

    /// Bonus repayment share in percent (0-100)
    #[serde(default = "default_bonus_ratio_pct")]
    pub bonus_ratio_pct: u32,

    #[serde(default = "default_term_years")]
    pub term_years: u32,

    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Offers to compare; the first two are compared head to head
    #[serde(default = "default_offers")]
    pub offers: Vec<LoanOffer>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            bonus_ratio_pct: default_bonus_ratio_pct(),
            term_years: default_term_years(),
            start_year: default_start_year(),
            offers: default_offers(),
        }
    }
}

impl SimulatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.amount, self.bonus_ratio_pct, self.term_years, self.start_year)
    }

    /// Reject the configuration before any computation runs
    pub fn validate(&self) -> Result<()> {
        self.terms().validate()?;
        if self.offers.is_empty() {
            return Err(LoanError::invalid("offers", "at least one offer is required"));
        }
        for offer in &self.offers {
            offer.validate()?;
        }
        Ok(())
    }

    /// The two offers compared head to head
    pub fn offer_pair(&self) -> Result<(&LoanOffer, &LoanOffer)> {
        match self.offers.as_slice() {
            [first, second, ..] => Ok((first, second)),
            _ => Err(LoanError::invalid(
                "offers",
                format!("comparison needs two offers, got {}", self.offers.len()),
            )),
        }
    }
}
