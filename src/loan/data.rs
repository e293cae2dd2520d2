//! Loan input data: shared terms, per-offer pricing and the derived scenario

use serde::{Deserialize, Serialize};

use crate::amortization::{check_compounding, MAX_PRINCIPAL};
use crate::error::{LoanError, Result};

/// Earliest start year accepted (month-end dates must be representable)
pub const MIN_START_YEAR: i32 = 1900;
/// Latest start year accepted
pub const MAX_START_YEAR: i32 = 9999;

/// Terms shared by every offer being compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed, excluding any origination fee
    pub amount: i64,

    /// Share of the principal repaid through bonus payments (0-100)
    pub bonus_ratio_pct: u32,

    /// Repayment term in years
    pub term_years: u32,

    /// Calendar year in which repayment starts (January for monthly,
    /// June for bonus payments)
    pub start_year: i32,
}

impl LoanTerms {
    pub fn new(amount: i64, bonus_ratio_pct: u32, term_years: u32, start_year: i32) -> Self {
        Self {
            amount,
            bonus_ratio_pct,
            term_years,
            start_year,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount < 0 {
            return Err(LoanError::invalid("amount", "must not be negative"));
        }
        if self.bonus_ratio_pct > 100 {
            return Err(LoanError::invalid(
                "bonus_ratio_pct",
                format!("{} is outside 0..=100", self.bonus_ratio_pct),
            ));
        }
        validate_term(self.term_years)?;
        validate_start_year(self.start_year)
    }
}

/// One lender's offer: origination fee and nominal annual rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    /// Label used in reports and export file names
    pub label: String,

    /// Origination fee, financed on top of the loan amount
    pub fee: i64,

    /// Nominal annual interest rate in percent (0.425 = 0.425%)
    pub annual_rate_pct: f64,
}

impl LoanOffer {
    pub fn new(label: impl Into<String>, fee: i64, annual_rate_pct: f64) -> Self {
        Self {
            label: label.into(),
            fee,
            annual_rate_pct,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fee < 0 {
            return Err(LoanError::invalid("fee", "must not be negative"));
        }
        if !self.annual_rate_pct.is_finite()
            || self.annual_rate_pct < 0.0
            || self.annual_rate_pct > 100.0
        {
            return Err(LoanError::invalid(
                "annual_rate_pct",
                format!("{} is outside 0..=100", self.annual_rate_pct),
            ));
        }
        Ok(())
    }
}

/// Fully derived, validated input for one amortization run.
///
/// The principal is split into a monthly sub-loan and a bonus sub-loan
/// which amortize independently: monthly at `annual_rate / 12`, bonus
/// twice a year at `annual_rate / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    pub label: String,

    /// Total principal disbursed (amount plus fee)
    pub principal: i64,

    /// Slice of the principal repaid in June/December
    pub bonus_principal: i64,

    /// Nominal annual rate as a fraction
    pub annual_rate: f64,

    /// Monthly rate as a fraction
    pub periodic_rate: f64,

    /// Semi-annual rate as a fraction
    pub bonus_periodic_rate: f64,

    pub term_years: u32,

    pub start_year: i32,
}

impl LoanScenario {
    /// Build a scenario from explicit sub-principals
    pub fn new(
        label: impl Into<String>,
        principal: i64,
        bonus_principal: i64,
        annual_rate: f64,
        term_years: u32,
        start_year: i32,
    ) -> Result<Self> {
        if principal < 0 {
            return Err(LoanError::invalid("principal", "must not be negative"));
        }
        if principal > MAX_PRINCIPAL {
            return Err(LoanError::invalid(
                "principal",
                format!("{} exceeds {}", principal, MAX_PRINCIPAL),
            ));
        }
        if bonus_principal < 0 {
            return Err(LoanError::invalid("bonus_principal", "must not be negative"));
        }
        if bonus_principal > principal {
            return Err(LoanError::invalid(
                "bonus_principal",
                format!("{} exceeds principal {}", bonus_principal, principal),
            ));
        }
        if !annual_rate.is_finite() || annual_rate < 0.0 {
            return Err(LoanError::invalid(
                "annual_rate",
                format!("{} is not a non-negative rate", annual_rate),
            ));
        }
        validate_term(term_years)?;
        validate_start_year(start_year)?;

        let scenario = Self {
            label: label.into(),
            principal,
            bonus_principal,
            annual_rate,
            periodic_rate: annual_rate / 12.0,
            bonus_periodic_rate: annual_rate / 2.0,
            term_years,
            start_year,
        };
        check_compounding(scenario.periodic_rate, scenario.monthly_periods(), "term_years")?;
        check_compounding(scenario.bonus_periodic_rate, scenario.bonus_periods(), "term_years")?;
        Ok(scenario)
    }

    /// Combine shared terms with one offer.
    ///
    /// The fee is financed: principal = amount + fee. The bonus slice is
    /// truncated to whole currency units.
    pub fn from_offer(terms: &LoanTerms, offer: &LoanOffer) -> Result<Self> {
        terms.validate()?;
        offer.validate()?;

        let principal = terms
            .amount
            .checked_add(offer.fee)
            .ok_or_else(|| LoanError::invalid("fee", "amount + fee overflows"))?;
        let bonus_principal = principal
            .checked_mul(i64::from(terms.bonus_ratio_pct))
            .map(|scaled| scaled / 100)
            .ok_or_else(|| LoanError::invalid("amount", "bonus slice overflows"))?;

        Self::new(
            offer.label.clone(),
            principal,
            bonus_principal,
            offer.annual_rate_pct / 100.0,
            terms.term_years,
            terms.start_year,
        )
    }

    /// Principal repaid through ordinary monthly installments
    pub fn monthly_principal(&self) -> i64 {
        self.principal - self.bonus_principal
    }

    pub fn monthly_periods(&self) -> u32 {
        self.term_years * 12
    }

    pub fn bonus_periods(&self) -> u32 {
        self.term_years * 2
    }
}

fn validate_term(term_years: u32) -> Result<()> {
    if term_years == 0 {
        return Err(LoanError::invalid("term_years", "must be at least 1"));
    }
    // Keeps month counts well inside u32 and the calendar inside chrono's range
    if term_years > 1000 {
        return Err(LoanError::invalid(
            "term_years",
            format!("{} exceeds 1000", term_years),
        ));
    }
    Ok(())
}

fn validate_start_year(start_year: i32) -> Result<()> {
    if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&start_year) {
        return Err(LoanError::invalid(
            "start_year",
            format!(
                "{} is outside {}..={}",
                start_year, MIN_START_YEAR, MAX_START_YEAR
            ),
        ));
    }
    Ok(())
}
