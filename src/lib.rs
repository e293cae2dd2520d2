//! Loan Compare - equal-installment mortgage amortization and offer comparison
//!
//! This library provides:
//! - Level-payment amortization with floor rounding and exact final-period correction
//! - Separate monthly and semi-annual bonus sub-loans merged onto one calendar
//! - Running balance and cumulative payment series per month
//! - Head-to-head comparison of two fee/rate offers at any elapsed year
//! - CSV export of the combined schedule

pub mod error;
pub mod loan;
pub mod amortization;
pub mod schedule;
pub mod comparison;
pub mod simulator;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use loan::{LoanOffer, LoanScenario, LoanTerms};
pub use amortization::{amortize, AmortizationSchedule, PeriodRecord};
pub use schedule::{compose, LoanSchedule, MergedScheduleRow, ScheduleSummary};
pub use comparison::{advantage_series, compare_at_years, ComparisonResult, Favored, ScenarioPosition};
pub use simulator::Simulator;
pub use config::SimulatorConfig;
