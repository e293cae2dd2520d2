//! Amortization calculator: level payment and per-period principal/interest split

pub mod annuity;
mod schedule;

pub use schedule::{
    amortize, check_compounding, AmortizationSchedule, PeriodRecord, MAX_GROWTH_FACTOR, MAX_PRINCIPAL,
};
