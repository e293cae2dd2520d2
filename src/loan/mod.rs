//! Loan terms, offers and the derived per-offer scenario

mod data;
pub mod loader;

pub use data::{LoanOffer, LoanScenario, LoanTerms, MAX_START_YEAR, MIN_START_YEAR};
pub use loader::{load_offers, load_offers_from_reader};
