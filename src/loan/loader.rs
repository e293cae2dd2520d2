//! Load loan offers from a CSV file (`label,fee,annual_rate_pct`)

use super::LoanOffer;
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the offers file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    label: String,
    fee: i64,
    annual_rate_pct: f64,
}

impl CsvRow {
    fn into_offer(self) -> Result<LoanOffer> {
        let offer = LoanOffer::new(self.label.trim(), self.fee, self.annual_rate_pct);
        offer.validate()?;
        Ok(offer)
    }
}

/// Load all offers from a CSV file
pub fn load_offers<P: AsRef<Path>>(path: P) -> Result<Vec<LoanOffer>> {
    let mut reader = Reader::from_path(path)?;
    read_offers(&mut reader)
}

/// Load offers from any reader (e.g., string buffer)
pub fn load_offers_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanOffer>> {
    let mut csv_reader = Reader::from_reader(reader);
    read_offers(&mut csv_reader)
}

fn read_offers<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<LoanOffer>> {
    let mut offers = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        offers.push(row.into_offer()?);
    }

    Ok(offers)
}
