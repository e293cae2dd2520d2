//! Delimited-table export of a combined schedule

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::schedule::{LoanSchedule, MergedScheduleRow};

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Prefix the file with a UTF-8 BOM
    pub byte_order_mark: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { byte_order_mark: true }
    }
}

/// One exported line; balance is the principal-based balance
#[derive(Debug, Serialize)]
struct ExportRow {
    date: String,
    payment: i64,
    principal: i64,
    interest: i64,
    balance: i64,
    cumulative_payment: i64,
}

impl From<&MergedScheduleRow> for ExportRow {
    fn from(row: &MergedScheduleRow) -> Self {
        Self {
            date: row.month_label(),
            payment: row.payment,
            principal: row.principal_portion,
            interest: row.interest_portion,
            balance: row.remaining_principal_balance,
            cumulative_payment: row.cumulative_payment,
        }
    }
}

/// Write the schedule as CSV to any writer
pub fn write_schedule<W: Write>(mut writer: W, schedule: &LoanSchedule, options: ExportOptions) -> Result<()> {
    if options.byte_order_mark {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    if schedule.rows.is_empty() {
        csv_writer.write_record(["date", "payment", "principal", "interest", "balance", "cumulative_payment"])?;
    }
    for row in &schedule.rows {
        csv_writer.serialize(ExportRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// `simulation_{label}.csv`, with characters unsafe in file names replaced
pub fn export_file_name(label: &str) -> String {
    let safe: String = label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("simulation_{}.csv", safe)
}

/// Write the schedule into `dir` and return the file path
pub fn export_to_dir(dir: &Path, schedule: &LoanSchedule, options: ExportOptions) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(&schedule.scenario.label));
    let file = File::create(&path)?;
    write_schedule(BufWriter::new(file), schedule, options)?;
    Ok(path)
}
