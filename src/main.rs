//! Loan Compare CLI
//!
//! Command-line interface for computing and comparing loan schedules

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use loan_compare::comparison::Favored;
use loan_compare::export::{export_to_dir, ExportOptions};
use loan_compare::loan::load_offers;
use loan_compare::schedule::month_label;
use loan_compare::{LoanSchedule, Simulator, SimulatorConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loan-compare", version, about = "Compare two equal-installment mortgage offers")]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Command,
}

/// Loan terms and offer sources; flags override the config file
#[derive(Debug, Args)]
struct InputArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV file of offers (label,fee,annual_rate_pct)
    #[arg(long, global = true)]
    offers: Option<PathBuf>,

    /// Amount borrowed, excluding fees
    #[arg(long, global = true)]
    amount: Option<i64>,

    /// Bonus repayment share in percent (0-100)
    #[arg(long, global = true)]
    bonus_ratio: Option<u32>,

    /// Repayment term in years
    #[arg(long, global = true)]
    term_years: Option<u32>,

    /// Year repayment starts
    #[arg(long, global = true)]
    start_year: Option<i32>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print settings and lifetime totals for one offer
    Show {
        /// Offer number (1-based)
        #[arg(long, default_value_t = 1)]
        offer: usize,

        /// Also print the first N months of the schedule
        #[arg(long, default_value_t = 0)]
        rows: usize,
    },
    /// Compare the first two offers after a number of years
    Compare {
        /// Elapsed years (defaults to the full term)
        #[arg(long)]
        years: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also print the month-by-month advantage of the first offer
        #[arg(long)]
        series: bool,
    },
    /// Write simulation_{label}.csv for every offer
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Omit the UTF-8 byte order mark
        #[arg(long)]
        no_bom: bool,
    },
}

fn load_config(inputs: &InputArgs) -> Result<SimulatorConfig> {
    let mut config = match &inputs.config {
        Some(path) => SimulatorConfig::from_json_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => SimulatorConfig::default(),
    };

    if let Some(path) = &inputs.offers {
        config.offers = load_offers(path).with_context(|| format!("reading offers {}", path.display()))?;
    }
    if let Some(amount) = inputs.amount {
        config.amount = amount;
    }
    if let Some(ratio) = inputs.bonus_ratio {
        config.bonus_ratio_pct = ratio;
    }
    if let Some(years) = inputs.term_years {
        config.term_years = years;
    }
    if let Some(year) = inputs.start_year {
        config.start_year = year;
    }

    config.validate().context("invalid simulation inputs")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli.inputs)?;
    let simulator = Simulator::new(config.terms());

    match cli.command {
        Command::Show { offer, rows } => {
            let Some(selected) = offer.checked_sub(1).and_then(|i| config.offers.get(i)) else {
                bail!("offer {} does not exist ({} configured)", offer, config.offers.len());
            };
            let schedule = simulator.run(selected)?;
            print_settings(&config, &schedule);
            print_amounts(&schedule);
            print_rows(&schedule, rows);
        }
        Command::Compare { years, json, series } => {
            let (first, second) = config.offer_pair()?;
            let years = years.unwrap_or(config.term_years);
            if years > config.term_years {
                bail!("comparison horizon {} exceeds the {}-year term", years, config.term_years);
            }
            let result = simulator.compare(first, second, years)?;
            let advantage = if series {
                Some(simulator.advantage_series(first, second)?)
            } else {
                None
            };

            if json {
                let output = match &advantage {
                    Some(points) => {
                        let points: Vec<_> = points
                            .iter()
                            .map(|(date, value)| serde_json::json!({ "date": date, "advantage": value }))
                            .collect();
                        serde_json::json!({ "comparison": result, "series": points })
                    }
                    None => serde_json::to_value(&result)?,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match result.favored {
                    Favored::Tie => println!(
                        "After {} years {} and {} come out the same",
                        years, result.first.label, result.second.label
                    ),
                    _ => println!(
                        "After {} years {} is ahead by {}",
                        years,
                        result.favored_label().unwrap_or_default(),
                        result.advantage()
                    ),
                }
                for position in [&result.first, &result.second] {
                    println!(
                        "  {:<12} balance {:>12} (reduced by {:>12})  paid {:>12}",
                        position.label,
                        position.remaining_principal_balance,
                        position.balance_reduction,
                        position.cumulative_payment,
                    );
                }
                if let Some(points) = &advantage {
                    print_series(&result.first.label, points);
                }
            }
        }
        Command::Export { out_dir, no_bom } => {
            let options = ExportOptions { byte_order_mark: !no_bom };
            for (offer, result) in config.offers.iter().zip(simulator.run_all(&config.offers)) {
                let schedule = result.with_context(|| format!("computing offer '{}'", offer.label))?;
                let path = export_to_dir(&out_dir, &schedule, options)
                    .with_context(|| format!("exporting offer '{}'", offer.label))?;
                println!("{} -> {}", offer.label, path.display());
            }
        }
    }

    Ok(())
}

fn print_settings(config: &SimulatorConfig, schedule: &LoanSchedule) {
    let scenario = &schedule.scenario;
    println!("==== Settings: {} ====", scenario.label);
    println!(
        "Principal : {} (amount {} + fee {}; bonus part {})",
        scenario.principal,
        config.amount,
        scenario.principal - config.amount,
        scenario.bonus_principal
    );
    println!("Rate      : {:.3}%", scenario.annual_rate * 100.0);
    println!("Term      : {} years from {}", scenario.term_years, scenario.start_year);
}

fn print_amounts(schedule: &LoanSchedule) {
    let summary = schedule.summary();
    println!("==== Payments ====");
    println!("Total     : {}", summary.total_payment);
    println!("Principal : {}", summary.total_principal);
    println!("Interest  : {}", summary.total_interest);
    println!("Monthly   : {}", summary.monthly_payment);
    println!("Bonus (Jun, Dec) : {}", summary.bonus_payment);
}

fn print_rows(schedule: &LoanSchedule, count: usize) {
    if count == 0 {
        return;
    }
    println!(
        "{:>7} {:>10} {:>10} {:>10} {:>12} {:>12}",
        "Month", "Payment", "Principal", "Interest", "Balance", "Paid"
    );
    println!("{}", "-".repeat(66));
    for row in schedule.rows.iter().take(count) {
        println!(
            "{:>7} {:>10} {:>10} {:>10} {:>12} {:>12}",
            row.month_label(),
            row.payment,
            row.principal_portion,
            row.interest_portion,
            row.remaining_principal_balance,
            row.cumulative_payment,
        );
    }
    if schedule.len() > count {
        println!("... ({} more months)", schedule.len() - count);
    }
}

fn print_series(label: &str, points: &[(NaiveDate, i64)]) {
    println!("==== Advantage of {} by month ====", label);
    for (date, value) in points {
        println!("{:>7} {:>12}", month_label(*date), value);
    }
}
