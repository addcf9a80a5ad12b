//! Rental Ledger CLI
//!
//! Reads rental line items from CSV and prints each customer's final
//! balance and frequent renter points.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- rentals.csv > customers.csv
//! cargo run -- rentals.csv --statement
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use rental_ledger::{LedgerError, RentalLedger, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let statement = args.iter().any(|arg| arg == "--statement");
    let input_path = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .ok_or(LedgerError::MissingArgument)?;

    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut ledger = RentalLedger::new();
    ledger.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    if statement {
        ledger.write_statements(handle)?;
    } else {
        ledger.write_output(handle)?;
    }

    Ok(())
}
