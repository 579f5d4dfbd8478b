//! NACHA File CLI
//!
//! Builds an ACH file from an originator CSV and an entries CSV and writes
//! it to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- originator.csv entries.csv > payments.ach
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use nacha_file::{AchEngine, NachaError, Result};
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
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(NachaError::MissingArgument);
    }

    let originator = BufReader::new(File::open(&args[1])?);
    let mut engine = AchEngine::from_originator_csv(originator)?;

    let entries = BufReader::new(File::open(&args[2])?);
    engine.process_csv(entries)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
