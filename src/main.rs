//! Console ATM
//!
//! Interactive ATM over an in-memory account directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --accounts accounts.csv
//! cargo run -- --max-login-attempts 3
//! RUST_LOG=debug cargo run
//! ```
//!
//! The program asks for a User ID and PIN, then loops over the ATM menu until
//! the user quits. Logs go to stderr and are off unless `RUST_LOG` is set, so
//! they never interleave with the console dialogue on stdout.
//!
//! # Exit Codes
//!
//! - 0: Quit or end of input
//! - 1: Error (unreadable seed file, console I/O failure, login attempts exhausted)

use atm_engine::cli;
use atm_engine::core::AccountDirectory;
use atm_engine::io::{populate, read_seed_file, DEFAULT_ACCOUNTS};
use atm_engine::session::{Session, SessionEnd};
use atm_engine::AtmError;
use env_logger::Env;
use log::info;
use std::io;
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    let args = cli::parse_args();

    match run(&args) {
        Ok(end) => info!("session ended: {:?}", end),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &cli::CliArgs) -> Result<SessionEnd, AtmError> {
    let seeds = match &args.accounts {
        Some(path) => read_seed_file(path)?,
        None => DEFAULT_ACCOUNTS.to_vec(),
    };

    let mut directory = AccountDirectory::new();
    populate(&mut directory, &seeds)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        &mut directory,
        stdin.lock(),
        stdout.lock(),
        args.login_policy(),
    );
    session.run()
}
