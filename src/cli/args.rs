use crate::session::LoginPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Console ATM over an in-memory account directory
#[derive(Parser, Debug)]
#[command(name = "atm")]
#[command(about = "Console ATM with deposits, withdrawals and transfers", long_about = None)]
pub struct CliArgs {
    /// CSV file of seed accounts (header: id,pin)
    #[arg(
        long = "accounts",
        value_name = "FILE",
        help = "CSV file with seed accounts (columns: id,pin); defaults to the two built-in accounts"
    )]
    pub accounts: Option<PathBuf>,

    /// Maximum failed logins before the ATM gives up
    #[arg(
        long = "max-login-attempts",
        value_name = "COUNT",
        help = "Maximum failed login attempts (default: unlimited)"
    )]
    pub max_login_attempts: Option<u32>,
}

impl CliArgs {
    /// Build the login policy from CLI arguments
    ///
    /// A missing or zero attempt count means unlimited retries.
    pub fn login_policy(&self) -> LoginPolicy {
        match self.max_login_attempts {
            Some(max) if max > 0 => LoginPolicy::bounded(max),
            _ => LoginPolicy::unbounded(),
        }
    }
}
