//! Seed accounts for the directory
//!
//! The ATM starts with a fixed set of accounts. They come either from the
//! built-in defaults or from a CSV file with an `id,pin` header:
//!
//! ```text
//! id,pin
//! 12345,1234
//! 67890,5678
//! ```
//!
//! Whitespace around fields is trimmed. Every seeded account starts with a
//! zero balance.

use crate::core::Directory;
use crate::types::{AccountId, AtmError, Pin};
use csv::{ReaderBuilder, Trim};
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of the seed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SeedAccount {
    pub id: AccountId,
    pub pin: Pin,
}

/// Accounts registered when no seed file is given
pub const DEFAULT_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        id: 12345,
        pin: 1234,
    },
    SeedAccount {
        id: 67890,
        pin: 5678,
    },
];

/// Read seed accounts from a CSV file
///
/// # Errors
///
/// Returns `SeedFile` if the file cannot be opened or a row cannot be parsed;
/// the error carries the line number when one is known.
pub fn read_seed_file(path: &Path) -> Result<Vec<SeedAccount>, AtmError> {
    let file = File::open(path).map_err(|e| AtmError::SeedFile {
        line: None,
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;
    read_seed(file)
}

/// Read seed accounts from any CSV source
pub fn read_seed<R: Read>(source: R) -> Result<Vec<SeedAccount>, AtmError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);

    reader
        .deserialize::<SeedAccount>()
        .map(|row| row.map_err(AtmError::from))
        .collect()
}

/// Register every seed account in the directory
///
/// Stops at the first failure (for example a duplicate id) and returns it.
///
/// # Returns
///
/// The number of accounts registered.
pub fn populate<D: Directory>(directory: &mut D, seeds: &[SeedAccount]) -> Result<usize, AtmError> {
    for seed in seeds {
        directory.register(seed.id, seed.pin)?;
    }
    info!("seeded {} accounts", seeds.len());
    Ok(seeds.len())
}
