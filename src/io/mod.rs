//! I/O module
//!
//! Handles everything outside the domain model.
//!
//! # Components
//!
//! - `console` - Token-based console reader and writer for the session
//! - `seed` - Seed account loading (built-in defaults or CSV file)

pub mod console;
pub mod seed;

pub use console::Console;
pub use seed::{populate, read_seed, read_seed_file, SeedAccount, DEFAULT_ACCOUNTS};
