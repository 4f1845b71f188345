//! Core business logic module
//!
//! This module contains the account registry components:
//! - `traits` - The `Directory` abstraction the session is written against
//! - `directory` - Single-threaded directory used by the console ATM
//! - `shared_directory` - Thread-safe directory with ordered two-account locking

pub mod directory;
pub mod shared_directory;
pub mod traits;

pub use directory::AccountDirectory;
pub use shared_directory::SharedDirectory;
pub use traits::Directory;
