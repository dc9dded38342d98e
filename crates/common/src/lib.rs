//! Common utilities and types shared across migmap crates.

pub mod error;
pub mod hash;
pub mod timestamp;

pub use error::{Error, Result, ScanErrorCode, ScanFailure};
pub use timestamp::Timestamp;
