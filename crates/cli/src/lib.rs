pub mod driver;

pub use driver::{Driver, DriverError, RunOptions, Stage};

/// Exit status for a missing or malformed environment value.
pub const EXIT_CONFIGURATION: u8 = 1;
/// Exit status for any failure once requests are being prepared or sent.
pub const EXIT_EXECUTION: u8 = 2;
