//! Tracing setup shared by the uptime binaries.

mod tracing;

pub use self::tracing::{LogFormat, init, init_with_level};
