/// Monitoring module - drives check cycles on a schedule
///
/// This module is responsible for:
/// - Running one check cycle per target per interval
/// - Bounding how many cycles run at once
pub mod scheduler;

pub use scheduler::{MonitoringScheduler, ScheduledTarget};
