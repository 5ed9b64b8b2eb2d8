//! Synthetic device log lines.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Formats the periodic simulator log line for wall-clock time `now`.
///
/// The line has no severity prefix, so the dashboard files it under "other".
pub fn simulated_log_line<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("[mock] {} - simulated log entry", now.format("%H:%M:%S"))
}
