pub mod activity;
pub mod checkin;
pub mod config;
pub mod goal;
pub mod pause;
pub mod stats;
pub mod streak;
pub mod watch;

use chrono::NaiveDate;
use commitly_core::ValidationError;

/// Parse a `YYYY-MM-DD` argument.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(s.to_string()))
}
