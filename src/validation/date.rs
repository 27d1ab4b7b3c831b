//! Calendar date parsing for form input.

use chrono::NaiveDate;

/// Parses an ISO `YYYY-MM-DD` date from form input.
///
/// # Errors
///
/// Returns the message to record against the field when the input is blank
/// or not a valid calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("this field is required".to_owned());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| format!("'{trimmed}' is not a valid date (expected YYYY-MM-DD)"))
}
