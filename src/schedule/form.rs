//! Parsing of submitted start/end date fields.

use super::{DateRange, END_DATE_FIELD, START_DATE_FIELD};
use crate::validation::{FieldErrors, parse_date};
use chrono::NaiveDate;

/// Parses the submitted start and end dates without ordering checks.
///
/// # Errors
///
/// Returns [`FieldErrors`] naming every blank or malformed date field.
pub fn parse_date_fields(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), FieldErrors> {
    let mut errors = FieldErrors::new();
    let parsed_start = errors.capture(START_DATE_FIELD, parse_date(start));
    let parsed_end = errors.capture(END_DATE_FIELD, parse_date(end));
    match (parsed_start, parsed_end) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(errors),
    }
}

/// Parses a standalone range such as a project's schedule.
///
/// # Errors
///
/// Returns [`FieldErrors`] for malformed dates, or an `end_date` error when
/// the end does not follow the start.
pub fn parse_range_fields(start: &str, end: &str) -> Result<DateRange, FieldErrors> {
    let (first, last) = parse_date_fields(start, end)?;
    DateRange::new(first, last)
        .map_err(|_| FieldErrors::single(END_DATE_FIELD, "end date must be after start date"))
}
