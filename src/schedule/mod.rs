//! Date ranges and the temporal containment rule.
//!
//! Projects and tasks both occupy a [`DateRange`] whose end strictly follows
//! its start. A task's range must also sit inside its project's range, with
//! both bounds inclusive; [`validate_task_dates`] decides that and reports
//! violations against both date fields at once.

mod containment;
mod form;
mod range;

pub use containment::{ContainmentError, END_DATE_FIELD, START_DATE_FIELD, validate_task_dates};
pub use form::{parse_date_fields, parse_range_fields};
pub use range::{DateRange, DateRangeError};
