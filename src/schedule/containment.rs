//! Task-inside-project date containment rule.

use super::DateRange;
use crate::validation::FieldErrors;
use chrono::NaiveDate;
use thiserror::Error;

/// Form field carrying a task's start date.
pub const START_DATE_FIELD: &str = "start_date";

/// Form field carrying a task's end date.
pub const END_DATE_FIELD: &str = "end_date";

/// Rejection of a task date range against its project's range.
///
/// Whatever the violated condition, both date fields are reported so the
/// caller can flag them together.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("task dates {task_start} to {task_end} must fall within the project range ({project_start} to {project_end})")]
pub struct ContainmentError {
    /// Submitted task start date.
    pub task_start: NaiveDate,
    /// Submitted task end date.
    pub task_end: NaiveDate,
    /// First day the project allows.
    pub project_start: NaiveDate,
    /// Last day the project allows.
    pub project_end: NaiveDate,
}

impl ContainmentError {
    /// Returns `true` when the task's end does not follow its start.
    #[must_use]
    pub fn end_not_after_start(&self) -> bool {
        self.task_end <= self.task_start
    }

    /// Returns the permitted range rendered as `YYYY-MM-DD to YYYY-MM-DD`.
    #[must_use]
    pub fn permitted_range(&self) -> String {
        format!(
            "{} to {}",
            self.project_start.format("%Y-%m-%d"),
            self.project_end.format("%Y-%m-%d")
        )
    }

    /// Converts the rejection into errors on both date fields.
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let message = format!(
            "task dates must fall within the project range ({})",
            self.permitted_range()
        );
        let mut errors = FieldErrors::new();
        errors.add(START_DATE_FIELD, message.clone());
        errors.add(END_DATE_FIELD, message);
        if self.end_not_after_start() {
            errors.add(END_DATE_FIELD, "end date must be after start date");
        }
        errors
    }
}

impl From<ContainmentError> for FieldErrors {
    fn from(err: ContainmentError) -> Self {
        err.field_errors()
    }
}

/// Accepts a task range when it is well ordered and inside the project range.
///
/// The task's end must strictly follow its start, and the task must start no
/// earlier and end no later than the project.
///
/// # Errors
///
/// Returns [`ContainmentError`] on any violation.
pub fn validate_task_dates(
    task_start: NaiveDate,
    task_end: NaiveDate,
    project_start: NaiveDate,
    project_end: NaiveDate,
) -> Result<DateRange, ContainmentError> {
    let rejection = ContainmentError {
        task_start,
        task_end,
        project_start,
        project_end,
    };
    let task_range = DateRange::new(task_start, task_end).map_err(|_| rejection)?;
    let permitted = DateRange::new(project_start, project_end).map_err(|_| rejection)?;
    if !permitted.contains(&task_range) {
        return Err(rejection);
    }
    Ok(task_range)
}
