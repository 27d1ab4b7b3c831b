//! Field-level input validation shared by the services.
//!
//! Services collect every rule violation into [`FieldErrors`] instead of
//! failing on the first one, so a caller can render all field errors of a
//! form at once. The submitted input is left untouched for re-display.

mod date;
mod field_errors;
mod text;

pub use date::parse_date;
pub use field_errors::FieldErrors;
pub use text::{Description, MAX_TITLE_LENGTH, TextError, Title};
