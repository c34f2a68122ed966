//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors when an invariant of
//! the classification model would be violated.
//!
//! # Examples
//!
//! ```
//! use triage::domain::category::CategorySet;
//! use triage::domain::error::DomainError;
//!
//! let result = CategorySet::try_new(Vec::<String>::new());
//! assert!(matches!(result, Err(DomainError::EmptyCategories)));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A batch needs at least one category to classify into.
    #[error("categories cannot be empty")]
    EmptyCategories,

    /// Appended columns must line up with the existing rows.
    #[error("column '{column}' has {got} values but the table has {expected} rows")]
    ColumnLengthMismatch {
        /// Name of the column being appended.
        column: String,
        /// Number of rows in the table.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}
