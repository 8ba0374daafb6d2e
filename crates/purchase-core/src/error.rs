//! # Error Types
//!
//! Domain-specific error types for purchase-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  purchase-core errors (this file)                                      │
//! │  ├── ValidationError  - A single field is unusable                     │
//! │  └── CoreError        - Row- or batch-level failure                    │
//! │                                                                         │
//! │  import-runner errors (app)                                            │
//! │  └── AppError         - CSV, file, config, and CoreError               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError (with row position) → AppError      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (row position, barcode, field)
//! 3. Errors are enum variants, never String
//! 4. The engine classifies failures; skip/abort policy belongs to the caller

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Row- and batch-level failures of the import engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value failed validation outside the context of a specific row.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A specific import row failed validation.
    ///
    /// ## User Workflow
    /// ```text
    /// Row 7: barcode 8901234567890, mrp 500, discount 650
    ///      │
    ///      ▼
    /// resolve_rate → rate = -150
    ///      │
    ///      ▼
    /// InvalidRow { position: 7, barcode: "8901234567890", reason: Negative("rate") }
    ///      │
    ///      ▼
    /// Caller shows: "Row 7 (8901234567890): rate cannot be negative"
    /// ```
    #[error("Row {position} ({barcode}): {reason}")]
    InvalidRow {
        position: usize,
        barcode: String,
        #[source]
        reason: ValidationError,
    },

    /// Totals were requested for a batch with no line items.
    #[error("Import batch has no line items")]
    EmptyBatch,

    /// The batch exceeds the configured row limit.
    #[error("Import batch has {found} rows, maximum is {max}")]
    TooManyRows { max: usize, found: usize },
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Some input value was out of its allowed domain.
    InvalidInput,
    /// Nothing to accumulate.
    EmptyBatch,
}

impl CoreError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::EmptyBatch => ErrorKind::EmptyBatch,
            CoreError::InvalidInput(_)
            | CoreError::InvalidRow { .. }
            | CoreError::TooManyRows { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Returns the 1-based row position for row-level errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            CoreError::InvalidRow { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Attaches a row position and barcode to a field-level error.
    pub fn at_row(position: usize, barcode: &str, reason: ValidationError) -> Self {
        CoreError::InvalidRow {
            position,
            barcode: barcode.to_string(),
            reason,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Text could not be read as the expected type.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Arithmetic on this field left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Negative { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Overflow { field } => field,
        }
    }

    /// Replaces the field name, keeping the reason.
    ///
    /// The parsers in `money` and `types` only know they read "an amount";
    /// the row reader knows which column it was.
    pub fn for_field(self, name: &str) -> Self {
        let field = name.to_string();
        match self {
            ValidationError::Negative { .. } => ValidationError::Negative { field },
            ValidationError::MustBePositive { .. } => ValidationError::MustBePositive { field },
            ValidationError::OutOfRange { min, max, .. } => {
                ValidationError::OutOfRange { field, min, max }
            }
            ValidationError::InvalidFormat { reason, .. } => {
                ValidationError::InvalidFormat { field, reason }
            }
            ValidationError::Overflow { .. } => ValidationError::Overflow { field },
        }
    }

    pub(crate) fn overflow(field: &str) -> Self {
        ValidationError::Overflow {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::at_row(
            7,
            "8901234567890",
            ValidationError::Negative {
                field: "rate".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Row 7 (8901234567890): rate cannot be negative"
        );
        assert_eq!(CoreError::EmptyBatch.to_string(), "Import batch has no line items");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: "0%".to_string(),
            max: "100%".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "discount_percentage must be between 0% and 100%"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Negative {
            field: "mrp".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidInput);
        assert_eq!(core_err.position(), None);
    }

    #[test]
    fn test_kind_and_position() {
        assert_eq!(CoreError::EmptyBatch.kind(), ErrorKind::EmptyBatch);
        assert_eq!(
            CoreError::TooManyRows { max: 10, found: 11 }.kind(),
            ErrorKind::InvalidInput
        );

        let err = CoreError::at_row(3, "X", ValidationError::overflow("total"));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_for_field_renames() {
        let err = ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "expected a number".to_string(),
        }
        .for_field("mrp");
        assert_eq!(err.field(), "mrp");
        assert_eq!(err.to_string(), "mrp has invalid format: expected a number");
    }
}
