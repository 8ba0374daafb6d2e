//! # Validation Module
//!
//! Field checks applied to every import row before any arithmetic runs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Row reader                                                   │
//! │  ├── Cell parsing ("999.0" → Money, "18" → Percent)                    │
//! │  └── InvalidFormat for unreadable cells                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Sign checks (mrp, discount amount, explicit rate)                 │
//! │  ├── Range checks (discount percentage 0..=100, tax ≥ 0)               │
//! │  └── Quantity > 0                                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing                                                      │
//! │  └── Resolved rate ≥ 0 (only known after precedence is applied)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use purchase_core::validation::{validate_mrp, validate_quantity};
//! use purchase_core::Money;
//!
//! assert!(validate_mrp(Money::from_cents(99900)).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ImportRow, Percent};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Monetary Validators
// =============================================================================

fn non_negative(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a maximum retail price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
pub fn validate_mrp(mrp: Money) -> ValidationResult<()> {
    non_negative("mrp", mrp)
}

/// Validates a flat discount amount. Must be non-negative.
pub fn validate_discount_amount(amount: Money) -> ValidationResult<()> {
    non_negative("discount_amount", amount)
}

/// Validates an explicit purchase rate. Must be non-negative.
pub fn validate_explicit_rate(rate: Money) -> ValidationResult<()> {
    non_negative("rate", rate)
}

/// Validates the rate produced by discount resolution.
///
/// ## Example
/// ```rust
/// use purchase_core::validation::validate_resolved_rate;
/// use purchase_core::Money;
///
/// assert!(validate_resolved_rate(Money::from_cents(0)).is_ok());
/// assert!(validate_resolved_rate(Money::from_cents(-15000)).is_err());
/// ```
pub fn validate_resolved_rate(rate: Money) -> ValidationResult<()> {
    non_negative("rate", rate)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// There is no upper bound: purchase imports routinely carry case
/// quantities in the thousands. Overflow is caught by the line computer.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax percentage.
///
/// ## Rules
/// - Must be non-negative
/// - No upper bound (cess on some goods pushes the combined rate past 100%)
pub fn validate_tax_percentage(pct: Percent) -> ValidationResult<()> {
    if pct.is_negative() {
        return Err(ValidationError::Negative {
            field: "tax_percentage".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0% and 100% inclusive
///
/// ## Example
/// ```rust
/// use purchase_core::validation::validate_discount_percentage;
/// use purchase_core::types::Percent;
///
/// assert!(validate_discount_percentage(Percent::from_bps(0)).is_ok());
/// assert!(validate_discount_percentage(Percent::from_bps(10000)).is_ok());
/// assert!(validate_discount_percentage(Percent::from_bps(10001)).is_err());
/// assert!(validate_discount_percentage(Percent::from_bps(-1)).is_err());
/// ```
pub fn validate_discount_percentage(pct: Percent) -> ValidationResult<()> {
    if pct.is_negative() || pct > Percent::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: Percent::zero().to_string(),
            max: Percent::ONE_HUNDRED.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Row Validator
// =============================================================================

/// Validates every field of an import row.
///
/// Optional discount inputs are checked whenever they are present, even when
/// a higher-precedence input will shadow them: a negative discount in the
/// sheet is a data error regardless of whether it ends up being used.
pub fn validate_row(row: &ImportRow) -> ValidationResult<()> {
    validate_mrp(row.mrp)?;
    validate_quantity(row.quantity)?;
    validate_tax_percentage(row.tax_percentage)?;

    if let Some(rate) = row.rate {
        validate_explicit_rate(rate)?;
    }
    if let Some(amount) = row.discount_amount {
        validate_discount_amount(amount)?;
    }
    if let Some(pct) = row.discount_percentage {
        validate_discount_percentage(pct)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
