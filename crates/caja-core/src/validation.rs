//! # Validation Module
//!
//! Input validation for lifecycle operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (request layer, out of scope)                          │
//! │  ├── Basic format checks, immediate user feedback                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── Partial unique index on open sessions                              │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::PaymentMethod;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Monetary Validators
// =============================================================================

/// Validates a strictly positive monetary amount (expense/income entries).
///
/// ## Example
/// ```rust
/// use caja_core::validation::validate_positive_amount;
///
/// assert!(validate_positive_amount(5_000, "amount").is_ok());
/// assert!(validate_positive_amount(0, "amount").is_err());
/// assert!(validate_positive_amount(-100, "amount").is_err());
/// ```
pub fn validate_positive_amount(units: i64, field: &str) -> ValidationResult<()> {
    if units <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
            value: units,
        });
    }
    Ok(())
}

/// Validates a non-negative monetary amount (opening float, withdrawal,
/// sale total; zero is allowed).
pub fn validate_non_negative_amount(units: i64, field: &str) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
            value: units,
        });
    }
    Ok(())
}

/// Validates the tendered amount against the payment method.
///
/// ## Rules
/// - Tendered cash only makes sense for cash payments
/// - When present it must not be negative
pub fn validate_tendered(
    method: PaymentMethod,
    tendered_units: Option<i64>,
) -> ValidationResult<()> {
    match tendered_units {
        None => Ok(()),
        Some(_) if method != PaymentMethod::Cash => Err(ValidationError::WrongPaymentMethod {
            field: "amount_tendered".to_string(),
            expected: "cash".to_string(),
        }),
        Some(units) => validate_non_negative_amount(units, "amount_tendered"),
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an identifier field (till, operator) is non-empty.
pub fn validate_id(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an entry description.
///
/// ## Rules
/// - Must not be empty (the description is what operators see in reports)
/// - Maximum 200 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use caja_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(1, "amount").is_ok());
        assert!(validate_positive_amount(5_000, "amount").is_ok());

        assert!(validate_positive_amount(0, "amount").is_err());
        assert!(validate_positive_amount(-1, "amount").is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(0, "opening_float").is_ok());
        assert!(validate_non_negative_amount(100_000, "opening_float").is_ok());
        assert!(validate_non_negative_amount(-100, "opening_float").is_err());
    }

    #[test]
    fn test_validate_tendered() {
        assert!(validate_tendered(PaymentMethod::Cash, Some(20_000)).is_ok());
        assert!(validate_tendered(PaymentMethod::Cash, None).is_ok());
        assert!(validate_tendered(PaymentMethod::Card, None).is_ok());

        assert!(validate_tendered(PaymentMethod::Card, Some(20_000)).is_err());
        assert!(validate_tendered(PaymentMethod::Cash, Some(-1)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Bolsas para despacho").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description("   ").is_err());
        assert!(validate_description(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
