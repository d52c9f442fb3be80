//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                           │
//! │  ├── CoreError        - Reconciliation/lifecycle rule violations        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  caja-db errors (separate crate)                                        │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (till, session, sale ids)
//! 3. Errors are enum variants, never String
//! 4. Lifecycle errors abort the whole operation; audit findings are data,
//!    not errors, and never abort a scan

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Reconciliation and lifecycle errors.
///
/// These errors represent business rule violations. Each one aborts the
/// operation that raised it; no partial state is left behind.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A transaction's timestamp cannot be attributed to any session for
    /// its till.
    ///
    /// ## When This Occurs
    /// - No session was ever opened for the till
    /// - The transaction predates every session's `opened_at`
    /// - The latest candidate session closed before the transaction
    ///
    /// Surfaced to the caller; never silently dropped.
    #[error("no owning session for till {till_id} at {timestamp}")]
    NoOwningSession {
        till_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Attempt to open a session for a till that already has one open.
    ///
    /// Policy decision: the caller must close (or explicitly reuse) the
    /// existing session first. The database backs this with a partial
    /// unique index on open sessions.
    #[error("till {till_id} already has open session {session_id}")]
    SessionAlreadyOpen {
        till_id: String,
        session_id: String,
    },

    /// Attempt to close a session that is already closed.
    #[error("session {0} is already closed")]
    SessionAlreadyClosed(String),

    /// Session cannot be found.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Sale cannot be found.
    #[error("sale not found: {0}")]
    SaleNotFound(String),

    /// Attempt to void a sale that is already voided.
    ///
    /// `voided = true` is a one-way transition; there is no un-void.
    #[error("sale {0} is already voided")]
    SaleAlreadyVoided(String),

    /// Withdrawal exceeds the computed balance at close time.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: i64, available: i64 },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before lifecycle logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Monetary amount must be strictly positive.
    #[error("{field} must be a positive amount, got {value}")]
    MustBePositive { field: String, value: i64 },

    /// Monetary amount must not be negative.
    #[error("{field} must not be negative, got {value}")]
    MustNotBeNegative { field: String, value: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field only makes sense for a particular payment method.
    #[error("{field} is only valid for {expected} payments")]
    WrongPaymentMethod { field: String, expected: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
