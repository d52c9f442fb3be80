//! # caja-core: Pure Reconciliation Logic for Caja POS
//!
//! This crate is the **heart** of the till reconciliation engine. It
//! contains the attribution, balance, and audit rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Caja POS Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Request layer (web views, out of scope)              │   │
//! │  │    record_sale ─► open/close session ─► void ─► audit view      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ caja-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐     │   │
//! │  │   │   types   │ │   money   │ │attribution│ │  balance  │     │   │
//! │  │   │TillSession│ │   Money   │ │ owning_   │ │ compute_  │     │   │
//! │  │   │Sale, Entry│ │ (integer) │ │ session   │ │ balance   │     │   │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └───────────┘     │   │
//! │  │   ┌───────────┐ ┌───────────┐                                  │   │
//! │  │   │   audit   │ │validation │                                  │   │
//! │  │   │ 7 checks  │ │   rules   │                                  │   │
//! │  │   └───────────┘ └───────────┘                                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  caja-db (Ledger Store)                         │   │
//! │  │       SQLite queries, lifecycle transactions, auditor           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ledger types (TillSession, Sale, ExpenseIncome, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`attribution`] - Timestamp-to-session ownership resolution
//! - [`balance`] - Expected balance computation with breakdown
//! - [`audit`] - Reconciliation checks and repair proposals
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are i64 smallest-unit counts
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Findings Are Data**: the audit reports anomalies, it never throws them
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::balance::compute_balance;
//! use caja_core::types::TillSession;
//! use chrono::{TimeZone, Utc};
//!
//! let session = TillSession {
//!     id: "s1".to_string(),
//!     till_id: "1".to_string(),
//!     operator_id: "op1".to_string(),
//!     opened_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
//!     closed_at: None,
//!     opening_float_units: 100_000,
//!     closing_amount_units: None,
//! };
//!
//! // A freshly opened till holds exactly its float.
//! let balance = compute_balance(&session, &[], &[]);
//! assert_eq!(balance.total.units(), 100_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attribution;
pub mod audit;
pub mod balance;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use caja_core::Money` instead of
// `use caja_core::money::Money`

pub use attribution::owning_session;
pub use audit::{run_audit, Finding, FindingKind, Repair};
pub use balance::compute_balance;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
