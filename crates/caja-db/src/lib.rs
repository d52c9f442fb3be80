//! # caja-db: Ledger Store for Caja POS
//!
//! This crate provides database access and transactional orchestration
//! for the till reconciliation engine. It uses SQLite for local storage
//! with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja POS Data Flow                               │
//! │                                                                         │
//! │  Request layer (out of scope): open till, record sale, void, audit      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     caja-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Lifecycle    │    │   Auditor    │   │   │
//! │  │   │   (pool.rs)   │    │ open / close  │    │ scan + one-  │   │   │
//! │  │   │               │    │ void / record │    │ shot repairs │   │   │
//! │  │   │ SqlitePool    │◄───│ (one tx each) │    │              │   │   │
//! │  │   └───────▲───────┘    └───────────────┘    └──────────────┘   │   │
//! │  │           │            ┌───────────────┐    ┌──────────────┐   │   │
//! │  │           └────────────│ Repositories  │    │  Migrations  │   │   │
//! │  │                        │ sessions/sales│    │  (embedded)  │   │   │
//! │  │                        │ /entries      │    │              │   │   │
//! │  │                        └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys, partial unique index          │
//! │  guaranteeing one open session per till)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (sessions, sales, entries)
//! - [`lifecycle`] - Transactional session lifecycle operations
//! - [`auditor`] - Reconciliation scans and explicit repairs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caja_db::{AuditScope, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/caja.db")).await?;
//!
//! let session = db.lifecycle().open_session("1", "op1", 100_000).await?;
//! let (balance, breakdown) = {
//!     let b = db.lifecycle().get_balance(&session.id).await?;
//!     (b.total, b.breakdown)
//! };
//! let findings = db.auditor().run_audit(AuditScope::All).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auditor;
pub mod error;
pub mod lifecycle;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

pub use auditor::{AuditScope, Auditor, StoredFinding};
pub use lifecycle::{Lifecycle, NewEntry, NewSale};

// Repository re-exports for convenience
pub use repository::entry::EntryRepository;
pub use repository::sale::SaleRepository;
pub use repository::till_session::TillSessionRepository;
