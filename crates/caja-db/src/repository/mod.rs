//! # Repository Module
//!
//! Database repository implementations for the Caja POS ledger store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Lifecycle / Auditor service                                            │
//! │       │                                                                 │
//! │       │  db.sessions().find_open("1")                                   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  TillSessionRepository                                                  │
//! │  ├── find_open(&self, till_id)                                          │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── list_for_till(&self, till_id)                                      │
//! │  └── list_all(&self)                                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories expose pool-backed reads. The write paths that must be
//! atomic (open/close/void/record, repairs) live in the lifecycle and
//! auditor services, which run their statements inside one transaction.
//!
//! ## Available Repositories
//!
//! - [`TillSessionRepository`] - Session rows and the open-session lookup
//! - [`SaleRepository`] - Sale rows
//! - [`EntryRepository`] - Expense/income entry rows

pub mod entry;
pub mod sale;
pub mod till_session;
