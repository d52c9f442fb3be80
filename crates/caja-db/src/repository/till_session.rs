//! # Till Session Repository
//!
//! Database operations for till session rows.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Lifecycle                                   │
//! │                                                                         │
//! │  1. OPEN                                                                │
//! │     └── lifecycle.open_session() → TillSession { closed_at: None }      │
//! │                                                                         │
//! │  2. ACTIVITY                                                            │
//! │     └── sales and entries recorded against the session                  │
//! │                                                                         │
//! │  3. CLOSE (exactly once)                                                │
//! │     └── lifecycle.close_session() → closed_at + closing_amount set      │
//! │         together in one UPDATE                                          │
//! │                                                                         │
//! │  Sessions are never deleted in normal operation; removal of a           │
//! │  zero-activity duplicate is an explicit auditor repair.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::TillSession;

use crate::error::DbResult;

/// Repository for till session database operations.
#[derive(Debug, Clone)]
pub struct TillSessionRepository {
    pool: SqlitePool,
}

impl TillSessionRepository {
    /// Creates a new TillSessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TillSessionRepository { pool }
    }

    /// Inserts a session row.
    ///
    /// The partial unique index on `(till_id) WHERE closed_at IS NULL`
    /// rejects a second open session for the same till.
    pub async fn insert(&self, session: &TillSession) -> DbResult<()> {
        debug!(id = %session.id, till_id = %session.till_id, "Inserting till session");

        sqlx::query(
            r#"
            INSERT INTO till_sessions (
                id, till_id, operator_id,
                opened_at, closed_at,
                opening_float_units, closing_amount_units
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&session.id)
        .bind(&session.till_id)
        .bind(&session.operator_id)
        .bind(session.opened_at)
        .bind(session.closed_at)
        .bind(session.opening_float_units)
        .bind(session.closing_amount_units)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TillSession>> {
        let session = sqlx::query_as::<_, TillSession>(
            r#"
            SELECT id, till_id, operator_id,
                   opened_at, closed_at,
                   opening_float_units, closing_amount_units
            FROM till_sessions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Gets the open session for a till, if any.
    ///
    /// The partial unique index guarantees at most one row matches.
    pub async fn find_open(&self, till_id: &str) -> DbResult<Option<TillSession>> {
        let session = sqlx::query_as::<_, TillSession>(
            r#"
            SELECT id, till_id, operator_id,
                   opened_at, closed_at,
                   opening_float_units, closing_amount_units
            FROM till_sessions
            WHERE till_id = ?1 AND closed_at IS NULL
            "#,
        )
        .bind(till_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Lists all sessions for a till, oldest first.
    pub async fn list_for_till(&self, till_id: &str) -> DbResult<Vec<TillSession>> {
        let sessions = sqlx::query_as::<_, TillSession>(
            r#"
            SELECT id, till_id, operator_id,
                   opened_at, closed_at,
                   opening_float_units, closing_amount_units
            FROM till_sessions
            WHERE till_id = ?1
            ORDER BY opened_at, id
            "#,
        )
        .bind(till_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Lists every session, oldest first.
    ///
    /// Used by the auditor; a small shop's session table stays small
    /// (one row per till per day).
    pub async fn list_all(&self) -> DbResult<Vec<TillSession>> {
        let sessions = sqlx::query_as::<_, TillSession>(
            r#"
            SELECT id, till_id, operator_id,
                   opened_at, closed_at,
                   opening_float_units, closing_amount_units
            FROM till_sessions
            ORDER BY opened_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
