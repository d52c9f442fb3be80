//! # Expense/Income Entry Repository
//!
//! Database operations for manual cash adjustment rows (gastos/ingresos).
//! Entries are immutable after creation; the only sanctioned mutation is
//! the auditor repair that repoints `till_session_id`.

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::ExpenseIncome;

use crate::error::DbResult;

const ENTRY_COLUMNS: &str = r#"
    id, till_id, kind, subkind, amount_units,
    description, timestamp, operator_id, till_session_id
"#;

/// Repository for expense/income entry database operations.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: SqlitePool,
}

impl EntryRepository {
    /// Creates a new EntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EntryRepository { pool }
    }

    /// Inserts an entry row.
    pub async fn insert(&self, entry: &ExpenseIncome) -> DbResult<()> {
        debug!(
            id = %entry.id,
            till_id = %entry.till_id,
            amount = entry.amount_units,
            "Inserting expense/income entry"
        );

        sqlx::query(
            r#"
            INSERT INTO expense_income (
                id, till_id, kind, subkind, amount_units,
                description, timestamp, operator_id, till_session_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.till_id)
        .bind(entry.kind)
        .bind(entry.subkind)
        .bind(entry.amount_units)
        .bind(&entry.description)
        .bind(entry.timestamp)
        .bind(&entry.operator_id)
        .bind(&entry.till_session_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ExpenseIncome>> {
        let entry = sqlx::query_as::<_, ExpenseIncome>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM expense_income WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists the entries attributed to a session, oldest first.
    pub async fn list_for_session(&self, session_id: &str) -> DbResult<Vec<ExpenseIncome>> {
        let entries = sqlx::query_as::<_, ExpenseIncome>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM expense_income WHERE till_session_id = ?1 ORDER BY timestamp, id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lists all entries for a till, oldest first.
    pub async fn list_for_till(&self, till_id: &str) -> DbResult<Vec<ExpenseIncome>> {
        let entries = sqlx::query_as::<_, ExpenseIncome>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM expense_income WHERE till_id = ?1 ORDER BY timestamp, id"
        ))
        .bind(till_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lists every entry, oldest first. Used by the auditor.
    pub async fn list_all(&self) -> DbResult<Vec<ExpenseIncome>> {
        let entries = sqlx::query_as::<_, ExpenseIncome>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM expense_income ORDER BY timestamp, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
