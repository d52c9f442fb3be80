//! # Sale Repository
//!
//! Database operations for sale rows. Sales are written by the lifecycle
//! service (which assigns the owning session inside the same transaction);
//! this repository covers the read side plus the plain insert used there.

use sqlx::SqlitePool;
use tracing::debug;

use caja_core::Sale;

use crate::error::DbResult;

const SALE_COLUMNS: &str = r#"
    id, till_id, operator_id, seller_id, till_session_id,
    timestamp, total_units, payment_method, amount_tendered_units,
    completed, voided, void_reason, void_timestamp
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale row.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, till_id = %sale.till_id, total = sale.total_units, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, till_id, operator_id, seller_id, till_session_id,
                timestamp, total_units, payment_method, amount_tendered_units,
                completed, voided, void_reason, void_timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.till_id)
        .bind(&sale.operator_id)
        .bind(&sale.seller_id)
        .bind(&sale.till_session_id)
        .bind(sale.timestamp)
        .bind(sale.total_units)
        .bind(sale.payment_method)
        .bind(sale.amount_tendered_units)
        .bind(sale.completed)
        .bind(sale.voided)
        .bind(&sale.void_reason)
        .bind(sale.void_timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists the sales attributed to a session, oldest first.
    pub async fn list_for_session(&self, session_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE till_session_id = ?1 ORDER BY timestamp, id"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists all sales for a till, oldest first.
    pub async fn list_for_till(&self, till_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE till_id = ?1 ORDER BY timestamp, id"
        ))
        .bind(till_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists every sale, oldest first. Used by the auditor.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY timestamp, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}
