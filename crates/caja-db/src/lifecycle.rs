//! # Session Lifecycle Service
//!
//! Orchestrates the till session state machine and the ingestion of
//! transactions, enforcing the reconciliation invariants.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Lifecycle                                  │
//! │                                                                         │
//! │  open_session(till, operator, float)                                    │
//! │       │                                                                 │
//! │       ├── till already has an OPEN session? → SessionAlreadyOpen        │
//! │       ▼                                                                 │
//! │    [ OPEN ] ◄── record_sale / record_entry / void_sale attach here      │
//! │       │                                                                 │
//! │  close_session(session, withdrawal)                                     │
//! │       │                                                                 │
//! │       ├── withdrawal > computed balance? → InsufficientFunds            │
//! │       ├── withdrawal > 0 → withdrawal expense entry dated now           │
//! │       ▼                                                                 │
//! │    [ CLOSED ]  closed_at + closing_amount set together, exactly once    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Every operation runs inside a single SQLite transaction: entry creation
//! and state mutation commit together or not at all. A rejected operation
//! leaves no partial writes behind. Concurrent opens on the same till are
//! decided by the partial unique index; the loser gets
//! `SessionAlreadyOpen`, not a duplicate session.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use caja_core::{
    attribution::owning_session,
    balance::compute_balance,
    types::{
        void_reversal_description, EntryKind, EntrySubkind, ExpenseIncome, PaymentMethod, Sale,
        TillSession, WITHDRAWAL_DESCRIPTION,
    },
    validation, Balance, CoreError,
};

use crate::error::{DbError, DbResult};

// =============================================================================
// Ingestion Inputs
// =============================================================================

/// Input for recording a completed sale (spec'd by the checkout layer).
#[derive(Debug, Clone)]
pub struct NewSale {
    pub till_id: String,
    pub operator_id: String,
    pub seller_id: Option<String>,
    pub total_units: i64,
    pub payment_method: PaymentMethod,
    /// Cash handed over by the customer; cash payments only.
    pub amount_tendered_units: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// Input for recording a manual expense/income entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub till_id: String,
    pub kind: EntryKind,
    pub amount_units: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub operator_id: String,
}

// =============================================================================
// Lifecycle Service
// =============================================================================

/// Transactional session lifecycle operations.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    pool: SqlitePool,
}

impl Lifecycle {
    /// Creates a new Lifecycle service.
    pub fn new(pool: SqlitePool) -> Self {
        Lifecycle { pool }
    }

    /// Opens a new session for a till.
    ///
    /// ## Preconditions
    /// - `opening_float_units >= 0`
    /// - The till has no open session. If one exists the call is rejected
    ///   with `SessionAlreadyOpen`; the caller must close it or keep
    ///   using it explicitly.
    pub async fn open_session(
        &self,
        till_id: &str,
        operator_id: &str,
        opening_float_units: i64,
    ) -> DbResult<TillSession> {
        validation::validate_id(till_id, "till_id").map_err(CoreError::from)?;
        validation::validate_id(operator_id, "operator_id").map_err(CoreError::from)?;
        validation::validate_non_negative_amount(opening_float_units, "opening_float")
            .map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        if let Some(existing) = fetch_open_session(&mut tx, till_id).await? {
            return Err(CoreError::SessionAlreadyOpen {
                till_id: till_id.to_string(),
                session_id: existing.id,
            }
            .into());
        }

        let session = TillSession {
            id: Uuid::new_v4().to_string(),
            till_id: till_id.to_string(),
            operator_id: operator_id.to_string(),
            opened_at: Utc::now(),
            closed_at: None,
            opening_float_units,
            closing_amount_units: None,
        };

        let inserted = sqlx::query(
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
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            // A concurrent open won the race between our check and our
            // insert; the partial unique index catches it.
            Err(err) => {
                let err = DbError::from(err);
                if matches!(err, DbError::UniqueViolation { .. }) {
                    return Err(CoreError::SessionAlreadyOpen {
                        till_id: till_id.to_string(),
                        session_id: "concurrent".to_string(),
                    }
                    .into());
                }
                return Err(err);
            }
        }

        tx.commit().await?;

        info!(
            session_id = %session.id,
            till_id = %till_id,
            operator_id = %operator_id,
            opening_float = %session.opening_float(),
            "Session opened"
        );

        Ok(session)
    }

    /// Closes a session, optionally withdrawing cash from the drawer.
    ///
    /// ## What This Does
    /// 1. Recomputes the session balance from its attributed rows
    /// 2. Rejects `withdrawal > balance` with `InsufficientFunds`
    /// 3. Records a withdrawal expense dated now when `withdrawal > 0`
    /// 4. Snapshots `closing_amount = balance - withdrawal` and sets
    ///    `closed_at`, both in the same transaction
    pub async fn close_session(
        &self,
        session_id: &str,
        withdrawal_units: i64,
    ) -> DbResult<TillSession> {
        validation::validate_non_negative_amount(withdrawal_units, "withdrawal")
            .map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let mut session = fetch_session(&mut tx, session_id)
            .await?
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;

        if !session.is_open() {
            return Err(CoreError::SessionAlreadyClosed(session_id.to_string()).into());
        }

        let sales = fetch_sales_for_session(&mut tx, session_id).await?;
        let entries = fetch_entries_for_session(&mut tx, session_id).await?;
        let balance = compute_balance(&session, &sales, &entries);

        // The withdrawal may take everything in the drawer, but not more.
        // A zero withdrawal always closes, even a till that is short.
        if withdrawal_units > 0 && withdrawal_units > balance.total.units() {
            return Err(CoreError::InsufficientFunds {
                requested: withdrawal_units,
                available: balance.total.units(),
            }
            .into());
        }

        let now = Utc::now();

        if withdrawal_units > 0 {
            let withdrawal = ExpenseIncome {
                id: Uuid::new_v4().to_string(),
                till_id: session.till_id.clone(),
                kind: EntryKind::Expense,
                subkind: EntrySubkind::Withdrawal,
                amount_units: withdrawal_units,
                description: WITHDRAWAL_DESCRIPTION.to_string(),
                timestamp: now,
                operator_id: session.operator_id.clone(),
                till_session_id: Some(session.id.clone()),
            };
            insert_entry(&mut tx, &withdrawal).await?;
        }

        let closing_amount_units = balance.total.units() - withdrawal_units;

        let result = sqlx::query(
            r#"
            UPDATE till_sessions
            SET closed_at = ?2, closing_amount_units = ?3
            WHERE id = ?1 AND closed_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(now)
        .bind(closing_amount_units)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::SessionAlreadyClosed(session_id.to_string()).into());
        }

        tx.commit().await?;

        session.closed_at = Some(now);
        session.closing_amount_units = Some(closing_amount_units);

        info!(
            session_id = %session_id,
            till_id = %session.till_id,
            withdrawal = withdrawal_units,
            closing_amount = closing_amount_units,
            "Session closed"
        );

        Ok(session)
    }

    /// Records a completed sale and attributes it to the owning session.
    ///
    /// Attribution runs exactly once, here, and the resulting link is
    /// stored on the row. `NoOwningSession` aborts the whole operation.
    pub async fn record_sale(&self, new: NewSale) -> DbResult<Sale> {
        validation::validate_id(&new.till_id, "till_id").map_err(CoreError::from)?;
        validation::validate_id(&new.operator_id, "operator_id").map_err(CoreError::from)?;
        validation::validate_non_negative_amount(new.total_units, "total")
            .map_err(CoreError::from)?;
        validation::validate_tendered(new.payment_method, new.amount_tendered_units)
            .map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let sessions = fetch_sessions_for_till(&mut tx, &new.till_id).await?;
        let owner = owning_session(&sessions, &new.till_id, new.timestamp)?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            till_id: new.till_id.clone(),
            operator_id: new.operator_id.clone(),
            seller_id: new.seller_id.clone(),
            till_session_id: Some(owner.id.clone()),
            timestamp: new.timestamp,
            total_units: new.total_units,
            payment_method: new.payment_method,
            amount_tendered_units: new.amount_tendered_units,
            completed: true,
            voided: false,
            void_reason: None,
            void_timestamp: None,
        };

        insert_sale(&mut tx, &sale).await?;
        tx.commit().await?;

        debug!(
            sale_id = %sale.id,
            session_id = %sale.till_session_id.as_deref().unwrap_or(""),
            total = sale.total_units,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Records a manual expense/income entry and attributes it to the
    /// owning session.
    pub async fn record_entry(&self, new: NewEntry) -> DbResult<ExpenseIncome> {
        validation::validate_id(&new.till_id, "till_id").map_err(CoreError::from)?;
        validation::validate_id(&new.operator_id, "operator_id").map_err(CoreError::from)?;
        validation::validate_positive_amount(new.amount_units, "amount")
            .map_err(CoreError::from)?;
        validation::validate_description(&new.description).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let sessions = fetch_sessions_for_till(&mut tx, &new.till_id).await?;
        let owner = owning_session(&sessions, &new.till_id, new.timestamp)?;

        let entry = ExpenseIncome {
            id: Uuid::new_v4().to_string(),
            till_id: new.till_id.clone(),
            kind: new.kind,
            subkind: EntrySubkind::Plain,
            amount_units: new.amount_units,
            description: new.description.trim().to_string(),
            timestamp: new.timestamp,
            operator_id: new.operator_id.clone(),
            till_session_id: Some(owner.id.clone()),
        };

        insert_entry(&mut tx, &entry).await?;
        tx.commit().await?;

        debug!(
            entry_id = %entry.id,
            session_id = %entry.till_session_id.as_deref().unwrap_or(""),
            amount = entry.amount_units,
            "Entry recorded"
        );

        Ok(entry)
    }

    /// Voids a sale. One-way: there is no un-void.
    ///
    /// When the sale had tendered cash, a compensating void-reversal
    /// expense is created and attributed to the session owning the *void
    /// timestamp*, not the sale's original session. The physical cash
    /// leaves whatever drawer is open when the refund happens, which may
    /// be a different day's session. If no session owns the void moment,
    /// the whole void is rejected with `NoOwningSession`.
    pub async fn void_sale(&self, sale_id: &str, reason: &str) -> DbResult<Sale> {
        validation::validate_id(reason, "void_reason").map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let mut sale = fetch_sale(&mut tx, sale_id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        if sale.voided {
            return Err(CoreError::SaleAlreadyVoided(sale_id.to_string()).into());
        }

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales
            SET voided = 1, void_reason = ?2, void_timestamp = ?3
            WHERE id = ?1 AND voided = 0
            "#,
        )
        .bind(sale_id)
        .bind(reason)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::SaleAlreadyVoided(sale_id.to_string()).into());
        }

        let tendered = sale.amount_tendered_units.unwrap_or(0);
        let mut reversal_session_id = None;

        if tendered > 0 {
            let sessions = fetch_sessions_for_till(&mut tx, &sale.till_id).await?;
            let owner = owning_session(&sessions, &sale.till_id, now)?;

            let reversal = ExpenseIncome {
                id: Uuid::new_v4().to_string(),
                till_id: sale.till_id.clone(),
                kind: EntryKind::Expense,
                subkind: EntrySubkind::VoidReversal,
                amount_units: tendered,
                description: void_reversal_description(sale_id),
                timestamp: now,
                operator_id: sale.operator_id.clone(),
                till_session_id: Some(owner.id.clone()),
            };
            insert_entry(&mut tx, &reversal).await?;
            reversal_session_id = Some(owner.id.clone());
        }

        tx.commit().await?;

        sale.voided = true;
        sale.void_reason = Some(reason.to_string());
        sale.void_timestamp = Some(now);

        info!(
            sale_id = %sale_id,
            reason = %reason,
            reversal_units = tendered,
            reversal_session = reversal_session_id.as_deref().unwrap_or("none"),
            "Sale voided"
        );

        Ok(sale)
    }

    /// Computes the expected balance of a session with its breakdown.
    ///
    /// Runs inside one read transaction so the sales and entry sums are
    /// consistent with respect to a single point in time.
    pub async fn get_balance(&self, session_id: &str) -> DbResult<Balance> {
        let mut tx = self.pool.begin().await?;

        let session = fetch_session(&mut tx, session_id)
            .await?
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;

        let sales = fetch_sales_for_session(&mut tx, session_id).await?;
        let entries = fetch_entries_for_session(&mut tx, session_id).await?;

        tx.commit().await?;

        Ok(compute_balance(&session, &sales, &entries))
    }
}

// =============================================================================
// Transaction-scoped queries
// =============================================================================
// These run on the operation's own connection so every read and write of
// one lifecycle call sees the same snapshot.

async fn fetch_session(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<TillSession>> {
    let session = sqlx::query_as::<_, TillSession>(
        r#"
        SELECT id, till_id, operator_id, opened_at, closed_at,
               opening_float_units, closing_amount_units
        FROM till_sessions
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(session)
}

async fn fetch_open_session(
    conn: &mut SqliteConnection,
    till_id: &str,
) -> DbResult<Option<TillSession>> {
    let session = sqlx::query_as::<_, TillSession>(
        r#"
        SELECT id, till_id, operator_id, opened_at, closed_at,
               opening_float_units, closing_amount_units
        FROM till_sessions
        WHERE till_id = ?1 AND closed_at IS NULL
        "#,
    )
    .bind(till_id)
    .fetch_optional(conn)
    .await?;

    Ok(session)
}

async fn fetch_sessions_for_till(
    conn: &mut SqliteConnection,
    till_id: &str,
) -> DbResult<Vec<TillSession>> {
    let sessions = sqlx::query_as::<_, TillSession>(
        r#"
        SELECT id, till_id, operator_id, opened_at, closed_at,
               opening_float_units, closing_amount_units
        FROM till_sessions
        WHERE till_id = ?1
        ORDER BY opened_at, id
        "#,
    )
    .bind(till_id)
    .fetch_all(conn)
    .await?;

    Ok(sessions)
}

async fn fetch_sale(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, till_id, operator_id, seller_id, till_session_id,
               timestamp, total_units, payment_method, amount_tendered_units,
               completed, voided, void_reason, void_timestamp
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(sale)
}

async fn fetch_sales_for_session(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> DbResult<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, till_id, operator_id, seller_id, till_session_id,
               timestamp, total_units, payment_method, amount_tendered_units,
               completed, voided, void_reason, void_timestamp
        FROM sales
        WHERE till_session_id = ?1
        ORDER BY timestamp, id
        "#,
    )
    .bind(session_id)
    .fetch_all(conn)
    .await?;

    Ok(sales)
}

async fn fetch_entries_for_session(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> DbResult<Vec<ExpenseIncome>> {
    let entries = sqlx::query_as::<_, ExpenseIncome>(
        r#"
        SELECT id, till_id, kind, subkind, amount_units,
               description, timestamp, operator_id, till_session_id
        FROM expense_income
        WHERE till_session_id = ?1
        ORDER BY timestamp, id
        "#,
    )
    .bind(session_id)
    .fetch_all(conn)
    .await?;

    Ok(entries)
}

async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
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
    .execute(conn)
    .await?;

    Ok(())
}

async fn insert_entry(conn: &mut SqliteConnection, entry: &ExpenseIncome) -> DbResult<()> {
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
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
