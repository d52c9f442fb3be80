//! # Reconciliation Auditor Service
//!
//! Runs the pure audit checks from caja-core over the stored ledger,
//! persists the findings, and applies proposed repairs one at a time on
//! explicit operator request.
//!
//! ## Scan vs Repair
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  run_audit(scope)                                                       │
//! │    ├── read-only scan, no locks: findings are advisory                  │
//! │    ├── findings persisted with a shared run_id and a JSON payload       │
//! │    └── NOTHING is changed                                               │
//! │                                                                         │
//! │  apply_repair(finding_id)        ← explicit opt-in, one finding         │
//! │    ├── one transaction per repair, session rows locked by it            │
//! │    ├── before/after values logged                                       │
//! │    └── finding marked applied_at, repairs are one-shot                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Incorrect silent correction of financial records is worse than leaving
//! them flagged, so no code path in this module mutates the ledger
//! without a finding id handed in by the caller.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use caja_core::{run_audit as audit_checks, ExpenseIncome, Finding, Repair, Sale, TillSession};

use crate::error::{DbError, DbResult};

// =============================================================================
// Scope & Stored Findings
// =============================================================================

/// What portion of the ledger a scan covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditScope {
    /// Every till.
    All,
    /// A single till's sessions and transactions.
    Till(String),
}

/// A finding persisted by a scan, addressable for repair.
///
/// Serializable so the consuming review UI can render the categorized
/// list directly.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFinding {
    pub id: String,
    /// Shared by every finding of one scan.
    pub run_id: String,
    pub finding: Finding,
    pub created_at: DateTime<Utc>,
    /// Set when the proposed repair was executed.
    pub applied_at: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
struct FindingRow {
    id: String,
    run_id: String,
    payload: String,
    created_at: DateTime<Utc>,
    applied_at: Option<DateTime<Utc>>,
}

impl FindingRow {
    fn into_stored(self) -> DbResult<StoredFinding> {
        let finding: Finding =
            serde_json::from_str(&self.payload).map_err(|e| DbError::CorruptFinding {
                id: self.id.clone(),
                reason: e.to_string(),
            })?;
        Ok(StoredFinding {
            id: self.id,
            run_id: self.run_id,
            finding,
            created_at: self.created_at,
            applied_at: self.applied_at,
        })
    }
}

// =============================================================================
// Auditor Service
// =============================================================================

/// Batch reconciliation scans and explicit repairs.
#[derive(Debug, Clone)]
pub struct Auditor {
    pool: SqlitePool,
}

impl Auditor {
    /// Creates a new Auditor.
    pub fn new(pool: SqlitePool) -> Self {
        Auditor { pool }
    }

    /// Scans the scoped ledger and persists the findings.
    ///
    /// The scan itself is read-only and unlocked; the same data produces
    /// the same findings list on every run.
    pub async fn run_audit(&self, scope: AuditScope) -> DbResult<Vec<StoredFinding>> {
        let (sessions, sales, entries) = self.load_snapshot(&scope).await?;

        let findings = audit_checks(&sessions, &sales, &entries);

        let run_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(findings.len());

        for finding in findings {
            warn!(
                kind = finding.kind.as_str(),
                subject_id = %finding.subject_id,
                detail = %finding.detail,
                "Audit finding"
            );

            let id = Uuid::new_v4().to_string();
            let payload = serde_json::to_string(&finding)?;

            sqlx::query(
                r#"
                INSERT INTO audit_findings (
                    id, run_id, kind, subject_id, payload, created_at, applied_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)
                "#,
            )
            .bind(&id)
            .bind(&run_id)
            .bind(finding.kind.as_str())
            .bind(&finding.subject_id)
            .bind(&payload)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

            stored.push(StoredFinding {
                id,
                run_id: run_id.clone(),
                finding,
                created_at,
                applied_at: None,
            });
        }

        tx.commit().await?;

        info!(
            run_id = %run_id,
            findings = stored.len(),
            scope = ?scope,
            "Audit run complete"
        );

        Ok(stored)
    }

    /// Returns the findings of a previous run, oldest ordering preserved.
    pub async fn get_findings(&self, run_id: &str) -> DbResult<Vec<StoredFinding>> {
        let rows = sqlx::query_as::<_, FindingRow>(
            r#"
            SELECT id, run_id, payload, created_at, applied_at
            FROM audit_findings
            WHERE run_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(run_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FindingRow::into_stored).collect()
    }

    /// Applies the repair proposed by one finding.
    ///
    /// Explicit opt-in only: the caller names the finding, the repair
    /// runs in its own transaction, before/after values are logged, and
    /// the finding is marked applied so it cannot run twice.
    pub async fn apply_repair(&self, finding_id: &str) -> DbResult<Repair> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, FindingRow>(
            r#"
            SELECT id, run_id, payload, created_at, applied_at
            FROM audit_findings
            WHERE id = ?1
            "#,
        )
        .bind(finding_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Finding", finding_id))?;

        if row.applied_at.is_some() {
            return Err(DbError::RepairAlreadyApplied(finding_id.to_string()));
        }

        let stored = row.into_stored()?;
        let repair = stored
            .finding
            .proposed_repair
            .clone()
            .ok_or_else(|| DbError::RepairUnavailable(finding_id.to_string()))?;

        match &repair {
            Repair::ReattachEntry {
                entry_id,
                to_session_id,
            } => {
                let before: Option<(Option<String>,)> = sqlx::query_as(
                    "SELECT till_session_id FROM expense_income WHERE id = ?1",
                )
                .bind(entry_id)
                .fetch_optional(&mut *tx)
                .await?;
                let before = before
                    .ok_or_else(|| DbError::not_found("Entry", entry_id.clone()))?
                    .0;

                sqlx::query("UPDATE expense_income SET till_session_id = ?2 WHERE id = ?1")
                    .bind(entry_id)
                    .bind(to_session_id)
                    .execute(&mut *tx)
                    .await?;

                info!(
                    finding_id = %finding_id,
                    entry_id = %entry_id,
                    before_session = before.as_deref().unwrap_or("none"),
                    after_session = %to_session_id,
                    "Repair applied: entry reattached"
                );
            }

            Repair::ReattachSale {
                sale_id,
                to_session_id,
            } => {
                let before: Option<(Option<String>,)> =
                    sqlx::query_as("SELECT till_session_id FROM sales WHERE id = ?1")
                        .bind(sale_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                let before = before
                    .ok_or_else(|| DbError::not_found("Sale", sale_id.clone()))?
                    .0;

                sqlx::query("UPDATE sales SET till_session_id = ?2 WHERE id = ?1")
                    .bind(sale_id)
                    .bind(to_session_id)
                    .execute(&mut *tx)
                    .await?;

                info!(
                    finding_id = %finding_id,
                    sale_id = %sale_id,
                    before_session = before.as_deref().unwrap_or("none"),
                    after_session = %to_session_id,
                    "Repair applied: sale reattached"
                );
            }

            Repair::BackfillSessionForEntry {
                entry_id,
                till_id,
                day,
            } => {
                let row = sqlx::query_as::<_, ExpenseIncome>(
                    r#"
                    SELECT id, till_id, kind, subkind, amount_units,
                           description, timestamp, operator_id, till_session_id
                    FROM expense_income
                    WHERE id = ?1
                    "#,
                )
                .bind(entry_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Entry", entry_id.clone()))?;

                // The backfill snapshot closes at the entry's own effect:
                // zero float plus one attached entry.
                let session_id = insert_backfill_session(
                    &mut tx,
                    till_id,
                    *day,
                    &row.operator_id,
                    row.signed_amount().units(),
                )
                .await?;

                sqlx::query("UPDATE expense_income SET till_session_id = ?2 WHERE id = ?1")
                    .bind(entry_id)
                    .bind(&session_id)
                    .execute(&mut *tx)
                    .await?;

                info!(
                    finding_id = %finding_id,
                    entry_id = %entry_id,
                    before_session = row.till_session_id.as_deref().unwrap_or("none"),
                    backfilled_session = %session_id,
                    day = %day,
                    "Repair applied: session backfilled for entry"
                );
            }

            Repair::BackfillSessionForSale {
                sale_id,
                till_id,
                day,
            } => {
                let row = sqlx::query_as::<_, Sale>(
                    r#"
                    SELECT id, till_id, operator_id, seller_id, till_session_id,
                           timestamp, total_units, payment_method, amount_tendered_units,
                           completed, voided, void_reason, void_timestamp
                    FROM sales
                    WHERE id = ?1
                    "#,
                )
                .bind(sale_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Sale", sale_id.clone()))?;

                let closing_units = if row.counts_toward_balance() {
                    row.total_units
                } else {
                    0
                };
                let session_id = insert_backfill_session(
                    &mut tx,
                    till_id,
                    *day,
                    &row.operator_id,
                    closing_units,
                )
                .await?;

                sqlx::query("UPDATE sales SET till_session_id = ?2 WHERE id = ?1")
                    .bind(sale_id)
                    .bind(&session_id)
                    .execute(&mut *tx)
                    .await?;

                info!(
                    finding_id = %finding_id,
                    sale_id = %sale_id,
                    before_session = row.till_session_id.as_deref().unwrap_or("none"),
                    backfilled_session = %session_id,
                    day = %day,
                    "Repair applied: session backfilled for sale"
                );
            }

            Repair::MergeSessions {
                canonical_session_id,
                duplicate_session_id,
            } => {
                // The scan saw the duplicate with zero activity; verify
                // nothing attached to it since, or the merge would orphan
                // those rows.
                let (attached,): (i64,) = sqlx::query_as(
                    r#"
                    SELECT (SELECT COUNT(*) FROM sales WHERE till_session_id = ?1)
                         + (SELECT COUNT(*) FROM expense_income WHERE till_session_id = ?1)
                    "#,
                )
                .bind(duplicate_session_id)
                .fetch_one(&mut *tx)
                .await?;

                if attached > 0 {
                    return Err(DbError::RepairConflict {
                        finding_id: finding_id.to_string(),
                        reason: format!(
                            "session {} gained {} transactions since the scan",
                            duplicate_session_id, attached
                        ),
                    });
                }

                let result = sqlx::query("DELETE FROM till_sessions WHERE id = ?1")
                    .bind(duplicate_session_id)
                    .execute(&mut *tx)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Session", duplicate_session_id.clone()));
                }

                info!(
                    finding_id = %finding_id,
                    removed_session = %duplicate_session_id,
                    canonical_session = %canonical_session_id,
                    "Repair applied: duplicate session merged away"
                );
            }
        }

        sqlx::query("UPDATE audit_findings SET applied_at = ?2 WHERE id = ?1")
            .bind(finding_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(repair)
    }

    async fn load_snapshot(
        &self,
        scope: &AuditScope,
    ) -> DbResult<(Vec<TillSession>, Vec<Sale>, Vec<ExpenseIncome>)> {
        let sessions = crate::repository::till_session::TillSessionRepository::new(
            self.pool.clone(),
        );
        let sales = crate::repository::sale::SaleRepository::new(self.pool.clone());
        let entries = crate::repository::entry::EntryRepository::new(self.pool.clone());

        match scope {
            AuditScope::All => Ok((
                sessions.list_all().await?,
                sales.list_all().await?,
                entries.list_all().await?,
            )),
            AuditScope::Till(till_id) => Ok((
                sessions.list_for_till(till_id).await?,
                sales.list_for_till(till_id).await?,
                entries.list_for_till(till_id).await?,
            )),
        }
    }
}

/// Inserts a closed administrative session spanning one whole day, used
/// by the backfill repairs. Zero float; the closing snapshot reflects the
/// single row being attached.
async fn insert_backfill_session(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    till_id: &str,
    day: NaiveDate,
    operator_id: &str,
    closing_amount_units: i64,
) -> DbResult<String> {
    let opened_at = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    let closed_at = opened_at + Duration::days(1) - Duration::seconds(1);

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO till_sessions (
            id, till_id, operator_id,
            opened_at, closed_at,
            opening_float_units, closing_amount_units
        ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
        "#,
    )
    .bind(&id)
    .bind(till_id)
    .bind(operator_id)
    .bind(opened_at)
    .bind(closed_at)
    .bind(closing_amount_units)
    .execute(&mut **tx)
    .await?;

    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::NewSale;
    use crate::pool::{Database, DbConfig};
    use caja_core::{EntryKind, EntrySubkind, FindingKind, PaymentMethod};
    use chrono::{Duration, TimeZone};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn legacy_entry(id: &str, till_id: &str, session_id: Option<&str>) -> ExpenseIncome {
        ExpenseIncome {
            id: id.to_string(),
            till_id: till_id.to_string(),
            kind: EntryKind::Expense,
            subkind: EntrySubkind::Plain,
            amount_units: 5_000,
            description: "Fletes".to_string(),
            timestamp: Utc::now(),
            operator_id: "op1".to_string(),
            till_session_id: session_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_clean_ledger_yields_no_findings() {
        let db = db().await;
        let lifecycle = db.lifecycle();

        let session = lifecycle.open_session("1", "op1", 100_000).await.unwrap();
        lifecycle
            .record_sale(NewSale {
                till_id: "1".to_string(),
                operator_id: "op1".to_string(),
                seller_id: None,
                total_units: 20_000,
                payment_method: PaymentMethod::Cash,
                amount_tendered_units: Some(20_000),
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
        lifecycle.close_session(&session.id, 10_000).await.unwrap();

        let findings = db.auditor().run_audit(AuditScope::All).await.unwrap();
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn test_unattributed_entry_found_and_repaired() {
        let db = db().await;
        let lifecycle = db.lifecycle();
        let auditor = db.auditor();

        let session = lifecycle.open_session("1", "op1", 100_000).await.unwrap();

        // A legacy row that predates stored attribution.
        db.entries()
            .insert(&legacy_entry("legacy-1", "1", None))
            .await
            .unwrap();

        let findings = auditor.run_audit(AuditScope::All).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].finding.kind,
            FindingKind::UnattributedEntry
        );

        let repair = auditor.apply_repair(&findings[0].id).await.unwrap();
        assert_eq!(
            repair,
            Repair::ReattachEntry {
                entry_id: "legacy-1".to_string(),
                to_session_id: session.id.clone(),
            }
        );

        // The entry now counts toward the session's balance.
        let balance = lifecycle.get_balance(&session.id).await.unwrap();
        assert_eq!(balance.total.units(), 95_000);

        // And a fresh scan comes back clean.
        assert!(auditor.run_audit(AuditScope::All).await.unwrap().is_empty());

        // Repairs are one-shot.
        let err = auditor.apply_repair(&findings[0].id).await.unwrap_err();
        assert!(matches!(err, DbError::RepairAlreadyApplied(_)));
    }

    #[tokio::test]
    async fn test_out_of_window_entry_flagged_and_backfilled() {
        let db = db().await;
        let lifecycle = db.lifecycle();

        let session = lifecycle.open_session("1", "op1", 100_000).await.unwrap();

        // Entry timestamped one hour before the session opened, yet filed
        // on it.
        let mut entry = legacy_entry("e-early", "1", Some(&session.id));
        entry.timestamp = session.opened_at - Duration::hours(1);
        db.entries().insert(&entry).await.unwrap();

        let findings = db.auditor().run_audit(AuditScope::All).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding.kind, FindingKind::OutOfWindowEntry);
        assert!(findings[0].applied_at.is_none());

        // Nothing owned that hour, so the proposal is a backfill session.
        let repair = db.auditor().apply_repair(&findings[0].id).await.unwrap();
        let Repair::BackfillSessionForEntry { entry_id, day, .. } = &repair else {
            panic!("expected backfill repair, got {repair:?}");
        };
        assert_eq!(entry_id, "e-early");
        assert_eq!(*day, entry.timestamp.date_naive());

        // The entry now sits in a closed session whose window contains it.
        let moved = db.entries().get_by_id("e-early").await.unwrap().unwrap();
        let new_session_id = moved.till_session_id.clone().unwrap();
        assert_ne!(new_session_id, session.id);

        let backfilled = db
            .sessions()
            .get_by_id(&new_session_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!backfilled.is_open());
        assert!(backfilled.window_contains(moved.timestamp));
        assert_eq!(backfilled.opening_float_units, 0);
        assert_eq!(backfilled.closing_amount_units, Some(-5_000));

        // A fresh scan comes back clean.
        assert!(db.auditor().run_audit(AuditScope::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repair_unavailable_for_report_only_findings() {
        let db = db().await;
        let lifecycle = db.lifecycle();

        let session = lifecycle.open_session("1", "op1", 100_000).await.unwrap();

        // A withdrawal filed on a session that is still open has no safe
        // automatic repair.
        let mut withdrawal = legacy_entry("w1", "1", Some(&session.id));
        withdrawal.subkind = EntrySubkind::Withdrawal;
        db.entries().insert(&withdrawal).await.unwrap();

        let findings = db.auditor().run_audit(AuditScope::All).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].finding.kind,
            FindingKind::WithdrawalOnOpenSession
        );

        let err = db.auditor().apply_repair(&findings[0].id).await.unwrap_err();
        assert!(matches!(err, DbError::RepairUnavailable(_)));
    }

    #[tokio::test]
    async fn test_audit_runs_are_idempotent() {
        let db = db().await;
        let lifecycle = db.lifecycle();

        lifecycle.open_session("1", "op1", 100_000).await.unwrap();
        db.entries()
            .insert(&legacy_entry("legacy-1", "1", None))
            .await
            .unwrap();
        db.entries()
            .insert(&legacy_entry("legacy-2", "2", None))
            .await
            .unwrap();

        let first = db.auditor().run_audit(AuditScope::All).await.unwrap();
        let second = db.auditor().run_audit(AuditScope::All).await.unwrap();

        let first_payloads: Vec<&Finding> = first.iter().map(|f| &f.finding).collect();
        let second_payloads: Vec<&Finding> = second.iter().map(|f| &f.finding).collect();
        assert_eq!(first_payloads, second_payloads);

        // Both runs remain retrievable by their run id.
        let reloaded = db.auditor().get_findings(&first[0].run_id).await.unwrap();
        assert_eq!(reloaded.len(), first.len());
    }

    #[tokio::test]
    async fn test_scoped_audit_only_sees_its_till() {
        let db = db().await;

        db.entries()
            .insert(&legacy_entry("legacy-1", "1", None))
            .await
            .unwrap();
        db.entries()
            .insert(&legacy_entry("legacy-2", "2", None))
            .await
            .unwrap();

        let findings = db
            .auditor()
            .run_audit(AuditScope::Till("1".to_string()))
            .await
            .unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding.subject_id, "legacy-1");
    }

    #[tokio::test]
    async fn test_empty_session_merge_repair() {
        let db = db().await;
        let sessions = db.sessions();
        let morning = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap();

        // Two sessions for the same till and day, inserted the way the
        // legacy importer used to: one real, one zero-activity duplicate.
        let canonical = TillSession {
            id: "real".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            opened_at: morning,
            closed_at: Some(evening),
            opening_float_units: 100_000,
            closing_amount_units: Some(100_000),
        };
        let duplicate = TillSession {
            id: "dup".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            opened_at: morning,
            closed_at: Some(morning),
            opening_float_units: 0,
            closing_amount_units: Some(0),
        };
        sessions.insert(&canonical).await.unwrap();
        sessions.insert(&duplicate).await.unwrap();

        let findings = db.auditor().run_audit(AuditScope::All).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding.kind, FindingKind::EmptySession);

        let repair = db.auditor().apply_repair(&findings[0].id).await.unwrap();
        assert_eq!(
            repair,
            Repair::MergeSessions {
                canonical_session_id: "real".to_string(),
                duplicate_session_id: "dup".to_string(),
            }
        );

        assert!(sessions.get_by_id("dup").await.unwrap().is_none());
        assert!(sessions.get_by_id("real").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_merge_conflicts_when_duplicate_gained_activity() {
        let db = db().await;
        let lifecycle = db.lifecycle();
        let morning = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let midday = Utc.with_ymd_and_hms(2026, 3, 14, 13, 0, 0).unwrap();

        let canonical = TillSession {
            id: "real".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            opened_at: morning,
            closed_at: Some(midday),
            opening_float_units: 100_000,
            closing_amount_units: Some(100_000),
        };
        let duplicate = TillSession {
            id: "dup".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            opened_at: Utc.with_ymd_and_hms(2026, 3, 14, 13, 30, 0).unwrap(),
            closed_at: None,
            opening_float_units: 0,
            closing_amount_units: None,
        };
        db.sessions().insert(&canonical).await.unwrap();
        db.sessions().insert(&duplicate).await.unwrap();

        let findings = db.auditor().run_audit(AuditScope::All).await.unwrap();
        let empty = findings
            .iter()
            .find(|f| f.finding.kind == FindingKind::EmptySession)
            .unwrap();

        // Between the scan and the repair, the "duplicate" received a
        // sale (it is the open session, so attribution picks it).
        lifecycle
            .record_sale(NewSale {
                till_id: "1".to_string(),
                operator_id: "op1".to_string(),
                seller_id: None,
                total_units: 1_000,
                payment_method: PaymentMethod::Cash,
                amount_tendered_units: Some(1_000),
                timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 14, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        let err = db.auditor().apply_repair(&empty.id).await.unwrap_err();
        assert!(matches!(err, DbError::RepairConflict { .. }));

        // The session survived.
        assert!(db.sessions().get_by_id("dup").await.unwrap().is_some());
    }
}
