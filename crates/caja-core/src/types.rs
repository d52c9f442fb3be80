//! # Ledger Types
//!
//! Core domain types for the reconciliation engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  TillSession    │   │      Sale       │   │  ExpenseIncome  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  till_session_id│   │  till_session_id│──┐    │
//! │  │  till_id        │   │  total_units    │   │  kind, subkind  │  │    │
//! │  │  opened_at      │   │  voided         │   │  amount_units   │  │    │
//! │  │  closed_at?     │   │  amount_tendered│   └─────────────────┘  │    │
//! │  └─────────▲───────┘   └─────────────────┘                        │    │
//! │            └──────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │   EntryKind     │   │  EntrySubkind   │       │
//! │  │  Cash           │   │   Expense       │   │  Plain          │       │
//! │  │  Card           │   │   Income        │   │  Withdrawal     │       │
//! │  │  Transfer       │   └─────────────────┘   │  VoidReversal   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Attribution Is Stored, Not Recomputed
//! Every `Sale` and `ExpenseIncome` carries a nullable `till_session_id`
//! assigned once at creation time by session attribution. A null link only
//! appears on legacy/imported rows; the auditor flags those instead of
//! guessing an owner at query time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash into the drawer. The only method that moves till cash.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Entry Kind & Subkind
// =============================================================================

/// Direction of a manual cash adjustment.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Cash leaving the till (gasto).
    Expense,
    /// Cash entering the till (ingreso).
    Income,
}

/// Structured tag for the special expense sub-kinds.
///
/// The legacy system distinguished withdrawals and void reversals by
/// matching substrings of the free-text description. That made every
/// consumer of the ledger fragile against a reworded description, so the
/// tag is now an explicit column set at creation time.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySubkind {
    /// Ordinary operator-entered adjustment.
    Plain,
    /// Cash removed from the drawer when closing a session.
    Withdrawal,
    /// Compensating expense created when a cash sale is voided.
    VoidReversal,
}

// =============================================================================
// Till Session
// =============================================================================

/// One cashier's continuous custody of a till, from open to close.
///
/// ## Invariants
/// - `closed_at` and `closing_amount_units` are both null (open) or both
///   set (closed); never one without the other
/// - `opened_at <= closed_at` when closed
/// - At most one open session per till (enforced by a partial unique
///   index in the store)
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TillSession {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Till (caja) this session belongs to.
    pub till_id: String,

    /// Operator who has custody of the drawer.
    pub operator_id: String,

    /// When custody started.
    pub opened_at: DateTime<Utc>,

    /// When custody ended; null while the session is open.
    pub closed_at: Option<DateTime<Utc>>,

    /// Cash placed in the drawer at session start.
    pub opening_float_units: i64,

    /// Final balance snapshot taken at close; null while open.
    pub closing_amount_units: Option<i64>,
}

impl TillSession {
    /// Whether the session is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Returns the opening float as Money.
    #[inline]
    pub fn opening_float(&self) -> Money {
        Money::from_units(self.opening_float_units)
    }

    /// Returns the closing snapshot as Money, if closed.
    #[inline]
    pub fn closing_amount(&self) -> Option<Money> {
        self.closing_amount_units.map(Money::from_units)
    }

    /// Whether a timestamp falls inside this session's custody window.
    ///
    /// Open sessions accept anything at or after `opened_at`; closed
    /// sessions additionally require `timestamp <= closed_at`.
    pub fn window_contains(&self, timestamp: DateTime<Utc>) -> bool {
        if timestamp < self.opened_at {
            return false;
        }
        match self.closed_at {
            Some(closed_at) => timestamp <= closed_at,
            None => true,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed transaction against a till.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub till_id: String,
    /// Operator at the register.
    pub operator_id: String,
    /// Salesperson credited with the sale, when distinct from the operator.
    pub seller_id: Option<String>,
    /// Owning session, assigned at creation time. Null on legacy rows.
    pub till_session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub total_units: i64,
    pub payment_method: PaymentMethod,
    /// Cash handed over by the customer; cash payments only.
    pub amount_tendered_units: Option<i64>,
    pub completed: bool,
    /// One-way flag; a voided sale contributes zero to the balance and is
    /// compensated by a void-reversal expense entry.
    pub voided: bool,
    pub void_reason: Option<String>,
    pub void_timestamp: Option<DateTime<Utc>>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_units(self.total_units)
    }

    /// Returns the cash tendered as Money, if any.
    #[inline]
    pub fn amount_tendered(&self) -> Option<Money> {
        self.amount_tendered_units.map(Money::from_units)
    }

    /// Whether this sale counts toward a till balance.
    ///
    /// Voided sales contribute zero directly; their cash effect exists
    /// only through the compensating void-reversal entry.
    #[inline]
    pub fn counts_toward_balance(&self) -> bool {
        self.completed && !self.voided
    }
}

// =============================================================================
// Expense / Income Entry
// =============================================================================

/// Default description recorded on withdrawal-at-close entries.
pub const WITHDRAWAL_DESCRIPTION: &str = "Retiro de dinero al cerrar caja";

/// Builds the description recorded on a void-reversal entry.
///
/// The sale id is embedded so the reversal can be traced back to the sale
/// it compensates, and so the auditor can verify the pairing.
pub fn void_reversal_description(sale_id: &str) -> String {
    format!("Devolución por anulación de venta #{}", sale_id)
}

/// A manual adjustment to the till's cash (GastoCaja).
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseIncome {
    pub id: String,
    pub till_id: String,
    pub kind: EntryKind,
    pub subkind: EntrySubkind,
    /// Always positive; direction comes from `kind`.
    pub amount_units: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub operator_id: String,
    /// Owning session, assigned at creation time. Null on legacy rows;
    /// repointed only by an explicit auditor repair.
    pub till_session_id: Option<String>,
}

impl ExpenseIncome {
    /// Returns the entry amount as Money (always positive).
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_units(self.amount_units)
    }

    /// Returns the amount signed by direction: income positive, expense
    /// negative.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryKind::Income => self.amount(),
            EntryKind::Expense => -self.amount(),
        }
    }

    /// Whether this is a withdrawal-at-close entry.
    #[inline]
    pub fn is_withdrawal(&self) -> bool {
        self.subkind == EntrySubkind::Withdrawal
    }

    /// Whether this is a void-reversal entry.
    #[inline]
    pub fn is_void_reversal(&self) -> bool {
        self.subkind == EntrySubkind::VoidReversal
    }
}

// =============================================================================
// Balance Output
// =============================================================================

/// Per-component breakdown of a computed balance, for audit display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBreakdown {
    /// Cash placed in the drawer at open.
    pub opening_float: Money,
    /// Sum of non-voided attributed sale totals.
    pub sales_total: Money,
    /// Sum of attributed income entries.
    pub income_total: Money,
    /// Sum of attributed expense entries (withdrawals included).
    pub expense_total: Money,
    /// Sum of the withdrawal subset of `expense_total`, reported
    /// separately. Not an extra subtraction.
    pub withdrawal_total: Money,
}

/// A computed balance with its component breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Expected cash in the drawer.
    pub total: Money,
    pub breakdown: BalanceBreakdown,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn open_session() -> TillSession {
        TillSession {
            id: "s1".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            opened_at: ts(9),
            closed_at: None,
            opening_float_units: 100_000,
            closing_amount_units: None,
        }
    }

    #[test]
    fn test_open_session_window() {
        let session = open_session();
        assert!(session.is_open());
        assert!(session.window_contains(ts(9)));
        assert!(session.window_contains(ts(23)));
        assert!(!session.window_contains(ts(8)));
    }

    #[test]
    fn test_closed_session_window() {
        let mut session = open_session();
        session.closed_at = Some(ts(18));
        session.closing_amount_units = Some(105_000);

        assert!(!session.is_open());
        assert!(session.window_contains(ts(9)));
        assert!(session.window_contains(ts(18)));
        assert!(!session.window_contains(ts(19)));
        assert_eq!(session.closing_amount(), Some(Money::from_units(105_000)));
    }

    #[test]
    fn test_signed_amount() {
        let mut entry = ExpenseIncome {
            id: "e1".to_string(),
            till_id: "1".to_string(),
            kind: EntryKind::Expense,
            subkind: EntrySubkind::Plain,
            amount_units: 5_000,
            description: "Bolsas".to_string(),
            timestamp: ts(10),
            operator_id: "op1".to_string(),
            till_session_id: Some("s1".to_string()),
        };
        assert_eq!(entry.signed_amount().units(), -5_000);

        entry.kind = EntryKind::Income;
        assert_eq!(entry.signed_amount().units(), 5_000);
    }

    #[test]
    fn test_voided_sale_does_not_count() {
        let sale = Sale {
            id: "v1".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            seller_id: None,
            till_session_id: Some("s1".to_string()),
            timestamp: ts(11),
            total_units: 20_000,
            payment_method: PaymentMethod::Cash,
            amount_tendered_units: Some(20_000),
            completed: true,
            voided: true,
            void_reason: Some("cliente arrepentido".to_string()),
            void_timestamp: Some(ts(12)),
        };
        assert!(!sale.counts_toward_balance());
    }

    #[test]
    fn test_void_reversal_description_embeds_sale_id() {
        let desc = void_reversal_description("v1");
        assert!(desc.contains("v1"));
    }

    #[test]
    fn test_enum_serde_tags() {
        // The auditor persists these tags; they must stay snake_case.
        assert_eq!(
            serde_json::to_string(&EntrySubkind::VoidReversal).unwrap(),
            "\"void_reversal\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
    }
}
