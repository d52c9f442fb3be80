//! # Balance Calculator
//!
//! Computes the expected cash balance for a session at any point in time,
//! open or closed.
//!
//! ## The Canonical Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  balance = opening_float                                                │
//! │          + Σ sale.total      (attributed, completed, not voided)        │
//! │          + Σ entry.amount    (attributed, kind == income)               │
//! │          - Σ entry.amount    (attributed, kind == expense)              │
//! │                                                                         │
//! │  Withdrawals ARE expenses: they appear once inside the expense sum      │
//! │  and are reported separately as withdrawal_total for summaries.         │
//! │  They are never subtracted twice.                                       │
//! │                                                                         │
//! │  Voided sales contribute ZERO directly. Their cash effect exists        │
//! │  only through the void-reversal expense created at void time. If        │
//! │  that reversal is missing, this calculator overstates the balance       │
//! │  by the voided sale's tendered amount; the auditor checks for it.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is integer [`Money`]; no floating point anywhere.

use crate::money::Money;
use crate::types::{Balance, BalanceBreakdown, EntryKind, ExpenseIncome, Sale, TillSession};

/// Computes the expected balance of `session` from its attributed sales
/// and expense/income entries.
///
/// Inputs may be unfiltered: only rows whose stored `till_session_id`
/// matches the session are counted. Never mutates anything.
pub fn compute_balance(
    session: &TillSession,
    sales: &[Sale],
    entries: &[ExpenseIncome],
) -> Balance {
    let attributed_sales = sales
        .iter()
        .filter(|s| s.till_session_id.as_deref() == Some(session.id.as_str()));

    let sales_total: Money = attributed_sales
        .filter(|s| s.counts_toward_balance())
        .map(|s| s.total())
        .sum();

    let mut income_total = Money::zero();
    let mut expense_total = Money::zero();
    let mut withdrawal_total = Money::zero();

    for entry in entries
        .iter()
        .filter(|e| e.till_session_id.as_deref() == Some(session.id.as_str()))
    {
        match entry.kind {
            EntryKind::Income => income_total += entry.amount(),
            EntryKind::Expense => {
                expense_total += entry.amount();
                if entry.is_withdrawal() {
                    withdrawal_total += entry.amount();
                }
            }
        }
    }

    let opening_float = session.opening_float();
    let total = opening_float + sales_total + income_total - expense_total;

    Balance {
        total,
        breakdown: BalanceBreakdown {
            opening_float,
            sales_total,
            income_total,
            expense_total,
            withdrawal_total,
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntrySubkind, PaymentMethod};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn session_with_float(units: i64) -> TillSession {
        TillSession {
            id: "s1".to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            opened_at: ts(9),
            closed_at: None,
            opening_float_units: units,
            closing_amount_units: None,
        }
    }

    fn cash_sale(id: &str, session_id: &str, total: i64) -> Sale {
        Sale {
            id: id.to_string(),
            till_id: "1".to_string(),
            operator_id: "op1".to_string(),
            seller_id: None,
            till_session_id: Some(session_id.to_string()),
            timestamp: ts(11),
            total_units: total,
            payment_method: PaymentMethod::Cash,
            amount_tendered_units: Some(total),
            completed: true,
            voided: false,
            void_reason: None,
            void_timestamp: None,
        }
    }

    fn entry(
        id: &str,
        session_id: &str,
        kind: EntryKind,
        subkind: EntrySubkind,
        amount: i64,
    ) -> ExpenseIncome {
        ExpenseIncome {
            id: id.to_string(),
            till_id: "1".to_string(),
            kind,
            subkind,
            amount_units: amount,
            description: "test".to_string(),
            timestamp: ts(12),
            operator_id: "op1".to_string(),
            till_session_id: Some(session_id.to_string()),
        }
    }

    #[test]
    fn test_empty_session_is_opening_float() {
        let session = session_with_float(100_000);
        let balance = compute_balance(&session, &[], &[]);

        assert_eq!(balance.total.units(), 100_000);
        assert_eq!(balance.breakdown.sales_total, Money::zero());
        assert_eq!(balance.breakdown.withdrawal_total, Money::zero());
    }

    #[test]
    fn test_canonical_formula() {
        // open float 100000; cash sale 20000; expense 5000
        // balance = 100000 + 20000 - 5000 = 115000
        let session = session_with_float(100_000);
        let sales = vec![cash_sale("v1", "s1", 20_000)];
        let entries = vec![entry(
            "e1",
            "s1",
            EntryKind::Expense,
            EntrySubkind::Plain,
            5_000,
        )];

        let balance = compute_balance(&session, &sales, &entries);
        assert_eq!(balance.total.units(), 115_000);
        assert_eq!(balance.breakdown.sales_total.units(), 20_000);
        assert_eq!(balance.breakdown.expense_total.units(), 5_000);
        assert_eq!(balance.breakdown.income_total.units(), 0);
    }

    #[test]
    fn test_income_adds() {
        let session = session_with_float(0);
        let entries = vec![entry(
            "e1",
            "s1",
            EntryKind::Income,
            EntrySubkind::Plain,
            7_500,
        )];

        let balance = compute_balance(&session, &[], &entries);
        assert_eq!(balance.total.units(), 7_500);
        assert_eq!(balance.breakdown.income_total.units(), 7_500);
    }

    #[test]
    fn test_voided_sale_counts_only_through_reversal() {
        // Voided sale: total excluded, reversal expense of the tendered
        // amount included. 100000 + 0 - 5000 - 20000 = 75000
        let session = session_with_float(100_000);

        let mut voided = cash_sale("v1", "s1", 20_000);
        voided.voided = true;
        voided.void_reason = Some("producto dañado".to_string());
        voided.void_timestamp = Some(ts(13));

        let entries = vec![
            entry("e1", "s1", EntryKind::Expense, EntrySubkind::Plain, 5_000),
            entry(
                "e2",
                "s1",
                EntryKind::Expense,
                EntrySubkind::VoidReversal,
                20_000,
            ),
        ];

        let balance = compute_balance(&session, &[voided], &entries);
        assert_eq!(balance.total.units(), 75_000);
        assert_eq!(balance.breakdown.sales_total.units(), 0);
        assert_eq!(balance.breakdown.expense_total.units(), 25_000);
    }

    #[test]
    fn test_withdrawal_subtracted_once_reported_separately() {
        let session = session_with_float(100_000);
        let sales = vec![cash_sale("v1", "s1", 20_000)];
        let entries = vec![
            entry("e1", "s1", EntryKind::Expense, EntrySubkind::Plain, 5_000),
            entry(
                "e2",
                "s1",
                EntryKind::Expense,
                EntrySubkind::Withdrawal,
                10_000,
            ),
        ];

        let balance = compute_balance(&session, &sales, &entries);
        // 100000 + 20000 - 5000 - 10000: the withdrawal appears once in
        // expense_total, and again as withdrawal_total for display only.
        assert_eq!(balance.total.units(), 105_000);
        assert_eq!(balance.breakdown.expense_total.units(), 15_000);
        assert_eq!(balance.breakdown.withdrawal_total.units(), 10_000);
    }

    #[test]
    fn test_other_sessions_rows_are_ignored() {
        let session = session_with_float(100_000);
        let sales = vec![
            cash_sale("v1", "s1", 20_000),
            cash_sale("v2", "other", 99_000),
        ];
        let mut unattributed = cash_sale("v3", "s1", 1_000);
        unattributed.till_session_id = None;
        let sales = [sales, vec![unattributed]].concat();

        let entries = vec![entry(
            "e1",
            "other",
            EntryKind::Expense,
            EntrySubkind::Plain,
            50_000,
        )];

        let balance = compute_balance(&session, &sales, &entries);
        assert_eq!(balance.total.units(), 120_000);
    }

    #[test]
    fn test_incomplete_sale_excluded() {
        let session = session_with_float(0);
        let mut sale = cash_sale("v1", "s1", 20_000);
        sale.completed = false;

        let balance = compute_balance(&session, &[sale], &[]);
        assert_eq!(balance.total.units(), 0);
    }
}
