//! # Seed Data Generator
//!
//! Populates the database with demo till activity for development.
//!
//! ## Usage
//! ```bash
//! # Simulate 3 shifts on 2 tills (default)
//! cargo run -p caja-db --bin seed
//!
//! # Custom amounts
//! cargo run -p caja-db --bin seed -- --shifts 5 --tills 3
//!
//! # Specify database path
//! cargo run -p caja-db --bin seed -- --db ./data/caja.db
//! ```
//!
//! ## Generated Activity
//! For every till and shift:
//! - A session opened with a realistic float
//! - A handful of sales (cash, card, transfer)
//! - One or two manual expense/income entries
//! - Occasionally a voided cash sale (with its reversal)
//! - A close with a withdrawal
//!
//! Ends with a reconciliation audit over everything generated, which is
//! expected to come back clean.

use std::env;

use caja_core::{EntryKind, Money, PaymentMethod};
use caja_db::{AuditScope, Database, DbConfig, NewEntry, NewSale};
use chrono::Utc;

/// Sale totals cycled through while seeding (smallest currency units).
const SALE_TOTALS: &[i64] = &[2_500, 4_990, 7_500, 12_990, 19_990, 34_990];

/// Expense descriptions cycled through while seeding.
const EXPENSES: &[(&str, i64)] = &[
    ("Bolsas para despacho", 3_500),
    ("Fletes", 8_000),
    ("Artículos de aseo", 4_200),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut shifts: usize = 3;
    let mut tills: usize = 2;
    let mut db_path = String::from("./caja_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--shifts" | "-s" => {
                if i + 1 < args.len() {
                    shifts = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--tills" | "-t" => {
                if i + 1 < args.len() {
                    tills = args[i + 1].parse().unwrap_or(2);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caja POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --shifts <N>   Shifts to simulate per till (default: 3)");
                println!("  -t, --tills <N>    Number of tills (default: 2)");
                println!("  -d, --db <PATH>    Database file path (default: ./caja_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Caja POS Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Tills: {}, shifts per till: {}", tills, shifts);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let lifecycle = db.lifecycle();
    let mut sessions_created = 0;
    let mut sales_created = 0;

    for till in 1..=tills {
        let till_id = till.to_string();

        for shift in 0..shifts {
            let seed = till * 100 + shift;
            let operator_id = format!("op-{}", (seed % 3) + 1);
            let opening_float = 50_000 + ((seed * 7) % 4) as i64 * 25_000;

            let session = lifecycle
                .open_session(&till_id, &operator_id, opening_float)
                .await?;
            sessions_created += 1;

            // A few sales per shift, cycling payment methods
            let sale_count = 3 + seed % 4;
            let mut voidable = None;
            for n in 0..sale_count {
                let total = SALE_TOTALS[(seed + n) % SALE_TOTALS.len()];
                let method = match (seed + n) % 4 {
                    0 | 1 => PaymentMethod::Cash,
                    2 => PaymentMethod::Card,
                    _ => PaymentMethod::Transfer,
                };
                let tendered = (method == PaymentMethod::Cash).then_some(total);

                let sale = lifecycle
                    .record_sale(NewSale {
                        till_id: till_id.clone(),
                        operator_id: operator_id.clone(),
                        seller_id: (n % 2 == 0).then(|| format!("vend-{}", n + 1)),
                        total_units: total,
                        payment_method: method,
                        amount_tendered_units: tendered,
                        timestamp: Utc::now(),
                    })
                    .await?;
                sales_created += 1;

                if method == PaymentMethod::Cash {
                    voidable = Some(sale);
                }
            }

            // A manual expense, and on some shifts an income entry
            let (description, amount) = EXPENSES[seed % EXPENSES.len()];
            lifecycle
                .record_entry(NewEntry {
                    till_id: till_id.clone(),
                    kind: EntryKind::Expense,
                    amount_units: amount,
                    description: description.to_string(),
                    timestamp: Utc::now(),
                    operator_id: operator_id.clone(),
                })
                .await?;

            if seed % 3 == 0 {
                lifecycle
                    .record_entry(NewEntry {
                        till_id: till_id.clone(),
                        kind: EntryKind::Income,
                        amount_units: 10_000,
                        description: "Sencillo desde gerencia".to_string(),
                        timestamp: Utc::now(),
                        operator_id: operator_id.clone(),
                    })
                    .await?;
            }

            // Every third shift voids its last cash sale
            if seed % 3 == 1 {
                if let Some(sale) = voidable {
                    lifecycle.void_sale(&sale.id, "producto devuelto").await?;
                }
            }

            let balance = lifecycle.get_balance(&session.id).await?;
            let withdrawal = (balance.total.units() / 2).max(0);
            let closed = lifecycle.close_session(&session.id, withdrawal).await?;

            println!(
                "  till {} shift {}: closed at {} (withdrew {})",
                till_id,
                shift + 1,
                closed.closing_amount().unwrap_or_default(),
                Money::from_units(withdrawal)
            );
        }
    }

    println!();
    println!("✓ Created {} sessions, {} sales", sessions_created, sales_created);

    // A freshly seeded ledger must reconcile cleanly
    println!();
    println!("Running reconciliation audit...");
    let findings = db.auditor().run_audit(AuditScope::All).await?;
    if findings.is_empty() {
        println!("✓ Audit clean: no findings");
    } else {
        println!("⚠ Audit produced {} findings:", findings.len());
        for stored in &findings {
            println!(
                "  [{}] {}: {}",
                stored.finding.kind.as_str(),
                stored.finding.subject_id,
                stored.finding.detail
            );
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
