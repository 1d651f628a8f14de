// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::models::{Card, RecordDate, Transaction, TransactionType};
use pocketbook::store::{self, MemoryStore};
use pocketbook::{cli, commands::exporter};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn seeded() -> (MemoryStore, Card) {
    let s = MemoryStore::new();
    let card = Card::new("Visa", Decimal::new(1000, 0), 10, None, Utc::now()).unwrap();
    store::save_cards(&s, std::slice::from_ref(&card)).unwrap();
    let ts = vec![
        Transaction {
            id: "t2".into(),
            description: "Corner Shop".into(),
            amount: Decimal::new(1234, 2),
            date: RecordDate::parse("2025-01-02"),
            r#type: TransactionType::Expense,
            category: "Groceries".into(),
            card_id: Some(card.id.clone()),
            due_date: None,
        },
        Transaction {
            id: "t1".into(),
            description: "Paycheck".into(),
            amount: Decimal::new(200000, 2),
            date: RecordDate::parse("2025-01-01"),
            r#type: TransactionType::Income,
            category: "Salary".into(),
            card_id: Some("deleted-card".into()),
            due_date: None,
        },
    ];
    store::save_transactions(&s, &ts).unwrap();
    (s, card)
}

fn run_export(s: &MemoryStore, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "pocketbook",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(s, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_writes_pretty_json() {
    let (s, _) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    run_export(&s, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "t1",
                "date": "2025-01-01",
                "description": "Paycheck",
                "type": "income",
                "amount": "2000.00",
                "category": "Salary",
                "card": "",
                "dueDate": null
            },
            {
                "id": "t2",
                "date": "2025-01-02",
                "description": "Corner Shop",
                "type": "expense",
                "amount": "12.34",
                "category": "Groceries",
                "card": "Visa",
                "dueDate": null
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv() {
    let (s, _) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    run_export(&s, "CSV", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("id"));
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get(2), Some("Corner Shop"));
    assert_eq!(rows[1].get(6), Some("Visa"));
    assert_eq!(rows[0].get(4), Some("2000.00"));
}

#[test]
fn unknown_format_writes_nothing() {
    let (s, _) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    let err = run_export(&s, "xml", &out_path.to_string_lossy()).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out_path.exists());
}
