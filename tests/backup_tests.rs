// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use pocketbook::backup::{self, backup_file_name};
use pocketbook::error::Error;
use pocketbook::models::{Card, ExtraIncome, RecordDate, Settings, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn fixture() -> (Vec<Transaction>, Vec<Card>, Settings) {
    let card = Card::new(
        "Visa",
        Decimal::new(250000, 2),
        12,
        Some("green"),
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
    )
    .unwrap();
    let transactions = vec![
        Transaction {
            id: "t1".into(),
            description: "Salary".into(),
            amount: Decimal::new(500000, 2),
            date: RecordDate::parse("2025-01-05"),
            r#type: TransactionType::Income,
            category: "Salary".into(),
            card_id: None,
            due_date: None,
        },
        Transaction {
            id: "t2".into(),
            description: "Flights (1/2)".into(),
            amount: Decimal::new(41999, 2),
            date: RecordDate::parse("2025-01-07"),
            r#type: TransactionType::Expense,
            category: "Travel".into(),
            card_id: Some(card.id.clone()),
            due_date: Some(RecordDate::parse("2025-02-12")),
        },
        Transaction {
            id: "t3".into(),
            description: "Imported row".into(),
            amount: Decimal::new(10, 0),
            date: RecordDate::parse("07/01/2025"),
            r#type: TransactionType::Expense,
            category: String::new(),
            card_id: None,
            due_date: None,
        },
    ];
    let mut settings = Settings::default();
    settings.salary = Decimal::new(5000, 0);
    settings.salary_day = 5;
    settings.extra_income.push(ExtraIncome {
        description: "Rent from garage".into(),
        amount: Decimal::new(150, 0),
    });
    settings.notifications.notify_low_balance = false;
    (transactions, vec![card], settings)
}

#[test]
fn export_then_import_restores_everything() {
    let (transactions, cards, settings) = fixture();
    let doc = backup::export(&transactions, &cards, &settings, Utc::now());
    let json = doc.to_json().unwrap();

    let restored = backup::import(&json).unwrap();
    assert_eq!(restored.transactions, transactions);
    assert_eq!(restored.cards, cards);
    assert_eq!(restored.settings, settings);
    assert_eq!(restored.skipped, 0);
}

#[test]
fn export_uses_camel_case_keys() {
    let (transactions, cards, settings) = fixture();
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    let json = backup::export(&transactions, &cards, &settings, at)
        .to_json()
        .unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();
    assert!(v.get("exportDate").is_some());
    assert_eq!(v["transactions"][1]["cardId"], json!(cards[0].id));
    assert_eq!(v["transactions"][1]["dueDate"], json!("2025-02-12"));
    assert_eq!(v["transactions"][2]["date"], json!("07/01/2025"));
    assert_eq!(v["cards"][0]["dueDay"], json!(12));
    assert_eq!(v["settings"]["salaryDay"], json!(5));
    assert_eq!(
        v["settings"]["notifications"]["daysBeforeDue"],
        json!([1, 2, 3])
    );
}

#[test]
fn missing_section_is_rejected() {
    let doc = json!({ "transactions": [], "settings": {} }).to_string();
    let err = backup::import(&doc).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("missing 'cards'"));

    let doc = json!({ "transactions": [], "cards": [], "settings": null }).to_string();
    let err = backup::import(&doc).unwrap_err();
    assert!(err.to_string().contains("missing 'settings'"));
}

#[test]
fn non_object_documents_are_rejected() {
    assert!(backup::import("[1, 2, 3]").is_err());
    assert!(backup::import("not json").is_err());
    let doc = json!({ "transactions": {}, "cards": [], "settings": {} }).to_string();
    let err = backup::import(&doc).unwrap_err();
    assert!(err.to_string().contains("'transactions' must be an array"));
}

#[test]
fn export_date_is_not_checked() {
    let doc = json!({
        "transactions": [],
        "cards": [],
        "settings": {},
        "exportDate": "whenever"
    })
    .to_string();
    let restored = backup::import(&doc).unwrap();
    assert!(restored.transactions.is_empty());
    assert_eq!(restored.settings, Settings::default());
}

#[test]
fn unreadable_records_are_skipped_and_counted() {
    let doc = json!({
        "transactions": [
            { "id": "ok", "amount": "12.00", "date": "2025-01-01", "type": "expense" },
            { "id": "bad-type", "amount": "1", "date": "2025-01-01", "type": "refund" },
            { "id": "negative", "amount": "-4", "date": "2025-01-01", "type": "income" }
        ],
        "cards": [
            { "id": "c1", "name": "Visa", "limit": 100, "dueDay": 40, "createdAt": "2025-01-01T00:00:00Z" }
        ],
        "settings": {}
    })
    .to_string();
    let restored = backup::import(&doc).unwrap();
    assert_eq!(restored.transactions.len(), 1);
    assert_eq!(restored.transactions[0].id, "ok");
    assert!(restored.cards.is_empty());
    assert_eq!(restored.skipped, 3);
}

#[test]
fn invalid_settings_abort_the_import() {
    let doc = json!({
        "transactions": [],
        "cards": [],
        "settings": { "salary": "-10" }
    })
    .to_string();
    assert!(backup::import(&doc).is_err());
}

#[test]
fn file_name_carries_the_date() {
    let name = backup_file_name(NaiveDate::from_ymd_opt(2025, 4, 9).unwrap());
    assert_eq!(name, "pocketbook-backup-2025-04-09.json");
}

#[test]
fn oversized_amounts_are_skipped_so_totals_stay_computable() {
    let huge = "50000000000000000000000000000";
    let doc = json!({
        "transactions": [
            { "id": "a", "amount": huge, "date": "2025-01-01", "type": "expense", "cardId": "k" },
            { "id": "b", "amount": huge, "date": "2025-01-02", "type": "expense", "cardId": "k" },
            { "id": "c", "amount": "25", "date": "2025-01-03", "type": "expense", "cardId": "k" }
        ],
        "cards": [
            { "id": "k", "name": "Visa", "limit": "100", "dueDay": 5, "createdAt": "2025-01-01T00:00:00Z" },
            { "id": "big", "name": "Huge", "limit": huge, "dueDay": 5, "createdAt": "2025-01-01T00:00:00Z" }
        ],
        "settings": {}
    })
    .to_string();
    let restored = backup::import(&doc).unwrap();
    assert_eq!(restored.skipped, 3);
    assert_eq!(restored.transactions.len(), 1);
    assert_eq!(
        pocketbook::analytics::total_balance(&restored.transactions),
        Decimal::new(-25, 0)
    );
    let usage = pocketbook::analytics::card_usage(&restored.cards[0], &restored.transactions);
    assert_eq!(usage.usage_percent, Decimal::new(25, 0));
}
