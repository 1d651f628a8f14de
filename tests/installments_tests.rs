// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::error::Error;
use pocketbook::installments::{NewTransaction, expand_installments};
use pocketbook::models::{RecordDate, TransactionType};
use rust_decimal::Decimal;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn purchase(amount: i64, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        description: "Laptop".into(),
        amount: Decimal::new(amount, 0),
        date,
        r#type: TransactionType::Expense,
        category: "Electronics".into(),
        card_id: Some("card-1".into()),
        due_date: None,
    }
}

#[test]
fn three_installments_one_month_apart() {
    let out = expand_installments(purchase(300, ymd(2025, 1, 15)), 3).unwrap();
    assert_eq!(out.len(), 3);
    let dates: Vec<RecordDate> = out.iter().map(|t| t.date.clone()).collect();
    assert_eq!(
        dates,
        vec![
            RecordDate::Valid(ymd(2025, 1, 15)),
            RecordDate::Valid(ymd(2025, 2, 15)),
            RecordDate::Valid(ymd(2025, 3, 15)),
        ]
    );
    assert!(out.iter().all(|t| t.amount == Decimal::new(100, 0)));
    assert_eq!(out[0].description, "Laptop (1/3)");
    assert_eq!(out[2].description, "Laptop (3/3)");
    assert!(out.iter().all(|t| t.card_id.as_deref() == Some("card-1")));
    assert!(out.iter().all(|t| t.category == "Electronics"));

    let mut ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn end_of_month_purchases_clamp() {
    let out = expand_installments(purchase(90, ymd(2025, 1, 31)), 3).unwrap();
    assert_eq!(out[1].date(), Some(ymd(2025, 2, 28)));
    assert_eq!(out[2].date(), Some(ymd(2025, 3, 31)));

    let leap = expand_installments(purchase(20, ymd(2024, 1, 30)), 2).unwrap();
    assert_eq!(leap[1].date(), Some(ymd(2024, 2, 29)));
}

#[test]
fn single_installment_keeps_description() {
    let out = expand_installments(purchase(300, ymd(2025, 1, 15)), 1).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].description, "Laptop");
    assert_eq!(out[0].amount, Decimal::new(300, 0));
}

#[test]
fn zero_installments_rejected() {
    let err = expand_installments(purchase(300, ymd(2025, 1, 15)), 0).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn negative_amounts_rejected() {
    let err = expand_installments(purchase(-10, ymd(2025, 1, 15)), 2).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn installments_span_year_end() {
    let out = expand_installments(purchase(120, ymd(2025, 11, 10)), 4).unwrap();
    let last = out.last().unwrap();
    assert_eq!(last.date(), Some(ymd(2026, 2, 10)));
    let total: Decimal = out.iter().map(|t| t.amount).sum();
    assert_eq!(total, Decimal::new(120, 0));
}
