// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::ArgMatches;
use pocketbook::commands::{cards, transactions};
use pocketbook::store::{self, MemoryStore};
use pocketbook::{analytics, cli};
use rust_decimal::Decimal;

fn leaf(args: &[&str]) -> ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args.iter().copied());
    while let Some((_, sub)) = m.subcommand() {
        m = sub.clone();
    }
    m
}

fn add_card(s: &MemoryStore, name: &str, limit: &str, due_day: &str) -> anyhow::Result<pocketbook::models::Card> {
    cards::add(
        s,
        &leaf(&["pocketbook", "card", "add", "-n", name, "-l", limit, "--due-day", due_day]),
    )
}

fn spend(s: &MemoryStore, card_id: &str, amount: &str, date: &str) {
    transactions::add(
        s,
        &leaf(&[
            "pocketbook", "tx", "add", "-d", "Purchase", "-a", amount, "-t", "expense", "-c",
            "Shopping", "--date", date, "--card", card_id,
        ]),
    )
    .unwrap();
}

#[test]
fn add_validates_and_defaults_color() {
    let s = MemoryStore::new();
    let card = add_card(&s, "Visa", "1000", "10").unwrap();
    assert_eq!(card.color, "blue");
    assert_eq!(store::load_cards(&s), vec![card]);

    assert!(add_card(&s, "Broken", "0", "10").is_err());
    assert!(add_card(&s, "Broken", "100", "32").is_err());
    assert!(add_card(&s, "  ", "100", "5").is_err());
    assert_eq!(store::load_cards(&s).len(), 1);
}

#[test]
fn usage_reports_over_limit_cards() {
    let s = MemoryStore::new();
    let card = add_card(&s, "Visa", "1000", "10").unwrap();
    spend(&s, &card.id, "700", "2025-01-05");
    spend(&s, &card.id, "500", "2025-01-06");

    let rows = cards::usage_rows(&s);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].used, Decimal::new(1200, 0));
    assert_eq!(rows[0].available, Decimal::new(-200, 0));
    assert!(rows[0].over_limit);
}

#[test]
fn removing_a_card_keeps_its_transactions() {
    let s = MemoryStore::new();
    let card = add_card(&s, "Visa", "1000", "10").unwrap();
    spend(&s, &card.id, "40", "2025-01-05");

    cards::remove(&s, &card.id).unwrap();
    assert!(store::load_cards(&s).is_empty());
    let ts = store::load_transactions(&s);
    assert_eq!(ts.len(), 1);
    assert_eq!(ts[0].card_id.as_deref(), Some(card.id.as_str()));
    assert_eq!(analytics::card_name(&store::load_cards(&s), ts[0].card_id.as_deref()), "");

    assert!(cards::remove(&s, &card.id).is_err());
}

#[test]
fn installments_listing_only_shows_future_charges() {
    let s = MemoryStore::new();
    let card = add_card(&s, "Visa", "5000", "10").unwrap();
    transactions::add(
        &s,
        &leaf(&[
            "pocketbook", "tx", "add", "-d", "Phone", "-a", "600", "-t", "expense", "-c", "Tech",
            "--date", "2025-01-20", "--card", &card.id, "--installments", "6",
        ]),
    )
    .unwrap();
    let all = store::load_transactions(&s);
    let as_of = chrono::NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
    let upcoming = analytics::future_installments_for_card(&all, &card.id, as_of);
    let descriptions: Vec<&str> = upcoming.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Phone (4/6)", "Phone (5/6)", "Phone (6/6)"]);
    assert!(upcoming.iter().all(|t| t.amount == Decimal::new(100, 0)));
}
