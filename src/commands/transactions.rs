// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, Page, card_name};
use crate::installments::{NewTransaction, expand_installments};
use crate::models::{Transaction, TransactionType};
use crate::store::{self, Store};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today_or};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let created = add(store, sub)?;
            if let [first, .., last] = created.as_slice() {
                println!(
                    "Recorded {} installments of {} from {} to {}",
                    created.len(),
                    fmt_money(&first.amount),
                    first.date,
                    last.date
                );
            } else if let Some(t) = created.first() {
                println!(
                    "Recorded {} {} on {} '{}' (id: {})",
                    t.r#type,
                    fmt_money(&t.amount),
                    t.date,
                    t.description,
                    t.id
                );
            }
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            remove(store, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Records the transaction (or its installments) and returns what was stored.
pub fn add(store: &dyn Store, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let description = sub.get_one::<String>("description").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let r#type = TransactionType::parse(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let date = today_or(sub.get_one::<String>("date"))?;
    let due_date = sub
        .get_one::<String>("due_date")
        .map(|s| parse_date(s))
        .transpose()?;
    let card_id = sub
        .get_one::<String>("card")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let count = sub.get_one::<u32>("installments").copied().unwrap_or(1);

    if let Some(ref id) = card_id {
        if !store::load_cards(store).iter().any(|c| &c.id == id) {
            return Err(anyhow!("Card '{}' not found", id));
        }
    }

    let draft = NewTransaction {
        description: description.to_string(),
        amount,
        date,
        r#type,
        category: category.to_string(),
        card_id,
        due_date,
    };
    let created = expand_installments(draft, count)?;

    let mut transactions = store::load_transactions(store);
    transactions.extend(created.iter().cloned());
    store::save_transactions(store, &transactions)?;
    tracing::info!(count = created.len(), "recorded transactions");
    Ok(created)
}

pub fn remove(store: &dyn Store, id: &str) -> Result<()> {
    let mut transactions = store::load_transactions(store);
    let before = transactions.len();
    transactions.retain(|t| t.id != id);
    if transactions.len() == before {
        return Err(anyhow!("Transaction '{}' not found", id));
    }
    store::save_transactions(store, &transactions)?;
    Ok(())
}

fn list(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let page = query_rows(store, sub)?;
    let printed = if jsonl_flag {
        maybe_print_json(false, true, &page.items)?
    } else {
        maybe_print_json(json_flag, false, &page)?
    };
    if !printed {
        let rows: Vec<Vec<String>> = page
            .items
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.card.clone(),
                    r.r#type.to_string(),
                    r.amount.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Category", "Card", "Type", "Amount", "ID"],
                rows,
            )
        );
        println!(
            "Page {}/{} ({} transactions)",
            page.page,
            page.total_pages.max(1),
            page.total_items
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub card: String,
    pub r#type: TransactionType,
    pub amount: String,
}

pub fn query_rows(store: &dyn Store, sub: &clap::ArgMatches) -> Result<Page<TransactionRow>> {
    let transactions = store::load_transactions(store);
    let cards = store::load_cards(store);
    let term = sub.get_one::<String>("search").map(String::as_str);
    let category = sub.get_one::<String>("category").map(|s| s.trim());
    let page = sub.get_one::<usize>("page").copied().unwrap_or(1);
    let per_page = sub
        .get_one::<usize>("per_page")
        .copied()
        .unwrap_or(analytics::DEFAULT_PAGE_SIZE);

    let rows: Vec<TransactionRow> = analytics::search(&transactions, term, category)
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            description: t.description.clone(),
            category: t.category.clone(),
            card: card_name(&cards, t.card_id.as_deref()).to_string(),
            r#type: t.r#type,
            amount: fmt_money(&t.amount),
        })
        .collect();
    Ok(analytics::paginate(rows, page, per_page))
}
