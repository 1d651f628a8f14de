// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::card_name;
use crate::store::{self, Store};
use anyhow::{Result, anyhow};
use serde_json::json;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let mut transactions = store::load_transactions(store);
    let cards = store::load_cards(store);
    transactions.sort_by_key(|t| t.date());

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "id", "date", "description", "type", "amount", "category", "card", "due_date",
        ])?;
        for t in &transactions {
            wtr.write_record([
                t.id.clone(),
                t.date.to_string(),
                t.description.clone(),
                t.r#type.to_string(),
                t.amount.to_string(),
                t.category.clone(),
                card_name(&cards, t.card_id.as_deref()).to_string(),
                t.due_date.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = transactions
            .iter()
            .map(|t| {
                json!({
                    "id": t.id, "date": t.date, "description": t.description, "type": t.r#type,
                    "amount": t.amount, "category": t.category,
                    "card": card_name(&cards, t.card_id.as_deref()), "dueDate": t.due_date
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
