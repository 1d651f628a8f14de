// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{CardUsage, card_usage, future_installments_for_card};
use crate::models::Card;
use crate::store::{self, Store};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, today_or};
use anyhow::{Result, anyhow};
use chrono::Utc;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let card = add(store, sub)?;
            println!(
                "Added card '{}' (limit {}, due day {}, id: {})",
                card.name,
                fmt_money(&card.limit),
                card.due_day,
                card.id
            );
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = usage_rows(store);
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|u| {
                        let available = if u.over_limit {
                            format!("{} (over limit)", fmt_money(&u.available))
                        } else {
                            fmt_money(&u.available)
                        };
                        vec![
                            u.name.clone(),
                            u.due_day.to_string(),
                            fmt_money(&u.limit),
                            fmt_money(&u.used),
                            available,
                            format!("{:.1}%", u.usage_percent),
                            u.card_id.clone(),
                        ]
                    })
                    .collect();
                if rows.is_empty() {
                    println!("No cards yet. Add one with `pocketbook card add`.");
                } else {
                    println!(
                        "{}",
                        pretty_table(
                            &["Name", "Due day", "Limit", "Used", "Available", "Usage", "ID"],
                            rows
                        )
                    );
                }
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            remove(store, id)?;
            println!("Removed card {} (its transactions were kept)", id);
        }
        Some(("installments", sub)) => installments(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn add(store: &dyn Store, sub: &clap::ArgMatches) -> Result<Card> {
    let name = sub.get_one::<String>("name").unwrap();
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    let due_day = *sub.get_one::<u32>("due_day").unwrap();
    let color = sub.get_one::<String>("color").map(String::as_str);

    let card = Card::new(name, limit, due_day, color, Utc::now())?;
    let mut cards = store::load_cards(store);
    cards.push(card.clone());
    store::save_cards(store, &cards)?;
    Ok(card)
}

/// Deletes the card only; transactions keep their now-orphaned card id.
pub fn remove(store: &dyn Store, id: &str) -> Result<()> {
    let mut cards = store::load_cards(store);
    let before = cards.len();
    cards.retain(|c| c.id != id);
    if cards.len() == before {
        return Err(anyhow!("Card '{}' not found", id));
    }
    store::save_cards(store, &cards)?;
    Ok(())
}

pub fn usage_rows(store: &dyn Store) -> Vec<CardUsage> {
    let transactions = store::load_transactions(store);
    store::load_cards(store)
        .iter()
        .map(|c| card_usage(c, &transactions))
        .collect()
}

fn installments(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = sub.get_one::<String>("id").unwrap().trim();
    let as_of = today_or(sub.get_one::<String>("as_of"))?;

    let cards = store::load_cards(store);
    let card = cards
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow!("Card '{}' not found", id))?;
    let transactions = store::load_transactions(store);
    let upcoming = future_installments_for_card(&transactions, &card.id, as_of);

    if !maybe_print_json(json_flag, jsonl_flag, &upcoming)? {
        if upcoming.is_empty() {
            println!("No upcoming installments on '{}'", card.name);
            return Ok(());
        }
        let rows: Vec<Vec<String>> = upcoming
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.description.clone(),
                    fmt_money(&t.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Description", "Amount"], rows));
    }
    Ok(())
}
