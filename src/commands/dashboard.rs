// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::thread;
use std::time::Duration;

use crate::analytics::{DashboardSummary, card_name, dashboard_summary, recent};
use crate::commands::alerts::{Snapshot, print_alerts};
use crate::models::Transaction;
use crate::notifications::Alerts;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today_or};
use anyhow::Result;
use serde::Serialize;

const RECENT_COUNT: usize = 5;

#[derive(Serialize)]
pub struct Dashboard<'a> {
    pub summary: DashboardSummary,
    pub recent: Vec<&'a Transaction>,
    pub alerts: Alerts<'a>,
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let watch = m.get_one::<u64>("watch").copied();
    loop {
        render(store, m)?;
        match watch {
            Some(secs) if secs > 0 => thread::sleep(Duration::from_secs(secs)),
            _ => return Ok(()),
        }
    }
}

/// Summary and recent rows as of `--today`, or the local clock.
pub fn build<'a>(snapshot: &'a Snapshot, m: &clap::ArgMatches) -> Result<Dashboard<'a>> {
    let today = today_or(m.get_one::<String>("today"))?;
    Ok(Dashboard {
        summary: dashboard_summary(&snapshot.transactions, today),
        recent: recent(&snapshot.transactions, RECENT_COUNT),
        alerts: snapshot.alerts(m)?,
    })
}

fn render(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let snapshot = Snapshot::load(store);
    let cards = &snapshot.cards;
    let dashboard = build(&snapshot, m)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &dashboard)? {
        return Ok(());
    }

    let s = &dashboard.summary;
    println!(
        "{}",
        pretty_table(
            &["Balance", "Income (month)", "Expenses (month)", "Result (month)"],
            vec![vec![
                fmt_money(&s.total_balance),
                fmt_money(&s.month_income),
                fmt_money(&s.month_expenses),
                fmt_money(&s.month_result),
            ]],
        )
    );
    if dashboard.recent.is_empty() {
        println!("No transactions found");
    } else {
        let rows = dashboard
            .recent
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.description.clone(),
                    t.category.clone(),
                    card_name(cards, t.card_id.as_deref()).to_string(),
                    t.r#type.to_string(),
                    fmt_money(&t.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Category", "Card", "Type", "Amount"],
                rows
            )
        );
    }
    print_alerts(&dashboard.alerts);
    Ok(())
}
