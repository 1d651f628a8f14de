// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExtraIncome, Settings};
use crate::store::{self, Store};
use crate::utils::{
    fmt_money, maybe_print_json, parse_day_list, parse_decimal, parse_on_off, pretty_table,
};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("set", sub)) => {
            set(store, sub)?;
            println!("Settings saved");
        }
        Some(("extra", sub)) => match sub.subcommand() {
            Some(("add", add)) => {
                let entry = add_extra(store, add)?;
                println!(
                    "Added extra income '{}' ({})",
                    entry.description,
                    fmt_money(&entry.amount)
                );
            }
            Some(("clear", _)) => {
                let mut settings = store::load_settings(store);
                settings.extra_income.clear();
                store::save_settings(store, &settings)?;
                println!("Cleared extra income");
            }
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn show(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let settings = store::load_settings(store);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
        return Ok(());
    }
    let n = &settings.notifications;
    let yes_no = |b: bool| (if b { "on" } else { "off" }).to_string();
    let days: Vec<String> = n.days_before_due.iter().map(|d| d.to_string()).collect();
    let mut rows = vec![
        vec!["Salary".into(), fmt_money(&settings.salary)],
        vec!["Salary day".into(), settings.salary_day.to_string()],
    ];
    for e in &settings.extra_income {
        rows.push(vec![
            format!("Extra: {}", e.description),
            fmt_money(&e.amount),
        ]);
    }
    rows.extend([
        vec![
            "Expected monthly income".into(),
            fmt_money(&settings.expected_monthly_income()),
        ],
        vec!["Notifications".into(), yes_no(n.enabled)],
        vec!["Days before due".into(), days.join(",")],
        vec!["Notify due dates".into(), yes_no(n.notify_due_dates)],
        vec!["Notify low balance".into(), yes_no(n.notify_low_balance)],
        vec!["Notify high expenses".into(), yes_no(n.notify_high_expenses)],
    ]);
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

/// Applies the given flags on top of the stored settings and saves the result.
pub fn set(store: &dyn Store, sub: &clap::ArgMatches) -> Result<Settings> {
    let mut settings = store::load_settings(store);
    if let Some(s) = sub.get_one::<String>("salary") {
        settings.salary = parse_decimal(s)?;
    }
    if let Some(d) = sub.get_one::<u32>("salary_day") {
        settings.salary_day = *d;
    }
    let n = &mut settings.notifications;
    if let Some(v) = sub.get_one::<String>("notifications") {
        n.enabled = parse_on_off(v)?;
    }
    if let Some(v) = sub.get_one::<String>("days_before_due") {
        n.days_before_due = parse_day_list(v)?;
    }
    if let Some(v) = sub.get_one::<String>("notify_due_dates") {
        n.notify_due_dates = parse_on_off(v)?;
    }
    if let Some(v) = sub.get_one::<String>("notify_low_balance") {
        n.notify_low_balance = parse_on_off(v)?;
    }
    if let Some(v) = sub.get_one::<String>("notify_high_expenses") {
        n.notify_high_expenses = parse_on_off(v)?;
    }
    store::save_settings(store, &settings)?;
    Ok(settings)
}

pub fn add_extra(store: &dyn Store, sub: &clap::ArgMatches) -> Result<ExtraIncome> {
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if description.is_empty() || amount <= Decimal::ZERO {
        return Err(anyhow!(
            "Extra income needs a description and a positive amount"
        ));
    }
    let entry = ExtraIncome {
        description: description.to_string(),
        amount,
    };
    let mut settings = store::load_settings(store);
    settings.extra_income.push(entry.clone());
    store::save_settings(store, &settings)?;
    Ok(entry)
}
