// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, Kpis, Period, Series};
use crate::models::Transaction;
use crate::store::{self, Store};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let transactions = store::load_transactions(store);
    match m.subcommand() {
        Some(("kpis", sub)) => kpis(&transactions, sub)?,
        Some(("categories", sub)) => categories(&transactions, sub)?,
        Some(("top", sub)) => top(&transactions, sub)?,
        Some(("monthly", sub)) => monthly(&transactions, sub)?,
        Some(("daily", sub)) => daily(&transactions, sub)?,
        _ => {}
    }
    Ok(())
}

/// `--year`, or the newest year that has data.
pub fn year_from(transactions: &[Transaction], sub: &clap::ArgMatches) -> i32 {
    match sub.get_one::<i32>("year") {
        Some(y) => *y,
        None => analytics::available_years(transactions, Local::now().date_naive())[0],
    }
}

/// Year as in [`year_from`]; no `--month` means the whole year.
pub fn period_from(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<Period> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    Ok(Period {
        year: year_from(transactions, sub),
        month,
    })
}

pub fn kpis_report(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<(Period, Kpis)> {
    let period = period_from(transactions, sub)?;
    Ok((
        period,
        analytics::kpis(analytics::filter_by_period(transactions, period)),
    ))
}

pub fn daily_report(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<Series> {
    let period = period_from(transactions, sub)?;
    let month = period
        .month
        .context("The daily report needs --month")?;
    Ok(analytics::daily_series(transactions, month, period.year))
}

fn kpis(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let (period, k) = kpis_report(transactions, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &k)? {
        let rows = vec![
            vec!["Income".to_string(), fmt_money(&k.total_income)],
            vec!["Expenses".to_string(), fmt_money(&k.total_expenses)],
            vec!["Net result".to_string(), fmt_money(&k.net_result)],
            vec![
                "Savings rate".to_string(),
                format!("{:.1}%", k.savings_rate.round_dp(1)),
            ],
        ];
        let label = period_label(period);
        println!("{}", pretty_table(&[label.as_str(), ""], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    spent: String,
}

fn categories(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let period = period_from(transactions, sub)?;
    let breakdown = analytics::category_breakdown(analytics::filter_by_period(transactions, period));
    let data: Vec<CategoryRow> = breakdown
        .iter()
        .map(|(c, amt)| CategoryRow {
            category: if c.is_empty() {
                "(uncategorized)".into()
            } else {
                c.clone()
            },
            spent: fmt_money(amt),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.category, r.spent])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn top(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let period = period_from(transactions, sub)?;
    let n = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let top = analytics::top_expenses(analytics::filter_by_period(transactions, period), n);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &top)? {
        if top.is_empty() {
            println!("No expenses recorded in {}", period_label(period));
            return Ok(());
        }
        let rows = top
            .iter()
            .map(|e| {
                vec![
                    e.transaction.date.to_string(),
                    e.transaction.description.clone(),
                    e.transaction.category.clone(),
                    fmt_money(&e.transaction.amount),
                    format!("{}%", e.percent()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Amount", "Share"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct SeriesRow {
    label: String,
    income: String,
    expenses: String,
    net: String,
}

fn series_rows(labels: Vec<String>, series: &Series) -> Vec<SeriesRow> {
    labels
        .into_iter()
        .zip(series.income.iter().zip(&series.expenses))
        .zip(series.net())
        .map(|((label, (inc, exp)), net)| SeriesRow {
            label,
            income: fmt_money(inc),
            expenses: fmt_money(exp),
            net: fmt_money(&net),
        })
        .collect()
}

fn print_series(sub: &clap::ArgMatches, first: &str, data: Vec<SeriesRow>) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.label, r.income, r.expenses, r.net])
            .collect();
        println!(
            "{}",
            pretty_table(&[first, "Income", "Expenses", "Net"], rows)
        );
    }
    Ok(())
}

fn monthly(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let series = analytics::monthly_series(transactions, year_from(transactions, sub));
    let labels = MONTH_NAMES.iter().map(|m| m.to_string()).collect();
    print_series(sub, "Month", series_rows(labels, &series))
}

fn daily(transactions: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    let series = daily_report(transactions, sub)?;
    let labels = (1..=series.len()).map(|d| d.to_string()).collect();
    print_series(sub, "Day", series_rows(labels, &series))
}

fn period_label(period: Period) -> String {
    match period.month {
        Some(m) => format!("{} {}", MONTH_NAMES[(m - 1) as usize], period.year),
        None => period.year.to_string(),
    }
}
