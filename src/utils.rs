// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<u32> {
    let m: u32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid month '{}', expected 1-12", s))?;
    if !(1..=12).contains(&m) {
        return Err(anyhow!("Invalid month '{}', expected 1-12", s));
    }
    Ok(m)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_on_off(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(anyhow!("Expected on|off, got '{}'", other)),
    }
}

/// Parses "1,2,3" into a set of day offsets.
pub fn parse_day_list(s: &str) -> Result<BTreeSet<i64>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<i64>()
                .with_context(|| format!("Invalid day offset '{}'", p))
        })
        .collect()
}

/// `--today` if given, else the local date.
pub fn today_or(arg: Option<&String>) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Local wall-clock time, or midnight of `--today` when given.
pub fn now_or(arg: Option<&String>) -> Result<NaiveDateTime> {
    match arg {
        Some(s) => Ok(parse_date(s)?.and_time(chrono::NaiveTime::default())),
        None => Ok(Local::now().naive_local()),
    }
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
