// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Card, Settings, Transaction};
use crate::store::{check_card, check_transaction, decode_records, decode_settings};

pub const REQUIRED_KEYS: [&str; 3] = ["transactions", "cards", "settings"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument<'a> {
    pub transactions: &'a [Transaction],
    pub cards: &'a [Card],
    pub settings: &'a Settings,
    pub export_date: DateTime<Utc>,
}

impl BackupDocument<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn export<'a>(
    transactions: &'a [Transaction],
    cards: &'a [Card],
    settings: &'a Settings,
    exported_at: DateTime<Utc>,
) -> BackupDocument<'a> {
    BackupDocument {
        transactions,
        cards,
        settings,
        export_date: exported_at,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub transactions: Vec<Transaction>,
    pub cards: Vec<Card>,
    pub settings: Settings,
    /// Records dropped because they could not be decoded.
    pub skipped: usize,
}

fn invalid(msg: impl std::fmt::Display) -> Error {
    Error::Validation(format!("Invalid backup file: {}", msg))
}

/// Parses a backup document. Nothing is written; the caller decides whether
/// to overwrite its collections with the result.
pub fn import(json: &str) -> Result<Restored> {
    let Value::Object(mut doc) = serde_json::from_str::<Value>(json)? else {
        return Err(invalid("expected a JSON object"));
    };
    for key in REQUIRED_KEYS {
        if doc.get(key).is_none_or(Value::is_null) {
            return Err(invalid(format_args!("missing '{}'", key)));
        }
    }
    let mut take = |key: &str| doc.remove(key).unwrap_or(Value::Null);

    let (transactions, skipped_tx) = decode_records(take("transactions"), check_transaction)
        .map_err(|_| invalid("'transactions' must be an array"))?;
    let (cards, skipped_cards) = decode_records(take("cards"), check_card)
        .map_err(|_| invalid("'cards' must be an array"))?;
    let settings = decode_settings(take("settings")).map_err(invalid)?;

    Ok(Restored {
        transactions,
        cards,
        settings,
        skipped: skipped_tx + skipped_cards,
    })
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("pocketbook-backup-{}.json", date.format("%Y-%m-%d"))
}
