// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat key/value persistence: one serialized JSON document per collection.
//!
//! The raw [`Store`] only moves strings around. The typed `load_*` helpers
//! decode them and fall back to the documented defaults when a collection is
//! missing or unreadable, so a broken collection never blocks the others.

use std::cell::RefCell;
use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Card, MAX_AMOUNT, Settings, Transaction, check_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Cards,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Transactions, Self::Cards, Self::Settings];

    pub fn key(self) -> &'static str {
        match self {
            Self::Transactions => "finance_transactions",
            Self::Cards => "finance_cards",
            Self::Settings => "finance_settings",
        }
    }
}

pub trait Store {
    fn get(&self, collection: Collection) -> Result<Option<String>>;
    fn set(&self, collection: Collection, value: &str) -> Result<()>;

    /// Writes several collections at once. Stores that can should apply all
    /// of them or none.
    fn set_many(&self, entries: &[(Collection, String)]) -> Result<()> {
        for (collection, value) in entries {
            self.set(*collection, value)?;
        }
        Ok(())
    }
}

const UPSERT: &str = "INSERT INTO collections(name, value) VALUES (?1, ?2)
     ON CONFLICT(name) DO UPDATE SET value=excluded.value, updated_at=datetime('now')";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        crate::db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn get(&self, collection: Collection) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM collections WHERE name=?1",
                params![collection.key()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn set(&self, collection: Collection, value: &str) -> Result<()> {
        self.conn.execute(UPSERT, params![collection.key(), value])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(Collection, String)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (collection, value) in entries {
            tx.execute(UPSERT, params![collection.key(), value])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<Collection, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, collection: Collection) -> Result<Option<String>> {
        Ok(self.values.borrow().get(&collection).cloned())
    }

    fn set(&self, collection: Collection, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(collection, value.to_string());
        Ok(())
    }
}

/// Decodes a JSON array record by record.
///
/// Records that fail to decode, or that `check` rejects, are logged and left
/// out. Only a non-array document is an error.
pub fn decode_records<T, F>(value: Value, check: F) -> Result<(Vec<T>, usize)>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Option<String>,
{
    let Value::Array(items) = value else {
        return Err(Error::Storage("expected a JSON array".into()));
    };
    let mut out = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.into_iter().enumerate() {
        let decoded = serde_json::from_value::<T>(item)
            .map_err(|e| e.to_string())
            .and_then(|rec| match check(&rec) {
                Some(reason) => Err(reason),
                None => Ok(rec),
            });
        match decoded {
            Ok(rec) => out.push(rec),
            Err(reason) => {
                let err = Error::DataIntegrity { index, reason };
                tracing::warn!("skipping record: {}", err);
                skipped += 1;
            }
        }
    }
    Ok((out, skipped))
}

pub fn check_transaction(t: &Transaction) -> Option<String> {
    check_amount("amount", t.amount)
        .err()
        .map(|e| format!("transaction '{}': {}", t.id, e))
}

pub fn check_card(c: &Card) -> Option<String> {
    if c.limit <= rust_decimal::Decimal::ZERO {
        Some(format!("card '{}' has a non-positive limit", c.id))
    } else if c.limit > MAX_AMOUNT {
        Some(format!("card '{}' has a limit above {}", c.id, MAX_AMOUNT))
    } else if !(1..=31).contains(&c.due_day) {
        Some(format!("card '{}' has due day {}", c.id, c.due_day))
    } else {
        None
    }
}

fn read_value(store: &dyn Store, collection: Collection) -> Result<Option<Value>> {
    match store.get(collection)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Storage(format!("{}: {}", collection.key(), e))),
    }
}

fn load_list<T, F>(store: &dyn Store, collection: Collection, check: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Option<String>,
{
    let loaded = read_value(store, collection)
        .and_then(|v| v.map(|v| decode_records(v, check)).transpose());
    match loaded {
        Ok(Some((items, _))) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(collection = collection.key(), "falling back to empty list: {}", e);
            Vec::new()
        }
    }
}

pub fn load_transactions(store: &dyn Store) -> Vec<Transaction> {
    load_list(store, Collection::Transactions, check_transaction)
}

pub fn load_cards(store: &dyn Store) -> Vec<Card> {
    load_list(store, Collection::Cards, check_card)
}

pub fn decode_settings(value: Value) -> Result<Settings> {
    let settings: Settings = serde_json::from_value(value)?;
    settings.validate()?;
    Ok(settings)
}

pub fn load_settings(store: &dyn Store) -> Settings {
    let loaded = read_value(store, Collection::Settings)
        .and_then(|v| v.map(decode_settings).transpose());
    match loaded {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(e) => {
            tracing::warn!("falling back to default settings: {}", e);
            Settings::default()
        }
    }
}

fn save<T: Serialize + ?Sized>(store: &dyn Store, collection: Collection, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(collection, &raw)?;
    tracing::debug!(collection = collection.key(), bytes = raw.len(), "saved collection");
    Ok(())
}

pub fn save_transactions(store: &dyn Store, transactions: &[Transaction]) -> Result<()> {
    save(store, Collection::Transactions, transactions)
}

pub fn save_cards(store: &dyn Store, cards: &[Card]) -> Result<()> {
    save(store, Collection::Cards, cards)
}

pub fn save_settings(store: &dyn Store, settings: &Settings) -> Result<()> {
    settings.validate()?;
    save(store, Collection::Settings, settings)
}

/// Replaces all three collections in one write.
pub fn save_all(
    store: &dyn Store,
    transactions: &[Transaction],
    cards: &[Card],
    settings: &Settings,
) -> Result<()> {
    settings.validate()?;
    store.set_many(&[
        (Collection::Transactions, serde_json::to_string(transactions)?),
        (Collection::Cards, serde_json::to_string(cards)?),
        (Collection::Settings, serde_json::to_string(settings)?),
    ])?;
    tracing::debug!("saved all collections");
    Ok(())
}
