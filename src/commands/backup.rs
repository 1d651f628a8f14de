// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup::{self, Restored};
use crate::store::{self, Store};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::path::PathBuf;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = match sub.get_one::<String>("out") {
                Some(p) => PathBuf::from(p.trim()),
                None => PathBuf::from(backup::backup_file_name(Local::now().date_naive())),
            };
            export_to(store, &out)?;
            println!("Exported backup to {}", out.display());
        }
        Some(("import", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let restored = import_from(store, path)?;
            println!(
                "Imported {} transactions and {} cards from {}",
                restored.transactions.len(),
                restored.cards.len(),
                path
            );
            if restored.skipped > 0 {
                println!("Skipped {} unreadable records", restored.skipped);
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn export_to(store: &dyn Store, out: &std::path::Path) -> Result<()> {
    let transactions = store::load_transactions(store);
    let cards = store::load_cards(store);
    let settings = store::load_settings(store);
    let doc = backup::export(&transactions, &cards, &settings, Utc::now());
    std::fs::write(out, doc.to_json()?)
        .with_context(|| format!("Write backup {}", out.display()))?;
    Ok(())
}

/// Replaces all three collections with the backup contents. Nothing is
/// written unless the whole document validates.
pub fn import_from(store: &dyn Store, path: &str) -> Result<Restored> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Read backup {}", path))?;
    let restored = backup::import(&raw).context("Could not import backup")?;
    store::save_all(
        store,
        &restored.transactions,
        &restored.cards,
        &restored.settings,
    )?;
    tracing::info!(
        transactions = restored.transactions.len(),
        cards = restored.cards.len(),
        skipped = restored.skipped,
        "backup restored"
    );
    Ok(restored)
}
