// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Card, Settings, Transaction};
use crate::notifications::{Alerts, evaluate};
use crate::store::{self, Store};
use crate::utils::{maybe_print_json, now_or, pretty_table};
use anyhow::Result;

/// The three collections as loaded for one render.
pub struct Snapshot {
    pub settings: Settings,
    pub cards: Vec<Card>,
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn load(store: &dyn Store) -> Self {
        Self {
            settings: store::load_settings(store),
            cards: store::load_cards(store),
            transactions: store::load_transactions(store),
        }
    }

    /// Alerts as of midnight of `--today`, or the local clock.
    pub fn alerts(&self, m: &clap::ArgMatches) -> Result<Alerts<'_>> {
        let now = now_or(m.get_one::<String>("today"))?;
        Ok(evaluate(&self.settings, &self.cards, &self.transactions, now))
    }
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let snapshot = Snapshot::load(store);
    let alerts = snapshot.alerts(m)?;

    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &alerts)? {
        print_alerts(&alerts);
    }
    Ok(())
}

pub fn alert_rows(alerts: &Alerts<'_>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for a in &alerts.cards {
        rows.push(vec![
            "card_due".into(),
            format!("Card '{}' bill is due in {} day(s)", a.card_name, a.days_until_due),
        ]);
    }
    for a in &alerts.transactions {
        rows.push(vec![
            "payment_due".into(),
            format!(
                "'{}' is due in {} day(s)",
                a.transaction.description, a.days_until_due
            ),
        ]);
    }
    rows
}

pub fn print_alerts(alerts: &Alerts<'_>) {
    if alerts.is_empty() {
        println!("No upcoming due dates");
    } else {
        println!("{}", pretty_table(&["Alert", "Detail"], alert_rows(alerts)));
    }
}
