// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Due-date alerts, recomputed on demand from settings, cards and the clock
//! reading passed in by the caller.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::analytics::days_in_month;
use crate::models::{Card, Settings, Transaction};

/// Card bills alert this many days ahead, regardless of settings.
pub const CARD_DUE_WINDOW_DAYS: u32 = 3;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Days until the next `due_day`. A day already past this month rolls into the
/// next one.
pub fn days_until_due(today: NaiveDate, due_day: u32) -> u32 {
    let current = today.day();
    if due_day < current {
        days_in_month(today.year(), today.month()) - current + due_day
    } else {
        due_day - current
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDueAlert {
    pub card_id: String,
    pub card_name: String,
    pub due_day: u32,
    pub days_until_due: u32,
}

pub fn card_due_alerts(cards: &[Card], today: NaiveDate) -> Vec<CardDueAlert> {
    cards
        .iter()
        .filter_map(|card| {
            let days = days_until_due(today, card.due_day);
            (days > 0 && days <= CARD_DUE_WINDOW_DAYS).then(|| CardDueAlert {
                card_id: card.id.clone(),
                card_name: card.name.clone(),
                due_day: card.due_day,
                days_until_due: days,
            })
        })
        .collect()
}

/// Whole days from `now` to the start of `due`, rounded up.
pub fn days_until(due: NaiveDate, now: NaiveDateTime) -> i64 {
    let secs = (due.and_time(chrono::NaiveTime::default()) - now).num_seconds();
    let days = secs.div_euclid(SECONDS_PER_DAY);
    if secs.rem_euclid(SECONDS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DueDateAlert<'a> {
    pub transaction: &'a Transaction,
    pub days_until_due: i64,
}

pub fn transaction_due_alerts<'a>(
    settings: &Settings,
    transactions: &'a [Transaction],
    now: NaiveDateTime,
) -> Vec<DueDateAlert<'a>> {
    let prefs = &settings.notifications;
    if !prefs.enabled || !prefs.notify_due_dates {
        return Vec::new();
    }
    transactions
        .iter()
        .filter_map(|t| {
            let due = t.due_date.as_ref()?.as_date()?;
            let days = days_until(due, now);
            prefs
                .days_before_due
                .contains(&days)
                .then_some(DueDateAlert {
                    transaction: t,
                    days_until_due: days,
                })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Alerts<'a> {
    pub cards: Vec<CardDueAlert>,
    pub transactions: Vec<DueDateAlert<'a>>,
}

impl Alerts<'_> {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.transactions.is_empty()
    }
}

pub fn evaluate<'a>(
    settings: &Settings,
    cards: &[Card],
    transactions: &'a [Transaction],
    now: NaiveDateTime,
) -> Alerts<'a> {
    Alerts {
        cards: card_due_alerts(cards, now.date()),
        transactions: transaction_due_alerts(settings, transactions, now),
    }
}
