// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Largest amount, limit or income accepted anywhere (1e15). Keeps sums over
/// any realistic number of records inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Checks that `amount` is within `0..=MAX_AMOUNT`.
pub fn check_amount(what: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "{} must not be negative, got {}",
            what, amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "{} must not exceed {}, got {}",
            what, MAX_AMOUNT, amount
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::Validation(format!(
                "Invalid transaction type '{}', expected income|expense",
                other
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.write_str("income"),
            Self::Expense => f.write_str("expense"),
        }
    }
}

/// A calendar date as stored in a record.
///
/// Dates that cannot be parsed are kept verbatim so that saving the
/// collection again does not lose them. Date-bucketed reports skip them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDate {
    Valid(NaiveDate),
    Malformed(String),
}

impl RecordDate {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Self::Valid(d);
        }
        // timestamps resolve to the local calendar day
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Self::Valid(dt.with_timezone(&Local).date_naive());
        }
        Self::Malformed(raw.to_string())
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Valid(d) => Some(*d),
            Self::Malformed(_) => None,
        }
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(d: NaiveDate) -> Self {
        Self::Valid(d)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Malformed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for RecordDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self::parse(&s)),
            other => Ok(Self::Malformed(other.to_string())),
        }
    }
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn non_empty_id<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.filter(|s| !s.trim().is_empty()))
}

fn optional_date<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<RecordDate>, D::Error> {
    match Option::<serde_json::Value>::deserialize(d)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(RecordDate::parse(&s))),
        Some(other) => Ok(Some(RecordDate::Malformed(other.to_string()))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    pub amount: Decimal, // always >= 0, sign comes from `type`
    pub date: RecordDate,
    pub r#type: TransactionType,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "non_empty_id")]
    pub card_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<RecordDate>,
}

impl Transaction {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date.as_date()
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    /// Amount with the sign implied by the type.
    pub fn signed_amount(&self) -> Decimal {
        match self.r#type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

fn default_color() -> String {
    "blue".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    pub limit: Decimal,
    pub due_day: u32,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(
        name: &str,
        limit: Decimal,
        due_day: u32,
        color: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Card name must not be empty".into()));
        }
        if limit <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Card limit must be positive, got {}",
                limit
            )));
        }
        check_amount("Card limit", limit)?;
        if !(1..=31).contains(&due_day) {
            return Err(Error::Validation(format!(
                "Due day must be between 1 and 31, got {}",
                due_day
            )));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            limit,
            due_day,
            color: color
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(default_color),
            created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraIncome {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    pub amount: Decimal,
}

fn default_true() -> bool {
    true
}

fn default_days_before_due() -> BTreeSet<i64> {
    BTreeSet::from([1, 2, 3])
}

fn default_salary_day() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_days_before_due")]
    pub days_before_due: BTreeSet<i64>,
    #[serde(default = "default_true")]
    pub notify_due_dates: bool,
    #[serde(default = "default_true")]
    pub notify_low_balance: bool,
    #[serde(default = "default_true")]
    pub notify_high_expenses: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days_before_due: default_days_before_due(),
            notify_due_dates: true,
            notify_low_balance: true,
            notify_high_expenses: true,
        }
    }
}

// Older builds stored `extraIncome: 0`; anything that is not a list reads as empty.
fn lenient_extra_income<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<ExtraIncome>, D::Error> {
    match serde_json::Value::deserialize(d)? {
        v @ serde_json::Value::Array(_) => serde_json::from_value(v).map_err(D::Error::custom),
        _ => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub salary: Decimal,
    #[serde(default = "default_salary_day")]
    pub salary_day: u32,
    #[serde(default, deserialize_with = "lenient_extra_income")]
    pub extra_income: Vec<ExtraIncome>,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            salary: Decimal::ZERO,
            salary_day: default_salary_day(),
            extra_income: Vec::new(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        check_amount("Salary", self.salary)?;
        if !(1..=31).contains(&self.salary_day) {
            return Err(Error::Validation(format!(
                "Salary day must be between 1 and 31, got {}",
                self.salary_day
            )));
        }
        for e in &self.extra_income {
            check_amount(&format!("Extra income '{}'", e.description), e.amount)?;
        }
        if let Some(bad) = self.notifications.days_before_due.iter().find(|d| **d < 0) {
            return Err(Error::Validation(format!(
                "Notification day offsets must not be negative, got {}",
                bad
            )));
        }
        Ok(())
    }

    pub fn expected_monthly_income(&self) -> Decimal {
        self.salary + self.extra_income.iter().map(|e| e.amount).sum::<Decimal>()
    }
}
