// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregates over the transaction list.
//!
//! Everything here is a pure function of its arguments. Months are 1-indexed
//! (January = 1). Records whose date could not be parsed still count towards
//! balances and category/card totals but are left out of anything bucketed by
//! date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Card, Transaction, TransactionType};

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn sum_of<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
) -> Decimal {
    transactions
        .into_iter()
        .filter(|t| t.r#type == kind)
        .map(|t| t.amount)
        .sum()
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

pub fn total_balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions.into_iter().map(|t| t.signed_amount()).sum()
}

pub fn total_income<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    sum_of(transactions, TransactionType::Income)
}

pub fn total_expenses<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    sum_of(transactions, TransactionType::Expense)
}

/// A (year, optional month) window. `month: None` covers the whole year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && self.month.is_none_or(|m| date.month() == m)
    }
}

pub fn filter_by_period<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    period: Period,
) -> Vec<&'a Transaction> {
    transactions
        .into_iter()
        .filter(|t| t.date().is_some_and(|d| period.contains(d)))
        .collect()
}

pub fn monthly_income<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    month: u32,
    year: i32,
) -> Decimal {
    total_income(filter_by_period(transactions, Period::month(year, month)))
}

pub fn monthly_expenses<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    month: u32,
    year: i32,
) -> Decimal {
    total_expenses(filter_by_period(transactions, Period::month(year, month)))
}

/// Expense totals per category, ordered by category name.
pub fn category_breakdown<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<String, Decimal> {
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        *out.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct TopExpense<'a> {
    pub transaction: &'a Transaction,
    /// Fraction of all expenses in the input, 0 when there were none.
    pub share: Decimal,
}

impl TopExpense<'_> {
    pub fn percent(&self) -> Decimal {
        (self.share * Decimal::ONE_HUNDRED).round_dp(1)
    }
}

pub fn top_expenses<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    n: usize,
) -> Vec<TopExpense<'a>> {
    let mut expenses: Vec<&Transaction> =
        transactions.into_iter().filter(|t| t.is_expense()).collect();
    let total: Decimal = expenses.iter().map(|t| t.amount).sum();
    // stable: equal amounts keep their input order
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
    expenses
        .into_iter()
        .take(n)
        .map(|t| TopExpense {
            transaction: t,
            share: ratio(t.amount, total),
        })
        .collect()
}

pub fn card_used_limit<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    card_id: &str,
) -> Decimal {
    transactions
        .into_iter()
        .filter(|t| t.is_expense() && t.card_id.as_deref() == Some(card_id))
        .map(|t| t.amount)
        .sum()
}

/// May be negative when the card is over its limit.
pub fn card_available_limit<'a>(
    card: &Card,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Decimal {
    card.limit - card_used_limit(transactions, &card.id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardUsage {
    pub card_id: String,
    pub name: String,
    pub due_day: u32,
    pub limit: Decimal,
    pub used: Decimal,
    pub available: Decimal,
    pub usage_percent: Decimal,
    pub over_limit: bool,
}

pub fn card_usage<'a>(
    card: &Card,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> CardUsage {
    let used = card_used_limit(transactions, &card.id);
    let available = card.limit - used;
    CardUsage {
        card_id: card.id.clone(),
        name: card.name.clone(),
        due_day: card.due_day,
        limit: card.limit,
        used,
        available,
        usage_percent: ratio(used * Decimal::ONE_HUNDRED, card.limit),
        over_limit: available < Decimal::ZERO,
    }
}

/// Expenses on the card dated strictly after `as_of`, oldest first.
pub fn future_installments_for_card<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    card_id: &str,
    as_of: NaiveDate,
) -> Vec<&'a Transaction> {
    let mut out: Vec<&Transaction> = transactions
        .into_iter()
        .filter(|t| t.is_expense() && t.card_id.as_deref() == Some(card_id))
        .filter(|t| t.date().is_some_and(|d| d > as_of))
        .collect();
    out.sort_by_key(|t| t.date());
    out
}

/// Card name for display; orphaned or missing ids give an empty string.
pub fn card_name<'a>(cards: &'a [Card], card_id: Option<&str>) -> &'a str {
    card_id
        .and_then(|id| cards.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("")
}

/// Zero-filled income/expense buckets for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub income: Vec<Decimal>,
    pub expenses: Vec<Decimal>,
}

impl Series {
    fn zeroed(len: usize) -> Self {
        Self {
            income: vec![Decimal::ZERO; len],
            expenses: vec![Decimal::ZERO; len],
        }
    }

    fn add(&mut self, bucket: usize, t: &Transaction) {
        match t.r#type {
            TransactionType::Income => self.income[bucket] += t.amount,
            TransactionType::Expense => self.expenses[bucket] += t.amount,
        }
    }

    pub fn len(&self) -> usize {
        self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
    }

    /// Income minus expenses per bucket.
    pub fn net(&self) -> Vec<Decimal> {
        self.income
            .iter()
            .zip(&self.expenses)
            .map(|(i, e)| i - e)
            .collect()
    }
}

pub fn daily_series<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    month: u32,
    year: i32,
) -> Series {
    let mut series = Series::zeroed(days_in_month(year, month) as usize);
    for t in filter_by_period(transactions, Period::month(year, month)) {
        if let Some(d) = t.date() {
            series.add(d.day0() as usize, t);
        }
    }
    series
}

pub fn monthly_series<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    year: i32,
) -> Series {
    let mut series = Series::zeroed(12);
    for t in filter_by_period(transactions, Period::year(year)) {
        if let Some(d) = t.date() {
            series.add(d.month0() as usize, t);
        }
    }
    series
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_result: Decimal,
    /// Percentage of income kept, 0 when there was no income.
    pub savings_rate: Decimal,
}

pub fn kpis<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Kpis {
    let items: Vec<&Transaction> = transactions.into_iter().collect();
    let income = total_income(items.iter().copied());
    let expenses = total_expenses(items.iter().copied());
    let net = income - expenses;
    Kpis {
        total_income: income,
        total_expenses: expenses,
        net_result: net,
        savings_rate: ratio(net * Decimal::ONE_HUNDRED, income),
    }
}

/// Years that have at least one dated transaction, newest first.
pub fn available_years<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    today: NaiveDate,
) -> Vec<i32> {
    let years: BTreeSet<i32> = transactions
        .into_iter()
        .filter_map(|t| t.date())
        .map(|d| d.year())
        .collect();
    if years.is_empty() {
        return vec![today.year()];
    }
    years.into_iter().rev().collect()
}

fn newest_first(items: &mut [&Transaction]) {
    // None sorts below Some, so undated records end up last
    items.sort_by(|a, b| b.date().cmp(&a.date()));
}

pub fn recent<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    n: usize,
) -> Vec<&'a Transaction> {
    let mut items: Vec<&Transaction> = transactions.into_iter().collect();
    newest_first(&mut items);
    items.truncate(n);
    items
}

/// Case-insensitive search on description or category, plus an exact
/// category filter. Results are newest first.
pub fn search<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    term: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a Transaction> {
    let term = term
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let category = category.filter(|c| !c.is_empty());
    let mut items: Vec<&Transaction> = transactions
        .into_iter()
        .filter(|t| {
            term.as_ref().is_none_or(|needle| {
                t.description.to_lowercase().contains(needle.as_str())
                    || t.category.to_lowercase().contains(needle.as_str())
            })
        })
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();
    newest_first(&mut items);
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// 1-based pagination. Pages past the end clamp to the last page.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        per_page
    };
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    Page {
        items,
        page,
        per_page,
        total_pages,
        total_items,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub year: i32,
    pub month: u32,
    pub total_balance: Decimal,
    pub month_income: Decimal,
    pub month_expenses: Decimal,
    pub month_result: Decimal,
}

pub fn dashboard_summary(transactions: &[Transaction], today: NaiveDate) -> DashboardSummary {
    let (year, month) = (today.year(), today.month());
    let month_income = monthly_income(transactions, month, year);
    let month_expenses = monthly_expenses(transactions, month, year);
    DashboardSummary {
        year,
        month,
        total_balance: total_balance(transactions),
        month_income,
        month_expenses,
        month_result: month_income - month_expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn paginate_clamps_out_of_range_pages() {
        let p = paginate((1..=25).collect::<Vec<_>>(), 9, 10);
        assert_eq!(p.page, 3);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.items, vec![21, 22, 23, 24, 25]);

        let empty = paginate(Vec::<u8>::new(), 0, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn ratio_never_divides_by_zero() {
        assert_eq!(ratio(Decimal::ONE, Decimal::ZERO), Decimal::ZERO);
    }
}
