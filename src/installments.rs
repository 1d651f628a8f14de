// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{RecordDate, Transaction, TransactionType, check_amount};

/// A transaction as entered, before ids are assigned or installments expanded.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub r#type: TransactionType,
    pub category: String,
    pub card_id: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl NewTransaction {
    fn validate(&self) -> Result<()> {
        check_amount("Amount", self.amount)
    }

    pub fn build(self) -> Result<Transaction> {
        self.validate()?;
        Ok(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            description: self.description.trim().to_string(),
            amount: self.amount,
            date: RecordDate::Valid(self.date),
            r#type: self.r#type,
            category: self.category.trim().to_string(),
            card_id: self.card_id.filter(|c| !c.trim().is_empty()),
            due_date: self.due_date.map(RecordDate::Valid),
        })
    }
}

/// Splits a purchase into `count` monthly transactions of equal amount.
///
/// Installment `i` (0-based) is dated `i` months after the purchase; days past
/// the end of a shorter month clamp to its last day. A count of 0 is rejected
/// and a count of 1 records the purchase as-is.
pub fn expand_installments(draft: NewTransaction, count: u32) -> Result<Vec<Transaction>> {
    if count == 0 {
        return Err(Error::Validation(
            "Installment count must be at least 1".into(),
        ));
    }
    if count == 1 {
        return Ok(vec![draft.build()?]);
    }
    draft.validate()?;

    let part = draft.amount / Decimal::from(count);
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let date = draft.date.checked_add_months(Months::new(i)).ok_or_else(|| {
            Error::Validation(format!(
                "Installment {} of {} falls outside the supported date range",
                i + 1,
                count
            ))
        })?;
        let installment = NewTransaction {
            description: format!("{} ({}/{})", draft.description.trim(), i + 1, count),
            amount: part,
            date,
            ..draft.clone()
        };
        out.push(installment.build()?);
    }
    Ok(out)
}
