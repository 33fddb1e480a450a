// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly and yearly aggregation over a transaction list.
//!
//! Everything here is pure: the callers pass in whatever the store returned
//! and get a fresh report back. Amounts are decimal strings on the
//! transactions; anything that does not parse counts as zero.

use crate::models::{Transaction, TransactionType};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How requested years map onto the Gregorian dates stored on transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarPolicy {
    #[default]
    Gregorian,
    /// Thai solar calendar: years above 2500 are Buddhist Era and sit 543
    /// years ahead of the Gregorian count.
    Buddhist,
}

impl CalendarPolicy {
    pub const BUDDHIST_OFFSET: i32 = 543;
    const BUDDHIST_THRESHOLD: i32 = 2500;

    pub fn to_gregorian(self, year: i32) -> i32 {
        match self {
            CalendarPolicy::Buddhist if year > Self::BUDDHIST_THRESHOLD => {
                year - Self::BUDDHIST_OFFSET
            }
            _ => year,
        }
    }

    /// The year printed on receipts.
    pub fn display_year(self, year: i32) -> i32 {
        match self {
            CalendarPolicy::Buddhist if year < Self::BUDDHIST_THRESHOLD => {
                year + Self::BUDDHIST_OFFSET
            }
            _ => year,
        }
    }
}

impl fmt::Display for CalendarPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarPolicy::Gregorian => f.write_str("gregorian"),
            CalendarPolicy::Buddhist => f.write_str("buddhist"),
        }
    }
}

impl FromStr for CalendarPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gregorian" | "ce" => Ok(CalendarPolicy::Gregorian),
            "buddhist" | "be" | "thai" => Ok(CalendarPolicy::Buddhist),
            other => Err(format!(
                "Unknown calendar '{}', expected gregorian|buddhist",
                other
            )),
        }
    }
}

/// Parses a stored amount, treating absent or malformed values as zero.
pub fn amount(s: Option<&str>) -> Decimal {
    s.and_then(|v| v.trim().parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub month: u32,
    pub year: i32,
    pub transactions: Vec<Transaction>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
    pub taxable_amount: Decimal,
    pub tax_exempt_amount: Decimal,
    pub type_summary: BTreeMap<TransactionType, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: u32,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReportData {
    pub year: i32,
    pub transactions: Vec<Transaction>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
    pub taxable_amount: Decimal,
    pub tax_exempt_amount: Decimal,
    pub type_summary: BTreeMap<TransactionType, usize>,
    /// Always 12 entries, January first.
    pub monthly: Vec<MonthSummary>,
}

#[derive(Default)]
struct Tally {
    debit: Decimal,
    credit: Decimal,
    taxable: Decimal,
    exempt: Decimal,
    types: BTreeMap<TransactionType, usize>,
}

impl Tally {
    fn add(&mut self, t: &Transaction) {
        let debit = amount(t.debit_amount.as_deref());
        let credit = amount(t.credit_amount.as_deref());
        self.debit += debit;
        self.credit += credit;
        *self.types.entry(t.kind).or_insert(0) += 1;
        if credit > Decimal::ZERO {
            if t.kind.is_taxable() {
                self.taxable += credit;
            } else {
                self.exempt += credit;
            }
        }
    }
}

fn chronological(mut txs: Vec<Transaction>) -> Vec<Transaction> {
    txs.sort_by(|a, b| {
        a.transaction_date
            .cmp(&b.transaction_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    txs
}

pub fn aggregate_month(
    transactions: &[Transaction],
    month: u32,
    year: i32,
    calendar: CalendarPolicy,
) -> ReportData {
    let target = calendar.to_gregorian(year);
    let picked: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.transaction_date.year() == target && t.transaction_date.month() == month)
        .cloned()
        .collect();

    let mut tally = Tally::default();
    for t in &picked {
        tally.add(t);
    }

    ReportData {
        month,
        year,
        transactions: chronological(picked),
        total_debit: tally.debit,
        total_credit: tally.credit,
        balance: tally.credit - tally.debit,
        taxable_amount: tally.taxable,
        tax_exempt_amount: tally.exempt,
        type_summary: tally.types,
    }
}

pub fn aggregate_year(
    transactions: &[Transaction],
    year: i32,
    calendar: CalendarPolicy,
) -> YearlyReportData {
    let target = calendar.to_gregorian(year);
    let picked: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.transaction_date.year() == target)
        .cloned()
        .collect();

    let mut tally = Tally::default();
    let mut monthly: Vec<MonthSummary> = (1..=12)
        .map(|month| MonthSummary {
            month,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            balance: Decimal::ZERO,
            count: 0,
        })
        .collect();

    for t in &picked {
        tally.add(t);
        let slot = &mut monthly[t.transaction_date.month0() as usize];
        slot.debit += amount(t.debit_amount.as_deref());
        slot.credit += amount(t.credit_amount.as_deref());
        slot.count += 1;
    }
    for slot in &mut monthly {
        slot.balance = slot.credit - slot.debit;
    }

    YearlyReportData {
        year,
        transactions: chronological(picked),
        total_debit: tally.debit,
        total_credit: tally.credit,
        balance: tally.credit - tally.debit,
        taxable_amount: tally.taxable,
        tax_exempt_amount: tally.exempt,
        type_summary: tally.types,
        monthly,
    }
}
