// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, tx};
use rust_decimal::Decimal;
use slipbook::models::TransactionType::*;
use slipbook::report::{CalendarPolicy, aggregate_month, aggregate_year};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn august_example_totals() {
    let txs = vec![
        tx(REG, None, Some("1000"), date(2025, 8, 2)),
        tx(ESS, Some("35"), None, date(2025, 8, 1)),
    ];
    let r = aggregate_month(&txs, 8, 2025, CalendarPolicy::Gregorian);
    assert_eq!(r.total_credit, dec("1000"));
    assert_eq!(r.total_debit, dec("35"));
    assert_eq!(r.balance, dec("965"));
    assert_eq!(r.taxable_amount, dec("1000"));
    assert_eq!(r.tax_exempt_amount, Decimal::ZERO);
    assert_eq!(r.type_summary.get(&REG), Some(&1));
    assert_eq!(r.type_summary.get(&ESS), Some(&1));
    // chronological for the receipt scan
    assert_eq!(r.transactions[0].transaction_date, date(2025, 8, 1));
}

#[test]
fn empty_input_gives_zero_report() {
    let r = aggregate_month(&[], 1, 2025, CalendarPolicy::Gregorian);
    assert_eq!(r.total_debit, Decimal::ZERO);
    assert_eq!(r.total_credit, Decimal::ZERO);
    assert_eq!(r.balance, Decimal::ZERO);
    assert_eq!(r.taxable_amount, Decimal::ZERO);
    assert_eq!(r.tax_exempt_amount, Decimal::ZERO);
    assert!(r.type_summary.is_empty());
    assert!(r.transactions.is_empty());

    let y = aggregate_year(&[], 2025, CalendarPolicy::Gregorian);
    assert_eq!(y.balance, Decimal::ZERO);
    assert!(y.type_summary.is_empty());
    assert_eq!(y.monthly.len(), 12);
    assert!(y.monthly.iter().all(|m| m.count == 0 && m.balance.is_zero()));
}

#[test]
fn other_months_and_years_are_ignored() {
    let txs = vec![
        tx(REG, None, Some("1000"), date(2025, 8, 2)),
        tx(REG, None, Some("1000"), date(2025, 9, 1)),
        tx(REG, None, Some("1000"), date(2024, 8, 2)),
    ];
    let r = aggregate_month(&txs, 8, 2025, CalendarPolicy::Gregorian);
    assert_eq!(r.transactions.len(), 1);
    assert_eq!(r.total_credit, dec("1000"));
}

#[test]
fn tax_split_follows_type_flags() {
    let txs = vec![
        tx(SID, None, Some("500"), date(2025, 8, 1)),
        tx(TEX, None, Some("200.50"), date(2025, 8, 3)),
        tx(INV, None, Some("10.25"), date(2025, 8, 4)),
        // a refund booked on an expense code counts as exempt credit
        tx(DIS, None, Some("5"), date(2025, 8, 5)),
        tx(DEB, Some("300"), None, date(2025, 8, 6)),
    ];
    let r = aggregate_month(&txs, 8, 2025, CalendarPolicy::Gregorian);
    assert_eq!(r.taxable_amount, dec("510.25"));
    assert_eq!(r.tax_exempt_amount, dec("205.50"));
    assert_eq!(r.taxable_amount + r.tax_exempt_amount, r.total_credit);
}

#[test]
fn malformed_amounts_count_as_zero() {
    let txs = vec![
        tx(ESS, Some("abc"), None, date(2025, 8, 1)),
        tx(ESS, Some(""), Some("1e9x"), date(2025, 8, 1)),
        tx(ESS, Some("12.5"), None, date(2025, 8, 1)),
    ];
    let r = aggregate_month(&txs, 8, 2025, CalendarPolicy::Gregorian);
    assert_eq!(r.total_debit, dec("12.5"));
    assert_eq!(r.total_credit, Decimal::ZERO);
    assert_eq!(r.type_summary.get(&ESS), Some(&3));
}

#[test]
fn invariants_hold_over_mixed_ledgers() {
    let kinds = [REG, SID, INV, OIC, TEX, ESS, DIS, DEB, SAV, OEX];
    let mut txs = Vec::new();
    for i in 0..120u32 {
        let kind = kinds[(i as usize * 7) % kinds.len()];
        let amt = format!("{}.{:02}", i * 13 % 997, i % 100);
        let on = date(2025, 1 + i % 12, 1 + i % 28);
        if kind.is_income() {
            txs.push(tx(kind, None, Some(&amt), on));
        } else {
            txs.push(tx(kind, Some(&amt), None, on));
        }
    }
    for month in 1..=12 {
        let r = aggregate_month(&txs, month, 2025, CalendarPolicy::Gregorian);
        assert_eq!(r.balance, r.total_credit - r.total_debit);
        assert_eq!(r.type_summary.values().sum::<usize>(), r.transactions.len());
    }
    let y = aggregate_year(&txs, 2025, CalendarPolicy::Gregorian);
    assert_eq!(y.balance, y.total_credit - y.total_debit);
    assert_eq!(y.type_summary.values().sum::<usize>(), 120);
    assert_eq!(y.monthly.iter().map(|m| m.count).sum::<usize>(), 120);
    let debit: Decimal = y.monthly.iter().map(|m| m.debit).sum();
    let credit: Decimal = y.monthly.iter().map(|m| m.credit).sum();
    assert_eq!(debit, y.total_debit);
    assert_eq!(credit, y.total_credit);
    for m in &y.monthly {
        assert_eq!(m.balance, m.credit - m.debit);
    }
}

#[test]
fn yearly_breakdown_buckets_by_month() {
    let txs = vec![
        tx(REG, None, Some("1000"), date(2025, 8, 2)),
        tx(ESS, Some("35"), None, date(2025, 8, 1)),
        tx(REG, None, Some("1000"), date(2025, 9, 1)),
        tx(OEX, Some("65"), None, date(2025, 9, 30)),
    ];
    let y = aggregate_year(&txs, 2025, CalendarPolicy::Gregorian);
    assert_eq!(y.monthly[7].month, 8);
    assert_eq!(y.monthly[7].balance, dec("965"));
    assert_eq!(y.monthly[8].balance, dec("935"));
    assert_eq!(y.monthly[0].count, 0);
    assert_eq!(y.balance, dec("1900"));
}

#[test]
fn buddhist_policy_accepts_be_years() {
    let txs = vec![tx(REG, None, Some("1000"), date(2025, 8, 2))];
    let be = aggregate_month(&txs, 8, 2568, CalendarPolicy::Buddhist);
    assert_eq!(be.total_credit, dec("1000"));
    assert_eq!(be.year, 2568);
    let ce = aggregate_month(&txs, 8, 2568, CalendarPolicy::Gregorian);
    assert!(ce.transactions.is_empty());
    let y = aggregate_year(&txs, 2568, CalendarPolicy::Buddhist);
    assert_eq!(y.transactions.len(), 1);
}
