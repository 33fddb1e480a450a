// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-width receipts for narrow thermal printers.
//!
//! Every line is at most `width` characters. Amount columns shrink with the
//! paper; an amount that still does not fit drops its decimals and, failing
//! that, prints as `#`s.

use crate::models::TransactionType;
use crate::report::{CalendarPolicy, ReportData, YearlyReportData, amount};
use chrono::Datelike;
use rust_decimal::Decimal;

pub const MIN_WIDTH: usize = 32;
pub const MAX_WIDTH: usize = 42;
pub const DEFAULT_WIDTH: usize = 40;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Label column of the summary block.
const LABEL: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOptions {
    width: usize,
    pub currency: String,
    pub calendar: CalendarPolicy,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            currency: "THB".into(),
            calendar: CalendarPolicy::default(),
        }
    }
}

impl ReceiptOptions {
    /// `width` is clamped into `MIN_WIDTH..=MAX_WIDTH`.
    pub fn new(width: usize, currency: impl Into<String>, calendar: CalendarPolicy) -> Self {
        Self {
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            currency: currency.into(),
            calendar,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

fn month_abbr(month: u32) -> &'static str {
    (month as usize)
        .checked_sub(1)
        .and_then(|i| MONTH_ABBR.get(i))
        .copied()
        .unwrap_or("---")
}

fn money(d: Decimal) -> String {
    format!("{:.2}", d)
}

fn money_or_blank(d: Decimal) -> String {
    if d > Decimal::ZERO { money(d) } else { String::new() }
}

/// Makes `s` fit in `w` characters.
fn fit(s: &str, w: usize) -> String {
    if s.chars().count() <= w {
        return s.to_string();
    }
    if let Some((whole, _)) = s.split_once('.') {
        if whole.chars().count() <= w {
            return whole.to_string();
        }
    }
    "#".repeat(w)
}

fn truncate(s: &str, w: usize) -> String {
    s.chars().take(w).collect()
}

/// Widths of the two narrow amount columns and the wide trailing one, for a
/// row with 11 characters of fixed content.
fn amount_columns(width: usize) -> (usize, usize) {
    let a = (width - 11) / 3;
    (a, width - 11 - 2 * a)
}

struct Sheet {
    width: usize,
    lines: Vec<String>,
}

impl Sheet {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: String) {
        let line = truncate(line.trim_end(), self.width);
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn rule(&mut self, c: char) {
        self.lines.push(c.to_string().repeat(self.width));
    }

    fn centered(&mut self, s: &str) {
        let w = self.width;
        self.push(format!("{:^w$}", s));
    }

    fn spread(&mut self, left: &str, right: &str) {
        let used = left.chars().count();
        let room = self.width.saturating_sub(used).max(1);
        self.push(format!("{left}{right:>room$}"));
    }

    fn kv(&mut self, label: &str, value: &str) {
        let v = self.width - LABEL - 3;
        self.push(format!(" {:<LABEL$}: {:>v$}", truncate(label, LABEL), fit(value, v)));
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn summary(
    sheet: &mut Sheet,
    debit: Decimal,
    credit: Decimal,
    types: &std::collections::BTreeMap<TransactionType, usize>,
    taxable: Decimal,
    exempt: Decimal,
) {
    sheet.rule('=');
    sheet.push("  SUMMARY".into());
    sheet.rule('-');
    sheet.kv("Total Debit", &money(debit));
    sheet.kv("Total Credit", &money(credit));
    sheet.kv("Balance", &money(credit - debit));
    sheet.rule('-');
    sheet.push(" TRANSACTION TYPES".into());
    for t in TransactionType::ALL {
        if let Some(n) = types.get(&t) {
            sheet.kv(&format!("{} {}", t.code(), t.info().name_en), &n.to_string());
        }
    }
    sheet.rule('-');
    sheet.push(" TAX INFORMATION".into());
    sheet.kv("Taxable Income", &money(taxable));
    sheet.kv("Tax-Exempt", &money(exempt));
    sheet.rule('=');
}

/// Monthly receipt: one row per transaction with a running balance.
pub fn monthly_receipt(report: &ReportData, opts: &ReceiptOptions) -> String {
    let width = opts.width;
    let (a, t) = amount_columns(width);
    let mut sheet = Sheet::new(width);

    sheet.centered(&format!(
        "ACCOUNT REPORT {}",
        opts.calendar.display_year(report.year)
    ));
    sheet.blank();
    sheet.spread(
        &format!("Month: {}", month_abbr(report.month)),
        &format!("Currency: {}", opts.currency),
    );
    sheet.rule('=');
    sheet.push(format!(
        "{:<3}  {:<4}{:>a$} {:>a$} {:>t$}",
        "Day", "Type", "Debit", "Credit", "Total"
    ));
    sheet.rule('=');

    let mut running = Decimal::ZERO;
    for tx in &report.transactions {
        let debit = amount(tx.debit_amount.as_deref());
        let credit = amount(tx.credit_amount.as_deref());
        running += credit - debit;
        sheet.push(format!(
            " {:02}  {:<3} {:>a$} {:>a$} {:>t$}",
            tx.transaction_date.day(),
            tx.kind.code(),
            fit(&money_or_blank(debit), a),
            fit(&money_or_blank(credit), a),
            fit(&money(running), t),
        ));
    }

    sheet.push(format!("{:>width$}", "_".repeat(t)));
    sheet.push(format!("{:>width$}", fit(&money(running), t)));
    sheet.push(format!("{:>width$}", "=".repeat(t)));
    sheet.blank();

    summary(
        &mut sheet,
        report.total_debit,
        report.total_credit,
        &report.type_summary,
        report.taxable_amount,
        report.tax_exempt_amount,
    );
    sheet.finish()
}

/// Yearly receipt: one row per calendar month instead of per transaction.
pub fn yearly_receipt(report: &YearlyReportData, opts: &ReceiptOptions) -> String {
    let width = opts.width;
    let (a, b) = amount_columns(width);
    let mut sheet = Sheet::new(width);

    sheet.centered(&format!(
        "ANNUAL REPORT {}",
        opts.calendar.display_year(report.year)
    ));
    sheet.blank();
    sheet.spread(
        &format!("Transactions: {}", report.transactions.len()),
        &format!("Currency: {}", opts.currency),
    );
    sheet.rule('=');
    sheet.push(format!(
        " {:<3} {:>a$} {:>a$} {:>b$} {:>3}",
        "Mon", "Debit", "Credit", "Balance", "#"
    ));
    sheet.rule('=');

    for m in &report.monthly {
        sheet.push(format!(
            " {:<3} {:>a$} {:>a$} {:>b$} {:>3}",
            month_abbr(m.month),
            fit(&money_or_blank(m.debit), a),
            fit(&money_or_blank(m.credit), a),
            fit(&money(m.balance), b),
            fit(&m.count.to_string(), 3),
        ));
    }

    sheet.push(format!("{:>w$}", "_".repeat(b), w = width - 4));
    sheet.push(format!("{:>w$}", fit(&money(report.balance), b), w = width - 4));
    sheet.push(format!("{:>w$}", "=".repeat(b), w = width - 4));
    sheet.blank();

    summary(
        &mut sheet,
        report.total_debit,
        report.total_credit,
        &report.type_summary,
        report.taxable_amount,
        report.tax_exempt_amount,
    );
    sheet.finish()
}
