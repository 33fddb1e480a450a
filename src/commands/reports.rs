// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::client::ApiClient;
use crate::models::TransactionType;
use crate::report::{ReportData, YearlyReportData};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use std::collections::BTreeMap;

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(client, sub)?,
        Some(("yearly", sub)) => yearly(client, sub)?,
        Some(("thermal", sub)) => thermal(client, sub)?,
        _ => {}
    }
    Ok(())
}

fn year_arg(sub: &clap::ArgMatches) -> Result<i32> {
    sub.get_one::<i32>("year")
        .copied()
        .ok_or_else(|| anyhow!("year is required"))
}

fn type_rows(types: &BTreeMap<TransactionType, usize>) -> Vec<Vec<String>> {
    types
        .iter()
        .map(|(t, n)| vec![t.code().to_string(), t.info().name_en.to_string(), n.to_string()])
        .collect()
}

pub fn summary_rows(report: &ReportData) -> Vec<Vec<String>> {
    vec![
        vec!["Total debit".into(), format!("{:.2}", report.total_debit)],
        vec!["Total credit".into(), format!("{:.2}", report.total_credit)],
        vec!["Balance".into(), format!("{:.2}", report.balance)],
        vec!["Taxable income".into(), format!("{:.2}", report.taxable_amount)],
        vec!["Tax-exempt income".into(), format!("{:.2}", report.tax_exempt_amount)],
        vec!["Transactions".into(), report.transactions.len().to_string()],
    ]
}

fn monthly(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let year = year_arg(sub)?;
    let month = sub
        .get_one::<u32>("month")
        .copied()
        .ok_or_else(|| anyhow!("month is required"))?;
    let report = client.monthly_report(year, month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    println!("Report for {}-{:02}", year, month);
    println!("{}", pretty_table(&["", "Amount"], summary_rows(&report)));
    if !report.type_summary.is_empty() {
        println!(
            "{}",
            pretty_table(&["Type", "Name", "Count"], type_rows(&report.type_summary))
        );
    }
    Ok(())
}

pub fn monthly_rows(report: &YearlyReportData) -> Vec<Vec<String>> {
    report
        .monthly
        .iter()
        .map(|m| {
            vec![
                format!("{}-{:02}", report.year, m.month),
                format!("{:.2}", m.debit),
                format!("{:.2}", m.credit),
                format!("{:.2}", m.balance),
                m.count.to_string(),
            ]
        })
        .collect()
}

fn yearly(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let year = year_arg(sub)?;
    let report = client.yearly_report(year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Month", "Debit", "Credit", "Balance", "Count"],
            monthly_rows(&report)
        )
    );
    println!(
        "Debit {:.2} | Credit {:.2} | Balance {:.2} | Taxable {:.2} | Exempt {:.2}",
        report.total_debit,
        report.total_credit,
        report.balance,
        report.taxable_amount,
        report.tax_exempt_amount
    );
    Ok(())
}

fn thermal(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let year = year_arg(sub)?;
    let receipt = match sub.get_one::<u32>("month") {
        Some(month) => client.thermal(year, *month)?.receipt,
        None => client.thermal_yearly(year)?.receipt,
    };
    print!("{}", receipt);
    Ok(())
}
