// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::client::ApiClient;
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_opt_date, pretty_table};
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use uuid::Uuid;

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(client, sub)?,
        Some(("list", sub)) => list(client, sub)?,
        Some(("rm", sub)) => remove(client, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn input_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let kind: TransactionType = sub
        .get_one::<String>("type")
        .ok_or_else(|| anyhow!("--type is required"))?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let date = parse_date(
        sub.get_one::<String>("date")
            .ok_or_else(|| anyhow!("--date is required"))?,
    )?;
    let debit = sub.get_one::<String>("debit").cloned();
    let credit = sub.get_one::<String>("credit").cloned();
    for v in debit.iter().chain(credit.iter()) {
        parse_decimal(v)?;
    }
    if debit.is_some() && credit.is_some() {
        bail!("Give either --debit or --credit, not both");
    }
    // The single amount goes on the side the type implies.
    let (debit, credit) = if kind.is_income() {
        (None, credit.or(debit))
    } else {
        (debit.or(credit), None)
    };
    Ok(NewTransaction {
        kind,
        debit_amount: debit,
        credit_amount: credit,
        transaction_date: date,
        notes: sub.get_one::<String>("note").cloned(),
    })
}

fn add(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let input = input_from_args(sub)?;
    let tx = client.create_transaction(&input)?;
    let amount = tx
        .credit_amount
        .as_deref()
        .or(tx.debit_amount.as_deref())
        .unwrap_or("0");
    println!(
        "Recorded {} {} on {} (id: {}{})",
        tx.kind,
        amount,
        tx.transaction_date,
        tx.id,
        if tx.external_id.is_some() { ", synced" } else { ", not synced" }
    );
    Ok(())
}

fn remove(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("id is required"))?;
    let id = Uuid::parse_str(raw).with_context(|| format!("Invalid id '{}'", raw))?;
    client.delete_transaction(id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}

fn list(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let start = parse_opt_date(sub.get_one::<String>("start"))?;
    let end = parse_opt_date(sub.get_one::<String>("end"))?;
    let data = query_rows(client.list_transactions(start, end)?, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.debit.clone(),
                    r.credit.clone(),
                    r.note.clone(),
                    r.synced.to_string(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Debit", "Credit", "Note", "Synced", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub debit: String,
    pub credit: String,
    pub note: String,
    pub synced: bool,
}

/// Applies the `--type` and `--limit` filters to rows the server returned
/// (already newest first).
pub fn query_rows(data: Vec<Transaction>, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    Ok(data
        .into_iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.transaction_date.to_string(),
            r#type: t.kind.to_string(),
            debit: t.debit_amount.unwrap_or_default(),
            credit: t.credit_amount.unwrap_or_default(),
            note: t.notes.unwrap_or_default(),
            synced: t.external_id.is_some(),
        })
        .collect())
}
