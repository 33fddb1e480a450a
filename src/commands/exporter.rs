// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::client::ApiClient;
use crate::models::Transaction;
use crate::utils::parse_opt_date;
use anyhow::{Result, anyhow, bail};
use serde_json::json;
use std::path::Path;

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub
                .get_one::<String>("format")
                .ok_or_else(|| anyhow!("--format is required"))?
                .to_lowercase();
            let out = sub
                .get_one::<String>("out")
                .ok_or_else(|| anyhow!("--out is required"))?;
            check_format(&fmt)?;
            let start = parse_opt_date(sub.get_one::<String>("start"))?;
            let end = parse_opt_date(sub.get_one::<String>("end"))?;
            let mut rows = client.list_transactions(start, end)?;
            rows.reverse();
            export_transactions(&rows, &fmt, Path::new(out))?;
            println!("Exported {} transaction(s) to {}", rows.len(), out);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_format(fmt: &str) -> Result<()> {
    match fmt {
        "csv" | "json" => Ok(()),
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
}

/// Writes `rows` in the given order. Nothing is written for an unknown format.
pub fn export_transactions(rows: &[Transaction], fmt: &str, out: &Path) -> Result<()> {
    check_format(fmt)?;
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "debit",
                "credit",
                "notes",
                "external_id",
            ])?;
            for t in rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.transaction_date.to_string(),
                    t.kind.to_string(),
                    t.debit_amount.clone().unwrap_or_default(),
                    t.credit_amount.clone().unwrap_or_default(),
                    t.notes.clone().unwrap_or_default(),
                    t.external_id.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.transaction_date,
                        "type": t.kind,
                        "debit": t.debit_amount,
                        "credit": t.credit_amount,
                        "notes": t.notes,
                        "externalId": t.external_id,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    Ok(())
}
