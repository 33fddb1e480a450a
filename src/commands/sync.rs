// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::client::ApiClient;
use crate::sync::{PullPolicy, SyncOutcome};
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("pull", sub)) => {
            let policy = sub
                .get_one::<String>("policy")
                .map(|s| s.parse::<PullPolicy>().map_err(|e| anyhow!(e)))
                .transpose()?
                .unwrap_or_default();
            print_outcome(&client.pull(policy)?);
        }
        Some(("push", _)) => print_outcome(&client.push()?),
        _ => {}
    }
    Ok(())
}

fn print_outcome(outcome: &SyncOutcome) {
    println!("{}", outcome.message);
    let r = outcome.report;
    println!(
        "{}",
        pretty_table(
            &["Processed", "Skipped", "Failed"],
            vec![vec![
                r.processed.to_string(),
                r.skipped.to_string(),
                r.failed.to_string(),
            ]],
        )
    );
}
