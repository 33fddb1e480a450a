// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use slipbook::{cli, client::ApiClient, commands, config::ServerConfig, server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("slipbook=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn client_for(m: &clap::ArgMatches) -> Result<ApiClient> {
    let base = m
        .get_one::<String>("server")
        .map(String::as_str)
        .unwrap_or(slipbook::config::DEFAULT_SERVER);
    ApiClient::new(base)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("serve", sub)) => {
            init_tracing();
            let cfg = ServerConfig::from_matches(sub).context("Invalid server configuration")?;
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            rt.block_on(server::run_server(cfg))?;
        }
        Some(("tx", sub)) => commands::transactions::handle(&client_for(sub)?, sub)?,
        Some(("report", sub)) => commands::reports::handle(&client_for(sub)?, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&client_for(sub)?, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&client_for(sub)?, sub)?,
        Some(("types", _)) => commands::types::handle()?,
        Some(("seed", sub)) => {
            let resp = client_for(sub)?.seed()?;
            println!("{}", resp.message);
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
