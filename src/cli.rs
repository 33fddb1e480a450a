// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{DEFAULT_API_URL, DEFAULT_BIND, DEFAULT_SERVER};
use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn serve_cmd() -> Command {
    Command::new("serve")
        .about("Run the HTTP API (in-memory ledger, Airtable mirror)")
        .arg(
            Arg::new("bind")
                .long("bind")
                .env("SLIPBOOK_BIND")
                .default_value(DEFAULT_BIND)
                .help("Listen address"),
        )
        .arg(
            Arg::new("calendar")
                .long("calendar")
                .env("SLIPBOOK_CALENDAR")
                .default_value("gregorian")
                .help("Year convention for reports: gregorian|buddhist"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .env("SLIPBOOK_CURRENCY")
                .default_value("THB")
                .help("Currency label printed on receipts"),
        )
        .arg(
            Arg::new("receipt-width")
                .long("receipt-width")
                .env("SLIPBOOK_RECEIPT_WIDTH")
                .value_parser(value_parser!(usize))
                .default_value("40")
                .help("Receipt width in characters (32-42)"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .env("SLIPBOOK_AIRTABLE_TIMEOUT")
                .value_parser(value_parser!(u64))
                .help("Per-request Airtable timeout in seconds"),
        )
        .arg(
            Arg::new("airtable-key")
                .long("airtable-key")
                .env("AIRTABLE_API_KEY")
                .hide_env_values(true)
                .help("Airtable personal access token (required)"),
        )
        .arg(
            Arg::new("airtable-base")
                .long("airtable-base")
                .env("AIRTABLE_BASE_ID")
                .help("Airtable base id (required)"),
        )
        .arg(
            Arg::new("airtable-table")
                .long("airtable-table")
                .env("AIRTABLE_TABLE_NAME")
                .help("Airtable table name (required)"),
        )
        .arg(
            Arg::new("airtable-url")
                .long("airtable-url")
                .env("AIRTABLE_API_URL")
                .default_value(DEFAULT_API_URL)
                .help("Airtable API root"),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("type").long("type").required(true).help("REG|SID|INV|OIC|TEX|ESS|DIS|DEB|SAV|OEX"))
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                .arg(Arg::new("debit").long("debit").help("Amount paid out"))
                .arg(Arg::new("credit").long("credit").help("Amount received"))
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("start").long("start").help("YYYY-MM-DD, inclusive"))
                .arg(Arg::new("end").long("end").help("YYYY-MM-DD, inclusive"))
                .arg(Arg::new("type").long("type"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").required(true)),
        )
}

fn report_cmd() -> Command {
    let year = || {
        Arg::new("year")
            .required(true)
            .value_parser(value_parser!(i32))
    };
    Command::new("report")
        .about("Reports")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("monthly").arg(year()).arg(
                Arg::new("month")
                    .required(true)
                    .value_parser(value_parser!(u32).range(1..=12)),
            ),
        ))
        .subcommand(json_flags(Command::new("yearly").arg(year())))
        .subcommand(
            Command::new("thermal")
                .about("Print a receipt; the whole year when no month is given")
                .arg(year())
                .arg(Arg::new("month").value_parser(value_parser!(u32).range(1..=12))),
        )
}

fn sync_cmd() -> Command {
    Command::new("sync")
        .about("Airtable synchronisation")
        .subcommand_required(true)
        .subcommand(
            Command::new("pull").arg(
                Arg::new("policy")
                    .long("policy")
                    .default_value("skip-existing")
                    .help("skip-existing|replace"),
            ),
        )
        .subcommand(Command::new("push"))
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data")
        .subcommand_required(true)
        .subcommand(
            Command::new("transactions")
                .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                .arg(Arg::new("out").long("out").required(true))
                .arg(Arg::new("start").long("start"))
                .arg(Arg::new("end").long("end")),
        )
}

pub fn build_cli() -> Command {
    Command::new("slipbook")
        .version(crate_version!())
        .about("Income/expense ledger with thermal receipts and Airtable sync")
        .arg(
            Arg::new("server")
                .long("server")
                .global(true)
                .env("SLIPBOOK_SERVER")
                .default_value(DEFAULT_SERVER)
                .help("Base URL of a running `slipbook serve`"),
        )
        .subcommand(serve_cmd())
        .subcommand(tx_cmd())
        .subcommand(report_cmd())
        .subcommand(sync_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("types").about("Show transaction type codes"))
        .subcommand(Command::new("seed").about("Load the sample ledger into the server"))
}
