// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, tx};
use slipbook::client::ApiClient;
use slipbook::models::TransactionType::*;
use slipbook::{cli, commands::exporter};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn export_transactions_writes_pretty_json() {
    let mut t = tx(ESS, Some("12.34"), None, date(2025, 1, 2));
    t.notes = Some("Weekly run".into());
    t.external_id = Some("rec0001".into());

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    exporter::export_transactions(std::slice::from_ref(&t), "json", &out_path).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": t.id.to_string(),
                "date": "2025-01-02",
                "type": "ESS",
                "debit": "12.34",
                "credit": null,
                "notes": "Weekly run",
                "externalId": "rec0001"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv() {
    let rows = vec![
        tx(ESS, Some("35"), None, date(2025, 8, 1)),
        tx(REG, None, Some("1000"), date(2025, 8, 2)),
    ];
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    exporter::export_transactions(&rows, "csv", &out_path).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][2], "ESS");
    assert_eq!(&records[0][3], "35");
    assert_eq!(&records[1][4], "1000");
    assert_eq!(&records[1][6], "");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "slipbook",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    // the format is checked before the server is contacted
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&client, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
