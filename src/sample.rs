// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewTransaction, TransactionType};
use crate::store::TransactionStore;
use chrono::NaiveDate;
use tracing::warn;

/// A small August/September 2025 ledger for trying the reports out.
pub fn sample_transactions() -> Vec<NewTransaction> {
    let rows: [(TransactionType, Option<&str>, Option<&str>, (i32, u32, u32), &str); 6] = [
        (TransactionType::SID, None, Some("500"), (2025, 8, 1), "รายได้เสริมจากงานพิเศษ"),
        (TransactionType::ESS, Some("35"), None, (2025, 8, 1), "ค่าอาหาร"),
        (TransactionType::REG, None, Some("1000"), (2025, 8, 2), "เงินเดือนประจำ"),
        (TransactionType::DIS, Some("200"), None, (2025, 8, 31), "ค่าช้อปปิ้ง"),
        (TransactionType::REG, None, Some("1000"), (2025, 9, 1), "เงินเดือนประจำ"),
        (TransactionType::OEX, Some("65"), None, (2025, 9, 30), "ค่าของขวัญ"),
    ];
    rows.into_iter()
        .filter_map(|(kind, debit, credit, (y, m, d), note)| {
            Some(NewTransaction {
                kind,
                debit_amount: debit.map(String::from),
                credit_amount: credit.map(String::from),
                transaction_date: NaiveDate::from_ymd_opt(y, m, d)?,
                notes: Some(note.to_string()),
            })
        })
        .collect()
}

/// Inserts the sample ledger; rows rejected by the store are skipped.
pub fn seed(store: &TransactionStore) -> usize {
    let mut created = 0;
    for input in sample_transactions() {
        match store.create(input) {
            Ok(_) => created += 1,
            Err(e) => warn!(error = %e, "sample row not created"),
        }
    }
    created
}
