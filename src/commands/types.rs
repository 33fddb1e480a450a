// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle() -> Result<()> {
    let rows: Vec<Vec<String>> = TransactionType::ALL
        .iter()
        .map(|t| {
            let info = t.info();
            vec![
                t.code().to_string(),
                info.name_en.to_string(),
                info.name_th.to_string(),
                if info.is_income { "income" } else { "expense" }.to_string(),
                if info.taxable { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Code", "Name", "ชื่อ", "Side", "Taxable"], rows)
    );
    Ok(())
}
