// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use slipbook::airtable::{AirtableError, RecordFields, RecordTable, RemoteRecord};
use slipbook::models::{NewTransaction, Transaction, TransactionType};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

/// In-memory stand-in for the Airtable table.
#[derive(Default)]
pub struct FakeTable {
    pub records: Mutex<Vec<RemoteRecord>>,
    next_id: AtomicUsize,
    pub offline: AtomicBool,
    /// Creates carrying one of these notes fail.
    pub reject_notes: Mutex<HashSet<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub updated: Mutex<Vec<String>>,
}

impl FakeTable {
    pub fn with_records(records: Vec<RemoteRecord>) -> Self {
        let t = Self::default();
        t.next_id.store(records.len(), Ordering::SeqCst);
        *t.records.lock().unwrap() = records;
        t
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn unavailable(&self) -> Result<(), AirtableError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AirtableError::Status {
                status: 503,
                body: "offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordTable for FakeTable {
    async fn list(&self) -> Result<Vec<RemoteRecord>, AirtableError> {
        self.unavailable()?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, fields: &RecordFields) -> Result<RemoteRecord, AirtableError> {
        self.unavailable()?;
        if let Some(n) = &fields.notes {
            if self.reject_notes.lock().unwrap().contains(n) {
                return Err(AirtableError::Status {
                    status: 422,
                    body: "INVALID_VALUE_FOR_COLUMN".into(),
                });
            }
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let rec = RemoteRecord {
            id: format!("rec{:04}", n),
            fields: fields.clone(),
        };
        self.records.lock().unwrap().push(rec.clone());
        Ok(rec)
    }

    async fn update(&self, id: &str, fields: &RecordFields) -> Result<RemoteRecord, AirtableError> {
        self.unavailable()?;
        let mut recs = self.records.lock().unwrap();
        let rec = recs
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AirtableError::Status {
                status: 404,
                body: "NOT_FOUND".into(),
            })?;
        rec.fields = fields.clone();
        self.updated.lock().unwrap().push(id.to_string());
        Ok(rec.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AirtableError> {
        self.unavailable()?;
        self.records.lock().unwrap().retain(|r| r.id != id);
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_tx(
    kind: TransactionType,
    debit: Option<&str>,
    credit: Option<&str>,
    on: NaiveDate,
    notes: Option<&str>,
) -> NewTransaction {
    NewTransaction {
        kind,
        debit_amount: debit.map(String::from),
        credit_amount: credit.map(String::from),
        transaction_date: on,
        notes: notes.map(String::from),
    }
}

pub fn tx(kind: TransactionType, debit: Option<&str>, credit: Option<&str>, on: NaiveDate) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        kind,
        debit_amount: debit.map(String::from),
        credit_amount: credit.map(String::from),
        transaction_date: on,
        notes: None,
        created_at: Utc::now(),
        external_id: None,
    }
}

pub fn remote(id: &str, kind: &str, debit: Option<f64>, credit: Option<f64>, on: &str) -> RemoteRecord {
    RemoteRecord {
        id: id.into(),
        fields: RecordFields {
            kind: Some(kind.into()),
            debit_amount: debit,
            credit_amount: credit,
            date: Some(on.into()),
            notes: None,
        },
    }
}
