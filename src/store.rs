// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory transaction store.
//!
//! Nothing here survives a restart. The map sits behind a `std::sync::Mutex`;
//! no method holds the guard across an `.await`, so the store can be shared
//! through an `Arc` with the axum handlers.

use crate::models::{NewTransaction, Transaction, TransactionPatch};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

/// Two identical submissions closer together than this are treated as an
/// accidental double submit.
pub const DUPLICATE_WINDOW_SECS: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate transaction detected within {} seconds", DUPLICATE_WINDOW_SECS)]
    Duplicate,

    #[error("transaction with id {0} not found")]
    NotFound(Uuid),
}

#[derive(Debug, Default)]
pub struct TransactionStore {
    inner: Mutex<HashMap<Uuid, Transaction>>,
}

fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.transaction_date
        .cmp(&a.transaction_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Transaction>> {
        // Every mutation is a single insert/remove; a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All transactions, newest `transaction_date` first.
    pub fn list(&self) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = self.lock().values().cloned().collect();
        out.sort_by(newest_first);
        out
    }

    /// Transactions dated within `start..=end`, newest first.
    pub fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = self
            .lock()
            .values()
            .filter(|t| t.transaction_date >= start && t.transaction_date <= end)
            .cloned()
            .collect();
        out.sort_by(newest_first);
        out
    }

    pub fn get(&self, id: Uuid) -> Option<Transaction> {
        self.lock().get(&id).cloned()
    }

    pub fn unsynced(&self) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = self
            .lock()
            .values()
            .filter(|t| t.external_id.is_none())
            .cloned()
            .collect();
        out.sort_by(newest_first);
        out
    }

    pub fn is_linked(&self, external_id: &str) -> bool {
        self.lock()
            .values()
            .any(|t| t.external_id.as_deref() == Some(external_id))
    }

    pub fn create(&self, input: NewTransaction) -> Result<Transaction, StoreError> {
        self.create_at(input, Utc::now())
    }

    /// Same as [`TransactionStore::create`] with an explicit clock reading.
    pub fn create_at(
        &self,
        input: NewTransaction,
        now: DateTime<Utc>,
    ) -> Result<Transaction, StoreError> {
        let window = Duration::seconds(DUPLICATE_WINDOW_SECS);
        let mut map = self.lock();
        let dup = map.values().any(|t| {
            t.kind == input.kind
                && t.debit_amount == input.debit_amount
                && t.credit_amount == input.credit_amount
                && t.transaction_date == input.transaction_date
                && t.notes == input.notes
                && now - t.created_at < window
        });
        if dup {
            return Err(StoreError::Duplicate);
        }
        let tx = Transaction {
            id: Uuid::new_v4(),
            kind: input.kind,
            debit_amount: input.debit_amount,
            credit_amount: input.credit_amount,
            transaction_date: input.transaction_date,
            notes: input.notes,
            created_at: now,
            external_id: None,
        };
        map.insert(tx.id, tx.clone());
        Ok(tx)
    }

    /// Inserts a record that already exists remotely. The duplicate window does
    /// not apply; the remote id is the identity.
    pub fn import(&self, input: NewTransaction, external_id: String) -> Transaction {
        let tx = Transaction {
            id: Uuid::new_v4(),
            kind: input.kind,
            debit_amount: input.debit_amount,
            credit_amount: input.credit_amount,
            transaction_date: input.transaction_date,
            notes: input.notes,
            created_at: Utc::now(),
            external_id: Some(external_id),
        };
        self.lock().insert(tx.id, tx.clone());
        tx
    }

    pub fn update(&self, id: Uuid, patch: TransactionPatch) -> Result<Transaction, StoreError> {
        let mut map = self.lock();
        let tx = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(kind) = patch.kind {
            tx.kind = kind;
        }
        if let Some(v) = patch.debit_amount {
            tx.debit_amount = Some(v);
        }
        if let Some(v) = patch.credit_amount {
            tx.credit_amount = Some(v);
        }
        if let Some(d) = patch.transaction_date {
            tx.transaction_date = d;
        }
        if let Some(n) = patch.notes {
            tx.notes = Some(n);
        }
        if let Some(ext) = patch.external_id {
            tx.external_id = Some(ext);
        }
        Ok(tx.clone())
    }

    /// Returns the removed transaction, `None` if `id` was unknown.
    pub fn delete(&self, id: Uuid) -> Option<Transaction> {
        self.lock().remove(&id)
    }

    pub fn clear(&self) -> usize {
        let mut map = self.lock();
        let n = map.len();
        map.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    fn food(date: (i32, u32, u32)) -> NewTransaction {
        NewTransaction {
            kind: TransactionType::ESS,
            debit_amount: Some("35".into()),
            credit_amount: None,
            transaction_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            notes: Some("lunch".into()),
        }
    }

    #[test]
    fn duplicate_window_is_five_seconds() {
        let store = TransactionStore::new();
        let t0 = Utc::now();
        store.create_at(food((2025, 8, 1)), t0).unwrap();
        let err = store
            .create_at(food((2025, 8, 1)), t0 + Duration::milliseconds(4_999))
            .unwrap_err();
        assert_eq!(err, StoreError::Duplicate);
        store
            .create_at(food((2025, 8, 1)), t0 + Duration::seconds(5))
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn differing_notes_are_not_duplicates() {
        let store = TransactionStore::new();
        let t0 = Utc::now();
        store.create_at(food((2025, 8, 1)), t0).unwrap();
        let mut other = food((2025, 8, 1));
        other.notes = Some("dinner".into());
        store.create_at(other, t0).unwrap();
    }

    #[test]
    fn list_is_newest_first() {
        let store = TransactionStore::new();
        store.create(food((2025, 8, 1))).unwrap();
        store.create(food((2025, 9, 30))).unwrap();
        store.create(food((2025, 8, 15))).unwrap();
        let dates: Vec<String> = store
            .list()
            .iter()
            .map(|t| t.transaction_date.to_string())
            .collect();
        assert_eq!(dates, ["2025-09-30", "2025-08-15", "2025-08-01"]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let store = TransactionStore::new();
        store.create(food((2025, 8, 1))).unwrap();
        store.create(food((2025, 8, 31))).unwrap();
        store.create(food((2025, 9, 1))).unwrap();
        let aug = store.list_by_date_range(
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        );
        assert_eq!(aug.len(), 2);
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let store = TransactionStore::new();
        let ghost = Uuid::new_v4();
        assert_eq!(
            store.update(ghost, TransactionPatch::link("rec1")).unwrap_err(),
            StoreError::NotFound(ghost)
        );
        assert!(store.delete(ghost).is_none());

        let tx = store.create(food((2025, 8, 1))).unwrap();
        let linked = store.update(tx.id, TransactionPatch::link("rec1")).unwrap();
        assert_eq!(linked.external_id.as_deref(), Some("rec1"));
        assert_eq!(linked.created_at, tx.created_at);
        assert!(store.is_linked("rec1"));
        assert!(store.unsynced().is_empty());
        assert!(store.delete(tx.id).is_some());
        assert!(store.is_empty());
    }
}
