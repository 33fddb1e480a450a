// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pull/push between the local store and the remote table.
//!
//! Both directions walk the records one at a time. A record that fails is
//! logged and counted, and the loop moves on; nothing is retried within a
//! pass. Unlinked local rows stay eligible for the next push.
//!
//! Pulls, pushes and single-row links take one shared gate, so a row is never
//! created remotely twice by overlapping requests.

use crate::airtable::{AirtableError, RecordFields, RecordTable};
use crate::models::{Transaction, TransactionPatch};
use crate::store::{StoreError, TransactionStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] AirtableError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What `pull` does with rows the store already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PullPolicy {
    /// Import only remote rows whose id is not linked to a local row yet.
    #[default]
    SkipExisting,
    /// Drop every local row, then import the remote set.
    Replace,
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullPolicy::SkipExisting => f.write_str("skip-existing"),
            PullPolicy::Replace => f.write_str("replace"),
        }
    }
}

impl FromStr for PullPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip-existing" | "skip" | "merge" => Ok(PullPolicy::SkipExisting),
            "replace" => Ok(PullPolicy::Replace),
            other => Err(format!(
                "Unknown pull policy '{}', expected skip-existing|replace",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub message: String,
    pub report: SyncReport,
}

#[derive(Clone)]
pub struct SyncAdapter {
    store: Arc<TransactionStore>,
    table: Arc<dyn RecordTable>,
    gate: Arc<Mutex<()>>,
}

impl SyncAdapter {
    pub fn new(store: Arc<TransactionStore>, table: Arc<dyn RecordTable>) -> Self {
        Self {
            store,
            table,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Remote → local. Fails only when the record list itself cannot be
    /// fetched, in which case the store is untouched.
    pub async fn pull(&self, policy: PullPolicy) -> Result<SyncOutcome, SyncError> {
        let _gate = self.gate.lock().await;
        let records = self.table.list().await?;
        info!(count = records.len(), %policy, "fetched remote records");

        if policy == PullPolicy::Replace {
            let removed = self.store.clear();
            info!(removed, "cleared local store before replace");
        }

        let mut report = SyncReport::default();
        for rec in &records {
            if policy == PullPolicy::SkipExisting && self.store.is_linked(&rec.id) {
                report.skipped += 1;
                continue;
            }
            match rec.to_new_transaction() {
                Ok(input) => {
                    let tx = self.store.import(input, rec.id.clone());
                    debug!(id = %tx.id, external_id = %rec.id, "imported remote record");
                    report.processed += 1;
                }
                Err(e) => {
                    warn!(external_id = %rec.id, error = %e, "skipping remote record");
                    report.failed += 1;
                }
            }
        }

        info!(?report, "pull finished");
        Ok(SyncOutcome {
            message: format!(
                "Pulled {} record(s) from Airtable ({} already linked, {} failed)",
                report.processed, report.skipped, report.failed
            ),
            report,
        })
    }

    /// Local → remote for every row without an external id.
    pub async fn push(&self) -> SyncOutcome {
        let _gate = self.gate.lock().await;
        let pending = self.store.unsynced();
        if pending.is_empty() {
            return SyncOutcome {
                message: "No new transactions to push to Airtable".into(),
                report: SyncReport::default(),
            };
        }

        let mut report = SyncReport::default();
        for tx in &pending {
            match self.link_remote(tx).await {
                Ok(linked) => {
                    debug!(id = %linked.id, external_id = ?linked.external_id, "pushed");
                    report.processed += 1;
                }
                Err(e) => {
                    warn!(id = %tx.id, error = %e, "failed to push transaction");
                    report.failed += 1;
                }
            }
        }

        info!(?report, "push finished");
        let message = if report.processed > 0 {
            format!(
                "Pushed {} transaction(s) to Airtable ({} failed)",
                report.processed, report.failed
            )
        } else {
            "Could not push any transactions to Airtable".to_string()
        };
        SyncOutcome { message, report }
    }

    /// Creates the remote row for `tx` and links it locally. A row that got
    /// linked in the meantime is returned as stored.
    pub async fn push_one(&self, tx: &Transaction) -> Result<Transaction, SyncError> {
        let _gate = self.gate.lock().await;
        let current = self
            .store
            .get(tx.id)
            .ok_or(StoreError::NotFound(tx.id))?;
        if current.external_id.is_some() {
            return Ok(current);
        }
        self.link_remote(&current).await
    }

    // Caller holds the gate.
    async fn link_remote(&self, tx: &Transaction) -> Result<Transaction, SyncError> {
        let remote = self
            .table
            .create(&RecordFields::from_transaction(tx))
            .await?;
        Ok(self.store.update(tx.id, TransactionPatch::link(remote.id))?)
    }

    /// Best-effort mirror of a fresh local row. Returns the linked row, or the
    /// row as given when the remote side failed.
    pub async fn mirror_created(&self, tx: Transaction) -> Transaction {
        match self.push_one(&tx).await {
            Ok(linked) => linked,
            Err(e) => {
                warn!(id = %tx.id, error = %e, "auto-sync to Airtable failed; row stays unsynced");
                tx
            }
        }
    }

    /// Best-effort mirror of a local edit.
    pub async fn mirror_updated(&self, tx: Transaction) -> Transaction {
        let Some(ext) = tx.external_id.clone() else {
            return self.mirror_created(tx).await;
        };
        if let Err(e) = self
            .table
            .update(&ext, &RecordFields::from_transaction(&tx))
            .await
        {
            warn!(id = %tx.id, external_id = %ext, error = %e, "remote update failed");
        }
        tx
    }

    /// Best-effort removal of the remote twin of a deleted local row.
    pub async fn mirror_deleted(&self, tx: &Transaction) {
        let Some(ext) = tx.external_id.as_deref() else {
            return;
        };
        if let Err(e) = self.table.delete(ext).await {
            warn!(id = %tx.id, external_id = %ext, error = %e, "remote delete failed");
        }
    }
}
