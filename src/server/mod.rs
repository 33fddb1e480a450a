// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod error;
pub mod handlers;
mod routes;

use crate::airtable::{AirtableClient, RecordTable};
use crate::config::ServerConfig;
use crate::receipt::ReceiptOptions;
use crate::store::TransactionStore;
use crate::sync::SyncAdapter;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tracing::info;

/// Shared by every handler. Cloning is cheap; all members are handles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TransactionStore>,
    pub sync: SyncAdapter,
    pub receipt: Arc<ReceiptOptions>,
}

impl AppState {
    pub fn new(
        store: Arc<TransactionStore>,
        table: Arc<dyn RecordTable>,
        receipt: ReceiptOptions,
    ) -> Self {
        Self {
            sync: SyncAdapter::new(store.clone(), table),
            store,
            receipt: Arc::new(receipt),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(routes::api_routes())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

pub async fn run_server(cfg: ServerConfig) -> Result<()> {
    let table = AirtableClient::new(&cfg.airtable).context("Failed to build Airtable client")?;
    info!(table = %table.table_url(), "airtable sync target");
    info!(calendar = %cfg.receipt.calendar, currency = %cfg.receipt.currency, width = cfg.receipt.width(), "receipt settings");

    let state = AppState::new(Arc::new(TransactionStore::new()), Arc::new(table), cfg.receipt);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.bind))?;
    info!(addr = %cfg.bind, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
