// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::server::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            patch(handlers::update_transaction).delete(handlers::delete_transaction),
        )
        .route("/transaction-types", get(handlers::transaction_types))
        .route("/reports/monthly/:year/:month", get(handlers::monthly_report))
        .route("/reports/yearly/:year", get(handlers::yearly_report))
        .route("/reports/thermal/:year/:month", get(handlers::thermal_receipt))
        .route(
            "/reports/thermal-yearly/:year",
            get(handlers::thermal_yearly_receipt),
        )
        .route("/sync/pull", post(handlers::sync_pull))
        .route("/sync/push", post(handlers::sync_push))
        .route("/sample-data", post(handlers::seed_sample_data))
}
