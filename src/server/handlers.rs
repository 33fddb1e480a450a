// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType, TypeInfo};
use crate::receipt::{monthly_receipt, yearly_receipt};
use crate::report::{ReportData, YearlyReportData, aggregate_month, aggregate_year};
use crate::sample;
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::sync::{PullPolicy, SyncOutcome};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullQuery {
    pub policy: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalResponse<T> {
    pub receipt: String,
    pub report_data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    pub created: usize,
}

fn check_month(month: u32) -> Result<(), ApiError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "invalid month {}, expected 1-12",
            month
        )))
    }
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let Query(range) = query?;
    let rows = match (range.start, range.end) {
        (None, None) => state.store.list(),
        (start, end) => {
            let start = start.unwrap_or(NaiveDate::MIN);
            let end = end.unwrap_or(NaiveDate::MAX);
            if start > end {
                return Err(ApiError::Validation(format!(
                    "start {} is after end {}",
                    start, end
                )));
            }
            state.store.list_by_date_range(start, end)
        }
    };
    Ok(Json(rows))
}

/// Saves locally first; the Airtable copy is attempted afterwards and its
/// failure only leaves the row unsynced.
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let tx = state.store.create(input)?;
    info!(id = %tx.id, kind = %tx.kind, date = %tx.transaction_date, "transaction created");
    let tx = state.sync.mirror_created(tx).await;
    Ok((StatusCode::CREATED, Json(tx)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransactionPatch>, JsonRejection>,
) -> Result<Json<Transaction>, ApiError> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    let patch = patch.validate()?;
    let mirror = patch.touches_content();
    let tx = state.store.update(id, patch)?;
    info!(id = %tx.id, "transaction updated");
    if !mirror {
        return Ok(Json(tx));
    }
    Ok(Json(state.sync.mirror_updated(tx).await))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let tx = state
        .store
        .delete(id)
        .ok_or_else(|| ApiError::NotFound(format!("transaction with id {} not found", id)))?;
    info!(id = %tx.id, "transaction deleted");
    state.sync.mirror_deleted(&tx).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transaction_types() -> Json<Vec<TypeInfo>> {
    Json(TransactionType::ALL.iter().map(|t| t.info()).collect())
}

pub async fn monthly_report(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Json<ReportData>, ApiError> {
    let Path((year, month)) = path?;
    check_month(month)?;
    let rows = state.store.list();
    Ok(Json(aggregate_month(&rows, month, year, state.receipt.calendar)))
}

pub async fn yearly_report(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<YearlyReportData>, ApiError> {
    let Path(year) = path?;
    let rows = state.store.list();
    Ok(Json(aggregate_year(&rows, year, state.receipt.calendar)))
}

pub async fn thermal_receipt(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Json<ThermalResponse<ReportData>>, ApiError> {
    let Path((year, month)) = path?;
    check_month(month)?;
    let rows = state.store.list();
    let report = aggregate_month(&rows, month, year, state.receipt.calendar);
    Ok(Json(ThermalResponse {
        receipt: monthly_receipt(&report, &state.receipt),
        report_data: report,
    }))
}

pub async fn thermal_yearly_receipt(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ThermalResponse<YearlyReportData>>, ApiError> {
    let Path(year) = path?;
    let rows = state.store.list();
    let report = aggregate_year(&rows, year, state.receipt.calendar);
    Ok(Json(ThermalResponse {
        receipt: yearly_receipt(&report, &state.receipt),
        report_data: report,
    }))
}

pub async fn sync_pull(
    State(state): State<AppState>,
    query: Result<Query<PullQuery>, QueryRejection>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let Query(q) = query?;
    let policy = match q.policy.as_deref() {
        Some(p) => p.parse::<PullPolicy>().map_err(ApiError::Validation)?,
        None => PullPolicy::default(),
    };
    Ok(Json(state.sync.pull(policy).await?))
}

pub async fn sync_push(State(state): State<AppState>) -> Json<SyncOutcome> {
    Json(state.sync.push().await)
}

pub async fn seed_sample_data(State(state): State<AppState>) -> Json<SeedResponse> {
    let created = sample::seed(&state.store);
    Json(SeedResponse {
        message: format!("Created {} sample transaction(s)", created),
        created,
    })
}
