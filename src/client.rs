// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for a running `slipbook serve`, used by the CLI commands.

use crate::models::{NewTransaction, Transaction};
use crate::report::{ReportData, YearlyReportData};
use crate::server::handlers::{SeedResponse, ThermalResponse};
use crate::sync::{PullPolicy, SyncOutcome};
use crate::utils::http_client;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn send(&self, req: RequestBuilder) -> Result<reqwest::blocking::Response> {
        let resp = req
            .send()
            .with_context(|| format!("Could not reach slipbook server at {}", self.base))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().unwrap_or_default();
        let msg = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);
        Err(anyhow!("Server returned {}: {}", status, msg))
    }

    fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = self.send(req)?;
        resp.json::<T>().context("Unexpected response body")
    }

    pub fn list_transactions(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(s) = start {
            query.push(("start", s.to_string()));
        }
        if let Some(e) = end {
            query.push(("end", e.to_string()));
        }
        self.json(self.http.get(self.url("/transactions")).query(&query))
    }

    pub fn create_transaction(&self, input: &NewTransaction) -> Result<Transaction> {
        self.json(self.http.post(self.url("/transactions")).json(input))
    }

    pub fn delete_transaction(&self, id: Uuid) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("/transactions/{}", id))))?;
        Ok(())
    }

    pub fn monthly_report(&self, year: i32, month: u32) -> Result<ReportData> {
        self.json(
            self.http
                .get(self.url(&format!("/reports/monthly/{}/{}", year, month))),
        )
    }

    pub fn yearly_report(&self, year: i32) -> Result<YearlyReportData> {
        self.json(self.http.get(self.url(&format!("/reports/yearly/{}", year))))
    }

    pub fn thermal(&self, year: i32, month: u32) -> Result<ThermalResponse<ReportData>> {
        self.json(
            self.http
                .get(self.url(&format!("/reports/thermal/{}/{}", year, month))),
        )
    }

    pub fn thermal_yearly(&self, year: i32) -> Result<ThermalResponse<YearlyReportData>> {
        self.json(
            self.http
                .get(self.url(&format!("/reports/thermal-yearly/{}", year))),
        )
    }

    pub fn pull(&self, policy: PullPolicy) -> Result<SyncOutcome> {
        self.json(
            self.http
                .post(self.url("/sync/pull"))
                .query(&[("policy", policy.to_string())]),
        )
    }

    pub fn push(&self) -> Result<SyncOutcome> {
        self.json(self.http.post(self.url("/sync/push")))
    }

    pub fn seed(&self) -> Result<SeedResponse> {
        self.json(self.http.post(self.url("/sample-data")))
    }
}
