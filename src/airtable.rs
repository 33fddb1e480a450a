// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client for the Airtable table that mirrors the ledger.

use crate::config::AirtableConfig;
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::report::amount;
use crate::utils::UA;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirtableError {
    #[error("airtable request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("airtable API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("record {id} cannot be mapped: {reason}")]
    Mapping { id: String, reason: String },
}

/// Column values of one row. Amounts travel as JSON numbers. Airtable omits
/// empty cells, so every column may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordFields {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    pub fields: RecordFields,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<RemoteRecord>,
}

#[derive(Serialize)]
struct FieldsBody<'a> {
    fields: &'a RecordFields,
}

fn to_number(s: Option<&str>) -> Option<f64> {
    s.filter(|v| !v.trim().is_empty())
        .and_then(|v| amount(Some(v)).to_f64())
}

fn from_number(v: Option<f64>) -> Option<String> {
    v.and_then(|n| Decimal::try_from(n).ok())
        .map(|d| d.normalize().to_string())
}

impl RecordFields {
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            kind: Some(tx.kind.code().to_string()),
            debit_amount: to_number(tx.debit_amount.as_deref()),
            credit_amount: to_number(tx.credit_amount.as_deref()),
            date: Some(tx.transaction_date.to_string()),
            notes: tx.notes.clone(),
        }
    }
}

impl RemoteRecord {
    fn unmappable(&self, reason: impl Into<String>) -> AirtableError {
        AirtableError::Mapping {
            id: self.id.clone(),
            reason: reason.into(),
        }
    }

    /// Local create input for this row, held to the same rules as input
    /// arriving over the API.
    pub fn to_new_transaction(&self) -> Result<NewTransaction, AirtableError> {
        let kind: TransactionType = self
            .fields
            .kind
            .as_deref()
            .ok_or_else(|| self.unmappable("missing Type"))?
            .parse::<TransactionType>()
            .map_err(|reason: String| self.unmappable(reason))?;
        let date = self
            .fields
            .date
            .as_deref()
            .ok_or_else(|| self.unmappable("missing Date"))?;
        let transaction_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| self.unmappable(format!("invalid date '{}'", date)))?;
        NewTransaction {
            kind,
            debit_amount: from_number(self.fields.debit_amount),
            credit_amount: from_number(self.fields.credit_amount),
            transaction_date,
            notes: self.fields.notes.clone(),
        }
        .validate()
        .map_err(|e| self.unmappable(e.to_string()))
    }
}

/// The remote table as seen by the sync code.
#[async_trait]
pub trait RecordTable: Send + Sync {
    /// First page of records.
    async fn list(&self) -> Result<Vec<RemoteRecord>, AirtableError>;
    async fn create(&self, fields: &RecordFields) -> Result<RemoteRecord, AirtableError>;
    async fn update(&self, id: &str, fields: &RecordFields) -> Result<RemoteRecord, AirtableError>;
    async fn delete(&self, id: &str) -> Result<(), AirtableError>;
}

pub struct AirtableClient {
    http: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl AirtableClient {
    pub fn new(cfg: &AirtableConfig) -> Result<Self, AirtableError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(UA)
            .build()?;
        Ok(Self {
            http,
            table_url: cfg.table_url(),
            api_key: cfg.api_key.clone(),
        })
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, AirtableError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(AirtableError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RecordTable for AirtableClient {
    async fn list(&self) -> Result<Vec<RemoteRecord>, AirtableError> {
        let resp = self
            .http
            .get(&self.table_url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let page: ListResponse = Self::check(resp).await?.json().await?;
        Ok(page.records)
    }

    async fn create(&self, fields: &RecordFields) -> Result<RemoteRecord, AirtableError> {
        let resp = self
            .http
            .post(&self.table_url)
            .bearer_auth(&self.api_key)
            .json(&FieldsBody { fields })
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn update(&self, id: &str, fields: &RecordFields) -> Result<RemoteRecord, AirtableError> {
        let resp = self
            .http
            .patch(format!("{}/{}", self.table_url, id))
            .bearer_auth(&self.api_key)
            .json(&FieldsBody { fields })
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), AirtableError> {
        let resp = self
            .http
            .delete(format!("{}/{}", self.table_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn remote(kind: &str, date: &str, credit: Option<f64>) -> RemoteRecord {
        RemoteRecord {
            id: "recA".into(),
            fields: RecordFields {
                kind: Some(kind.into()),
                debit_amount: None,
                credit_amount: credit,
                date: Some(date.into()),
                notes: Some(String::new()),
            },
        }
    }

    #[test]
    fn remote_rows_map_to_local_input() {
        let input = remote("REG", "2025-08-02", Some(1000.0))
            .to_new_transaction()
            .unwrap();
        assert_eq!(input.kind, TransactionType::REG);
        assert_eq!(input.credit_amount.as_deref(), Some("1000"));
        assert_eq!(input.debit_amount, None);
        assert_eq!(input.notes, None);

        let half = remote("SID", "2025-08-02", Some(12.5)).to_new_transaction().unwrap();
        assert_eq!(half.credit_amount.as_deref(), Some("12.5"));
    }

    #[test]
    fn unmappable_rows_are_rejected() {
        assert!(matches!(
            remote("XXX", "2025-08-02", None).to_new_transaction(),
            Err(AirtableError::Mapping { .. })
        ));
        assert!(matches!(
            remote("REG", "02/08/2025", None).to_new_transaction(),
            Err(AirtableError::Mapping { .. })
        ));
    }

    #[test]
    fn negative_remote_amounts_are_rejected() {
        assert!(matches!(
            remote("REG", "2025-08-02", Some(-500.0)).to_new_transaction(),
            Err(AirtableError::Mapping { .. })
        ));
    }

    #[test]
    fn list_body_with_empty_cells_still_decodes() {
        let body = r#"{"records":[
            {"id":"recA","fields":{"Type":"REG","CreditAmount":1000,"Date":"2025-08-02"}},
            {"id":"recB","fields":{"Type":"ESS","DebitAmount":35}},
            {"id":"recC","fields":{}}
        ]}"#;
        let page: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.records.len(), 3);
        assert!(page.records[0].to_new_transaction().is_ok());
        for rec in &page.records[1..] {
            assert!(matches!(
                rec.to_new_transaction(),
                Err(AirtableError::Mapping { .. })
            ));
        }
    }

    #[test]
    fn local_rows_serialize_as_airtable_fields() {
        let tx = Transaction {
            id: Uuid::new_v4(),
            kind: TransactionType::ESS,
            debit_amount: Some("35.50".into()),
            credit_amount: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            notes: None,
            created_at: Utc::now(),
            external_id: None,
        };
        let v = serde_json::to_value(FieldsBody {
            fields: &RecordFields::from_transaction(&tx),
        })
        .unwrap();
        assert_eq!(
            v,
            serde_json::json!({"fields": {"Type": "ESS", "DebitAmount": 35.5, "Date": "2025-08-01"}})
        );
    }
}
