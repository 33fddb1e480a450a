// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::receipt::{DEFAULT_WIDTH, ReceiptOptions};
use crate::report::CalendarPolicy;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Credentials and location of the remote table. There are no built-in
/// credentials; every field must come from the environment or the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn required(key: &'static str, v: Option<&String>) -> Result<String, ConfigError> {
    v.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(key))
}

impl AirtableConfig {
    pub fn new(
        api_key: Option<&String>,
        base_id: Option<&String>,
        table_name: Option<&String>,
        api_url: Option<&String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required("AIRTABLE_API_KEY", api_key)?,
            base_id: required("AIRTABLE_BASE_ID", base_id)?,
            table_name: required("AIRTABLE_TABLE_NAME", table_name)?,
            api_url: api_url
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn table_url(&self) -> String {
        format!("{}/{}/{}", self.api_url, self.base_id, self.table_name)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub receipt: ReceiptOptions,
    pub airtable: AirtableConfig,
}

impl ServerConfig {
    /// Builds the server settings from `serve` arguments. clap has already
    /// merged the environment (and `.env`) into the matches.
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self, ConfigError> {
        let bind_raw = m
            .get_one::<String>("bind")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BIND);
        let bind: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "SLIPBOOK_BIND",
            reason: format!("'{}' is not a socket address", bind_raw),
        })?;

        let calendar = match m.get_one::<String>("calendar") {
            Some(s) => s.parse::<CalendarPolicy>().map_err(|reason| ConfigError::Invalid {
                key: "SLIPBOOK_CALENDAR",
                reason,
            })?,
            None => CalendarPolicy::default(),
        };
        let currency = m
            .get_one::<String>("currency")
            .cloned()
            .unwrap_or_else(|| "THB".into());
        let width = m
            .get_one::<usize>("receipt-width")
            .copied()
            .unwrap_or(DEFAULT_WIDTH);

        let mut airtable = AirtableConfig::new(
            m.get_one::<String>("airtable-key"),
            m.get_one::<String>("airtable-base"),
            m.get_one::<String>("airtable-table"),
            m.get_one::<String>("airtable-url"),
        )?;
        if let Some(t) = m.get_one::<u64>("timeout") {
            airtable.timeout_secs = *t;
        }

        Ok(Self {
            bind,
            receipt: ReceiptOptions::new(width, currency, calendar),
            airtable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn credentials_are_required() {
        let err = AirtableConfig::new(None, Some(&s("app1")), Some(&s("T")), None).unwrap_err();
        assert_eq!(err, ConfigError::Missing("AIRTABLE_API_KEY"));
        let err = AirtableConfig::new(Some(&s("  ")), Some(&s("app1")), Some(&s("T")), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("AIRTABLE_API_KEY"));
    }

    #[test]
    fn table_url_joins_parts() {
        let cfg = AirtableConfig::new(
            Some(&s("key")),
            Some(&s("app1")),
            Some(&s("Transactions")),
            Some(&s("http://localhost:9999/v0/")),
        )
        .unwrap();
        assert_eq!(cfg.table_url(), "http://localhost:9999/v0/app1/Transactions");
        assert!(!format!("{:?}", cfg).contains("\"key\""));
    }
}
