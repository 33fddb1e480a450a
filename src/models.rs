// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category code attached to every transaction.
///
/// Income codes come first, expense codes after; the order is also the order
/// used when printing per-type counts on receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    REG,
    SID,
    INV,
    OIC,
    TEX,
    ESS,
    DIS,
    DEB,
    SAV,
    OEX,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub code: TransactionType,
    pub name_en: &'static str,
    pub name_th: &'static str,
    pub is_income: bool,
    pub taxable: bool,
    pub color: &'static str,
}

impl TransactionType {
    pub const ALL: [TransactionType; 10] = [
        TransactionType::REG,
        TransactionType::SID,
        TransactionType::INV,
        TransactionType::OIC,
        TransactionType::TEX,
        TransactionType::ESS,
        TransactionType::DIS,
        TransactionType::DEB,
        TransactionType::SAV,
        TransactionType::OEX,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TransactionType::REG => "REG",
            TransactionType::SID => "SID",
            TransactionType::INV => "INV",
            TransactionType::OIC => "OIC",
            TransactionType::TEX => "TEX",
            TransactionType::ESS => "ESS",
            TransactionType::DIS => "DIS",
            TransactionType::DEB => "DEB",
            TransactionType::SAV => "SAV",
            TransactionType::OEX => "OEX",
        }
    }

    pub fn info(self) -> TypeInfo {
        let (name_en, name_th, is_income, taxable, color) = match self {
            TransactionType::REG => (
                "Regular Income",
                "รายได้ประจำ (เงินเดือน, ค่าจ้าง, โบนัส)",
                true,
                true,
                "green",
            ),
            TransactionType::SID => ("Side Income", "รายได้เสริม / งานพิเศษ", true, true, "green"),
            TransactionType::INV => (
                "Investment Income",
                "รายได้จากการลงทุน (หุ้น, ดอกเบี้ย, ปันผล)",
                true,
                true,
                "blue",
            ),
            TransactionType::OIC => (
                "Other Income",
                "รายได้อื่น ๆ (ของขวัญ, ขายทรัพย์สิน)",
                true,
                true,
                "purple",
            ),
            TransactionType::TEX => (
                "Tax-Exempt Income",
                "รายได้ที่ได้รับการยกเว้นภาษี",
                true,
                false,
                "gray",
            ),
            TransactionType::ESS => (
                "Essential",
                "ค่าใช้จ่ายจำเป็น (อาหาร, ที่พัก, ค่าน้ำไฟ)",
                false,
                false,
                "red",
            ),
            TransactionType::DIS => (
                "Discretionary",
                "ค่าใช้จ่ายไม่จำเป็น (ช้อปปิ้ง, ท่องเที่ยว)",
                false,
                false,
                "orange",
            ),
            TransactionType::DEB => ("Debt", "ชำระหนี้ / สินเชื่อ", false, false, "red"),
            TransactionType::SAV => (
                "Savings / Investment",
                "การออมเงิน / การลงทุน",
                false,
                false,
                "blue",
            ),
            TransactionType::OEX => (
                "Other Expense",
                "รายจ่ายอื่น ๆ (ของขวัญ, บริจาค, ค่าปรับ)",
                false,
                false,
                "gray",
            ),
        };
        TypeInfo {
            code: self,
            name_en,
            name_th,
            is_income,
            taxable,
            color,
        }
    }

    pub fn is_income(self) -> bool {
        self.info().is_income
    }

    pub fn is_taxable(self) -> bool {
        self.info().taxable
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let up = s.trim().to_uppercase();
        TransactionType::ALL
            .into_iter()
            .find(|t| t.code() == up)
            .ok_or_else(|| format!("Unknown transaction type '{}'", s))
    }
}

/// One ledger entry as held by the store and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub debit_amount: Option<String>,
    pub credit_amount: Option<String>,
    pub transaction_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub external_id: Option<String>,
}

/// Create input: a transaction minus the server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub debit_amount: Option<String>,
    #[serde(default)]
    pub credit_amount: Option<String>,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl TransactionPatch {
    pub fn link(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            ..Default::default()
        }
    }

    /// True when the patch changes anything besides the remote link.
    pub fn touches_content(&self) -> bool {
        self.kind.is_some()
            || self.debit_amount.is_some()
            || self.credit_amount.is_some()
            || self.transaction_date.is_some()
            || self.notes.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn check_amount(field: &'static str, v: Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(s) = blank_to_none(v) else {
        return Ok(None);
    };
    let d = s.parse::<Decimal>().map_err(|_| ValidationError {
        field,
        reason: format!("'{}' is not a decimal amount", s),
    })?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(ValidationError {
            field,
            reason: format!("'{}' must not be negative", s),
        });
    }
    Ok(Some(s))
}

impl NewTransaction {
    /// Normalizes blank strings to absent and rejects malformed amounts.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            kind: self.kind,
            debit_amount: check_amount("debitAmount", self.debit_amount)?,
            credit_amount: check_amount("creditAmount", self.credit_amount)?,
            transaction_date: self.transaction_date,
            notes: blank_to_none(self.notes),
        })
    }
}

impl TransactionPatch {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            kind: self.kind,
            debit_amount: check_amount("debitAmount", self.debit_amount)?,
            credit_amount: check_amount("creditAmount", self.credit_amount)?,
            transaction_date: self.transaction_date,
            notes: blank_to_none(self.notes),
            external_id: blank_to_none(self.external_id),
        })
    }
}
