// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LoanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanCategory {
    Personal,
    Business,
    Emergency,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 3] = [
        LoanCategory::Personal,
        LoanCategory::Business,
        LoanCategory::Emergency,
    ];

    /// Base annual rate before any long-term surcharge.
    pub fn base_rate(self) -> Decimal {
        match self {
            LoanCategory::Personal => Decimal::new(20, 2),
            LoanCategory::Business => Decimal::new(18, 2),
            LoanCategory::Emergency => Decimal::new(25, 2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoanCategory::Personal => "personal",
            LoanCategory::Business => "business",
            LoanCategory::Emergency => "emergency",
        }
    }
}

impl fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanCategory {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(LoanCategory::Personal),
            "business" => Ok(LoanCategory::Business),
            "emergency" => Ok(LoanCategory::Emergency),
            _ => Err(LoanError::InvalidCategory(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_decided(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Outcome handed to `lifecycle::decide` by whatever policy makes the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn status(self) -> ApplicationStatus {
        match self {
            Decision::Approved => ApplicationStatus::Approved,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "approved" => Ok(Decision::Approved),
            "reject" | "rejected" => Ok(Decision::Rejected),
            other => Err(format!("unknown decision '{}' (use approve|reject)", other)),
        }
    }
}

/// Output of the loan terms calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub interest_rate: Decimal,
    pub interest_amount: Decimal,
    pub total_amount: Decimal,
    pub periodic_payment: Decimal,
}

/// Raw applicant input for `lifecycle::submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub applicant: String,
    pub principal: Decimal,
    pub category: LoanCategory,
    pub period: u32,
    pub purpose: String,
    pub collateral: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub applicant: String,
    pub principal: Decimal,
    pub category: LoanCategory,
    pub period: u32,
    pub purpose: String,
    pub collateral: String,
    pub interest_amount: Decimal,
    pub total_amount: Decimal,
    pub periodic_payment: Decimal,
    pub status: ApplicationStatus,
    pub paid_amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl LoanApplication {
    pub fn outstanding(&self) -> Decimal {
        (self.total_amount - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.paid_amount == self.total_amount
    }

    /// Amount of the next installment: one periodic payment, capped at what is still owed.
    pub fn next_installment(&self) -> Decimal {
        self.periodic_payment.min(self.outstanding())
    }

    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Partial update handed to the persistence layer. `expected_*` fields guard the write:
/// the update only applies when the stored row still carries those values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub expected_status: ApplicationStatus,
    pub expected_paid: Decimal,
    pub status: Option<ApplicationStatus>,
    pub decided_at: Option<DateTime<Utc>>,
    pub paid_amount: Option<Decimal>,
}

impl ApplicationPatch {
    /// Patch that moves `before` to `after`, touching only the mutable fields that changed.
    pub fn between(before: &LoanApplication, after: &LoanApplication) -> Self {
        Self {
            expected_status: before.status,
            expected_paid: before.paid_amount,
            status: (before.status != after.status).then_some(after.status),
            decided_at: if before.decided_at != after.decided_at {
                after.decided_at
            } else {
                None
            },
            paid_amount: (before.paid_amount != after.paid_amount).then_some(after.paid_amount),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.decided_at.is_none() && self.paid_amount.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub recipient: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}
