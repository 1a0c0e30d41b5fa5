// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state machine.
//!
//! Every function takes a snapshot and returns a new one; nothing is mutated in place and
//! nothing is persisted here. Status moves Pending -> Approved | Rejected exactly once, and
//! `paid_amount` only grows while Approved, never past `total_amount`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::calculator::compute_terms;
use crate::error::{FieldError, LoanError};
use crate::models::{ApplicationStatus, Decision, LoanApplication, LoanRequest};

pub const MIN_PRINCIPAL: i64 = 5_000;
pub const MAX_PRINCIPAL: i64 = 100_000;
pub const MIN_PERIOD: u32 = 1;
pub const MAX_PERIOD: u32 = 12;

/// Something a notifier may want to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LifecycleEvent {
    #[serde(rename_all = "camelCase")]
    Submitted {
        id: Option<Uuid>,
        applicant: String,
        principal: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Decided {
        id: Option<Uuid>,
        applicant: String,
        outcome: Decision,
        at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Repaid {
        id: Option<Uuid>,
        applicant: String,
        amount: Decimal,
        paid_amount: Decimal,
        outstanding: Decimal,
        settled: bool,
    },
}

impl LifecycleEvent {
    pub fn submitted(app: &LoanApplication) -> Self {
        LifecycleEvent::Submitted {
            id: app.id,
            applicant: app.applicant.clone(),
            principal: app.principal,
        }
    }

    pub fn decided(app: &LoanApplication, outcome: Decision) -> Self {
        LifecycleEvent::Decided {
            id: app.id,
            applicant: app.applicant.clone(),
            outcome,
            at: app.decided_at.unwrap_or(app.created_at),
        }
    }

    pub fn repaid(app: &LoanApplication, amount: Decimal) -> Self {
        LifecycleEvent::Repaid {
            id: app.id,
            applicant: app.applicant.clone(),
            amount,
            paid_amount: app.paid_amount,
            outstanding: app.outstanding(),
            settled: app.is_settled(),
        }
    }

    pub fn applicant(&self) -> &str {
        match self {
            LifecycleEvent::Submitted { applicant, .. }
            | LifecycleEvent::Decided { applicant, .. }
            | LifecycleEvent::Repaid { applicant, .. } => applicant,
        }
    }

    /// Short message suitable for an applicant's inbox.
    pub fn message(&self) -> String {
        let short = |id: &Option<Uuid>| {
            id.map(|u| u.simple().to_string()[..8].to_string())
                .unwrap_or_else(|| "-".into())
        };
        match self {
            LifecycleEvent::Submitted { id, principal, .. } => format!(
                "Application {} for {} received and pending review",
                short(id),
                principal.round_dp(2)
            ),
            LifecycleEvent::Decided { id, outcome, .. } => {
                format!("Application {} has been {}", short(id), outcome)
            }
            LifecycleEvent::Repaid {
                id,
                amount,
                outstanding,
                settled,
                ..
            } => {
                if *settled {
                    format!(
                        "Payment of {} received; loan {} is fully repaid",
                        amount.round_dp(2),
                        short(id)
                    )
                } else {
                    format!(
                        "Payment of {} received for loan {}; {} outstanding",
                        amount.round_dp(2),
                        short(id),
                        outstanding.round_dp(2)
                    )
                }
            }
        }
    }
}

pub fn submit(request: LoanRequest) -> Result<LoanApplication, LoanError> {
    submit_at(request, Utc::now())
}

pub fn submit_at(request: LoanRequest, now: DateTime<Utc>) -> Result<LoanApplication, LoanError> {
    let errors = validate(&request);
    if !errors.is_empty() {
        return Err(LoanError::Validation(errors));
    }

    let terms = compute_terms(request.principal, request.period, request.category)?;

    Ok(LoanApplication {
        id: None,
        applicant: request.applicant.trim().to_string(),
        principal: request.principal,
        category: request.category,
        period: request.period,
        purpose: request.purpose.trim().to_string(),
        collateral: request.collateral.trim().to_string(),
        interest_amount: terms.interest_amount,
        total_amount: terms.total_amount,
        periodic_payment: terms.periodic_payment,
        status: ApplicationStatus::Pending,
        paid_amount: Decimal::ZERO,
        created_at: now,
        decided_at: None,
    })
}

/// Every field that fails submission policy, in form order.
pub fn validate(request: &LoanRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.applicant.trim().is_empty() {
        errors.push(FieldError::new("applicant", "must not be empty"));
    }
    let (min, max) = (Decimal::from(MIN_PRINCIPAL), Decimal::from(MAX_PRINCIPAL));
    if request.principal < min || request.principal > max {
        errors.push(FieldError::new(
            "principal",
            format!("must be between {} and {}", min, max),
        ));
    }
    if request.period < MIN_PERIOD || request.period > MAX_PERIOD {
        errors.push(FieldError::new(
            "period",
            format!("must be between {} and {} months", MIN_PERIOD, MAX_PERIOD),
        ));
    }
    if request.purpose.trim().is_empty() {
        errors.push(FieldError::new("purpose", "must not be empty"));
    }
    if request.collateral.trim().is_empty() {
        errors.push(FieldError::new("collateral", "must not be empty"));
    }
    errors
}

pub fn decide(
    application: &LoanApplication,
    outcome: Decision,
) -> Result<LoanApplication, LoanError> {
    decide_at(application, outcome, Utc::now())
}

pub fn decide_at(
    application: &LoanApplication,
    outcome: Decision,
    now: DateTime<Utc>,
) -> Result<LoanApplication, LoanError> {
    if application.status.is_decided() {
        return Err(LoanError::InvalidTransition {
            from: application.status,
            to: outcome.status(),
        });
    }
    let mut next = application.clone();
    next.status = outcome.status();
    next.decided_at = Some(now.max(application.created_at));
    Ok(next)
}

pub fn record_repayment(
    application: &LoanApplication,
    amount: Decimal,
) -> Result<LoanApplication, LoanError> {
    if application.status != ApplicationStatus::Approved {
        return Err(LoanError::InvalidState {
            operation: "record a repayment",
            status: application.status,
        });
    }
    if amount <= Decimal::ZERO {
        return Err(LoanError::InvalidAmount(amount));
    }
    let paid_amount = application
        .paid_amount
        .checked_add(amount)
        .filter(|paid| *paid <= application.total_amount)
        .ok_or_else(|| LoanError::Overpayment {
            amount,
            outstanding: application.outstanding(),
        })?;
    let mut next = application.clone();
    next.paid_amount = paid_amount;
    Ok(next)
}

/// Result of deciding one record inside a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub id: Option<Uuid>,
    pub result: Result<LoanApplication, LoanError>,
}

/// Decides each application independently; a failure on one record leaves its siblings alone.
pub fn decide_batch<F>(
    applications: &[LoanApplication],
    now: DateTime<Utc>,
    mut outcome_for: F,
) -> Vec<BatchItem>
where
    F: FnMut(&LoanApplication) -> Decision,
{
    applications
        .iter()
        .map(|app| BatchItem {
            id: app.id,
            result: decide_at(app, outcome_for(app), now),
        })
        .collect()
}
