// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::ApplicationStatus;

/// A single field that failed submission checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the loan terms calculator and the application lifecycle.
#[derive(Debug, Error, PartialEq)]
pub enum LoanError {
    #[error("Application is invalid: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Application is already {from}; it cannot become {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Cannot {operation} while the application is {status}")]
    InvalidState {
        operation: &'static str,
        status: ApplicationStatus,
    },

    #[error("Amount must be greater than zero (got {0})")]
    InvalidAmount(Decimal),

    #[error("Payment of {amount} exceeds the outstanding balance of {outstanding}")]
    Overpayment { amount: Decimal, outstanding: Decimal },

    #[error("Unknown loan category '{0}' (use personal, business or emergency)")]
    InvalidCategory(String),

    #[error("Repayment period must be at least one month (got {0})")]
    InvalidPeriod(i64),
}

impl LoanError {
    /// Fields named by a validation failure, empty for every other variant.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            LoanError::Validation(errs) => errs.iter().map(|e| e.field).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Application '{0}' not found")]
    NotFound(String),

    #[error("Application '{0}' was modified concurrently; reload and retry")]
    Conflict(String),

    #[error("Stored application is corrupt: {0}")]
    Corrupt(String),

    #[error("Id prefix '{0}' matches more than one application")]
    Ambiguous(String),

    #[error("Application has no id; it must be created before it can be updated")]
    MissingId,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Loan(#[from] LoanError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn as_loan(&self) -> Option<&LoanError> {
        match self {
            ServiceError::Loan(e) => Some(e),
            ServiceError::Store(_) => None,
        }
    }
}
