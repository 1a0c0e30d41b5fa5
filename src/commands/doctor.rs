// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::calculator::compute_terms;
use crate::models::{ApplicationStatus, LoanApplication};
use crate::store::{ApplicationStore, SqliteStore};
use crate::utils::{pretty_table, short_id};

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = scan(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Application", "Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn scan(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for app in SqliteStore::new(conn).list_all()? {
        for (issue, detail) in check(&app) {
            rows.push(vec![short_id(&app), issue.to_string(), detail]);
        }
    }
    Ok(rows)
}

/// Invariant violations for one stored application.
pub fn check(app: &LoanApplication) -> Vec<(&'static str, String)> {
    let mut issues = Vec::new();

    match compute_terms(app.principal, app.period, app.category) {
        Ok(terms) => {
            if terms.interest_amount != app.interest_amount
                || terms.total_amount != app.total_amount
                || terms.periodic_payment != app.periodic_payment
            {
                issues.push((
                    "terms_drift",
                    format!(
                        "stored total {} but terms give {}",
                        app.total_amount, terms.total_amount
                    ),
                ));
            }
        }
        Err(e) => issues.push(("invalid_terms", e.to_string())),
    }

    if app.paid_amount < Decimal::ZERO {
        issues.push(("negative_paid", app.paid_amount.to_string()));
    }
    if app.paid_amount > app.total_amount {
        issues.push((
            "overpaid",
            format!("paid {} of {}", app.paid_amount, app.total_amount),
        ));
    }
    if app.status != ApplicationStatus::Approved && !app.paid_amount.is_zero() {
        issues.push((
            "paid_while_not_approved",
            format!("{} with {} paid", app.status, app.paid_amount),
        ));
    }
    match (app.status.is_decided(), app.decided_at) {
        (true, None) => issues.push(("missing_decided_at", app.status.to_string())),
        (false, Some(at)) => issues.push(("pending_with_decided_at", at.to_rfc3339())),
        (true, Some(at)) if at < app.created_at => issues.push((
            "decided_before_created",
            format!("{} < {}", at.to_rfc3339(), app.created_at.to_rfc3339()),
        )),
        _ => {}
    }
    issues
}
