// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::Config;
use crate::models::{ApplicationStatus, LoanApplication};
use crate::utils::{current_user, fmt_money, get_currency, maybe_print_json, pretty_table, short_id};

pub fn handle(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub, config)?;
    let apps = super::service(conn).dashboard(&user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &apps)? {
        return Ok(());
    }
    if apps.is_empty() {
        println!("No applications yet for {}", user);
        return Ok(());
    }
    let ccy = get_currency(conn, config)?;
    let rows = apps.iter().map(|a| row(a, &ccy)).collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Created", "Type", "Amount", "Months", "Interest", "Total", "Paid",
                "Outstanding", "Status",
            ],
            rows,
        )
    );
    Ok(())
}

fn row(a: &LoanApplication, ccy: &str) -> Vec<String> {
    vec![
        short_id(a),
        a.created_at.format("%Y-%m-%d").to_string(),
        a.category.to_string(),
        fmt_money(&a.principal, ccy),
        a.period.to_string(),
        fmt_money(&a.interest_amount, ccy),
        fmt_money(&a.total_amount, ccy),
        fmt_money(&a.paid_amount, ccy),
        fmt_money(&a.outstanding(), ccy),
        status_label(a),
    ]
}

pub fn status_label(a: &LoanApplication) -> String {
    match a.status {
        ApplicationStatus::Approved if a.is_settled() => "approved (settled)".to_string(),
        s => s.to_string(),
    }
}
