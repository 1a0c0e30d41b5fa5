// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::calculator::compute_terms;
use crate::commands::quote::summary_rows;
use crate::config::Config;
use crate::models::{LoanApplication, LoanCategory, LoanRequest};
use crate::utils::{current_user, get_currency, maybe_print_json, parse_decimal, pretty_table, short_id};

pub fn handle(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let app = submit(conn, config, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &app)? {
        let ccy = get_currency(conn, config)?;
        let terms = compute_terms(app.principal, app.period, app.category)?;
        println!(
            "Application {} submitted; we'll review it and get back to you soon.",
            short_id(&app)
        );
        println!(
            "{}",
            pretty_table(&["Loan Summary", ""], summary_rows(app.principal, &terms, &ccy))
        );
    }
    Ok(())
}

pub fn submit(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<LoanApplication> {
    let request = request_from(sub, current_user(sub, config)?)?;
    Ok(super::service(conn).submit(request)?)
}

pub fn request_from(sub: &clap::ArgMatches, applicant: String) -> Result<LoanRequest> {
    let category: LoanCategory = sub.get_one::<String>("type").unwrap().parse()?;
    let principal = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    // Out-of-range periods are reported by submission validation with the other fields.
    let period = u32::try_from(*sub.get_one::<i64>("period").unwrap()).unwrap_or(0);
    Ok(LoanRequest {
        applicant,
        principal,
        category,
        period,
        purpose: sub.get_one::<String>("purpose").cloned().unwrap_or_default(),
        collateral: sub
            .get_one::<String>("collateral")
            .cloned()
            .unwrap_or_default(),
    })
}
