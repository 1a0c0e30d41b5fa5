// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculator::compute_terms_for;
use crate::config::Config;
use crate::models::LoanTerms;
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_decimal, pretty_table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub principal: Decimal,
    pub category: String,
    pub period: i64,
    #[serde(flatten)]
    pub terms: LoanTerms,
}

pub fn handle(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let quote = quote(sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &quote)? {
        let ccy = get_currency(conn, config)?;
        println!(
            "{}",
            pretty_table(&["Loan Summary", ""], summary_rows(quote.principal, &quote.terms, &ccy))
        );
    }
    Ok(())
}

pub fn quote(sub: &clap::ArgMatches) -> Result<Quote> {
    let principal = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("type").unwrap();
    let period = *sub.get_one::<i64>("period").unwrap();
    let terms = compute_terms_for(principal, period, category)?;
    Ok(Quote {
        principal,
        category: category.trim().to_lowercase(),
        period,
        terms,
    })
}

pub fn summary_rows(principal: Decimal, terms: &LoanTerms, ccy: &str) -> Vec<Vec<String>> {
    vec![
        vec!["Loan Amount".into(), fmt_money(&principal, ccy)],
        vec![
            "Interest Rate".into(),
            format!("{}%", (terms.interest_rate * Decimal::ONE_HUNDRED).normalize()),
        ],
        vec!["Interest Amount".into(), fmt_money(&terms.interest_amount, ccy)],
        vec!["Total Repayment".into(), fmt_money(&terms.total_amount, ccy)],
        vec!["Monthly Payment".into(), fmt_money(&terms.periodic_payment, ccy)],
    ]
}
