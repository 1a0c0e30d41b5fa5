// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::config::{Config, validate_currency};
use crate::models::LoanApplication;

// Safaricom/Airtel style numbers: 07XXXXXXXX, 01XXXXXXXX, optionally as +254 / 254.
static MOBILE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+?254|0)([17]\d{8})$").expect("static regex"));

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s.trim()))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

/// Normalises a mobile-money number to `2547XXXXXXXX` form.
pub fn normalize_msisdn(raw: &str) -> Result<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    let caps = MOBILE_NUMBER
        .captures(&compact)
        .ok_or_else(|| anyhow!("Invalid mobile number '{}', expected e.g. 0712345678", raw.trim()))?;
    Ok(format!("254{}", &caps[1]))
}

pub fn short_id(app: &LoanApplication) -> String {
    app.id
        .map(|id| id.simple().to_string()[..8].to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_currency(conn: &Connection, config: &Config) -> Result<String> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key='currency'", [], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.unwrap_or_else(|| config.currency.clone()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<String> {
    let ccy = validate_currency(ccy)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(ccy)
}

/// Applicant identity from `--user`, falling back to configuration.
pub fn current_user(m: &clap::ArgMatches, config: &Config) -> Result<String> {
    m.get_one::<String>("user")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| config.user.clone())
        .ok_or_else(|| anyhow!("No user given; pass --user <email> or set LOANEASE_USER"))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line.
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
