// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::commands::dashboard::status_label;
use crate::config::Config;
use crate::models::{ApplicationStatus, Decision, LoanApplication};
use crate::policy::{CoinFlip, DecisionPolicy, PolicyKind, ThresholdPolicy};
use crate::service::BatchReport;
use crate::utils::{fmt_money, get_currency, maybe_print_json, parse_decimal, pretty_table, short_id};

pub fn handle(conn: &Connection, config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, config, sub)?,
        Some(("decide", sub)) => {
            let app = decide(conn, sub)?;
            println!("Application {} {}", short_id(&app), app.status);
        }
        Some(("process", sub)) => {
            let report = process(conn, sub)?;
            println!(
                "Approved {}, rejected {}, failed {}",
                report.approved(),
                report.rejected(),
                report.failed.len()
            );
            for (id, err) in &report.failed {
                let id = id.map(|u| u.to_string()).unwrap_or_default();
                eprintln!("  {}: {}", id, err);
            }
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let apps = list_rows(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &apps)? {
        return Ok(());
    }
    let ccy = get_currency(conn, config)?;
    let rows = apps
        .iter()
        .map(|a| {
            vec![
                short_id(a),
                a.created_at.format("%Y-%m-%d %H:%M").to_string(),
                a.applicant.clone(),
                a.category.to_string(),
                fmt_money(&a.principal, &ccy),
                a.period.to_string(),
                a.purpose.clone(),
                fmt_money(&a.paid_amount, &ccy),
                status_label(a),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Created", "Applicant", "Type", "Amount", "Months", "Purpose", "Paid", "Status"],
            rows,
        )
    );
    Ok(())
}

pub fn list_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<LoanApplication>> {
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<ApplicationStatus>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let all = super::service(conn).all_applications()?;
    Ok(match status {
        Some(s) => all.into_iter().filter(|a| a.status == s).collect(),
        None => all,
    })
}

pub fn decide(conn: &Connection, sub: &clap::ArgMatches) -> Result<LoanApplication> {
    let outcome: Decision = sub
        .get_one::<String>("outcome")
        .unwrap()
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let service = super::service(conn);
    let id = service.store().resolve_id(sub.get_one::<String>("id").unwrap())?;
    Ok(service.decide(id, outcome)?)
}

pub fn process(conn: &Connection, sub: &clap::ArgMatches) -> Result<BatchReport> {
    let kind: PolicyKind = sub
        .get_one::<String>("policy")
        .unwrap()
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let policy: Box<dyn DecisionPolicy> = match kind {
        PolicyKind::CoinFlip => match sub.get_one::<u64>("seed") {
            Some(seed) => Box::new(CoinFlip::seeded(*seed)),
            None => Box::new(CoinFlip::new()),
        },
        PolicyKind::Threshold => {
            let mut p = ThresholdPolicy::default();
            if let Some(s) = sub.get_one::<String>("max_amount") {
                p.max_principal = parse_decimal(s)?;
            }
            if let Some(n) = sub.get_one::<u32>("max_period") {
                p.max_period = *n;
            }
            Box::new(p)
        }
    };
    Ok(super::service(conn).process_pending(policy.as_ref())?)
}
