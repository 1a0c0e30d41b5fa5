// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::config::Config;
use crate::models::LoanApplication;
use crate::utils::{current_user, fmt_money, get_currency, normalize_msisdn, parse_decimal, short_id};

pub fn handle(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let app = repay(conn, config, sub)?;
    let ccy = get_currency(conn, config)?;
    println!("Payment initiated. Please check your phone for the M-Pesa prompt.");
    if app.is_settled() {
        println!("Loan {} is fully repaid.", short_id(&app));
    } else {
        println!(
            "Loan {}: paid {}, outstanding {}",
            short_id(&app),
            fmt_money(&app.paid_amount, &ccy),
            fmt_money(&app.outstanding(), &ccy)
        );
    }
    Ok(())
}

pub fn repay(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<LoanApplication> {
    let user = current_user(sub, config)?;
    let msisdn = normalize_msisdn(sub.get_one::<String>("phone").unwrap())?;
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;

    let service = super::service(conn);
    let id = service.store().resolve_id(sub.get_one::<String>("id").unwrap())?;
    let current = service.get(id)?;
    if current.applicant != user {
        bail!("Application {} does not belong to {}", short_id(&current), user);
    }
    tracing::info!(%id, %msisdn, "simulated M-Pesa push");
    Ok(service.repay(id, amount)?)
}
