// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::config::Config;
use crate::utils::current_user;

pub fn handle(conn: &Connection, config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("applications", sub)) => export_applications(conn, config, sub),
        _ => Ok(()),
    }
}

fn export_applications(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let service = super::service(conn);
    let apps = if sub.get_flag("all") {
        service.all_applications()?
    } else {
        service.dashboard(&current_user(sub, config)?)?
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "applicant",
                "category",
                "principal",
                "period",
                "purpose",
                "collateral",
                "interestAmount",
                "totalAmount",
                "periodicPayment",
                "status",
                "paidAmount",
                "createdAt",
                "decidedAt",
            ])?;
            for a in &apps {
                wtr.write_record([
                    a.id_string(),
                    a.applicant.clone(),
                    a.category.to_string(),
                    a.principal.to_string(),
                    a.period.to_string(),
                    a.purpose.clone(),
                    a.collateral.clone(),
                    a.interest_amount.to_string(),
                    a.total_amount.to_string(),
                    a.periodic_payment.to_string(),
                    a.status.to_string(),
                    a.paid_amount.to_string(),
                    a.created_at.to_rfc3339(),
                    a.decided_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&apps)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} applications to {}", apps.len(), out);
    Ok(())
}
