// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use loanease::{cli, commands, config::Config, db, utils};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init(&config)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&config)?.display());
        }
        Some(("apply", sub)) => commands::apply::handle(&conn, &config, sub)?,
        Some(("quote", sub)) => commands::quote::handle(&conn, &config, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, &config, sub)?,
        Some(("repay", sub)) => commands::repay::handle(&conn, &config, sub)?,
        Some(("admin", sub)) => commands::admin::handle(&conn, &config, sub)?,
        Some(("notifications", sub)) => commands::notifications::handle(&conn, &config, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &config, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        Some(("currency", sub)) => match sub.get_one::<String>("code") {
            Some(code) => println!("Currency set to {}", utils::set_currency(&conn, code)?),
            None => println!("{}", utils::get_currency(&conn, &config)?),
        },
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
