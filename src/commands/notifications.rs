// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::Config;
use crate::notify;
use crate::utils::{current_user, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub, config)?;
    let items = notify::list(conn, &user, sub.get_flag("unread"))?;
    if !maybe_print_json(sub.get_flag("json"), false, &items)? {
        if items.is_empty() {
            println!("No notifications");
        } else {
            let rows = items
                .iter()
                .map(|n| {
                    vec![
                        n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        if n.read { "" } else { "new" }.to_string(),
                        n.message.clone(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["When", "", "Message"], rows));
        }
    }
    if sub.get_flag("mark_read") {
        notify::mark_all_read(conn, &user)?;
    }
    Ok(())
}
