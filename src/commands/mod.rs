// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;

use crate::notify::{InboxNotifier, LogNotifier};
use crate::service::LoanService;
use crate::store::SqliteStore;

pub mod admin;
pub mod apply;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod notifications;
pub mod quote;
pub mod repay;

pub type CliService<'a> = LoanService<SqliteStore<'a>, (LogNotifier, InboxNotifier<'a>)>;

pub fn service(conn: &Connection) -> CliService<'_> {
    LoanService::new(
        SqliteStore::new(conn),
        (LogNotifier, InboxNotifier::new(conn)),
    )
}
