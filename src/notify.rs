// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, params};

use crate::error::StoreError;
use crate::lifecycle::LifecycleEvent;
use crate::models::Notification;
use crate::store::{fmt_ts, parse_ts};

/// Fire-and-forget delivery of lifecycle events. Implementations swallow their own failures.
pub trait Notifier {
    fn notify(&self, event: &LifecycleEvent);
}

/// Writes events to the tracing log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &LifecycleEvent) {
        tracing::info!(applicant = %event.applicant(), "{}", event.message());
    }
}

impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, event: &LifecycleEvent) {
        self.0.notify(event);
        self.1.notify(event);
    }
}

/// Stores a message per applicant in the `notifications` table.
pub struct InboxNotifier<'a> {
    conn: &'a Connection,
}

impl<'a> InboxNotifier<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Notifier for InboxNotifier<'_> {
    fn notify(&self, event: &LifecycleEvent) {
        if let Err(err) = push(self.conn, event.applicant(), &event.message()) {
            tracing::warn!(error = %err, "failed to deliver notification");
        }
    }
}

pub fn push(conn: &Connection, recipient: &str, message: &str) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO notifications(recipient, message, created_at, read) VALUES (?1, ?2, ?3, 0)",
        params![recipient, message, fmt_ts(&Utc::now())],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first.
pub fn list(
    conn: &Connection,
    recipient: &str,
    unread_only: bool,
) -> Result<Vec<Notification>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, recipient, message, created_at, read FROM notifications
         WHERE recipient=?1 AND (?2 = 0 OR read = 0)
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![recipient, unread_only], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, bool>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, recipient, message, created_at, read) = row?;
        out.push(Notification {
            id,
            recipient,
            message,
            created_at: parse_ts(&created_at)?,
            read,
        });
    }
    Ok(out)
}

pub fn mark_all_read(conn: &Connection, recipient: &str) -> Result<usize, StoreError> {
    Ok(conn.execute(
        "UPDATE notifications SET read=1 WHERE recipient=?1 AND read=0",
        params![recipient],
    )?)
}
