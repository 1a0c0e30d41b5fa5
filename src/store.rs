// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{ApplicationPatch, ApplicationStatus, LoanApplication};

/// Persistence for loan applications. `update` must be atomic and only apply when the stored
/// status and paid amount still match the patch's expectations.
pub trait ApplicationStore {
    fn create(&self, application: &LoanApplication) -> Result<Uuid, StoreError>;

    fn get(&self, id: Uuid) -> Result<LoanApplication, StoreError>;

    fn update(&self, id: Uuid, patch: &ApplicationPatch) -> Result<LoanApplication, StoreError>;

    fn query_by_owner(&self, owner: &str) -> Result<Vec<LoanApplication>, StoreError>;

    fn list_all(&self) -> Result<Vec<LoanApplication>, StoreError>;

    fn list_by_status(&self, status: ApplicationStatus)
    -> Result<Vec<LoanApplication>, StoreError>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

const SELECT_COLUMNS: &str = "SELECT id, applicant, principal, category, period, purpose, \
    collateral, interest_amount, total_amount, periodic_payment, status, paid_amount, \
    created_at, decided_at FROM applications";

pub(crate) fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid timestamp '{}': {}", s, e)))
}

fn parse_money(s: &str, field: &str) -> Result<Decimal, StoreError> {
    s.parse::<Decimal>()
        .map_err(|_| StoreError::Corrupt(format!("invalid {} '{}'", field, s)))
}

struct RawRow {
    id: String,
    applicant: String,
    principal: String,
    category: String,
    period: i64,
    purpose: String,
    collateral: String,
    interest_amount: String,
    total_amount: String,
    periodic_payment: String,
    status: String,
    paid_amount: String,
    created_at: String,
    decided_at: Option<String>,
}

impl RawRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            applicant: r.get(1)?,
            principal: r.get(2)?,
            category: r.get(3)?,
            period: r.get(4)?,
            purpose: r.get(5)?,
            collateral: r.get(6)?,
            interest_amount: r.get(7)?,
            total_amount: r.get(8)?,
            periodic_payment: r.get(9)?,
            status: r.get(10)?,
            paid_amount: r.get(11)?,
            created_at: r.get(12)?,
            decided_at: r.get(13)?,
        })
    }

    fn into_application(self) -> Result<LoanApplication, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|_| StoreError::Corrupt(format!("invalid id '{}'", self.id)))?;
        let category = self
            .category
            .parse()
            .map_err(|e: crate::error::LoanError| StoreError::Corrupt(e.to_string()))?;
        let status = self.status.parse().map_err(StoreError::Corrupt)?;
        let period = u32::try_from(self.period)
            .map_err(|_| StoreError::Corrupt(format!("invalid period {}", self.period)))?;
        let decided_at = match self.decided_at.as_deref() {
            Some(s) => Some(parse_ts(s)?),
            None => None,
        };
        Ok(LoanApplication {
            id: Some(id),
            applicant: self.applicant,
            principal: parse_money(&self.principal, "principal")?,
            category,
            period,
            purpose: self.purpose,
            collateral: self.collateral,
            interest_amount: parse_money(&self.interest_amount, "interest amount")?,
            total_amount: parse_money(&self.total_amount, "total amount")?,
            periodic_payment: parse_money(&self.periodic_payment, "periodic payment")?,
            status,
            paid_amount: parse_money(&self.paid_amount, "paid amount")?,
            created_at: parse_ts(&self.created_at)?,
            decided_at,
        })
    }
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Resolves a full id or a unique prefix of one (as printed by the tables).
    pub fn resolve_id(&self, text: &str) -> Result<Uuid, StoreError> {
        let text = text.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&text) {
            return Ok(id);
        }
        let prefix = text.replace('-', "");
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StoreError::NotFound(text));
        }
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM applications WHERE replace(id, '-', '') LIKE ?1 || '%' LIMIT 2")?;
        let matches: Vec<String> = stmt
            .query_map(params![prefix], |r| r.get(0))?
            .collect::<Result<_, _>>()?;
        match matches.as_slice() {
            [only] => Uuid::parse_str(only)
                .map_err(|_| StoreError::Corrupt(format!("invalid id '{}'", only))),
            [] => Err(StoreError::NotFound(text)),
            _ => Err(StoreError::Ambiguous(text)),
        }
    }

    fn query(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<LoanApplication>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, RawRow::from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_application()?);
        }
        Ok(out)
    }
}

impl ApplicationStore for SqliteStore<'_> {
    fn create(&self, application: &LoanApplication) -> Result<Uuid, StoreError> {
        let id = application.id.unwrap_or_else(Uuid::new_v4);
        self.conn.execute(
            "INSERT INTO applications(id, applicant, principal, category, period, purpose, collateral,
                interest_amount, total_amount, periodic_payment, status, paid_amount, created_at, decided_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                id.to_string(),
                application.applicant,
                application.principal.to_string(),
                application.category.as_str(),
                application.period,
                application.purpose,
                application.collateral,
                application.interest_amount.to_string(),
                application.total_amount.to_string(),
                application.periodic_payment.to_string(),
                application.status.as_str(),
                application.paid_amount.to_string(),
                fmt_ts(&application.created_at),
                application.decided_at.as_ref().map(fmt_ts),
            ],
        )?;
        tracing::debug!(%id, applicant = %application.applicant, "application stored");
        Ok(id)
    }

    fn get(&self, id: Uuid) -> Result<LoanApplication, StoreError> {
        let sql = format!("{} WHERE id=?1", SELECT_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, params![id.to_string()], RawRow::from_row)
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        raw.into_application()
    }

    fn update(&self, id: Uuid, patch: &ApplicationPatch) -> Result<LoanApplication, StoreError> {
        if patch.is_empty() {
            return self.get(id);
        }
        let changed = self.conn.execute(
            "UPDATE applications
                SET status = COALESCE(?1, status),
                    decided_at = COALESCE(?2, decided_at),
                    paid_amount = COALESCE(?3, paid_amount)
              WHERE id = ?4 AND status = ?5 AND paid_amount = ?6",
            params![
                patch.status.map(|s| s.as_str()),
                patch.decided_at.as_ref().map(fmt_ts),
                patch.paid_amount.map(|d| d.to_string()),
                id.to_string(),
                patch.expected_status.as_str(),
                patch.expected_paid.to_string(),
            ],
        )?;
        if changed == 0 {
            // Distinguish a missing row from a stale snapshot.
            let exists: Option<i64> = self
                .conn
                .query_row(
                    "SELECT 1 FROM applications WHERE id=?1",
                    params![id.to_string()],
                    |r| r.get(0),
                )
                .optional()?;
            return Err(match exists {
                Some(_) => {
                    tracing::warn!(%id, "stale application snapshot; update rejected");
                    StoreError::Conflict(id.to_string())
                }
                None => StoreError::NotFound(id.to_string()),
            });
        }
        self.get(id)
    }

    fn query_by_owner(&self, owner: &str) -> Result<Vec<LoanApplication>, StoreError> {
        let sql = format!(
            "{} WHERE applicant=?1 ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        );
        self.query(&sql, &[&owner])
    }

    fn list_all(&self) -> Result<Vec<LoanApplication>, StoreError> {
        let sql = format!("{} ORDER BY created_at DESC, rowid DESC", SELECT_COLUMNS);
        self.query(&sql, &[])
    }

    fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, StoreError> {
        let sql = format!(
            "{} WHERE status=?1 ORDER BY created_at ASC, rowid ASC",
            SELECT_COLUMNS
        );
        self.query(&sql, &[&status.as_str()])
    }
}
