// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use loanease::db;
use loanease::error::StoreError;
use loanease::lifecycle::{decide, record_repayment, submit_at};
use loanease::models::{
    ApplicationPatch, ApplicationStatus, Decision, LoanApplication, LoanCategory, LoanRequest,
};
use loanease::store::{ApplicationStore, SqliteStore};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn new_app(applicant: &str, minutes: i64) -> LoanApplication {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes);
    submit_at(
        LoanRequest {
            applicant: applicant.into(),
            principal: dec!(15000),
            category: LoanCategory::Emergency,
            period: 9,
            purpose: "Hospital bill".into(),
            collateral: "Title deed".into(),
        },
        at,
    )
    .unwrap()
}

#[test]
fn create_assigns_id_and_get_round_trips_exactly() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut app = new_app("otieno@example.com", 0);
    // sub-second precision must survive storage
    app.created_at += Duration::nanoseconds(123_456_789);

    let id = store.create(&app).unwrap();
    app.id = Some(id);
    let loaded = store.get(id).unwrap();
    assert_eq!(loaded, app);
    assert_eq!(
        loaded.periodic_payment.to_string(),
        app.periodic_payment.to_string()
    );
}

#[test]
fn get_unknown_id_is_not_found() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    assert!(matches!(
        store.get(Uuid::new_v4()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn update_applies_only_changed_fields() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut app = new_app("otieno@example.com", 0);
    app.id = Some(store.create(&app).unwrap());

    let decided = decide(&app, Decision::Approved).unwrap();
    let patch = ApplicationPatch::between(&app, &decided);
    assert_eq!(patch.paid_amount, None);
    let saved = store.update(app.id.unwrap(), &patch).unwrap();
    assert_eq!(saved, decided);

    let paid = record_repayment(&saved, dec!(2500.25)).unwrap();
    let saved = store
        .update(app.id.unwrap(), &ApplicationPatch::between(&saved, &paid))
        .unwrap();
    assert_eq!(saved.paid_amount, dec!(2500.25));
    assert_eq!(saved.status, ApplicationStatus::Approved);
    assert_eq!(saved.decided_at, decided.decided_at);
}

#[test]
fn stale_snapshot_update_is_a_conflict() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut app = new_app("otieno@example.com", 0);
    let id = store.create(&app).unwrap();
    app.id = Some(id);
    let approved = store
        .update(id, &ApplicationPatch::between(&app, &decide(&app, Decision::Approved).unwrap()))
        .unwrap();

    // two repayments computed from the same snapshot
    let first = record_repayment(&approved, dec!(1000)).unwrap();
    let second = record_repayment(&approved, dec!(3000)).unwrap();

    store
        .update(id, &ApplicationPatch::between(&approved, &first))
        .unwrap();
    let err = store
        .update(id, &ApplicationPatch::between(&approved, &second))
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(store.get(id).unwrap().paid_amount, dec!(1000));
}

#[test]
fn queries_are_newest_first_and_scoped_by_owner() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    for (who, minutes) in [("a@example.com", 0), ("b@example.com", 5), ("a@example.com", 10)] {
        store.create(&new_app(who, minutes)).unwrap();
    }

    let mine = store.query_by_owner("a@example.com").unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine[0].created_at > mine[1].created_at);
    assert!(mine.iter().all(|a| a.applicant == "a@example.com"));

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].applicant, "b@example.com");

    let pending = store.list_by_status(ApplicationStatus::Pending).unwrap();
    assert_eq!(pending.len(), 3);
    assert!(pending[0].created_at < pending[2].created_at);
    assert!(
        store
            .list_by_status(ApplicationStatus::Approved)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn resolve_id_accepts_unique_prefix() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut app = new_app("a@example.com", 0);
    app.id = Some(Uuid::parse_str("6f1c2d3e-0000-4000-8000-000000000001").unwrap());
    store.create(&app).unwrap();
    let mut other = new_app("a@example.com", 1);
    other.id = Some(Uuid::parse_str("6f1c9999-0000-4000-8000-000000000002").unwrap());
    store.create(&other).unwrap();

    assert_eq!(store.resolve_id("6f1c2d3e").unwrap(), app.id.unwrap());
    assert!(matches!(store.resolve_id("6f1c"), Err(StoreError::Ambiguous(_))));
    assert!(matches!(store.resolve_id("ffff"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.resolve_id("%"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.resolve_id("6f1c_d3e"), Err(StoreError::NotFound(_))));
}

#[test]
fn corrupt_rows_are_reported() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let id = store.create(&new_app("a@example.com", 0)).unwrap();
    conn.execute(
        "UPDATE applications SET paid_amount='abc' WHERE id=?1",
        [id.to_string()],
    )
    .unwrap();
    assert!(matches!(store.get(id), Err(StoreError::Corrupt(_))));
}
