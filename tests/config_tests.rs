// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;

use loanease::config::Config;
use loanease::{db, utils};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_environment_is_empty() {
    let cfg = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.currency, "KES");
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn reads_overrides_and_ignores_blank_values() {
    let cfg = Config::from_lookup(lookup(&[
        ("LOANEASE_DB", "/tmp/loans.sqlite"),
        ("LOANEASE_LOG", "debug"),
        ("LOANEASE_CURRENCY", " ugx "),
        ("LOANEASE_USER", "   "),
    ]))
    .unwrap();
    assert_eq!(cfg.db_path, Some(PathBuf::from("/tmp/loans.sqlite")));
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.currency, "UGX");
    assert_eq!(cfg.user, None);
}

#[test]
fn rejects_malformed_currency() {
    let err = Config::from_lookup(lookup(&[("LOANEASE_CURRENCY", "shilling")])).unwrap_err();
    assert!(err.to_string().contains("LOANEASE_CURRENCY"));
}

#[test]
fn stored_currency_overrides_config() {
    let conn = db::open_in_memory().unwrap();
    let cfg = Config::default();
    assert_eq!(utils::get_currency(&conn, &cfg).unwrap(), "KES");
    assert_eq!(utils::set_currency(&conn, "tzs").unwrap(), "TZS");
    assert_eq!(utils::get_currency(&conn, &cfg).unwrap(), "TZS");
    assert!(utils::set_currency(&conn, "TZ").is_err());
}

#[test]
fn file_database_is_created_under_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        db_path: Some(dir.path().join("nested").join("loans.sqlite")),
        ..Config::default()
    };
    let conn = db::open_or_init(&cfg).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM applications", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
    assert!(dir.path().join("nested").join("loans.sqlite").exists());
}

#[test]
fn mobile_numbers_normalise() {
    assert_eq!(utils::normalize_msisdn("0712345678").unwrap(), "254712345678");
    assert_eq!(utils::normalize_msisdn("+254 110-123-456").unwrap(), "254110123456");
    assert!(utils::normalize_msisdn("0812345678").is_err());
}
