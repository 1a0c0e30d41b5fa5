// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use loanease::error::LoanError;
use loanease::lifecycle::{
    LifecycleEvent, decide, decide_at, decide_batch, record_repayment, submit, submit_at,
};
use loanease::models::{ApplicationStatus, Decision, LoanApplication, LoanCategory, LoanRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn request(principal: Decimal, period: u32) -> LoanRequest {
    LoanRequest {
        applicant: "wanjiku@example.com".into(),
        principal,
        category: LoanCategory::Personal,
        period,
        purpose: "School fees".into(),
        collateral: "Motorbike".into(),
    }
}

fn approved(principal: Decimal, period: u32) -> LoanApplication {
    let app = submit(request(principal, period)).unwrap();
    decide(&app, Decision::Approved).unwrap()
}

#[test]
fn submit_populates_terms_and_pending_state() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let app = submit_at(request(dec!(5000), 6), now).unwrap();
    assert_eq!(app.id, None);
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert_eq!(app.paid_amount, Decimal::ZERO);
    assert_eq!(app.interest_amount, dec!(1000));
    assert_eq!(app.total_amount, dec!(6000));
    assert_eq!(app.periodic_payment, dec!(1000));
    assert_eq!(app.created_at, now);
    assert_eq!(app.decided_at, None);
    assert!(!app.is_settled());
}

#[test]
fn principal_bounds_are_inclusive() {
    assert!(submit(request(dec!(5000), 6)).is_ok());
    assert!(submit(request(dec!(100000), 6)).is_ok());

    for bad in [dec!(4999), dec!(100001)] {
        let err = submit(request(bad, 6)).unwrap_err();
        assert!(matches!(err, LoanError::Validation(_)));
        assert_eq!(err.fields(), vec!["principal"]);
    }
}

#[test]
fn validation_lists_every_failing_field() {
    let req = LoanRequest {
        applicant: "  ".into(),
        principal: dec!(100),
        category: LoanCategory::Business,
        period: 13,
        purpose: "".into(),
        collateral: " ".into(),
    };
    let err = submit(req).unwrap_err();
    assert_eq!(
        err.fields(),
        vec!["applicant", "principal", "period", "purpose", "collateral"]
    );
    let msg = err.to_string();
    assert!(msg.contains("principal: must be between 5000 and 100000"));
    assert!(msg.contains("period: must be between 1 and 12 months"));
}

#[test]
fn period_zero_fails_validation() {
    let err = submit(request(dec!(5000), 0)).unwrap_err();
    assert_eq!(err.fields(), vec!["period"]);
}

#[test]
fn decide_twice_is_an_invalid_transition() {
    let app = submit(request(dec!(5000), 6)).unwrap();
    let first = decide(&app, Decision::Approved).unwrap();
    assert_eq!(first.status, ApplicationStatus::Approved);
    assert!(first.decided_at.unwrap() >= first.created_at);

    let err = decide(&first, Decision::Rejected).unwrap_err();
    assert_eq!(
        err,
        LoanError::InvalidTransition {
            from: ApplicationStatus::Approved,
            to: ApplicationStatus::Rejected,
        }
    );
    assert_eq!(first.status, ApplicationStatus::Approved);
    // the original snapshot is untouched
    assert_eq!(app.status, ApplicationStatus::Pending);
}

#[test]
fn rejected_is_terminal() {
    let app = submit(request(dec!(5000), 6)).unwrap();
    let rejected = decide(&app, Decision::Rejected).unwrap();
    assert!(decide(&rejected, Decision::Approved).is_err());
    assert!(matches!(
        record_repayment(&rejected, dec!(10)),
        Err(LoanError::InvalidState { .. })
    ));
}

#[test]
fn decided_at_never_precedes_created_at() {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let app = submit_at(request(dec!(5000), 6), created).unwrap();
    let skewed = decide_at(&app, Decision::Approved, created - Duration::minutes(5)).unwrap();
    assert_eq!(skewed.decided_at, Some(created));
}

#[test]
fn repayment_on_pending_fails_with_invalid_state() {
    let app = submit(request(dec!(5000), 6)).unwrap();
    let err = record_repayment(&app, dec!(1000)).unwrap_err();
    assert_eq!(
        err,
        LoanError::InvalidState {
            operation: "record a repayment",
            status: ApplicationStatus::Pending,
        }
    );
}

#[test]
fn repayments_accumulate_until_settled_then_overpayment_is_rejected() {
    let mut app = approved(dec!(5000), 6);
    assert_eq!(app.total_amount, dec!(6000));

    for _ in 0..6 {
        app = record_repayment(&app, dec!(1000)).unwrap();
    }
    assert_eq!(app.paid_amount, dec!(6000));
    assert!(app.is_settled());
    assert_eq!(app.outstanding(), Decimal::ZERO);

    let err = record_repayment(&app, dec!(1000)).unwrap_err();
    assert_eq!(
        err,
        LoanError::Overpayment {
            amount: dec!(1000),
            outstanding: Decimal::ZERO,
        }
    );
    assert_eq!(app.paid_amount, dec!(6000));
}

#[test]
fn partial_overpayment_is_rejected_without_change() {
    let app = approved(dec!(5000), 6);
    let app = record_repayment(&app, dec!(5500)).unwrap();
    assert!(matches!(
        record_repayment(&app, dec!(500.01)),
        Err(LoanError::Overpayment { .. })
    ));
    let app = record_repayment(&app, dec!(500)).unwrap();
    assert!(app.is_settled());
}

#[test]
fn huge_repayment_is_overpayment_not_overflow() {
    let app = approved(dec!(5000), 6);
    let app = record_repayment(&app, dec!(1000)).unwrap();
    assert_eq!(
        record_repayment(&app, Decimal::MAX),
        Err(LoanError::Overpayment {
            amount: Decimal::MAX,
            outstanding: dec!(5000),
        })
    );
}

#[test]
fn non_positive_repayment_is_invalid_amount() {
    let app = approved(dec!(5000), 6);
    assert_eq!(
        record_repayment(&app, Decimal::ZERO),
        Err(LoanError::InvalidAmount(Decimal::ZERO))
    );
    assert!(matches!(
        record_repayment(&app, dec!(-1)),
        Err(LoanError::InvalidAmount(_))
    ));
}

#[test]
fn next_installment_is_capped_at_outstanding() {
    let mut app = approved(dec!(5000), 9);
    for _ in 0..8 {
        let amount = app.next_installment();
        app = record_repayment(&app, amount).unwrap();
    }
    let last = app.next_installment();
    assert!(last <= app.periodic_payment);
    app = record_repayment(&app, last).unwrap();
    assert!(app.is_settled());
    assert_eq!(app.next_installment(), Decimal::ZERO);
}

#[test]
fn batch_failures_do_not_abort_siblings() {
    let now = Utc::now();
    let pending = submit(request(dec!(5000), 6)).unwrap();
    let already = decide(&pending, Decision::Rejected).unwrap();
    let other = submit(request(dec!(8000), 3)).unwrap();

    let items = decide_batch(&[pending, already, other], now, |_| Decision::Approved);
    assert_eq!(items.len(), 3);
    assert!(items[0].result.is_ok());
    assert!(matches!(
        items[1].result,
        Err(LoanError::InvalidTransition { .. })
    ));
    assert_eq!(
        items[2].result.as_ref().unwrap().status,
        ApplicationStatus::Approved
    );
}

#[test]
fn events_describe_transitions() {
    let app = approved(dec!(5000), 6);
    let paid = record_repayment(&app, dec!(6000)).unwrap();
    let event = LifecycleEvent::repaid(&paid, dec!(6000));
    assert_eq!(event.applicant(), "wanjiku@example.com");
    assert!(event.message().contains("fully repaid"));

    let decided = LifecycleEvent::decided(&app, Decision::Approved);
    assert!(decided.message().ends_with("has been approved"));
}

#[test]
fn serde_round_trip_preserves_every_field() {
    let app = approved(dec!(12345.50), 9);
    let app = record_repayment(&app, dec!(1234.56)).unwrap();

    let json = serde_json::to_string(&app).unwrap();
    for key in [
        "\"interestAmount\"",
        "\"totalAmount\"",
        "\"periodicPayment\"",
        "\"paidAmount\"",
        "\"createdAt\"",
        "\"decidedAt\"",
        "\"status\":\"approved\"",
        "\"category\":\"personal\"",
    ] {
        assert!(json.contains(key), "missing {} in {}", key, json);
    }
    let back: LoanApplication = serde_json::from_str(&json).unwrap();
    assert_eq!(back, app);
    assert_eq!(back.periodic_payment.to_string(), app.periodic_payment.to_string());
}
