// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Loan service: runs lifecycle transitions against a store and tells a notifier.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{LoanError, ServiceError, StoreError};
use crate::lifecycle::{self, LifecycleEvent};
use crate::models::{ApplicationPatch, ApplicationStatus, Decision, LoanApplication, LoanRequest};
use crate::notify::Notifier;
use crate::policy::DecisionPolicy;
use crate::store::ApplicationStore;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Outcome of running a policy over every pending application.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub decided: Vec<LoanApplication>,
    pub failed: Vec<(Option<Uuid>, ServiceError)>,
}

impl BatchReport {
    pub fn approved(&self) -> usize {
        self.decided
            .iter()
            .filter(|a| a.status == ApplicationStatus::Approved)
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.decided
            .iter()
            .filter(|a| a.status == ApplicationStatus::Rejected)
            .count()
    }
}

pub struct LoanService<S, N> {
    store: S,
    notifier: N,
}

impl<S: ApplicationStore, N: Notifier> LoanService<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn submit(&self, request: LoanRequest) -> Result<LoanApplication> {
        let mut application = lifecycle::submit(request)?;
        let id = self.store.create(&application)?;
        application.id = Some(id);
        tracing::info!(
            %id,
            applicant = %application.applicant,
            principal = %application.principal,
            category = %application.category,
            period = application.period,
            "application submitted"
        );
        self.notifier
            .notify(&LifecycleEvent::submitted(&application));
        Ok(application)
    }

    pub fn get(&self, id: Uuid) -> Result<LoanApplication> {
        Ok(self.store.get(id)?)
    }

    pub fn dashboard(&self, owner: &str) -> Result<Vec<LoanApplication>> {
        Ok(self.store.query_by_owner(owner)?)
    }

    pub fn all_applications(&self) -> Result<Vec<LoanApplication>> {
        Ok(self.store.list_all()?)
    }

    pub fn decide(&self, id: Uuid, outcome: Decision) -> Result<LoanApplication> {
        let current = self.store.get(id)?;
        self.persist_decision(&current, outcome)
    }

    pub fn decide_with(&self, id: Uuid, policy: &dyn DecisionPolicy) -> Result<LoanApplication> {
        let current = self.store.get(id)?;
        let outcome = policy.decide(&current);
        tracing::debug!(%id, policy = policy.name(), %outcome, "policy decision");
        self.persist_decision(&current, outcome)
    }

    /// Decides every pending application with `policy`. Each record succeeds or fails alone.
    pub fn process_pending(&self, policy: &dyn DecisionPolicy) -> Result<BatchReport> {
        let pending = self.store.list_by_status(ApplicationStatus::Pending)?;
        let mut outcomes = Vec::with_capacity(pending.len());
        let items = lifecycle::decide_batch(&pending, Utc::now(), |app| {
            let outcome = policy.decide(app);
            outcomes.push(outcome);
            outcome
        });

        let mut report = BatchReport::default();
        for ((before, item), outcome) in pending.iter().zip(items).zip(outcomes) {
            let persisted = item
                .result
                .map_err(ServiceError::from)
                .and_then(|after| self.persist(before, &after));
            match persisted {
                Ok(saved) => {
                    self.notifier
                        .notify(&LifecycleEvent::decided(&saved, outcome));
                    report.decided.push(saved);
                }
                Err(err) => {
                    tracing::warn!(id = ?item.id, error = %err, "could not decide application");
                    report.failed.push((item.id, err));
                }
            }
        }
        tracing::info!(
            policy = policy.name(),
            approved = report.approved(),
            rejected = report.rejected(),
            failed = report.failed.len(),
            "processed pending applications"
        );
        Ok(report)
    }

    /// Records a repayment. `amount` defaults to the next installment; a settled loan has none.
    pub fn repay(&self, id: Uuid, amount: Option<Decimal>) -> Result<LoanApplication> {
        let current = self.store.get(id)?;
        let amount = match amount {
            Some(amount) => amount,
            None if current.status == ApplicationStatus::Approved && current.is_settled() => {
                return Err(LoanError::Overpayment {
                    amount: current.periodic_payment,
                    outstanding: Decimal::ZERO,
                }
                .into());
            }
            None => current.next_installment(),
        };
        let next = lifecycle::record_repayment(&current, amount)?;
        let saved = self.persist(&current, &next)?;
        tracing::info!(
            %id,
            %amount,
            paid = %saved.paid_amount,
            outstanding = %saved.outstanding(),
            "repayment recorded"
        );
        self.notifier.notify(&LifecycleEvent::repaid(&saved, amount));
        Ok(saved)
    }

    fn persist_decision(
        &self,
        current: &LoanApplication,
        outcome: Decision,
    ) -> Result<LoanApplication> {
        let next = lifecycle::decide(current, outcome)?;
        let saved = self.persist(current, &next)?;
        tracing::info!(id = %saved.id_string(), %outcome, "application decided");
        self.notifier
            .notify(&LifecycleEvent::decided(&saved, outcome));
        Ok(saved)
    }

    fn persist(&self, before: &LoanApplication, after: &LoanApplication) -> Result<LoanApplication> {
        let id = before.id.ok_or(StoreError::MissingId)?;
        let patch = ApplicationPatch::between(before, after);
        Ok(self.store.update(id, &patch)?)
    }
}
