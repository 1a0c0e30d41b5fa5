// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::models::{Decision, LoanApplication};

/// Chooses approve or reject for a pending application. The lifecycle only checks that the
/// transition is legal; how the outcome is picked lives behind this trait.
pub trait DecisionPolicy {
    fn decide(&self, application: &LoanApplication) -> Decision;

    fn name(&self) -> &'static str;
}

/// An administrator's explicit call.
#[derive(Debug, Clone, Copy)]
pub struct ManualDecision(pub Decision);

impl DecisionPolicy for ManualDecision {
    fn decide(&self, _application: &LoanApplication) -> Decision {
        self.0
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

/// Approves with a fixed probability, independent of the application.
pub struct CoinFlip {
    rng: Mutex<StdRng>,
    approve_probability: f64,
}

impl CoinFlip {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            approve_probability: 0.5,
        }
    }

    pub fn with_probability(mut self, p: f64) -> Self {
        self.approve_probability = p.clamp(0.0, 1.0);
        self
    }
}

impl Default for CoinFlip {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionPolicy for CoinFlip {
    fn decide(&self, _application: &LoanApplication) -> Decision {
        let approved = match self.rng.lock() {
            Ok(mut rng) => rng.gen_bool(self.approve_probability),
            Err(poisoned) => poisoned.into_inner().gen_bool(self.approve_probability),
        };
        if approved {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }

    fn name(&self) -> &'static str {
        "coin-flip"
    }
}

/// Approves when principal and term both sit within configured limits.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    pub max_principal: Decimal,
    pub max_period: u32,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            max_principal: Decimal::from(50_000),
            max_period: 6,
        }
    }
}

impl DecisionPolicy for ThresholdPolicy {
    fn decide(&self, application: &LoanApplication) -> Decision {
        if application.principal <= self.max_principal && application.period <= self.max_period {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}

/// Policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    CoinFlip,
    Threshold,
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coin-flip" | "coinflip" | "random" => Ok(PolicyKind::CoinFlip),
            "threshold" | "rules" => Ok(PolicyKind::Threshold),
            other => Err(format!("unknown policy '{}' (use coin-flip|threshold)", other)),
        }
    }
}
