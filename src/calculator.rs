// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat-fee loan terms.
//!
//! Interest is charged once for the whole term: `principal * rate`, where the rate is the
//! category's base annual rate plus a flat 0.20 when the term runs longer than six months.
//! Stored applications carry numbers produced by exactly this formula.

use rust_decimal::Decimal;

use crate::error::LoanError;
use crate::models::{LoanCategory, LoanTerms};

/// Terms longer than this many months attract the surcharge.
pub const SURCHARGE_AFTER_MONTHS: u32 = 6;

pub fn long_term_surcharge() -> Decimal {
    Decimal::new(20, 2)
}

pub fn effective_rate(category: LoanCategory, period: u32) -> Decimal {
    if period > SURCHARGE_AFTER_MONTHS {
        category.base_rate() + long_term_surcharge()
    } else {
        category.base_rate()
    }
}

pub fn compute_terms(
    principal: Decimal,
    period: u32,
    category: LoanCategory,
) -> Result<LoanTerms, LoanError> {
    if principal <= Decimal::ZERO {
        return Err(LoanError::InvalidAmount(principal));
    }
    if period == 0 {
        return Err(LoanError::InvalidPeriod(0));
    }

    let interest_rate = effective_rate(category, period);
    let out_of_range = || LoanError::InvalidAmount(principal);
    let interest_amount = principal.checked_mul(interest_rate).ok_or_else(out_of_range)?;
    let total_amount = principal
        .checked_add(interest_amount)
        .ok_or_else(out_of_range)?;
    let periodic_payment = total_amount
        .checked_div(Decimal::from(period))
        .ok_or_else(out_of_range)?;

    Ok(LoanTerms {
        interest_rate,
        interest_amount,
        total_amount,
        periodic_payment,
    })
}

/// Parses category text at the input boundary, then computes terms.
pub fn compute_terms_for(
    principal: Decimal,
    period: i64,
    category: &str,
) -> Result<LoanTerms, LoanError> {
    let category: LoanCategory = category.parse()?;
    let period = u32::try_from(period)
        .ok()
        .filter(|p| *p > 0)
        .ok_or(LoanError::InvalidPeriod(period))?;
    compute_terms(principal, period, category)
}
