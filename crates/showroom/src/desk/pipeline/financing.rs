use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::domain::{FinancingTerms, ProposalType};

/// Loan durations the desk is allowed to offer, in months.
pub const ALLOWED_LOAN_TERMS: [u32; 7] = [24, 36, 48, 60, 72, 84, 96];

/// Validity window applied when the author does not pick an expiry date.
pub const DEFAULT_VALIDITY_DAYS: i64 = 14;

const DEFAULT_PAYMENT_TOLERANCE: f32 = 0.1;

/// Validation errors raised while normalizing a proposal's money fields.
#[derive(Debug, thiserror::Error)]
pub enum FinancingError {
    #[error("financing terms are required for non-cash proposals")]
    MissingTerms,
    #[error("down payment {down} exceeds total value {total}")]
    DownPaymentExceedsTotal { down: u32, total: u32 },
    #[error("loan term of {0} months is not offered")]
    UnsupportedLoanTerm(u32),
    #[error("interest rate must be a finite non-negative percentage, got {0}")]
    InvalidInterestRate(f32),
    #[error("valid-until date {valid_until} is not after the creation date {created_on}")]
    ValidityNotAfterCreation {
        valid_until: NaiveDate,
        created_on: NaiveDate,
    },
}

/// Validates the money fields of a draft and returns the terms that should
/// be stored. Cash drafts never store a schedule, whatever was submitted;
/// financing and leasing drafts must carry one that passes the bounds
/// checks. Operator-entered figures are kept verbatim, never re-derived.
pub fn resolve_terms(
    proposal_type: ProposalType,
    total_value: u32,
    terms: Option<FinancingTerms>,
) -> Result<Option<FinancingTerms>, FinancingError> {
    if !proposal_type.requires_terms() {
        return Ok(None);
    }

    let terms = terms.ok_or(FinancingError::MissingTerms)?;

    if terms.down_payment > total_value {
        return Err(FinancingError::DownPaymentExceedsTotal {
            down: terms.down_payment,
            total: total_value,
        });
    }

    if !ALLOWED_LOAN_TERMS.contains(&terms.loan_term_months) {
        return Err(FinancingError::UnsupportedLoanTerm(terms.loan_term_months));
    }

    if !terms.interest_rate.is_finite() || terms.interest_rate < 0.0 {
        return Err(FinancingError::InvalidInterestRate(terms.interest_rate));
    }

    Ok(Some(terms))
}

/// Resolves the expiry date for a proposal created on `created_on`. An
/// explicit date must fall strictly after the creation date.
pub fn resolve_validity(
    created_on: NaiveDate,
    requested: Option<NaiveDate>,
) -> Result<NaiveDate, FinancingError> {
    match requested {
        Some(valid_until) if valid_until <= created_on => {
            Err(FinancingError::ValidityNotAfterCreation {
                valid_until,
                created_on,
            })
        }
        Some(valid_until) => Ok(valid_until),
        None => Ok(created_on + Duration::days(DEFAULT_VALIDITY_DAYS)),
    }
}

/// Amortized monthly payment for the financed principal, or `None` when
/// the inputs do not describe a computable schedule.
pub fn expected_monthly_payment(total_value: u32, terms: &FinancingTerms) -> Option<f32> {
    if terms.loan_term_months == 0 || terms.down_payment > total_value {
        return None;
    }

    let principal = (total_value - terms.down_payment) as f32;
    let months = terms.loan_term_months as f32;
    let monthly_rate = terms.interest_rate / 100.0 / 12.0;

    let payment = if monthly_rate == 0.0 {
        principal / months
    } else {
        let growth = (1.0 + monthly_rate).powf(months);
        principal * monthly_rate * growth / (growth - 1.0)
    };

    payment.is_finite().then_some(payment)
}

/// Advisory verdict comparing the quoted monthly payment with the
/// amortized estimate. Surfaced on proposal views; never blocks a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCheck {
    Consistent,
    Review,
}

/// Tolerance dial for the advisory payment check.
#[derive(Debug, Clone)]
pub struct FinancingPolicy {
    payment_tolerance: f32,
}

impl FinancingPolicy {
    pub fn new(payment_tolerance: f32) -> Self {
        let sanitized = if payment_tolerance.is_finite() && payment_tolerance > 0.0 {
            payment_tolerance
        } else {
            DEFAULT_PAYMENT_TOLERANCE
        };

        Self {
            payment_tolerance: sanitized,
        }
    }

    pub fn payment_tolerance(&self) -> f32 {
        self.payment_tolerance
    }

    /// Flags a quoted payment that drifts beyond the tolerated fraction of
    /// the amortized estimate. One currency unit of absolute slack absorbs
    /// operator rounding to whole amounts.
    pub fn payment_check(&self, total_value: u32, terms: &FinancingTerms) -> PaymentCheck {
        let Some(expected) = expected_monthly_payment(total_value, terms) else {
            return PaymentCheck::Review;
        };

        let drift = (terms.monthly_payment as f32 - expected).abs();
        if drift <= expected * self.payment_tolerance + 1.0 {
            PaymentCheck::Consistent
        } else {
            PaymentCheck::Review
        }
    }
}

impl Default for FinancingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_TOLERANCE)
    }
}
