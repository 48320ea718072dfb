//! Tax deduction policies.
//!
//! Two ways of arriving at the tax withheld from a CTC are in use: an
//! administrator may type in a flat amount, or the deduction may be
//! estimated as a share of the total CTC.  Both are implementations of
//! the [`TaxDeductionPolicy`] trait so callers choose explicitly which
//! one applies, and net pay is always derived through the same
//! [`net_pay`](crate::compensation::net_pay) function.

use crate::compensation::round_currency;
use crate::models::CompensationBreakdown;
use serde::{Deserialize, Serialize};

/// Rate used by [`EstimatedTaxDeduction::default`].
pub const DEFAULT_TAX_ESTIMATE_RATE: f64 = 0.10;

/// Determines how much tax to deduct from a CTC breakdown.
///
/// Policies must be thread-safe (`Send + Sync`) because they are
/// shared across request handlers.
pub trait TaxDeductionPolicy: Send + Sync {
    /// Short name of the policy, used in logs.
    fn name(&self) -> &str;
    /// Tax to deduct for `breakdown`.  Never negative.
    fn deduction(&self, breakdown: &CompensationBreakdown) -> f64;
}

/// A caller-entered tax amount, applied as is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatTaxDeduction(pub f64);

impl TaxDeductionPolicy for FlatTaxDeduction {
    fn name(&self) -> &str {
        "flat"
    }

    fn deduction(&self, _breakdown: &CompensationBreakdown) -> f64 {
        if self.0.is_finite() && self.0 > 0.0 {
            self.0
        } else {
            0.0
        }
    }
}

/// Estimates tax as `round(total_ctc * rate)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedTaxDeduction {
    pub rate: f64,
}

impl Default for EstimatedTaxDeduction {
    fn default() -> Self {
        Self {
            rate: DEFAULT_TAX_ESTIMATE_RATE,
        }
    }
}

impl TaxDeductionPolicy for EstimatedTaxDeduction {
    fn name(&self) -> &str {
        "estimated"
    }

    fn deduction(&self, breakdown: &CompensationBreakdown) -> f64 {
        round_currency(breakdown.total_ctc * self.rate).max(0.0)
    }
}
