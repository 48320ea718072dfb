//! CTC calculation.
//!
//! Derives HRA, provident fund, gratuity and total cost to company from
//! a [`CompensationInput`].  The calculation backs a live preview that
//! runs on every keystroke, so it never fails: an incomplete or
//! nonsensical input simply produces zeroes.

use crate::models::{CompensationBreakdown, CompensationInput, NetPay};
use crate::tax::TaxDeductionPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const METRO_HRA_RATE: f64 = 0.50;
pub const NON_METRO_HRA_RATE: f64 = 0.40;
pub const PF_RATE: f64 = 0.12;
pub const GRATUITY_RATE: f64 = 0.0481;

/// Rounds to a whole currency unit, halves going up.
///
/// Only ever applied to non-negative amounts, where `f64::round`
/// (half away from zero) and half-up agree.
pub fn round_currency(value: f64) -> f64 {
    value.round()
}

/// Replaces negative and non-finite amounts with zero.
fn coerce_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Computes the CTC breakdown for `input`.
///
/// Components are rounded individually for display, while the total is
/// summed from the unrounded components and rounded once.
pub fn calculate(input: &CompensationInput) -> CompensationBreakdown {
    let basic = input.basic_salary;
    if !basic.is_finite() || basic <= 0.0 {
        return CompensationBreakdown::default();
    }
    let allowances = coerce_amount(input.allowances);
    let bonuses = coerce_amount(input.bonuses);

    let hra_rate = if input.is_metro_city {
        METRO_HRA_RATE
    } else {
        NON_METRO_HRA_RATE
    };
    let hra = basic * hra_rate;
    let pf_contribution = basic * PF_RATE;
    let gratuity = basic * GRATUITY_RATE;
    let total_ctc = basic + hra + allowances + bonuses + pf_contribution + gratuity;

    CompensationBreakdown {
        hra: round_currency(hra),
        pf_contribution: round_currency(pf_contribution),
        gratuity: round_currency(gratuity),
        total_ctc: round_currency(total_ctc),
    }
}

/// Net pay after provident fund and tax, never below zero.
pub fn net_pay(total_ctc: f64, pf_contribution: f64, tax_deduction: f64) -> f64 {
    (total_ctc - pf_contribution - tax_deduction).max(0.0)
}

/// Applies a tax policy to `breakdown` and derives net pay from it.
pub fn net_pay_with(breakdown: &CompensationBreakdown, policy: &dyn TaxDeductionPolicy) -> NetPay {
    let tax_deduction = policy.deduction(breakdown);
    debug!(policy = policy.name(), tax_deduction, "computed tax deduction");
    NetPay {
        tax_deduction,
        net_pay: net_pay(breakdown.total_ctc, breakdown.pf_contribution, tax_deduction),
    }
}

/// Raw CTC form state as posted by a front-end.
///
/// Amounts may arrive as JSON numbers, numeric strings, empty strings or
/// nothing at all while the user is still typing.  [`into_input`] turns
/// whatever is there into a well-formed [`CompensationInput`].
///
/// [`into_input`]: CompensationForm::into_input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationForm {
    #[serde(default)]
    pub basic_salary: Option<Value>,
    #[serde(default)]
    pub allowances: Option<Value>,
    #[serde(default)]
    pub bonuses: Option<Value>,
    #[serde(default)]
    pub is_metro_city: Option<bool>,
}

impl CompensationForm {
    pub fn into_input(self) -> CompensationInput {
        CompensationInput {
            basic_salary: parse_amount("basicSalary", self.basic_salary.as_ref()),
            allowances: parse_amount("allowances", self.allowances.as_ref()),
            bonuses: parse_amount("bonuses", self.bonuses.as_ref()),
            is_metro_city: self.is_metro_city.unwrap_or(true),
        }
    }
}

/// Reads a loosely typed amount: numbers and numeric strings parse,
/// anything else (including negative or non-finite values) becomes 0.
pub(crate) fn parse_amount(field: &str, value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        Some(amount) => {
            debug!(field, amount, "coercing out of range amount to zero");
            0.0
        }
        None => {
            if let Some(raw) = value.filter(|v| !v.is_null()) {
                debug!(field, %raw, "coercing non-numeric amount to zero");
            }
            0.0
        }
    }
}
