//! Payslip eligibility and pro-ration.
//!
//! An employee may receive a payslip for any month up to and including
//! the month they joined in.  Joining after the first of that month
//! means the month's pay is pro-rated by the number of days worked.

use crate::error::CtcError;
use crate::models::{EligibilityResult, PayPeriod};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to conclude about an employee whose joining date is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingJoiningDatePolicy {
    /// Treat the employee as eligible for every period, full month.
    #[default]
    Eligible,
    /// Exclude the employee from every period.
    Ineligible,
}

impl FromStr for MissingJoiningDatePolicy {
    type Err = CtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eligible" => Ok(Self::Eligible),
            "ineligible" => Ok(Self::Ineligible),
            other => Err(CtcError::InvalidPolicy(format!(
                "unknown missing joining date policy `{}`",
                other
            ))),
        }
    }
}

/// Decides payslip eligibility for joining dates against pay periods.
///
/// The evaluator is a plain value; copy it freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EligibilityEvaluator {
    pub on_missing_joining_date: MissingJoiningDatePolicy,
}

impl EligibilityEvaluator {
    pub fn new(on_missing_joining_date: MissingJoiningDatePolicy) -> Self {
        Self {
            on_missing_joining_date,
        }
    }

    /// Whether an employee who joined on `joining_date` is owed a payslip
    /// for `period`, i.e. joined on or before the period's last day.
    pub fn is_eligible_for_period(&self, joining_date: Option<NaiveDate>, period: PayPeriod) -> bool {
        match joining_date {
            Some(date) => (date.year(), date.month()) <= (period.year(), period.month()),
            None => self.on_missing_joining_date == MissingJoiningDatePolicy::Eligible,
        }
    }

    /// Eligibility plus the pro-ration figures for a partial month.
    pub fn pro_ration_info(&self, joining_date: Option<NaiveDate>, period: PayPeriod) -> EligibilityResult {
        if !self.is_eligible_for_period(joining_date, period) {
            return EligibilityResult::ineligible();
        }
        let date = match joining_date {
            Some(date) if period.contains(date) && date.day() > 1 => date,
            _ => return EligibilityResult::full_month(),
        };

        let total_days = period.days_in_month();
        let working_days = total_days - date.day() + 1;
        let percentage = (f64::from(working_days) / f64::from(total_days) * 100.0).round() as u32;
        EligibilityResult {
            is_eligible: true,
            is_pro_rated: true,
            working_days: Some(working_days),
            total_days_in_month: Some(total_days),
            percentage: Some(percentage),
        }
    }
}
