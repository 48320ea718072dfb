//! Payslip period validation.
//!
//! Checks a payslip generation request before it is sent to the payroll
//! backend.  Every rejection is a [`PeriodValidationResult`] carrying a
//! message for the user, not an error: asking for next month's payslips
//! is a mistake the UI reports, not a fault.

use crate::eligibility::EligibilityEvaluator;
use crate::models::{EmployeeJoiningRecord, PayPeriod, PayslipSelection, PeriodValidationResult};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

impl PayslipSelection {
    /// "All employees" selection for `roster`, counting those eligible
    /// for `period`.
    pub fn all_from_roster(
        roster: &[EmployeeJoiningRecord],
        period: PayPeriod,
        evaluator: &EligibilityEvaluator,
    ) -> Self {
        let eligible_count = roster
            .iter()
            .filter(|e| evaluator.is_eligible_for_period(e.joining_date, period))
            .count();
        PayslipSelection::All { eligible_count }
    }
}

/// Validates a request to generate payslips for `period`, as of
/// `current_date`.
///
/// Rules are applied in order and the first failure wins: future years,
/// future months, an empty selection, selected employees who had not
/// yet joined, and finally a period in which nobody was employed.
pub fn validate(
    current_date: NaiveDate,
    period: PayPeriod,
    selection: &PayslipSelection,
    evaluator: &EligibilityEvaluator,
) -> PeriodValidationResult {
    if period.year() > current_date.year() {
        return PeriodValidationResult::invalid("Cannot generate payslips for future years");
    }
    // `chrono` months are 1-indexed, same as `PayPeriod`.
    if period.year() == current_date.year() && period.month() > current_date.month() {
        return PeriodValidationResult::invalid("Cannot generate payslips for future months");
    }

    match selection {
        PayslipSelection::Selected { employees } => {
            if employees.is_empty() {
                return PeriodValidationResult::invalid("Please select at least one employee");
            }
            let ineligible: Vec<&str> = employees
                .iter()
                .filter(|e| !evaluator.is_eligible_for_period(e.joining_date, period))
                .map(EmployeeJoiningRecord::display_name)
                .collect();
            if !ineligible.is_empty() {
                debug!(count = ineligible.len(), period = %period.label(), "ineligible employees selected");
                return PeriodValidationResult::invalid(format!(
                    "Some selected employees joined after {}: {}",
                    period.label(),
                    ineligible.join(", ")
                ));
            }
        }
        PayslipSelection::All { eligible_count } => {
            if *eligible_count == 0 {
                return PeriodValidationResult::invalid(format!(
                    "No employees were working during {}. Please select a different period.",
                    period.label()
                ));
            }
        }
    }

    PeriodValidationResult::valid()
}
