//! Payslip run planning.
//!
//! The `engine` module turns a roster and a requested period into a
//! [`PayslipRunPlan`]: per-employee eligibility, the validation outcome
//! and, when valid, the [`PayslipGenerationRequest`] to send to the
//! payroll backend.  It uses the [`rayon`] crate to evaluate large
//! rosters across multiple CPU cores.  Nothing here performs I/O; the
//! caller supplies the roster and the current date.

use crate::compensation::round_currency;
use crate::eligibility::EligibilityEvaluator;
use crate::error::CtcError;
use crate::models::{
    EligibilityResult, EmployeeJoiningRecord, PayPeriod, PayslipGenerationRequest, PayslipSelection,
    PeriodValidationResult,
};
use crate::validator::validate;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Eligibility of one employee for the planned period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeEligibility {
    pub employee_id: String,
    pub name: String,
    pub eligibility: EligibilityResult,
}

/// Outcome of planning a payslip run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRunPlan {
    pub period: PayPeriod,
    pub validation: PeriodValidationResult,
    /// Informational summary, only present for a valid plan.
    pub summary: Option<String>,
    /// One entry per employee in scope, in roster or selection order.
    pub employees: Vec<EmployeeEligibility>,
    /// Request to submit to the backend.  Only present for a valid plan.
    pub request: Option<PayslipGenerationRequest>,
}

/// Plans a payslip run for `period`.
///
/// With `employee_ids == None` the run covers the whole roster;
/// otherwise only the listed employees, who must all be on the roster.
pub fn plan_payslip_run(
    current_date: NaiveDate,
    period: PayPeriod,
    roster: &[EmployeeJoiningRecord],
    employee_ids: Option<&[String]>,
    evaluator: &EligibilityEvaluator,
) -> Result<PayslipRunPlan, CtcError> {
    let in_scope: Vec<&EmployeeJoiningRecord> = match employee_ids {
        None => roster.iter().collect(),
        Some(ids) => {
            let by_id: HashMap<&str, &EmployeeJoiningRecord> =
                roster.iter().map(|e| (e.employee_id.as_str(), e)).collect();
            ids.iter()
                .map(|id| {
                    by_id
                        .get(id.as_str())
                        .copied()
                        .ok_or_else(|| CtcError::UnknownEmployee(id.clone()))
                })
                .collect::<Result<_, _>>()?
        }
    };

    // Evaluate each employee's eligibility in parallel
    let employees: Vec<EmployeeEligibility> = in_scope
        .par_iter()
        .map(|record| EmployeeEligibility {
            employee_id: record.employee_id.clone(),
            name: record.display_name().to_string(),
            eligibility: evaluator.pro_ration_info(record.joining_date, period),
        })
        .collect();

    let eligible_count = employees.iter().filter(|e| e.eligibility.is_eligible).count();
    let selection = match employee_ids {
        None => PayslipSelection::All { eligible_count },
        Some(_) => PayslipSelection::Selected {
            employees: in_scope.iter().map(|&e| e.clone()).collect(),
        },
    };
    let validation = validate(current_date, period, &selection, evaluator);
    debug!(
        period = %period.label(),
        in_scope = employees.len(),
        eligible_count,
        valid = validation.is_valid,
        "planned payslip run"
    );

    let (summary, request) = if validation.is_valid {
        let pro_rated = employees.iter().filter(|e| e.eligibility.is_pro_rated).count();
        let summary = format!(
            "Ready to generate payslips for {} employee(s) for {} ({} pro-rated)",
            eligible_count,
            period.label(),
            pro_rated
        );
        let request = PayslipGenerationRequest {
            month: period.month(),
            year: period.year(),
            employee_ids: employee_ids.map(|ids| ids.to_vec()),
        };
        (Some(summary), Some(request))
    } else {
        (None, None)
    };

    Ok(PayslipRunPlan {
        period,
        validation,
        summary,
        employees,
        request,
    })
}

/// Share of `monthly_amount` owed for a period, per `eligibility`.
///
/// Returns zero for an ineligible employee and the full amount for a
/// full month.
pub fn prorated_amount(monthly_amount: f64, eligibility: &EligibilityResult) -> f64 {
    if !eligibility.is_eligible || !monthly_amount.is_finite() || monthly_amount <= 0.0 {
        return 0.0;
    }
    let percentage = eligibility.percentage.unwrap_or(100);
    round_currency(monthly_amount * f64::from(percentage) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster() -> Vec<EmployeeJoiningRecord> {
        vec![
            EmployeeJoiningRecord::new("E1", Some(date(2023, 4, 1))).with_name("Asha Rao"),
            EmployeeJoiningRecord::new("E2", Some(date(2025, 8, 15))).with_name("Vikram Iyer"),
            EmployeeJoiningRecord::new("E3", Some(date(2025, 9, 1))).with_name("Meera Nair"),
        ]
    }

    #[test]
    fn test_plan_all_employees() {
        let period = PayPeriod::new(8, 2025).unwrap();
        let plan = plan_payslip_run(
            date(2025, 8, 10),
            period,
            &roster(),
            None,
            &EligibilityEvaluator::default(),
        )
        .unwrap();

        assert!(plan.validation.is_valid);
        assert_eq!(plan.employees.len(), 3);
        assert_eq!(plan.employees[0].employee_id, "E1");
        assert_eq!(plan.employees[1].eligibility.percentage, Some(55));
        assert!(!plan.employees[2].eligibility.is_eligible);
        assert_eq!(
            plan.summary.as_deref(),
            Some("Ready to generate payslips for 2 employee(s) for August 2025 (1 pro-rated)")
        );
        assert_eq!(
            plan.request,
            Some(PayslipGenerationRequest {
                month: 8,
                year: 2025,
                employee_ids: None
            })
        );
    }

    #[test]
    fn test_plan_selected_with_late_joiner() {
        let ids = vec!["E1".to_string(), "E3".to_string()];
        let plan = plan_payslip_run(
            date(2025, 10, 2),
            PayPeriod::new(8, 2025).unwrap(),
            &roster(),
            Some(&ids),
            &EligibilityEvaluator::default(),
        )
        .unwrap();

        assert!(!plan.validation.is_valid);
        assert_eq!(
            plan.validation.message.as_deref(),
            Some("Some selected employees joined after August 2025: Meera Nair")
        );
        assert!(plan.request.is_none());
        assert!(plan.summary.is_none());
    }

    #[test]
    fn test_plan_selected_valid_carries_ids() {
        let ids = vec!["E2".to_string()];
        let plan = plan_payslip_run(
            date(2025, 8, 10),
            PayPeriod::new(8, 2025).unwrap(),
            &roster(),
            Some(&ids),
            &EligibilityEvaluator::default(),
        )
        .unwrap();
        assert_eq!(plan.request.unwrap().employee_ids, Some(ids));
    }

    #[test]
    fn test_plan_unknown_employee() {
        let ids = vec!["E9".to_string()];
        let err = plan_payslip_run(
            date(2025, 8, 10),
            PayPeriod::new(8, 2025).unwrap(),
            &roster(),
            Some(&ids),
            &EligibilityEvaluator::default(),
        )
        .unwrap_err();
        assert_eq!(err, CtcError::UnknownEmployee("E9".into()));
    }

    #[test]
    fn test_plan_period_before_anyone_joined() {
        let plan = plan_payslip_run(
            date(2025, 8, 10),
            PayPeriod::new(1, 2023).unwrap(),
            &roster(),
            None,
            &EligibilityEvaluator::default(),
        )
        .unwrap();
        assert_eq!(
            plan.validation.message.as_deref(),
            Some("No employees were working during January 2023. Please select a different period.")
        );
    }

    #[test]
    fn test_prorated_amount() {
        let pro_rated = EligibilityResult {
            is_eligible: true,
            is_pro_rated: true,
            working_days: Some(17),
            total_days_in_month: Some(31),
            percentage: Some(55),
        };
        assert_eq!(prorated_amount(50000.0, &pro_rated), 27500.0);
        assert_eq!(prorated_amount(50000.0, &EligibilityResult::full_month()), 50000.0);
        assert_eq!(prorated_amount(50000.0, &EligibilityResult::ineligible()), 0.0);
        assert_eq!(prorated_amount(-1.0, &EligibilityResult::full_month()), 0.0);
    }
}
