//! Data models for the CTC Engine.
//!
//! The `models` module defines the serialisable value types that flow
//! in and out of the compensation, eligibility and validation
//! components.  They derive `Serialize` and `Deserialize` so that a
//! front-end can post them as JSON, and they are serialised in
//! camelCase to match the payroll backend's payloads.  None of these
//! types are persisted by the engine itself.

use crate::error::CtcError;
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// Earliest year accepted for a [`PayPeriod`].
pub const MIN_YEAR: i32 = 2000;
/// Latest year accepted for a [`PayPeriod`].
pub const MAX_YEAR: i32 = 2100;

/// Base inputs to a CTC calculation.
///
/// All amounts are annual figures in whole or fractional currency
/// units.  Use [`CompensationForm`](crate::compensation::CompensationForm)
/// to build one from loosely typed form data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationInput {
    /// Basic salary.  A value of zero or less yields an all-zero
    /// breakdown.
    pub basic_salary: f64,
    /// Fixed allowances on top of HRA.
    #[serde(default)]
    pub allowances: f64,
    /// Bonuses included in the CTC.
    #[serde(default)]
    pub bonuses: f64,
    /// Whether the employee works in a metro city, which raises the
    /// HRA rate.  Defaults to `true` when unspecified.
    #[serde(default = "default_metro_city")]
    pub is_metro_city: bool,
}

fn default_metro_city() -> bool {
    true
}

impl CompensationInput {
    pub fn new(basic_salary: f64) -> Self {
        Self {
            basic_salary,
            allowances: 0.0,
            bonuses: 0.0,
            is_metro_city: default_metro_city(),
        }
    }
}

/// Derived salary components.  Every field is rounded to a whole
/// currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationBreakdown {
    /// House rent allowance, 50% of basic in a metro city, 40% elsewhere.
    pub hra: f64,
    /// Employer provident fund contribution, 12% of basic.
    pub pf_contribution: f64,
    /// Gratuity provision, 4.81% of basic.
    pub gratuity: f64,
    /// Total cost to company.  Summed from the unrounded components and
    /// rounded once.
    pub total_ctc: f64,
}

/// Tax deduction and resulting net pay for a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetPay {
    /// Tax withheld under the chosen deduction policy.
    pub tax_deduction: f64,
    /// Total CTC less provident fund and tax, never below zero.
    pub net_pay: f64,
}

/// An employee as seen by the eligibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeJoiningRecord {
    /// Opaque identifier assigned by the backend.
    pub employee_id: String,
    /// Display name used in validation messages.  When absent the
    /// identifier is shown instead.
    #[serde(default)]
    pub name: Option<String>,
    /// Date the employee joined.  `None` when the backend has no
    /// record of it; see
    /// [`MissingJoiningDatePolicy`](crate::eligibility::MissingJoiningDatePolicy).
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
}

impl EmployeeJoiningRecord {
    pub fn new(employee_id: impl Into<String>, joining_date: Option<NaiveDate>) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: None,
            joining_date,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name to show in messages, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.employee_id)
    }
}

#[derive(Deserialize)]
struct RawPayPeriod {
    month: u32,
    year: i32,
}

/// A calendar month for which payslips may be generated.
///
/// Months are 1-indexed.  A `PayPeriod` can only be obtained through
/// [`PayPeriod::new`], so every value in circulation is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPayPeriod")]
pub struct PayPeriod {
    // Field order matters for the derived `Ord`.
    year: i32,
    month: u32,
}

impl TryFrom<RawPayPeriod> for PayPeriod {
    type Error = CtcError;

    fn try_from(raw: RawPayPeriod) -> Result<Self, Self::Error> {
        PayPeriod::new(raw.month, raw.year)
    }
}

impl PayPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, CtcError> {
        if !(1..=12).contains(&month) {
            return Err(CtcError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CtcError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of calendar days in the month, accounting for leap years.
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        // The day before the first of next month.  Both dates exist for
        // any period that passed `PayPeriod::new`.
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    /// Whether `date` falls inside this calendar month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human readable label such as `"August 2025"`.
    pub fn label(&self) -> String {
        // `month` is validated on construction so the conversion cannot fail.
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        format!("{} {}", name, self.year)
    }
}

/// Outcome of an eligibility check for one employee and one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub is_eligible: bool,
    /// `true` when the employee joined after the first day of the
    /// period's month.
    pub is_pro_rated: bool,
    /// Days worked in the month, counting the joining day.  Only set
    /// when pro-rated.
    pub working_days: Option<u32>,
    /// Only set when pro-rated.
    pub total_days_in_month: Option<u32>,
    /// Share of the month's pay owed, 0–100.  `Some(100)` for a full
    /// month, `None` when not eligible.
    pub percentage: Option<u32>,
}

impl EligibilityResult {
    pub fn ineligible() -> Self {
        Self {
            is_eligible: false,
            is_pro_rated: false,
            working_days: None,
            total_days_in_month: None,
            percentage: None,
        }
    }

    pub fn full_month() -> Self {
        Self {
            is_eligible: true,
            is_pro_rated: false,
            working_days: None,
            total_days_in_month: None,
            percentage: Some(100),
        }
    }
}

/// Which employees a payslip run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PayslipSelection {
    /// Every employee on the roster.  Only the number of employees
    /// eligible for the period is needed to validate the run.
    #[serde(rename_all = "camelCase")]
    All { eligible_count: usize },
    /// An explicit list of employees.
    Selected { employees: Vec<EmployeeJoiningRecord> },
}

/// Result of validating a payslip generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodValidationResult {
    pub is_valid: bool,
    /// Reason the request was rejected.  Absent when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PeriodValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Body sent to the payroll backend to persist a CTC record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtcRecordPayload {
    pub employee_id: String,
    pub basic_salary: f64,
    pub hra: f64,
    pub allowances: f64,
    pub bonuses: f64,
    pub pf_contribution: f64,
    pub gratuity: f64,
    pub effective_from: NaiveDate,
    pub total_ctc: f64,
}

impl CtcRecordPayload {
    pub fn new(
        employee_id: impl Into<String>,
        input: &CompensationInput,
        breakdown: &CompensationBreakdown,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            basic_salary: input.basic_salary,
            hra: breakdown.hra,
            allowances: input.allowances,
            bonuses: input.bonuses,
            pf_contribution: breakdown.pf_contribution,
            gratuity: breakdown.gratuity,
            effective_from,
            total_ctc: breakdown.total_ctc,
        }
    }
}

/// Body sent to the payroll backend to generate payslips.  A `None`
/// list of employee ids means every eligible employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipGenerationRequest {
    pub month: u32,
    pub year: i32,
    pub employee_ids: Option<Vec<String>>,
}
