//! HTTP API for the CTC Engine.
//!
//! This module exposes the calculation and eligibility core over a
//! small REST API using the [`axum`](https://crates.io/crates/axum)
//! framework.  A front-end posts raw form state for a live CTC
//! preview, checks single employees' eligibility, and plans payslip
//! runs before submitting them to the payroll backend.  The API never
//! talks to that backend itself.

use crate::compensation::{calculate, net_pay_with, parse_amount, CompensationForm};
use crate::config::Config;
use crate::eligibility::EligibilityEvaluator;
use crate::engine::{plan_payslip_run, PayslipRunPlan};
use crate::error::CtcError;
use crate::models::{
    CompensationBreakdown, CtcRecordPayload, EligibilityResult, EmployeeJoiningRecord, PayPeriod,
};
use crate::tax::{EstimatedTaxDeduction, FlatTaxDeduction};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across requests.
pub struct AppState {
    pub evaluator: EligibilityEvaluator,
    pub estimated_tax: EstimatedTaxDeduction,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            evaluator: EligibilityEvaluator::new(config.missing_joining_date),
            estimated_tax: EstimatedTaxDeduction {
                rate: config.tax_estimate_rate,
            },
        }
    }
}

/// Wraps a [`CtcError`] so handlers can return it directly.
#[derive(Debug)]
pub struct ApiError(CtcError);

impl From<CtcError> for ApiError {
    fn from(err: CtcError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "rejecting request");
        let body = Json(serde_json::json!({"error": self.0.to_string()}));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtcPreviewRequest {
    #[serde(flatten)]
    pub form: CompensationForm,
    /// Flat tax entered by the administrator, coerced like the other
    /// form amounts.  When absent or null the tax is estimated from the
    /// total CTC.
    #[serde(default)]
    pub tax_deduction: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtcPreview {
    pub breakdown: CompensationBreakdown,
    pub tax_deduction: f64,
    pub net_pay: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtcRecordRequest {
    pub employee_id: String,
    pub effective_from: NaiveDate,
    #[serde(flatten)]
    pub form: CompensationForm,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub employee_ids: Option<Vec<String>>,
    pub roster: Vec<EmployeeJoiningRecord>,
}

/// Build the API router for the given configuration.
pub fn build_router(config: &Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(config));
    let router = Router::new()
        .route("/api/ctc/preview", post(preview_handler))
        .route("/api/ctc/record", post(record_handler))
        .route("/api/eligibility", post(eligibility_handler))
        .route("/api/payslips/plan", post(plan_handler))
        .with_state(state.clone());
    (router, state)
}

/// Handler for POST /api/ctc/preview
async fn preview_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CtcPreviewRequest>,
) -> Json<CtcPreview> {
    let breakdown = calculate(&request.form.into_input());
    let net = match request.tax_deduction.filter(|v| !v.is_null()) {
        Some(raw) => {
            let amount = parse_amount("taxDeduction", Some(&raw));
            net_pay_with(&breakdown, &FlatTaxDeduction(amount))
        }
        None => net_pay_with(&breakdown, &app_state.estimated_tax),
    };
    Json(CtcPreview {
        breakdown,
        tax_deduction: net.tax_deduction,
        net_pay: net.net_pay,
    })
}

/// Handler for POST /api/ctc/record
async fn record_handler(Json(request): Json<CtcRecordRequest>) -> Json<CtcRecordPayload> {
    let input = request.form.into_input();
    let breakdown = calculate(&input);
    Json(CtcRecordPayload::new(
        request.employee_id,
        &input,
        &breakdown,
        request.effective_from,
    ))
}

/// Handler for POST /api/eligibility
async fn eligibility_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<EligibilityRequest>,
) -> Result<Json<EligibilityResult>, ApiError> {
    let period = PayPeriod::new(request.month, request.year)?;
    Ok(Json(app_state.evaluator.pro_ration_info(request.joining_date, period)))
}

/// Handler for POST /api/payslips/plan
async fn plan_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PayslipRunPlan>, ApiError> {
    let period = PayPeriod::new(request.month, request.year)?;
    let today = Local::now().date_naive();
    let plan = plan_payslip_run(
        today,
        period,
        &request.roster,
        request.employee_ids.as_deref(),
        &app_state.evaluator,
    )?;
    Ok(Json(plan))
}

/// Launch the API server.  Binds to the configured address and blocks
/// until the server terminates (e.g. when interrupted).
pub async fn serve(config: Config) -> Result<()> {
    let (router, _state) = build_router(&config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on {}", config.bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
        let (router, _state) = build_router(&Config::default());
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_preview_with_estimated_tax() {
        let (status, body) = post_json(
            "/api/ctc/preview",
            json!({"basicSalary": "300000", "allowances": 50000, "bonuses": 50000}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakdown"]["totalCtc"], json!(600430.0));
        assert_eq!(body["taxDeduction"], json!(60043.0));
        assert_eq!(body["netPay"], json!(504387.0));
    }

    #[tokio::test]
    async fn test_preview_with_flat_tax_and_partial_form() {
        let (status, body) = post_json(
            "/api/ctc/preview",
            json!({"basicSalary": "", "taxDeduction": 1000}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakdown"]["totalCtc"], json!(0.0));
        assert_eq!(body["taxDeduction"], json!(1000.0));
        assert_eq!(body["netPay"], json!(0.0));
    }

    #[tokio::test]
    async fn test_preview_coerces_flat_tax_strings() {
        let (status, body) = post_json(
            "/api/ctc/preview",
            json!({"basicSalary": "300000", "taxDeduction": "5000"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakdown"]["totalCtc"], json!(500430.0));
        assert_eq!(body["taxDeduction"], json!(5000.0));
        assert_eq!(body["netPay"], json!(459430.0));

        for junk in ["", "abc"] {
            let (status, body) = post_json(
                "/api/ctc/preview",
                json!({"basicSalary": "300000", "taxDeduction": junk}),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "taxDeduction {:?}", junk);
            assert_eq!(body["taxDeduction"], json!(0.0));
            assert_eq!(body["netPay"], json!(464430.0));
        }
    }

    #[tokio::test]
    async fn test_preview_null_tax_is_estimated() {
        let (status, body) = post_json(
            "/api/ctc/preview",
            json!({"basicSalary": 300000, "taxDeduction": null}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["taxDeduction"], json!(50043.0));
    }

    #[tokio::test]
    async fn test_record_payload_shape() {
        let (status, body) = post_json(
            "/api/ctc/record",
            json!({
                "employeeId": "E7",
                "effectiveFrom": "2025-04-01",
                "basicSalary": 300000,
                "isMetroCity": false
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["employeeId"], json!("E7"));
        assert_eq!(body["hra"], json!(120000.0));
        assert_eq!(body["effectiveFrom"], json!("2025-04-01"));
        assert_eq!(body["totalCtc"], json!(470430.0));
    }

    #[tokio::test]
    async fn test_eligibility_endpoint() {
        let (status, body) = post_json(
            "/api/eligibility",
            json!({"joiningDate": "2025-08-15", "month": 8, "year": 2025}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isProRated"], json!(true));
        assert_eq!(body["workingDays"], json!(17));
        assert_eq!(body["percentage"], json!(55));
    }

    #[tokio::test]
    async fn test_eligibility_rejects_bad_month() {
        let (status, body) = post_json("/api/eligibility", json!({"month": 13, "year": 2025})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("month must be between 1 and 12, got 13"));
    }

    #[tokio::test]
    async fn test_plan_endpoint() {
        let (status, body) = post_json(
            "/api/payslips/plan",
            json!({
                "month": 1,
                "year": 2024,
                "roster": [
                    {"employeeId": "E1", "name": "Asha Rao", "joiningDate": "2023-06-01"},
                    {"employeeId": "E2", "joiningDate": "2024-01-10"}
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validation"]["isValid"], json!(true));
        assert_eq!(body["request"], json!({"month": 1, "year": 2024, "employeeIds": null}));
        assert_eq!(body["employees"][1]["eligibility"]["workingDays"], json!(22));
    }

    #[tokio::test]
    async fn test_plan_unknown_employee() {
        let (status, body) = post_json(
            "/api/payslips/plan",
            json!({"month": 1, "year": 2024, "employeeIds": ["E9"], "roster": []}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("employee E9 is not on the roster"));
    }
}
