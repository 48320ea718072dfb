//! CTC Engine library crate.
//!
//! This crate exposes the cost-to-company calculation, payslip
//! eligibility and payslip period validation core as reusable
//! modules, plus an HTTP API wrapping them.  The core modules are pure:
//! callers inject the current date and own whatever they persist.
//! External applications may call `compensation::calculate` or
//! `engine::plan_payslip_run` directly, or embed the API via
//! `api::build_router`.

pub mod api;
pub mod compensation;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod models;
pub mod tax;
pub mod validator;

pub use error::CtcError;
