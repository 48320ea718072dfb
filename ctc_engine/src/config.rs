//! Runtime configuration loaded from the environment.

use crate::eligibility::MissingJoiningDatePolicy;
use crate::tax::DEFAULT_TAX_ESTIMATE_RATE;
use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub missing_joining_date: MissingJoiningDatePolicy,
    pub tax_estimate_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            missing_joining_date: MissingJoiningDatePolicy::default(),
            tax_estimate_rate: DEFAULT_TAX_ESTIMATE_RATE,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.  Unset
    /// variables take their defaults; malformed ones are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading environment `CTC_BIND_ADDR`");
        let bind_addr = lookup("CTC_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("`CTC_BIND_ADDR` is not a valid socket address")?;

        info!("Loading environment `CTC_MISSING_JOINING_DATE`");
        let missing_joining_date = match lookup("CTC_MISSING_JOINING_DATE") {
            Some(value) => value
                .parse::<MissingJoiningDatePolicy>()
                .context("`CTC_MISSING_JOINING_DATE` must be `eligible` or `ineligible`")?,
            None => MissingJoiningDatePolicy::default(),
        };

        info!("Loading environment `CTC_TAX_ESTIMATE_RATE`");
        let tax_estimate_rate = match lookup("CTC_TAX_ESTIMATE_RATE") {
            Some(value) => value
                .trim()
                .parse::<f64>()
                .context("`CTC_TAX_ESTIMATE_RATE` is not a number")?,
            None => DEFAULT_TAX_ESTIMATE_RATE,
        };
        if !(0.0..=1.0).contains(&tax_estimate_rate) {
            bail!("`CTC_TAX_ESTIMATE_RATE` must be between 0 and 1, got {}", tax_estimate_rate);
        }

        Ok(Config {
            bind_addr,
            missing_joining_date,
            tax_estimate_rate,
        })
    }
}
