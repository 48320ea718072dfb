//! Entry point for the CTC Engine binary.
//!
//! Running this binary starts an HTTP server exposing the CTC preview
//! and payslip planning API.  Configuration is read from the
//! environment (and a `.env` file, if present); see
//! [`ctc_engine::config::Config`].  Log output is controlled through
//! `RUST_LOG`.

use ctc_engine::config::Config;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_line_number(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {:#}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = ctc_engine::api::serve(config).await {
        error!("Error running server: {:#}", err);
        std::process::exit(1);
    }
}
