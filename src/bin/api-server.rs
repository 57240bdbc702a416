//! Chartscope API Server
//!
//! Serves chart analysis, market sentiment and market data to the dashboard.

use chartscope::config::AppConfig;
use chartscope::core::http::start_server;
use chartscope::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    let env = chartscope::config::get_environment();
    info!("Starting Chartscope API Server");
    info!(environment = %env, "Environment");
    info!(
        analysis_model = %config.gemini.analysis_model,
        sentiment_model = %config.gemini.sentiment_model,
        "Model configuration"
    );
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
