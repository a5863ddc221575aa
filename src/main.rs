//! agent-demo-client entry point.
//!
//! Runs one scripted session against the configured agent server and
//! exits with status 0 however the session ends.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use agent_demo_client::client::DemoClient;
use agent_demo_client::config::ClientConfig;
use agent_demo_client::shutdown::install_interrupt_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_json);

    let shutdown = install_interrupt_handler();
    let client = DemoClient::new(config);
    info!(
        url = %client.config().url,
        session_id = %client.session_id(),
        "starting agent-demo-client"
    );

    match client.run(shutdown).await {
        Ok(report) => {
            info!(
                malformed = report.malformed_count(),
                close_acknowledged = report.close_acknowledged,
                "session finished"
            );
        }
        Err(err) => {
            error!(error = %err, "websocket error");
            info!("disconnected from server");
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
