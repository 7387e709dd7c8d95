//! agent-check: load balancer agent-check sidecar.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 AGENT-CHECK                  │
//!                         │                                              │
//!   Load balancer poll    │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ──────────────────────┼─▶│  report  │──▶│  report  │──▶│   CPU    │  │
//!   ◀── "UP 87% \n" ──────┼──│ listener │   │ handler  │   │ sampler  │  │
//!                         │  └──────────┘   └────┬─────┘   └──────────┘  │
//!                         │                      │ get                   │
//!                         │                      ▼                       │
//!                         │                ┌───────────┐                 │
//!                         │                │   state   │                 │
//!                         │                │   store   │                 │
//!                         │                └───────────┘                 │
//!                         │                      ▲ set                   │
//!   Operator "drain\n"    │  ┌──────────┐   ┌────┴─────┐                 │
//!   ──────────────────────┼─▶│ control  │──▶│ control  │                 │
//!   ◀── "DRAIN OK\n" ─────┼──│ listener │   │ handler  │                 │
//!                         │  └──────────┘   └──────────┘                 │
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! Required environment: `AC_LISTEN_PORT` (report channel, all interfaces)
//! and `AC_TALK_PORT` (control channel, localhost).

use agent_check::config;
use agent_check::lifecycle::{self, signals, Shutdown};
use agent_check::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    logging::init_tracing(&config.observability)?;

    tracing::info!("agent-check v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        report = %config.report.bind_address,
        control = %config.control.bind_address,
        sample_window_ms = config.sampler.window_ms,
        "Configuration loaded"
    );

    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let agent = match lifecycle::start(&config, &shutdown).await {
        Ok(agent) => agent,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let signal = signals::wait_for_signal().await?;
    tracing::info!(signal, "Exiting on signal");

    shutdown.trigger();
    agent.join().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
