//! CPU idle sampling.
//!
//! # Responsibilities
//! - Take two system-wide CPU snapshots a short window apart
//! - Derive the idle percentage across that window
//!
//! # Design Decisions
//! - Each sample runs on the blocking pool, so the window only parks that thread
//! - A fresh measurement per sample: no state is shared between requests
//! - Best effort: a platform read failure reports 0, anything else is clamped to 0..=100

use std::future::Future;
use std::time::Duration;

use systemstat::{Platform, System};

use crate::config::SamplerConfig;

/// Source of the instantaneous CPU idle figure.
pub trait IdleSampler: Send + Sync + 'static {
    /// Idle percentage (0..=100) averaged over the sampling window.
    fn sample_idle_percent(&self) -> impl Future<Output = u8> + Send;
}

/// Samples system-wide CPU load through `systemstat`.
#[derive(Debug, Clone)]
pub struct SystemIdleSampler {
    window: Duration,
}

impl SystemIdleSampler {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.window())
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl IdleSampler for SystemIdleSampler {
    async fn sample_idle_percent(&self) -> u8 {
        let window = self.window;
        let measured = tokio::task::spawn_blocking(move || {
            let measurement = System::new().cpu_load_aggregate()?;
            std::thread::sleep(window);
            measurement.done()
        })
        .await;

        match measured {
            Ok(Ok(load)) => {
                tracing::trace!(idle = load.idle, window_ms = window.as_millis() as u64, "CPU sampled");
                idle_from_fraction(load.idle)
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "CPU load unavailable");
                0
            }
            Err(e) => {
                tracing::debug!(error = %e, "CPU sampling task failed");
                0
            }
        }
    }
}

/// Convert an idle fraction (0.0..=1.0) into a truncated percentage.
pub fn idle_from_fraction(idle: f32) -> u8 {
    if !idle.is_finite() {
        return 0;
    }
    (idle * 100.0).clamp(0.0, 100.0) as u8
}
