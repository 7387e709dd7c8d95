//! Report channel handler.
//!
//! Writes `"<STATE> <IDLE>% \n"` and closes. The client sends nothing.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::health::IdleSampler;
use crate::observability::metrics;
use crate::state::{OperationalState, StateStore};

/// Render the report line.
pub fn format_report(state: OperationalState, idle_percent: u8) -> String {
    format!("{} {}% \n", state, idle_percent)
}

/// Serve one report connection.
///
/// The idle figure is sampled before the state is read, so the state written
/// is the one current at the end of the sampling window.
pub async fn handle_report<IO, S>(mut stream: IO, store: &dyn StateStore, sampler: &S) -> std::io::Result<()>
where
    IO: AsyncWrite + Unpin,
    S: IdleSampler,
{
    let idle_percent = sampler.sample_idle_percent().await;
    let state = store.get();
    metrics::record_idle_percent(idle_percent);

    tracing::trace!(state = %state, idle_percent, "Reporting");

    stream.write_all(format_report(state, idle_percent).as_bytes()).await?;
    stream.shutdown().await
}
