//! Control channel handler.
//!
//! Reads one line, applies it as the new operational state, replies with
//! `"<STATE> OK\n"` or `"NOT SET\n"` and closes. Anything after the first
//! line is ignored.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::observability::metrics;
use crate::state::{SetOutcome, StateStore};

/// What happened on a control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Stream ended before a full line; nothing was written.
    Aborted,
    /// A line was applied and the outcome written back.
    Replied(SetOutcome),
}

/// Strip the trailing newline; `None` if the line never ended.
fn strip_terminator(line: &str) -> Option<&str> {
    line.strip_suffix('\n')
}

/// Serve one control connection.
pub async fn handle_control<IO>(stream: IO, store: &dyn StateStore) -> std::io::Result<ControlOutcome>
where
    IO: AsyncRead + AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();
    reader.read_until(b'\n', &mut raw).await?;

    let line = String::from_utf8_lossy(&raw);
    let Some(candidate) = strip_terminator(&line) else {
        tracing::debug!(bytes = raw.len(), "Control stream ended before newline");
        return Ok(ControlOutcome::Aborted);
    };

    let outcome = store.set(candidate);
    metrics::record_state_change(outcome);
    match outcome {
        SetOutcome::Applied(state) => tracing::info!(state = %state, "Operational state set"),
        SetOutcome::Rejected => tracing::warn!(candidate = %candidate, "Rejected unknown state"),
    }

    let stream = reader.get_mut();
    stream.write_all(format!("{}\n", outcome).as_bytes()).await?;
    stream.shutdown().await?;

    Ok(ControlOutcome::Replied(outcome))
}
