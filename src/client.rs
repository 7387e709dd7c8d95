//! Client side of both agent channels.
//!
//! Used by `agent-check-cli` and by the integration tests.

use serde::Serialize;
use std::str::FromStr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::state::{OperationalState, SetOutcome};

/// Errors that can occur while talking to an agent.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report line did not have the form `"<STATE> <IDLE>% "`.
    #[error("malformed report line: {0:?}")]
    MalformedReport(String),

    /// The control reply was neither `"<STATE> OK"` nor `"NOT SET"`.
    #[error("malformed control reply: {0:?}")]
    MalformedReply(String),

    /// The agent closed the control connection without replying.
    #[error("agent closed the connection without a reply")]
    NoReply,
}

/// One reading from the report channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Report {
    pub state: OperationalState,
    pub idle_percent: u8,
}

impl FromStr for Report {
    type Err = ClientError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || ClientError::MalformedReport(line.to_string());

        let body = line.strip_suffix('\n').ok_or_else(malformed)?;
        let body = body.strip_suffix(' ').ok_or_else(malformed)?;
        let (state, idle) = body.split_once(' ').ok_or_else(malformed)?;
        let idle = idle.strip_suffix('%').ok_or_else(malformed)?;

        let state = state.parse().map_err(|_| malformed())?;
        let idle_percent: u8 = idle.parse().map_err(|_| malformed())?;
        if idle_percent > 100 {
            return Err(malformed());
        }

        Ok(Report { state, idle_percent })
    }
}

/// Parse a control channel reply line.
pub fn parse_reply(line: &str) -> Result<SetOutcome, ClientError> {
    let body = line
        .strip_suffix('\n')
        .ok_or_else(|| ClientError::MalformedReply(line.to_string()))?;

    if body == "NOT SET" {
        return Ok(SetOutcome::Rejected);
    }
    body.strip_suffix(" OK")
        .and_then(|state| state.parse().ok())
        .map(SetOutcome::Applied)
        .ok_or_else(|| ClientError::MalformedReply(line.to_string()))
}

/// Read the current report from the agent's report channel.
pub async fn fetch_report<A: ToSocketAddrs>(addr: A) -> Result<Report, ClientError> {
    let mut stream = TcpStream::connect(addr).await?;
    let mut line = String::new();
    stream.read_to_string(&mut line).await?;
    line.parse()
}

/// Ask the agent to switch to `candidate` over the control channel.
pub async fn send_state<A: ToSocketAddrs>(addr: A, candidate: &str) -> Result<SetOutcome, ClientError> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(format!("{}\n", candidate).as_bytes()).await?;

    let mut line = String::new();
    stream.read_to_string(&mut line).await?;
    if line.is_empty() {
        return Err(ClientError::NoReply);
    }
    parse_reply(&line)
}
