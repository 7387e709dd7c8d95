//! Agent server: wires both channels to their handlers.
//!
//! # Responsibilities
//! - Own the injected state store and CPU sampler
//! - Run the report and control accept loops side by side
//! - Report how each loop ended

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::handlers::{handle_control, handle_report};
use crate::health::IdleSampler;
use crate::net::{Channel, Listener, ListenerError};
use crate::state::StateStore;

/// How each channel's accept loop ended.
#[derive(Debug)]
pub struct ServerExit {
    pub report: Result<(), ListenerError>,
    pub control: Result<(), ListenerError>,
}

/// The agent's two TCP channels sharing one operational state.
pub struct AgentServer<S> {
    store: Arc<dyn StateStore>,
    sampler: Arc<S>,
}

impl<S: IdleSampler> AgentServer<S> {
    pub fn new(store: Arc<dyn StateStore>, sampler: Arc<S>) -> Self {
        Self { store, sampler }
    }

    /// Serve both channels until shutdown.
    ///
    /// An accept failure ends only the channel it happened on.
    pub async fn run(
        self,
        report: Listener,
        control: Listener,
        shutdown: broadcast::Receiver<()>,
    ) -> ServerExit {
        debug_assert_eq!(report.channel(), Channel::Report);
        debug_assert_eq!(control.channel(), Channel::Control);

        let report_loop = {
            let store = Arc::clone(&self.store);
            let sampler = Arc::clone(&self.sampler);
            report.serve(
                move |stream, id| {
                    let store = Arc::clone(&store);
                    let sampler = Arc::clone(&sampler);
                    async move {
                        if let Err(e) = handle_report(stream, store.as_ref(), sampler.as_ref()).await {
                            tracing::debug!(channel = %Channel::Report, connection_id = %id, error = %e, "Report write failed");
                        }
                    }
                },
                shutdown.resubscribe(),
            )
        };

        let control_loop = {
            let store = Arc::clone(&self.store);
            control.serve(
                move |stream, id| {
                    let store = Arc::clone(&store);
                    async move {
                        match handle_control(stream, store.as_ref()).await {
                            Ok(outcome) => {
                                tracing::trace!(channel = %Channel::Control, connection_id = %id, ?outcome, "Control handled");
                            }
                            Err(e) => {
                                tracing::debug!(channel = %Channel::Control, connection_id = %id, error = %e, "Control I/O failed");
                            }
                        }
                    }
                },
                shutdown,
            )
        };

        let (report, control) = tokio::join!(report_loop, control_loop);
        tracing::info!("Agent server stopped");
        ServerExit { report, control }
    }
}
