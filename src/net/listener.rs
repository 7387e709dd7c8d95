//! TCP listener and accept loop.
//!
//! # Responsibilities
//! - Bind a channel's configured address
//! - Accept incoming TCP connections
//! - Spawn one task per connection, with no concurrency cap
//! - Stop on accept failure or shutdown signal

use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use super::connection::{ConnectionId, ConnectionTracker};
use super::Channel;
use crate::config::ChannelConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {channel} channel to {address}: {source}")]
    Bind {
        channel: Channel,
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Failed to accept connection.
    #[error("failed to accept on {channel} channel: {source}")]
    Accept {
        channel: Channel,
        #[source]
        source: std::io::Error,
    },
}

/// A bound listener for one channel.
///
/// Every accepted connection runs on its own task. Nothing limits how many
/// run at once, so a connection flood can exhaust file descriptors.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    channel: Channel,
    tracker: ConnectionTracker,
}

impl Listener {
    /// Bind to the channel's configured address.
    pub async fn bind(channel: Channel, config: &ChannelConfig) -> Result<Self, ListenerError> {
        let bind_err = |source| ListenerError::Bind {
            channel,
            address: config.bind_address.clone(),
            source,
        };

        let listener = TcpListener::bind(config.bind_address.as_str())
            .await
            .map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        tracing::info!(
            channel = %channel,
            address = %local_addr,
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            channel,
            tracker: ConnectionTracker::new(channel),
        })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Connections currently being handled.
    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    /// Accept connections until shutdown or an accept error.
    ///
    /// `handler` is invoked once per connection and its future spawned, so
    /// the loop goes straight back to accepting. The listening socket is
    /// closed when this returns.
    pub async fn serve<F, Fut>(
        self,
        handler: F,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError>
    where
        F: Fn(TcpStream, ConnectionId) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        loop {
            let accepted = tokio::select! {
                accepted = self.inner.accept() => accepted,
                _ = shutdown.recv() => {
                    tracing::info!(channel = %self.channel, "Listener received shutdown signal, exiting loop");
                    return Ok(());
                }
            };

            let (stream, peer_addr) = match accepted {
                Ok(conn) => conn,
                Err(source) => {
                    tracing::error!(channel = %self.channel, error = %source, "Accept failed, closing channel");
                    return Err(ListenerError::Accept {
                        channel: self.channel,
                        source,
                    });
                }
            };

            let guard = self.tracker.track();
            tracing::debug!(
                channel = %self.channel,
                connection_id = %guard.id(),
                peer_addr = %peer_addr,
                "Connection accepted"
            );

            let handling = handler(stream, guard.id());
            tokio::spawn(async move {
                handling.await;
                drop(guard);
            });
        }
    }
}
