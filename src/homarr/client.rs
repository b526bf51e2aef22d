//! Homarr Client
//!
//! Main client for interacting with a Homarr instance, combining the
//! transport with the REST and tRPC adapters.

use super::http::Transport;
use super::rest::RestApi;
use super::trpc::TrpcApi;
use crate::config::ConnectionConfig;
use crate::error::Result;

/// Main Homarr client.
///
/// Cloning is cheap and shares the underlying connection pool. The client
/// holds no per-entity state; callers must serialize operations on the same
/// entity themselves.
#[derive(Clone, Debug)]
pub struct HomarrClient {
    transport: Transport,
}

impl HomarrClient {
    /// Create a new Homarr client
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let transport = Transport::new(config)?;
        Ok(Self { transport })
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.transport.config()
    }

    /// REST adapter (API key)
    pub fn rest(&self) -> RestApi<'_> {
        RestApi::new(&self.transport)
    }

    /// tRPC adapter (session token)
    pub fn trpc(&self) -> TrpcApi<'_> {
        TrpcApi::new(&self.transport)
    }
}
