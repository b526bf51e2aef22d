//! Homarr API interaction module
//!
//! Homarr exposes two incompatible protocols. Tiles ("apps") are served by a
//! conventional REST API authenticated with an `ApiKey` header; everything
//! else goes through tRPC, authenticated with the `authjs.session-token`
//! cookie and wrapped in a superjson envelope.
//!
//! # Module Structure
//!
//! - [`http`] - Transport: one request per call, credential selection, status checks
//! - [`rest`] - REST adapter (plain JSON bodies)
//! - [`trpc`] - tRPC adapter (envelope encoding, in-band errors)
//! - [`client`] - Main client tying the transport and both adapters together
//!
//! # Example
//!
//! ```no_run
//! use homarrctl::{ConnectionConfig, HomarrClient};
//! use homarrctl::resource::group;
//!
//! async fn example() -> homarrctl::Result<()> {
//!     let config = ConnectionConfig::new("https://homarr.example.com", None, Some("token".into()))?;
//!     let client = HomarrClient::new(config)?;
//!     let admins = group::create(&client, "Admins").await?;
//!     println!("{}", admins.id);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod rest;
pub mod trpc;

use crate::error::{HomarrError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a raw payload into the type expected at the call site
pub fn decode<T: DeserializeOwned>(what: &str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| HomarrError::decode(what, e))
}
