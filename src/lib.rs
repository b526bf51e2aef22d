//! homarrctl - configuration client for Homarr dashboards
//!
//! Homarr serves one resource kind (tiles) over a REST API and everything
//! else over tRPC. This crate normalises both into typed operations:
//!
//! - [`homarr`] - transport and protocol adapters
//! - [`resource`] - create/read/update/delete per resource kind
//! - [`config`] - connection settings from flags, environment and file
//! - [`error`] - the error taxonomy shared by all of the above

pub mod config;
pub mod error;
pub mod homarr;
pub mod resource;

pub use config::{ConnectionConfig, Profile};
pub use error::{HomarrError, RemoteError, Result, ResultExt};
pub use homarr::client::HomarrClient;
pub use homarr::http::AuthMode;
