//! Resource operations
//!
//! One module per Homarr resource kind. Each operation takes the client
//! explicitly, performs its round trips in sequence and returns a typed
//! entity; nothing is cached between calls.
//!
//! # Architecture
//!
//! - [`tile`] - Dashboard tiles over REST; updates re-read after PATCH
//! - [`group`] - Groups over tRPC; reads scan the full list
//! - [`integration`] - Integrations; create checks nested errors, then matches by name and kind
//! - [`search_engine`] - Search engines; create matches by name and short code
//! - [`board`] - Boards (read-only)
//! - [`server_settings`] - Singleton settings document
//! - [`dispatch`] - Maps command-line (resource, action) pairs onto the above
//!
//! # Example
//!
//! ```no_run
//! use homarrctl::resource::tile::{self, TileInput};
//! use homarrctl::HomarrClient;
//!
//! async fn add_grafana(client: &HomarrClient) -> homarrctl::Result<()> {
//!     let input = TileInput::new("Grafana", "https://x/icon.png");
//!     let created = tile::create(client, &input).await?;
//!     tile::update(client, &created.id, &input.with_href("https://grafana.lan")).await?;
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod dispatch;
pub mod group;
pub mod integration;
pub mod search_engine;
pub mod server_settings;
pub mod tile;

use crate::error::{HomarrError, Result};

/// First item satisfying `matches`
pub(crate) fn select_first<T>(items: Vec<T>, matches: impl Fn(&T) -> bool) -> Option<T> {
    items.into_iter().find(|item| matches(item))
}

/// Locate a just-created record among `items` by a non-identifier key.
///
/// Homarr does not return the ID of some created records, so they are found
/// again by attributes the caller chose. With duplicates the first match is
/// returned and a warning is logged.
pub(crate) fn match_created<T>(
    items: Vec<T>,
    resource: &'static str,
    key: String,
    matches: impl Fn(&T) -> bool,
) -> Result<T> {
    let mut candidates = items.into_iter().filter(|item| matches(item));
    let Some(first) = candidates.next() else {
        return Err(HomarrError::not_found(resource, key));
    };

    let others = candidates.count();
    if others > 0 {
        tracing::warn!(
            "{} {} is ambiguous: {} other records share the key, using the first",
            resource,
            key,
            others
        );
    }

    Ok(first)
}
