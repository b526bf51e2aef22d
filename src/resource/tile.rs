//! Dashboard tiles ("apps")
//!
//! The only resource on the REST API. Updates are a fire-and-forget PATCH,
//! so [`update`] re-reads the tile to return its current state.

use crate::error::{Result, ResultExt};
use crate::homarr::client::HomarrClient;
use crate::homarr::decode;
use reqwest::Method;
use serde::{Deserialize, Serialize};

const APPS_PATH: &str = "/api/apps";

/// A tile as stored by Homarr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    pub name: String,
    pub icon_url: String,
    /// Link opened when the tile is clicked
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ping_url: Option<String>,
}

/// Desired tile state for create and update.
///
/// Absent optional fields are sent as `null`, which clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileInput {
    pub name: String,
    pub icon_url: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ping_url: Option<String>,
}

impl TileInput {
    pub fn new(name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_url: icon_url.into(),
            ..Self::default()
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_ping_url(mut self, ping_url: impl Into<String>) -> Self {
        self.ping_url = Some(ping_url.into());
        self
    }
}

fn app_path(id: &str) -> String {
    format!("{}/{}", APPS_PATH, urlencoding::encode(id))
}

/// List all tiles
pub async fn list(client: &HomarrClient) -> Result<Vec<Tile>> {
    let payload = client.rest().query(APPS_PATH).await.context("list tiles")?;
    decode("tile list", payload).context("list tiles")
}

/// Get a single tile by ID
pub async fn get(client: &HomarrClient, id: &str) -> Result<Tile> {
    let payload = client
        .rest()
        .query(&app_path(id))
        .await
        .with_context(|| format!("read tile {id}"))?;
    decode("tile", payload).with_context(|| format!("read tile {id}"))
}

/// Create a tile. The server echoes the stored tile back.
pub async fn create(client: &HomarrClient, input: &TileInput) -> Result<Tile> {
    let operation = || format!("create tile {:?}", input.name);

    let payload = client
        .rest()
        .mutate(Method::POST, APPS_PATH, Some(input))
        .await
        .with_context(operation)?;
    let tile: Tile = decode("created tile", payload).with_context(operation)?;

    tracing::info!("Created tile {} ({})", tile.name, tile.id);
    Ok(tile)
}

/// Patch a tile, then read it back.
///
/// The PATCH endpoint replies without a body, so the returned tile always
/// comes from a follow-up GET.
pub async fn update(client: &HomarrClient, id: &str, input: &TileInput) -> Result<Tile> {
    client
        .rest()
        .mutate(Method::PATCH, &app_path(id), Some(input))
        .await
        .with_context(|| format!("update tile {id}"))?;

    tracing::info!("Updated tile {}", id);
    get(client, id).await
}

/// Delete a tile
pub async fn delete(client: &HomarrClient, id: &str) -> Result<()> {
    client
        .rest()
        .mutate::<()>(Method::DELETE, &app_path(id), None)
        .await
        .with_context(|| format!("delete tile {id}"))?;

    tracing::info!("Deleted tile {}", id);
    Ok(())
}
