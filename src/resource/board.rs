//! Boards (tRPC, read-only)
//!
//! Boards are only looked up, mainly to resolve home-board references in
//! server settings. There is no get-by-id procedure, so single reads scan
//! the full list.

use super::select_first;
use crate::error::{HomarrError, Result, ResultExt};
use crate::homarr::client::HomarrClient;
use crate::homarr::decode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_image_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub is_mobile_home: bool,
}

/// List all boards
pub async fn list(client: &HomarrClient) -> Result<Vec<Board>> {
    let payload = client
        .trpc()
        .query("board.getAllBoards", None)
        .await
        .context("list boards")?;
    decode("board.getAllBoards payload", payload).context("list boards")
}

/// Find a board by ID in the full list
pub async fn get(client: &HomarrClient, id: &str) -> Result<Board> {
    let boards = list(client).await?;
    select_first(boards, |b| b.id == id).ok_or_else(|| HomarrError::not_found("board", id))
}

