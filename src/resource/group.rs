//! User groups (tRPC)
//!
//! Homarr has no get-by-id procedure for groups, so single reads list all
//! groups and scan for the identifier. Creation only returns the new ID.

use super::select_first;
use crate::error::{HomarrError, Result, ResultExt};
use crate::homarr::client::HomarrClient;
use crate::homarr::decode;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A group as listed by `group.getAll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// List all groups
pub async fn list(client: &HomarrClient) -> Result<Vec<Group>> {
    let payload = client
        .trpc()
        .query("group.getAll", None)
        .await
        .context("list groups")?;
    decode("group.getAll payload", payload).context("list groups")
}

/// Find a group by ID in the full list
pub async fn get(client: &HomarrClient, id: &str) -> Result<Group> {
    let groups = list(client).await?;
    select_first(groups, |g| g.id == id).ok_or_else(|| HomarrError::not_found("group", id))
}

/// Create a group and return it as listed by the server
pub async fn create(client: &HomarrClient, name: &str) -> Result<Group> {
    let operation = || format!("create group {name:?}");

    let payload = client
        .trpc()
        .mutate("group.createGroup", &json!({ "name": name }))
        .await
        .with_context(operation)?;
    let id: String = decode("group.createGroup payload", payload).with_context(operation)?;

    tracing::info!("Created group {} ({})", name, id);
    get(client, &id).await.with_context(operation)
}

/// Rename a group, then read it back
pub async fn update(client: &HomarrClient, id: &str, name: &str) -> Result<Group> {
    let operation = || format!("update group {id}");

    client
        .trpc()
        .mutate("group.updateGroup", &json!({ "id": id, "name": name }))
        .await
        .with_context(operation)?;

    tracing::info!("Updated group {}", id);
    get(client, id).await.with_context(operation)
}

/// Delete a group
pub async fn delete(client: &HomarrClient, id: &str) -> Result<()> {
    client
        .trpc()
        .mutate("group.deleteGroup", &json!({ "id": id }))
        .await
        .with_context(|| format!("delete group {id}"))?;

    tracing::info!("Deleted group {}", id);
    Ok(())
}
