//! Search engines (tRPC)
//!
//! Listing goes through `searchEngine.getPaginated` with a single page of
//! [`PAGE_SIZE`] items; instances with more engines than that are not fully
//! listed. Creation returns nothing usable, so the new engine is located by
//! its (name, short) pair.

use super::match_created;
use crate::error::{Result, ResultExt};
use crate::homarr::client::HomarrClient;
use crate::homarr::decode;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Page size requested when listing
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchEngineType {
    #[default]
    Generic,
    FromIntegration,
}

/// A search engine as stored by Homarr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngine {
    pub id: String,
    pub name: String,
    pub short: String,
    #[serde(rename = "type", default)]
    pub engine_type: SearchEngineType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub url_template: Option<String>,
    #[serde(default)]
    pub integration_id: Option<String>,
}

/// Where results come from. Only the fields of the chosen type are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SearchEngineSource {
    /// Plain URL template with a `%s` placeholder for the query
    #[serde(rename_all = "camelCase")]
    Generic {
        icon_url: String,
        url_template: String,
    },
    /// Search delegated to an integration
    #[serde(rename_all = "camelCase")]
    FromIntegration { integration_id: String },
}

/// Desired search engine state for create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngineInput {
    pub name: String,
    pub short: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub source: SearchEngineSource,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    id: &'a str,
    #[serde(flatten)]
    input: &'a SearchEngineInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    items: Vec<SearchEngine>,
    #[serde(default)]
    total_count: Option<u64>,
}

/// List search engines (first page only)
pub async fn list(client: &HomarrClient) -> Result<Vec<SearchEngine>> {
    let input = json!({ "limit": PAGE_SIZE, "offset": 0 });
    let payload = client
        .trpc()
        .query("searchEngine.getPaginated", Some(&input))
        .await
        .context("list search engines")?;
    let page: Page = decode("searchEngine.getPaginated payload", payload).context("list search engines")?;

    if let Some(total) = page.total_count {
        if total > page.items.len() as u64 {
            tracing::warn!(
                "Homarr reports {} search engines but only {} were listed",
                total,
                page.items.len()
            );
        }
    }

    Ok(page.items)
}

/// Get a search engine by ID
pub async fn get(client: &HomarrClient, id: &str) -> Result<SearchEngine> {
    let payload = client
        .trpc()
        .query("searchEngine.byId", Some(&json!({ "id": id })))
        .await
        .with_context(|| format!("read search engine {id}"))?;
    decode("searchEngine.byId payload", payload)
        .with_context(|| format!("read search engine {id}"))
}

/// Create a search engine and locate it by (name, short)
pub async fn create(client: &HomarrClient, input: &SearchEngineInput) -> Result<SearchEngine> {
    let operation = || format!("create search engine {:?} ({})", input.name, input.short);

    client
        .trpc()
        .mutate("searchEngine.create", input)
        .await
        .with_context(operation)?;

    let engines = list(client).await.with_context(operation)?;
    let created = match_created(
        engines,
        "search engine",
        format!("{}/{}", input.name, input.short),
        |e| e.name == input.name && e.short == input.short,
    )
    .with_context(operation)?;

    tracing::info!("Created search engine {} ({})", created.name, created.id);
    Ok(created)
}

/// Update a search engine, then read it back
pub async fn update(
    client: &HomarrClient,
    id: &str,
    input: &SearchEngineInput,
) -> Result<SearchEngine> {
    client
        .trpc()
        .mutate("searchEngine.update", &UpdateRequest { id, input })
        .await
        .with_context(|| format!("update search engine {id}"))?;

    tracing::info!("Updated search engine {}", id);
    get(client, id).await
}

/// Delete a search engine
pub async fn delete(client: &HomarrClient, id: &str) -> Result<()> {
    client
        .trpc()
        .mutate("searchEngine.delete", &json!({ "id": id }))
        .await
        .with_context(|| format!("delete search engine {id}"))?;

    tracing::info!("Deleted search engine {}", id);
    Ok(())
}
