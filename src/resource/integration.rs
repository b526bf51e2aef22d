//! Integrations (tRPC)
//!
//! Creation has two quirks. Homarr tests connectivity while creating, and a
//! failed check comes back as an `error` object inside a successful
//! envelope. A successful create returns nothing usable, so the new record
//! is located afterwards by its (name, kind) pair. Two integrations sharing
//! both make that lookup ambiguous; the first match wins.

use super::match_created;
use crate::error::{HomarrError, Result, ResultExt};
use crate::homarr::client::HomarrClient;
use crate::homarr::decode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// An integration as returned by Homarr.
///
/// Secret values are write-only and never come back; only their kinds do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub secrets: Vec<StoredSecret>,
}

/// Read-back view of a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSecret {
    pub kind: String,
}

/// A secret to store on an integration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub kind: String,
    pub value: String,
}

impl Secret {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// The common `apiKey` secret
    pub fn api_key(value: impl Into<String>) -> Self {
        Self::new("apiKey", value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("kind", &self.kind)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Input for `integration.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIntegration {
    pub name: String,
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub secrets: Vec<Secret>,
    #[serde(default)]
    pub attempt_search_engine_creation: bool,
}

/// Input for `integration.update`. The kind cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationUpdate {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub secrets: Vec<Secret>,
    #[serde(default)]
    pub app_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id: &'a str,
    #[serde(flatten)]
    update: &'a IntegrationUpdate,
}

/// Nested error reported by `integration.create`
#[derive(Debug, Default, Deserialize)]
struct NestedError {
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract the business error from a create payload, if any
pub(crate) fn application_error(payload: &Value) -> Option<HomarrError> {
    let error = payload.get("error").filter(|e| !e.is_null())?;

    let nested: NestedError = serde_json::from_value(error.clone()).unwrap_or_default();
    let message = nested
        .message
        .or_else(|| error.as_str().map(String::from))
        .unwrap_or_else(|| error.to_string());

    Some(HomarrError::Application {
        message,
        kind: nested.error_type.or(nested.name),
    })
}

/// List all integrations
pub async fn list(client: &HomarrClient) -> Result<Vec<Integration>> {
    let payload = client
        .trpc()
        .query("integration.all", None)
        .await
        .context("list integrations")?;
    decode("integration.all payload", payload).context("list integrations")
}

/// Get an integration by ID
pub async fn get(client: &HomarrClient, id: &str) -> Result<Integration> {
    let payload = client
        .trpc()
        .query("integration.byId", Some(&json!({ "id": id })))
        .await
        .with_context(|| format!("read integration {id}"))?;
    decode("integration.byId payload", payload).with_context(|| format!("read integration {id}"))
}

/// Create an integration and locate it by (name, kind).
///
/// A connectivity failure reported inside the payload aborts with
/// [`HomarrError::Application`] before any lookup is made.
pub async fn create(client: &HomarrClient, input: &NewIntegration) -> Result<Integration> {
    let operation = || format!("create integration {:?} ({})", input.name, input.kind);

    let payload = client
        .trpc()
        .mutate("integration.create", input)
        .await
        .with_context(operation)?;

    if let Some(err) = application_error(&payload) {
        tracing::error!("Integration {} rejected: {}", input.name, err);
        return Err(err).with_context(operation);
    }

    let integrations = list(client).await.with_context(operation)?;
    let created = match_created(
        integrations,
        "integration",
        format!("{}/{}", input.name, input.kind),
        |i| i.name == input.name && i.kind == input.kind,
    )
    .with_context(operation)?;

    tracing::info!("Created integration {} ({})", created.name, created.id);
    Ok(created)
}

/// Update an integration, then read it back
pub async fn update(
    client: &HomarrClient,
    id: &str,
    update: &IntegrationUpdate,
) -> Result<Integration> {
    client
        .trpc()
        .mutate("integration.update", &UpdateRequest { id, update })
        .await
        .with_context(|| format!("update integration {id}"))?;

    tracing::info!("Updated integration {}", id);
    get(client, id).await
}

/// Delete an integration
pub async fn delete(client: &HomarrClient, id: &str) -> Result<()> {
    client
        .trpc()
        .mutate("integration.delete", &json!({ "id": id }))
        .await
        .with_context(|| format!("delete integration {id}"))?;

    tracing::info!("Deleted integration {}", id);
    Ok(())
}
