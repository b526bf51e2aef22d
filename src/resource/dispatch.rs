//! Resource Dispatch
//!
//! Maps a (resource, action) pair from the command line onto the typed
//! entity operations. Inputs arrive as JSON and results leave as JSON.

use super::{board, group, integration, search_engine, server_settings, tile};
use crate::homarr::client::HomarrClient;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Tile,
    Group,
    Integration,
    SearchEngine,
    Board,
    ServerSettings,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Group => "group",
            Self::Integration => "integration",
            Self::SearchEngine => "search-engine",
            Self::Board => "board",
            Self::ServerSettings => "server-settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Run one action against one resource kind.
///
/// `id` is required by get/update/delete on resources that have one.
/// `params` carries the JSON body for create/update. Delete returns
/// `{"deleted": <id>}`.
pub async fn invoke(
    client: &HomarrClient,
    kind: ResourceKind,
    action: Action,
    id: Option<&str>,
    params: &Value,
) -> Result<Value> {
    tracing::debug!(
        "invoke: resource={}, action={}, id={:?}",
        kind.as_str(),
        action.as_str(),
        id
    );

    match kind {
        ResourceKind::Tile => invoke_tile(client, action, id, params).await,
        ResourceKind::Group => invoke_group(client, action, id, params).await,
        ResourceKind::Integration => invoke_integration(client, action, id, params).await,
        ResourceKind::SearchEngine => invoke_search_engine(client, action, id, params).await,
        ResourceKind::Board => invoke_board(client, action, id).await,
        ResourceKind::ServerSettings => invoke_server_settings(client, action, params).await,
    }
}

// =============================================================================
// REST
// =============================================================================

async fn invoke_tile(
    client: &HomarrClient,
    action: Action,
    id: Option<&str>,
    params: &Value,
) -> Result<Value> {
    match action {
        Action::List => to_json(tile::list(client).await?),
        Action::Get => to_json(tile::get(client, require_id(id)?).await?),
        Action::Create => {
            let input: tile::TileInput = parse_params(params)?;
            to_json(tile::create(client, &input).await?)
        },
        Action::Update => {
            let input: tile::TileInput = parse_params(params)?;
            to_json(tile::update(client, require_id(id)?, &input).await?)
        },
        Action::Delete => {
            let id = require_id(id)?;
            tile::delete(client, id).await?;
            Ok(deleted(id))
        },
    }
}

// =============================================================================
// tRPC
// =============================================================================

async fn invoke_group(
    client: &HomarrClient,
    action: Action,
    id: Option<&str>,
    params: &Value,
) -> Result<Value> {
    match action {
        Action::List => to_json(group::list(client).await?),
        Action::Get => to_json(group::get(client, require_id(id)?).await?),
        Action::Create => {
            let name = get_param_str(params, "name")?;
            to_json(group::create(client, &name).await?)
        },
        Action::Update => {
            let name = get_param_str(params, "name")?;
            to_json(group::update(client, require_id(id)?, &name).await?)
        },
        Action::Delete => {
            let id = require_id(id)?;
            group::delete(client, id).await?;
            Ok(deleted(id))
        },
    }
}

async fn invoke_integration(
    client: &HomarrClient,
    action: Action,
    id: Option<&str>,
    params: &Value,
) -> Result<Value> {
    match action {
        Action::List => to_json(integration::list(client).await?),
        Action::Get => to_json(integration::get(client, require_id(id)?).await?),
        Action::Create => {
            let input: integration::NewIntegration = parse_params(params)?;
            to_json(integration::create(client, &input).await?)
        },
        Action::Update => {
            let update: integration::IntegrationUpdate = parse_params(params)?;
            to_json(integration::update(client, require_id(id)?, &update).await?)
        },
        Action::Delete => {
            let id = require_id(id)?;
            integration::delete(client, id).await?;
            Ok(deleted(id))
        },
    }
}

async fn invoke_search_engine(
    client: &HomarrClient,
    action: Action,
    id: Option<&str>,
    params: &Value,
) -> Result<Value> {
    match action {
        Action::List => to_json(search_engine::list(client).await?),
        Action::Get => to_json(search_engine::get(client, require_id(id)?).await?),
        Action::Create => {
            let input: search_engine::SearchEngineInput = parse_params(params)?;
            to_json(search_engine::create(client, &input).await?)
        },
        Action::Update => {
            let input: search_engine::SearchEngineInput = parse_params(params)?;
            to_json(search_engine::update(client, require_id(id)?, &input).await?)
        },
        Action::Delete => {
            let id = require_id(id)?;
            search_engine::delete(client, id).await?;
            Ok(deleted(id))
        },
    }
}

async fn invoke_board(client: &HomarrClient, action: Action, id: Option<&str>) -> Result<Value> {
    match action {
        Action::List => to_json(board::list(client).await?),
        Action::Get => to_json(board::get(client, require_id(id)?).await?),
        _ => Err(unsupported(ResourceKind::Board, action)),
    }
}

async fn invoke_server_settings(
    client: &HomarrClient,
    action: Action,
    params: &Value,
) -> Result<Value> {
    match action {
        Action::Get => to_json(server_settings::get(client).await?),
        Action::Update => {
            let updated = server_settings::modify(client, |settings| {
                server_settings::apply_patch(settings, params)
            })
            .await?;
            to_json(updated)
        },
        _ => Err(unsupported(ResourceKind::ServerSettings, action)),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn require_id(id: Option<&str>) -> Result<&str> {
    id.filter(|s| !s.is_empty())
        .context("Missing required argument: id")
}

fn get_param_str(params: &Value, key: &str) -> Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .context(format!("Missing required parameter: {}", key))
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T> {
    serde_json::from_value(params.clone()).context("Invalid --data for this resource")
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize result")
}

fn deleted(id: &str) -> Value {
    serde_json::json!({ "deleted": id })
}

fn unsupported(kind: ResourceKind, action: Action) -> anyhow::Error {
    anyhow::anyhow!(
        "Action '{}' is not supported for {}",
        action.as_str(),
        kind.as_str()
    )
}
