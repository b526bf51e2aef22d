//! Server settings (tRPC singleton)
//!
//! There is no identifier and nothing to create or delete: the whole
//! settings document is read with `serverSettings.getAll` and written back
//! with `serverSettings.saveSettings`.

use crate::error::{HomarrError, Result, ResultExt};
use crate::homarr::client::HomarrClient;
use crate::homarr::decode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub crawling_and_indexing: CrawlingAndIndexingSettings,
    #[serde(default)]
    pub board: BoardSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub culture: CultureSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub enable_general: bool,
    #[serde(default)]
    pub enable_widget_data: bool,
    #[serde(default)]
    pub enable_integration_data: bool,
    #[serde(default)]
    pub enable_user_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlingAndIndexingSettings {
    #[serde(default)]
    pub no_index: bool,
    #[serde(default)]
    pub no_follow: bool,
    #[serde(default)]
    pub no_translate: bool,
    #[serde(default)]
    pub no_site_links_search_box: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSettings {
    #[serde(default)]
    pub home_board_id: Option<String>,
    #[serde(default)]
    pub mobile_home_board_id: Option<String>,
    #[serde(default)]
    pub enable_status_by_default: bool,
    #[serde(default)]
    pub force_disable_status: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    #[serde(default)]
    pub default_color_scheme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureSettings {
    #[serde(default)]
    pub default_locale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSettings {
    #[serde(default)]
    pub default_search_engine_id: Option<String>,
}

/// Read all settings
pub async fn get(client: &HomarrClient) -> Result<ServerSettings> {
    let payload = client
        .trpc()
        .query("serverSettings.getAll", None)
        .await
        .context("read server settings")?;
    decode("serverSettings.getAll payload", payload).context("read server settings")
}

/// Overwrite all settings
pub async fn save(client: &HomarrClient, settings: &ServerSettings) -> Result<()> {
    client
        .trpc()
        .mutate("serverSettings.saveSettings", settings)
        .await
        .context("save server settings")?;

    tracing::info!("Saved server settings");
    Ok(())
}

/// Read-modify-write: fetch the current settings, apply `change`, save the
/// result and return the settings as re-read from the server.
///
/// Nothing is saved when `change` fails.
pub async fn modify<F>(client: &HomarrClient, change: F) -> Result<ServerSettings>
where
    F: FnOnce(&mut ServerSettings) -> Result<()>,
{
    let mut settings = get(client).await?;
    change(&mut settings).context("modify server settings")?;
    save(client, &settings).await?;
    get(client).await
}

/// Overlay a partial settings document onto `settings`.
///
/// Objects merge key by key; any other value replaces the current one.
/// Fields that [`ServerSettings`] does not model are rejected.
pub fn apply_patch(settings: &mut ServerSettings, patch: &Value) -> Result<()> {
    if !patch.is_object() {
        return Err(HomarrError::InvalidInput(
            "server settings patch must be a JSON object".to_string(),
        ));
    }

    let current =
        serde_json::to_value(&*settings).map_err(|e| HomarrError::decode("server settings", e))?;

    let mut unknown = Vec::new();
    unknown_fields(&current, patch, "", &mut unknown);
    if !unknown.is_empty() {
        return Err(HomarrError::InvalidInput(format!(
            "unknown server settings fields: {}",
            unknown.join(", ")
        )));
    }

    let merged = merge_json(current, patch.clone());
    *settings = serde_json::from_value(merged)
        .map_err(|e| HomarrError::decode("server settings patch", e))?;
    Ok(())
}

/// Collect dotted paths of `patch` keys that `known` does not have
fn unknown_fields(known: &Value, patch: &Value, prefix: &str, out: &mut Vec<String>) {
    let Some(fields) = patch.as_object() else {
        return;
    };

    for (key, value) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match known.get(key) {
            None => out.push(path),
            Some(nested) if nested.is_object() => unknown_fields(nested, value, &path, out),
            Some(_) => {},
        }
    }
}

fn merge_json(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        },
        (_, patch) => patch,
    }
}
