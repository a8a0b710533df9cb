//! Client settings persistence.
//!
//! Stores settings in the platform-specific config directory:
//! - Linux: ~/.config/pulse/settings.json
//! - macOS: ~/Library/Application Support/pulse/settings.json
//! - Windows: %APPDATA%/pulse/settings.json
//!
//! Environment variables override the file:
//! `PULSE_API_URL`, `PULSE_WORKSPACE_ID`, `PULSE_DEBOUNCE_MS`,
//! `PULSE_TIMEOUT_MS`.

use std::path::{Path, PathBuf};

use pulse_domain::ClientSettings;
use tokio::fs;
use tracing::debug;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Overrides the backend base URL.
pub const ENV_API_URL: &str = "PULSE_API_URL";
/// Overrides the workspace new requests are created in.
pub const ENV_WORKSPACE_ID: &str = "PULSE_WORKSPACE_ID";
/// Overrides the commit settle time, in milliseconds.
pub const ENV_DEBOUNCE_MS: &str = "PULSE_DEBOUNCE_MS";
/// Overrides the backend call timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "PULSE_TIMEOUT_MS";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// An environment override does not parse.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidOverride {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Repository for client settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository over the default settings file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Creates a repository over an explicit settings file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the default settings file, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pulse").join("settings.json"))
    }

    /// Returns the file this repository reads and writes.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads settings from the file, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an
    /// override is malformed.
    pub async fn load(&self) -> Result<ClientSettings, SettingsError> {
        let settings = match &self.path {
            Some(path) => Self::load_from(path).await?,
            None => ClientSettings::default(),
        };
        apply_overrides(settings, |name| std::env::var(name).ok())
    }

    /// Loads settings from a file without environment overrides.
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<ClientSettings, SettingsError> {
        if !fs::try_exists(path).await? {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(ClientSettings::default());
        }
        let content = fs::read(path).await?;
        Ok(from_json_bytes(&content)?)
    }

    /// Saves settings to the file, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no config directory or the write fails.
    pub async fn save(&self, settings: &ClientSettings) -> Result<(), SettingsError> {
        let path = self.path.as_deref().ok_or(SettingsError::NoConfigDir)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(path, to_json_stable_bytes(settings)?).await?;
        Ok(())
    }
}

/// Applies environment overrides read through `lookup`.
///
/// Blank values are ignored.
///
/// # Errors
///
/// Returns an error if a numeric override does not parse.
pub fn apply_overrides<F>(
    mut settings: ClientSettings,
    lookup: F,
) -> Result<ClientSettings, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = var(ENV_API_URL) {
        settings.api_base_url = url;
    }
    if let Some(workspace) = var(ENV_WORKSPACE_ID) {
        settings.workspace_id = Some(workspace);
    }
    if let Some(value) = var(ENV_DEBOUNCE_MS) {
        settings.commit_debounce_ms = parse_millis(ENV_DEBOUNCE_MS, value)?;
    }
    if let Some(value) = var(ENV_TIMEOUT_MS) {
        settings.request_timeout_ms = parse_millis(ENV_TIMEOUT_MS, value)?;
    }
    Ok(settings)
}

fn parse_millis(name: &'static str, value: String) -> Result<u64, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidOverride { name, value })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_path_ends_with_pulse_settings() {
        if let Some(path) = SettingsRepository::default_path() {
            assert!(path.ends_with("pulse/settings.json"));
        }
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsRepository::load_from(&dir.path().join("settings.json"))
            .await
            .unwrap();
        assert_eq!(settings, ClientSettings::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SettingsRepository::at(dir.path().join("nested").join("settings.json"));
        let settings = ClientSettings {
            api_base_url: "https://pulse.example.com".to_string(),
            workspace_id: Some("ws-1".to_string()),
            commit_debounce_ms: 250,
            ..ClientSettings::default()
        };

        repo.save(&settings).await.unwrap();
        let loaded = SettingsRepository::load_from(repo.path().unwrap())
            .await
            .unwrap();

        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "workspace_id": "ws-9" }"#).await.unwrap();

        let settings = SettingsRepository::load_from(&path).await.unwrap();

        assert_eq!(settings.workspace_id.as_deref(), Some("ws-9"));
        assert_eq!(settings.commit_debounce_ms, 500);
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").await.unwrap();

        let result = SettingsRepository::load_from(&path).await;

        assert!(matches!(result, Err(SettingsError::Serialization(_))));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let settings = apply_overrides(
            ClientSettings::default(),
            env(&[
                (ENV_API_URL, "https://staging.example.com"),
                (ENV_WORKSPACE_ID, "ws-2"),
                (ENV_DEBOUNCE_MS, " 100 "),
                (ENV_TIMEOUT_MS, ""),
            ]),
        )
        .unwrap();

        assert_eq!(settings.api_base_url, "https://staging.example.com");
        assert_eq!(settings.workspace_id.as_deref(), Some("ws-2"));
        assert_eq!(settings.commit_debounce_ms, 100);
        assert_eq!(settings.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_malformed_override_is_error() {
        let result = apply_overrides(ClientSettings::default(), env(&[(ENV_TIMEOUT_MS, "soon")]));
        assert!(matches!(
            result,
            Err(SettingsError::InvalidOverride {
                name: ENV_TIMEOUT_MS,
                ..
            })
        ));
    }
}
