//! Configuration types for Farmdesk
//!
//! Defines `Settings` (the `config.toml` file) and its sections.

use std::path::PathBuf;
use std::time::Duration;

use farmdesk_api::ApiConfig;
use serde::{Deserialize, Serialize};

/// Page sizes offered by the table pager, in cycle order.
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// Application settings (`config.toml`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl Settings {
    /// Client configuration with the token resolved from settings or env.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api.base_url.clone(),
            token: self.api.resolve_token(),
            timeout: Duration::from_secs(self.api.timeout_secs.max(1)),
            column_sync_endpoint: self
                .api
                .column_sync_endpoint
                .clone()
                .filter(|e| !e.trim().is_empty()),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL every resource path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Prefer `token_env` so the token stays out of the file.
    #[serde(default)]
    pub token: Option<String>,

    /// Environment variable consulted when `token` is unset
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Endpoint receiving column visibility (skipped when unset)
    #[serde(default)]
    pub column_sync_endpoint: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
            column_sync_endpoint: None,
        }
    }
}

impl ApiSettings {
    /// The configured token, else the value of `token_env`.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Icon set used by the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconMode {
    /// Unicode symbols (default)
    #[default]
    Unicode,
    /// Plain ASCII for limited terminals
    Ascii,
}

impl std::fmt::Display for IconMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconMode::Unicode => write!(f, "unicode"),
            IconMode::Ascii => write!(f, "ascii"),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    /// Initial page size when no per-resource preference is stored
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Show technical error details in alerts (non-production use)
    #[serde(default)]
    pub show_error_details: bool,

    #[serde(default)]
    pub icons: IconMode,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            show_error_details: false,
            icons: IconMode::default(),
        }
    }
}

impl UiSettings {
    /// The configured page size snapped to one the pager offers.
    pub fn effective_page_size(&self) -> u32 {
        snap_page_size(self.page_size)
    }
}

/// Behavior settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Ask before quitting
    #[serde(default = "default_true")]
    pub confirm_quit: bool,

    /// Delay after the last keystroke before a uniqueness check is sent
    #[serde(default = "default_validation_debounce_ms")]
    pub validation_debounce_ms: u64,

    /// How long a closed modal stays mounted for its exit transition
    #[serde(default = "default_modal_exit_ms")]
    pub modal_exit_ms: u64,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            confirm_quit: true,
            validation_debounce_ms: default_validation_debounce_ms(),
            modal_exit_ms: default_modal_exit_ms(),
        }
    }
}

impl BehaviorSettings {
    pub fn validation_debounce(&self) -> Duration {
        Duration::from_millis(self.validation_debounce_ms)
    }

    pub fn modal_exit_delay(&self) -> Duration {
        Duration::from_millis(self.modal_exit_ms)
    }
}

/// CSV export settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Directory exports and templates are written to
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl ExportSettings {
    /// The configured directory, else the user's download directory, else
    /// the working directory.
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Closest offered page size at or above `size` (largest when above all).
pub fn snap_page_size(size: u32) -> u32 {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|s| *s >= size)
        .unwrap_or(PAGE_SIZES[PAGE_SIZES.len() - 1])
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_token_env() -> String {
    "FARMDESK_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    25
}

fn default_validation_debounce_ms() -> u64 {
    400
}

fn default_modal_exit_ms() -> u64 {
    220
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:3000/api");
        assert_eq!(settings.api.token_env, "FARMDESK_TOKEN");
        assert_eq!(settings.ui.page_size, 25);
        assert!(settings.behavior.confirm_quit);
        assert_eq!(settings.behavior.modal_exit_ms, 220);
        assert!(!settings.ui.show_error_details);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[api]
base_url = "https://farm.example/api"

[ui]
icons = "ascii"
"#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "https://farm.example/api");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.ui.icons, IconMode::Ascii);
        assert_eq!(settings.behavior.validation_debounce_ms, 400);
    }

    #[test]
    fn test_snap_page_size() {
        assert_eq!(snap_page_size(1), 10);
        assert_eq!(snap_page_size(25), 25);
        assert_eq!(snap_page_size(30), 50);
        assert_eq!(snap_page_size(500), 100);
    }

    #[test]
    #[serial]
    fn test_token_from_env() {
        let api = ApiSettings {
            token_env: "FARMDESK_TEST_TOKEN_A".into(),
            ..Default::default()
        };
        std::env::set_var("FARMDESK_TEST_TOKEN_A", "secret");
        assert_eq!(api.resolve_token().as_deref(), Some("secret"));
        std::env::remove_var("FARMDESK_TEST_TOKEN_A");
        assert_eq!(api.resolve_token(), None);
    }

    #[test]
    #[serial]
    fn test_explicit_token_beats_env() {
        let api = ApiSettings {
            token: Some("from-file".into()),
            token_env: "FARMDESK_TEST_TOKEN_B".into(),
            ..Default::default()
        };
        std::env::set_var("FARMDESK_TEST_TOKEN_B", "from-env");
        assert_eq!(api.resolve_token().as_deref(), Some("from-file"));
        std::env::remove_var("FARMDESK_TEST_TOKEN_B");
    }

    #[test]
    fn test_api_config_drops_blank_sync_endpoint() {
        let mut settings = Settings::default();
        settings.api.column_sync_endpoint = Some("  ".into());
        assert!(settings.api_config().column_sync_endpoint.is_none());
    }
}
