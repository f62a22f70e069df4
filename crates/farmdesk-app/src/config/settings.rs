//! Settings loading and persistence
//!
//! `config.toml` lives in the config directory (`--config-dir`, else
//! `<config_dir>/farmdesk`). A missing or broken file never stops startup;
//! defaults are used and a warning is logged.

use std::path::{Path, PathBuf};

use farmdesk_core::prelude::*;

use super::types::Settings;

pub const CONFIG_FILENAME: &str = "config.toml";

/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "FARMDESK_API_URL";

/// Default configuration directory (`<config_dir>/farmdesk`).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("farmdesk")
}

/// Load settings from `config_dir/config.toml`, falling back to defaults.
///
/// Environment overrides are applied on top.
pub fn load_settings(config_dir: &Path) -> Settings {
    let mut settings = read_settings_file(&config_dir.join(CONFIG_FILENAME));
    apply_env_overrides(&mut settings);
    settings
}

fn read_settings_file(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply `FARMDESK_API_URL`.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            debug!("Using API base URL from {}", API_URL_ENV);
            settings.api.base_url = url.trim().to_string();
        }
    }
}

/// Save settings to `config_dir/config.toml`.
pub fn save_settings(config_dir: &Path, settings: &Settings) -> Result<()> {
    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

    let config_path = config_dir.join(CONFIG_FILENAME);
    write_atomic(&config_path, &format!("{}{}", CONFIG_HEADER, content))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

/// Write a default `config.toml` if none exists. Idempotent.
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    let config_path = config_dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Ok(());
    }
    write_atomic(&config_path, DEFAULT_CONFIG)?;
    info!("Created default config at {:?}", config_path);
    Ok(())
}

/// Write `content` to `path` via a temp file and rename.
///
/// Creates the parent directory if needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::config(format!("{:?} has no parent directory", path)))?;
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::config(format!("Failed to create {:?}: {}", dir, e)))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = dir.join(format!(".{}.tmp", file_name));

    std::fs::write(&temp_path, content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;
    Ok(())
}

const CONFIG_HEADER: &str = "# Farmdesk Configuration\n\n";

const DEFAULT_CONFIG: &str = r#"# Farmdesk Configuration

[api]
base_url = "http://localhost:3000/api"
# Read the bearer token from this environment variable
token_env = "FARMDESK_TOKEN"
timeout_secs = 30
# column_sync_endpoint = "/admin/table-columns"

[ui]
page_size = 25
show_error_details = false
icons = "unicode"

[behavior]
confirm_quit = true
validation_debounce_ms = 400
modal_exit_ms = 220

[export]
# directory = "/path/to/exports"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_load_settings_defaults() {
        let temp = tempdir().unwrap();
        std::env::remove_var(API_URL_ENV);
        let settings = load_settings(temp.path());

        assert!(settings.behavior.confirm_quit);
        assert_eq!(settings.api.base_url, "http://localhost:3000/api");
    }

    #[test]
    #[serial]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        std::env::remove_var(API_URL_ENV);
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "[behavior]\nconfirm_quit = false\n\n[ui]\npage_size = 50\n",
        )
        .unwrap();

        let settings = load_settings(temp.path());
        assert!(!settings.behavior.confirm_quit);
        assert_eq!(settings.ui.page_size, 50);
    }

    #[test]
    #[serial]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        std::env::remove_var(API_URL_ENV);
        std::fs::write(temp.path().join(CONFIG_FILENAME), "not valid toml {{{{").unwrap();

        let settings = load_settings(temp.path());
        assert!(settings.behavior.confirm_quit);
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        let temp = tempdir().unwrap();
        std::env::set_var(API_URL_ENV, "https://staging.example/api");
        let settings = load_settings(temp.path());
        std::env::remove_var(API_URL_ENV);

        assert_eq!(settings.api.base_url, "https://staging.example/api");
    }

    #[test]
    fn test_init_config_dir_writes_valid_defaults() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("farmdesk");

        init_config_dir(&dir).unwrap();

        let content = std::fs::read_to_string(dir.join(CONFIG_FILENAME)).unwrap();
        let settings: Settings = toml::from_str(&content).expect("default config is valid TOML");
        assert_eq!(settings.behavior.modal_exit_ms, 220);
    }

    #[test]
    fn test_init_config_dir_idempotent() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "[ui]\npage_size = 100\n").unwrap();

        init_config_dir(temp.path()).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("page_size = 100"));
    }

    #[test]
    #[serial]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        std::env::remove_var(API_URL_ENV);
        let mut settings = Settings::default();
        settings.ui.show_error_details = true;

        save_settings(temp.path(), &settings).unwrap();

        let content = std::fs::read_to_string(temp.path().join(CONFIG_FILENAME)).unwrap();
        assert!(content.starts_with("# Farmdesk Configuration"));
        assert!(load_settings(temp.path()).ui.show_error_details);
        assert!(!temp.path().join(".config.toml.tmp").exists());
    }
}
