//! Configuration for Farmdesk
//!
//! Supports:
//! - `config.toml` - Global settings (API, UI, behavior, export)
//! - `FARMDESK_API_URL` / token environment variable overrides

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, default_config_dir, init_config_dir, load_settings, save_settings,
    write_atomic, API_URL_ENV, CONFIG_FILENAME,
};
pub use types::*;
