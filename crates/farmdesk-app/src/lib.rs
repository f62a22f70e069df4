//! farmdesk-app - Application state and orchestration for Farmdesk
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! dashboard: navigation, paginated lists, column selection, record forms,
//! confirmation dialogs and CSV export. It never touches the terminal; the
//! TUI crate feeds it [`InputKey`]s and renders [`AppState`].

pub mod actions;
pub mod alert;
pub mod auth;
pub mod columns;
pub mod config;
pub mod confirm_dialog;
pub mod export;
pub mod form;
pub mod handler;
pub mod input_key;
pub mod list;
pub mod menu;
pub mod message;
pub mod modal;
pub mod preferences;
pub mod process;
pub mod request;
pub mod signals;
pub mod state;

// Re-export primary types
pub use auth::{Action, Capabilities, Claims};
pub use config::Settings;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::{InputKey, MouseClick};
pub use message::{Message, RequestFailure};
pub use preferences::{DynPreferences, FileStore, MemoryStore, Preferences};
pub use state::{AppState, FocusRegion, SessionStatus, UiMode};
