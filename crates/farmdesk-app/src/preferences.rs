//! User preferences service
//!
//! Small UI preferences (column visibility, page sizes, sidebar state) live
//! behind [`PreferenceStore`], a string key/value store. [`Preferences`]
//! layers typed accessors on top; values are JSON-encoded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use farmdesk_core::prelude::*;
use farmdesk_core::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::write_atomic;

pub const PREFERENCES_FILENAME: &str = "preferences.toml";

/// Column key → visible.
pub type ColumnVisibility = BTreeMap<String, bool>;

const SIDEBAR_EXPANDED_KEY: &str = "sidebar.expanded";

/// Key/value storage for preferences.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Volatile store, used by tests and `--no-persist` style runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by `preferences.toml`; every write rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store in `config_dir`. A missing or unreadable file starts
    /// empty.
    pub fn open(config_dir: &Path) -> Self {
        let path = config_dir.join(PREFERENCES_FILENAME);
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!("Failed to parse {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences file at {:?}", path);
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let content = toml::to_string(&self.values)
            .map_err(|e| Error::storage(format!("Failed to serialize preferences: {}", e)))?;
        write_atomic(&self.path, &content)
            .map_err(|e| Error::storage(format!("Failed to save preferences: {}", e)))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Typed preferences over any store.
pub struct Preferences<S> {
    store: S,
}

impl<S> std::fmt::Debug for Preferences<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

/// Preferences with the store chosen at runtime.
pub type DynPreferences = Preferences<Box<dyn PreferenceStore + Send>>;

impl<S: PreferenceStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed preference {}: {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    pub fn column_visibility(&self, key: &str) -> Option<ColumnVisibility> {
        self.read(key)
    }

    pub fn set_column_visibility(&mut self, key: &str, visibility: &ColumnVisibility) -> Result<()> {
        self.write(key, visibility)
    }

    pub fn page_size(&self, resource: Resource) -> Option<u32> {
        self.read(&page_size_key(resource))
    }

    pub fn set_page_size(&mut self, resource: Resource, size: u32) -> Result<()> {
        self.write(&page_size_key(resource), &size)
    }

    /// Id of the expanded top-level menu node.
    pub fn sidebar_expanded(&self) -> Option<String> {
        self.read(SIDEBAR_EXPANDED_KEY)
    }

    pub fn set_sidebar_expanded(&mut self, expanded: Option<&str>) -> Result<()> {
        match expanded {
            Some(id) => self.write(SIDEBAR_EXPANDED_KEY, &id),
            None => self.store.remove(SIDEBAR_EXPANDED_KEY),
        }
    }
}

impl DynPreferences {
    /// Erase the store type so it can be picked at runtime.
    pub fn boxed(store: impl PreferenceStore + Send + 'static) -> Self {
        let store: Box<dyn PreferenceStore + Send> = Box::new(store);
        Self::new(store)
    }
}

impl Preferences<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

fn page_size_key(resource: Resource) -> String {
    format!("page_size.{}", resource.slug())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_column_visibility_roundtrip() {
        let mut prefs = Preferences::in_memory();
        let mut vis = ColumnVisibility::new();
        vis.insert("FullName".into(), true);
        vis.insert("Phone".into(), false);

        prefs.set_column_visibility("columns.farmers", &vis).unwrap();
        assert_eq!(prefs.column_visibility("columns.farmers"), Some(vis));
        assert_eq!(prefs.column_visibility("columns.users"), None);
    }

    #[test]
    fn test_malformed_value_is_ignored() {
        let mut store = MemoryStore::new();
        store.set("page_size.farmers", "fifty").unwrap();
        let prefs = Preferences::new(store);
        assert_eq!(prefs.page_size(Resource::Farmers), None);
    }

    #[test]
    fn test_sidebar_expanded_none_removes_key() {
        let mut mock = MockPreferenceStore::new();
        mock.expect_remove()
            .withf(|key: &str| key == "sidebar.expanded")
            .times(1)
            .returning(|_| Ok(()));
        let mut prefs = Preferences::new(mock);
        prefs.set_sidebar_expanded(None).unwrap();
    }

    #[test]
    fn test_page_size_written_as_json_under_resource_key() {
        let mut mock = MockPreferenceStore::new();
        mock.expect_set()
            .withf(|key: &str, value: &str| key == "page_size.employees" && value == "50")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut prefs = Preferences::new(mock);
        prefs.set_page_size(Resource::Advisors, 50).unwrap();
    }

    #[test]
    fn test_store_errors_propagate() {
        let mut mock = MockPreferenceStore::new();
        mock.expect_set()
            .returning(|_, _| Err(Error::storage("disk full")));
        let mut prefs = Preferences::new(mock);
        let err = prefs.set_page_size(Resource::Farmers, 10).unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let temp = tempdir().unwrap();
        {
            let mut prefs = Preferences::new(FileStore::open(temp.path()));
            prefs.set_page_size(Resource::Farmers, 100).unwrap();
            prefs.set_sidebar_expanded(Some("people")).unwrap();
        }

        let prefs = Preferences::new(FileStore::open(temp.path()));
        assert_eq!(prefs.page_size(Resource::Farmers), Some(100));
        assert_eq!(prefs.sidebar_expanded().as_deref(), Some("people"));
    }

    #[test]
    fn test_file_store_starts_empty_on_garbage() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join(PREFERENCES_FILENAME), "{{{ nope").unwrap();
        let store = FileStore::open(temp.path());
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_boxed_store() {
        let mut prefs = DynPreferences::boxed(MemoryStore::new());
        prefs.set_page_size(Resource::Users, 10).unwrap();
        assert_eq!(prefs.page_size(Resource::Users), Some(10));
    }
}
