//! Test utilities for backend consumers
//!
//! Provides [`MemoryBackend`], an in-process [`Backend`](crate::Backend)
//! holding rows per resource, plus helpers for building test records.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use farmdesk_core::{
    display_field, display_value, record_from_pairs, record_id, Page, Record, Resource,
};
use serde_json::{json, Value};

use crate::backend::{Backend, ColumnVisibility};
use crate::error::ApiError;
use crate::query::ListQuery;
use crate::user::CurrentUser;

/// A recorded delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
    pub resource: Resource,
    pub id: String,
    pub deleted_by: String,
}

#[derive(Debug, Default)]
struct Inner {
    tables: BTreeMap<Resource, Vec<Record>>,
    next_id: u64,
    user: CurrentUser,
    fail_next: Option<(u16, String)>,
    deletes: Vec<DeleteCall>,
    column_syncs: Vec<(String, ColumnVisibility)>,
    list_calls: usize,
}

/// In-memory backend with server-side search and paging.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().next_id = 1000;
        backend.lock().user = admin_user();
        backend
    }

    pub fn with_user(self, user: CurrentUser) -> Self {
        self.lock().user = user;
        self
    }

    pub fn with_rows(self, resource: Resource, rows: Vec<Record>) -> Self {
        self.lock().tables.insert(resource, rows);
        self
    }

    /// Fail the next call with `status` (401 maps to `Unauthorized`).
    pub fn fail_next(&self, status: u16, message: &str) {
        self.lock().fail_next = Some((status, message.to_string()));
    }

    pub fn rows(&self, resource: Resource) -> Vec<Record> {
        self.lock()
            .tables
            .get(&resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn deletes(&self) -> Vec<DeleteCall> {
        self.lock().deletes.clone()
    }

    pub fn column_syncs(&self) -> Vec<(String, ColumnVisibility)> {
        self.lock().column_syncs.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.lock().fail_next.take() {
            Some((401, _)) => Err(ApiError::Unauthorized),
            Some((status, message)) => Err(ApiError::server(status, message)),
            None => Ok(()),
        }
    }
}

fn matches_search(row: &Record, search: &str) -> bool {
    let needle = search.to_lowercase();
    row.values()
        .any(|v| display_value(v).to_lowercase().contains(&needle))
}

fn not_found() -> ApiError {
    ApiError::server(404, "Record not found")
}

impl Backend for MemoryBackend {
    async fn list(&self, resource: Resource, query: &ListQuery) -> Result<Page, ApiError> {
        self.take_failure()?;
        let mut inner = self.lock();
        inner.list_calls += 1;
        let rows: Vec<Record> = inner
            .tables
            .get(&resource)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.search().map_or(true, |s| matches_search(row, s)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let total = rows.len() as u64;
        let skip = (query.page.saturating_sub(1) as usize) * query.page_size as usize;
        let page = rows
            .into_iter()
            .skip(skip)
            .take(query.page_size as usize)
            .collect();
        Ok(Page::new(page, total))
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Record, ApiError> {
        self.take_failure()?;
        self.lock()
            .tables
            .get(&resource)
            .and_then(|rows| {
                rows.iter()
                    .find(|r| record_id(r, resource.id_field()).as_deref() == Some(id))
            })
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, resource: Resource, record: &Record) -> Result<Record, ApiError> {
        self.take_failure()?;
        let mut inner = self.lock();
        inner.next_id += 1;
        let mut stored = Record::new();
        stored.insert(resource.id_field().to_string(), json!(inner.next_id));
        for (k, v) in record {
            if k != resource.id_field() {
                stored.insert(k.clone(), v.clone());
            }
        }
        inner
            .tables
            .entry(resource)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        record: &Record,
    ) -> Result<Record, ApiError> {
        self.take_failure()?;
        let mut inner = self.lock();
        let row = inner
            .tables
            .get_mut(&resource)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|r| record_id(r, resource.id_field()).as_deref() == Some(id))
            })
            .ok_or_else(not_found)?;
        for (k, v) in record {
            row.insert(k.clone(), v.clone());
        }
        Ok(row.clone())
    }

    async fn delete(&self, resource: Resource, id: &str, deleted_by: &str) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut inner = self.lock();
        let rows = inner.tables.get_mut(&resource).ok_or_else(not_found)?;
        let before = rows.len();
        rows.retain(|r| record_id(r, resource.id_field()).as_deref() != Some(id));
        if rows.len() == before {
            return Err(not_found());
        }
        inner.deletes.push(DeleteCall {
            resource,
            id: id.to_string(),
            deleted_by: deleted_by.to_string(),
        });
        Ok(())
    }

    async fn check_unique(
        &self,
        resource: Resource,
        field: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, ApiError> {
        self.take_failure()?;
        let inner = self.lock();
        let taken = inner.tables.get(&resource).is_some_and(|rows| {
            rows.iter()
                .filter(|r| {
                    exclude_id.is_none()
                        || record_id(r, resource.id_field()).as_deref() != exclude_id
                })
                .any(|r| display_field(r, field).eq_ignore_ascii_case(value.trim()))
        });
        Ok(!taken)
    }

    async fn save_columns(&self, key: &str, columns: &ColumnVisibility) -> Result<(), ApiError> {
        self.take_failure()?;
        self.lock()
            .column_syncs
            .push((key.to_string(), columns.clone()));
        Ok(())
    }

    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.take_failure()?;
        Ok(self.lock().user.clone())
    }
}

/// A user holding `ROLE_ADMIN`.
pub fn admin_user() -> CurrentUser {
    CurrentUser::new("admin", ["ROLE_ADMIN"], Vec::<String>::new())
}

/// A non-admin user with the given permissions.
pub fn user_with_permissions(permissions: &[&str]) -> CurrentUser {
    CurrentUser::new("clerk", ["ROLE_USER"], permissions.iter().copied())
}

/// A farmer row with the usual columns filled in.
pub fn test_farmer(id: u64, name: &str, village: &str) -> Record {
    record_from_pairs([
        ("FarmerId", json!(id)),
        ("FarmerCode", json!(format!("F-{id:04}"))),
        ("FullName", json!(name)),
        ("Phone", json!(format!("+2547000{id:05}"))),
        ("Village", json!(village)),
        ("District", Value::Null),
        ("FarmSizeHa", json!(1.5)),
    ])
}

/// `count` farmers named `Farmer 1..=count`.
pub fn test_farmers(count: u64) -> Vec<Record> {
    (1..=count)
        .map(|i| test_farmer(i, &format!("Farmer {i}"), "Kisumu"))
        .collect()
}

/// A user row.
pub fn test_user_row(id: u64, username: &str, email: &str) -> Record {
    record_from_pairs([
        ("UserId", json!(id)),
        ("Username", json!(username)),
        ("FullName", json!(username.to_uppercase())),
        ("Email", json!(email)),
        ("Phone", Value::Null),
        ("IsActive", json!(true)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_pages_and_searches() {
        let backend = MemoryBackend::new().with_rows(Resource::Farmers, test_farmers(30));

        let page = backend
            .list(Resource::Farmers, &ListQuery::new(2, 25))
            .await
            .unwrap();
        assert_eq!(page.total, 30);
        assert_eq!(page.rows.len(), 5);

        let page = backend
            .list(Resource::Farmers, &ListQuery::new(1, 25).with_search("farmer 3"))
            .await
            .unwrap();
        assert_eq!(page.total, 2); // "Farmer 3" and "Farmer 30"
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let backend = MemoryBackend::new();
        let created = backend
            .create(
                Resource::Farmers,
                &record_from_pairs([("FullName", json!("Ana"))]),
            )
            .await
            .unwrap();
        let id = record_id(&created, "FarmerId").unwrap();

        let updated = backend
            .update(
                Resource::Farmers,
                &id,
                &record_from_pairs([("Village", json!("Siaya"))]),
            )
            .await
            .unwrap();
        assert_eq!(updated["FullName"], "Ana");
        assert_eq!(updated["Village"], "Siaya");

        backend.delete(Resource::Farmers, &id, "admin").await.unwrap();
        assert!(backend.rows(Resource::Farmers).is_empty());
        assert_eq!(backend.deletes()[0].deleted_by, "admin");

        let err = backend.get(Resource::Farmers, &id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_check_unique_excludes_edited_record() {
        let backend = MemoryBackend::new()
            .with_rows(Resource::Users, vec![test_user_row(1, "ana", "ana@farm.org")]);

        let free = backend
            .check_unique(Resource::Users, "Username", "ANA", None)
            .await
            .unwrap();
        assert!(!free);

        let free = backend
            .check_unique(Resource::Users, "Username", "ana", Some("1"))
            .await
            .unwrap();
        assert!(free);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let backend = MemoryBackend::new();
        backend.fail_next(401, "expired");
        assert!(matches!(
            backend.current_user().await,
            Err(ApiError::Unauthorized)
        ));
        assert_eq!(backend.current_user().await.unwrap().username, "admin");
    }
}
