//! HTTP client for the admin REST backend

use std::time::Duration;

use farmdesk_core::{
    normalize_list, normalize_record, DeleteStyle, Page, Record, Resource, UpdateVerb,
};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::backend::{Backend, ColumnVisibility};
use crate::error::ApiError;
use crate::http::{check_response, read_json};
use crate::query::ListQuery;
use crate::user::CurrentUser;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to, e.g. `https://host/api`
    pub base_url: String,
    /// Bearer token; requests go out unauthenticated when absent
    pub token: Option<String>,
    pub timeout: Duration,
    /// Endpoint receiving column visibility; sync is skipped when absent
    pub column_sync_endpoint: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            column_sync_endpoint: None,
        }
    }
}

/// REST client implementing [`Backend`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
    column_sync_endpoint: Option<String>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("farmdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base,
            token: config.token.filter(|t| !t.trim().is_empty()),
            column_sync_endpoint: config.column_sync_endpoint,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `<base><path>`; `path` is either absolute or relative to the base.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base, path.trim_start_matches('/'))
        };
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// `<base><resource>/<id>[/<suffix>]` with the id percent-encoded.
    fn record_url(
        &self,
        resource: Resource,
        id: &str,
        suffix: Option<&str>,
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(resource.path())?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(format!("{} cannot hold a path", self.base)))?;
            segments.pop_if_empty().push(id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let resp = builder.send().await?;
        let resp = check_response(resp).await?;
        read_json(resp).await
    }
}

impl Backend for ApiClient {
    async fn list(&self, resource: Resource, query: &ListQuery) -> Result<Page, ApiError> {
        let url = self.endpoint(resource.path())?;
        debug!("GET {} {:?}", url, query.to_pairs());
        let body = self
            .send(self.request(Method::GET, url).query(&query.to_pairs()))
            .await?;
        normalize_list(body).map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Record, ApiError> {
        let url = self.record_url(resource, id, None)?;
        let body = self.send(self.request(Method::GET, url)).await?;
        normalize_record(body).map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn create(&self, resource: Resource, record: &Record) -> Result<Record, ApiError> {
        let url = self.endpoint(resource.path())?;
        debug!("POST {}", url);
        let body = self
            .send(self.request(Method::POST, url).json(record))
            .await?;
        normalize_record(body).map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        record: &Record,
    ) -> Result<Record, ApiError> {
        let url = self.record_url(resource, id, None)?;
        let method = match resource.update_verb() {
            UpdateVerb::Patch => Method::PATCH,
            UpdateVerb::Put => Method::PUT,
        };
        debug!("{} {}", method, url);
        let body = self.send(self.request(method, url).json(record)).await?;
        normalize_record(body).map_err(|e| ApiError::decode(e.to_string()))
    }

    async fn delete(&self, resource: Resource, id: &str, deleted_by: &str) -> Result<(), ApiError> {
        let builder = match resource.delete_style() {
            DeleteStyle::Soft => {
                let url = self.record_url(resource, id, Some("delete"))?;
                self.request(Method::POST, url)
                    .json(&json!({ "DeletedBy": deleted_by }))
            }
            DeleteStyle::Hard => {
                let url = self.record_url(resource, id, None)?;
                self.request(Method::DELETE, url)
            }
        };
        self.send(builder).await?;
        Ok(())
    }

    async fn check_unique(
        &self,
        resource: Resource,
        field: &str,
        value: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, ApiError> {
        let url = self.endpoint(&format!("{}/check-unique", resource.path()))?;
        let mut params = vec![("field", field), ("value", value)];
        if let Some(id) = exclude_id {
            params.push(("excludeId", id));
        }
        let body = self
            .send(self.request(Method::GET, url).query(&params))
            .await?;
        parse_unique_body(&body)
    }

    async fn save_columns(&self, key: &str, columns: &ColumnVisibility) -> Result<(), ApiError> {
        let Some(endpoint) = self.column_sync_endpoint.as_deref() else {
            debug!("No column sync endpoint configured, skipping sync for {}", key);
            return Ok(());
        };
        let url = self.endpoint(endpoint)?;
        let result = self
            .send(
                self.request(Method::POST, url)
                    .json(&json!({ "key": key, "columns": columns })),
            )
            .await;
        if let Err(e) = &result {
            warn!("Column sync for {} failed: {}", key, e);
        }
        result.map(|_| ())
    }

    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let url = self.endpoint("/auth/me")?;
        let body = self.send(self.request(Method::GET, url)).await?;
        CurrentUser::from_body(body)
    }
}

/// Interpret a check-unique response as "value is available".
///
/// Accepts `{ "available": b }`, `{ "isUnique": b }`, `{ "exists": b }` or a
/// bare boolean.
pub fn parse_unique_body(body: &Value) -> Result<bool, ApiError> {
    if let Some(available) = body.as_bool() {
        return Ok(available);
    }
    for key in ["available", "isUnique", "unique"] {
        if let Some(available) = body.get(key).and_then(Value::as_bool) {
            return Ok(available);
        }
    }
    if let Some(exists) = body.get("exists").and_then(Value::as_bool) {
        return Ok(!exists);
    }
    Err(ApiError::decode(format!("unexpected check-unique body: {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ApiClient::new(ApiConfig {
            base_url: "not a url".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://farm.example/api/");
        assert_eq!(
            c.endpoint("/farmers").unwrap().as_str(),
            "https://farm.example/api/farmers"
        );
        assert_eq!(
            c.endpoint("admin/columns").unwrap().as_str(),
            "https://farm.example/api/admin/columns"
        );
        assert_eq!(
            c.endpoint("https://other.example/sync").unwrap().as_str(),
            "https://other.example/sync"
        );
    }

    #[test]
    fn test_record_url_encodes_id() {
        let c = client("https://farm.example/api");
        let url = c.record_url(Resource::Farmers, "a b/c", None).unwrap();
        assert_eq!(url.as_str(), "https://farm.example/api/farmers/a%20b%2Fc");

        let url = c.record_url(Resource::Advisors, "7", Some("delete")).unwrap();
        assert_eq!(url.as_str(), "https://farm.example/api/advisor/7/delete");
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let c = ApiClient::new(ApiConfig {
            token: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(c.token.is_none());
    }

    #[test]
    fn test_parse_unique_body_shapes() {
        assert!(parse_unique_body(&json!({"available": true})).unwrap());
        assert!(!parse_unique_body(&json!({"isUnique": false})).unwrap());
        assert!(!parse_unique_body(&json!({"exists": true})).unwrap());
        assert!(parse_unique_body(&json!({"exists": false})).unwrap());
        assert!(parse_unique_body(&json!(true)).unwrap());
        assert!(parse_unique_body(&json!({"count": 0})).is_err());
    }
}
