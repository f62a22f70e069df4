//! The signed-in user as reported by `GET /auth/me`

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Identity and raw claims of the current session.
///
/// Claims are passed through as the backend sends them; normalisation
/// (trimming, upper-casing) happens where they are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    #[serde(default, alias = "Username", alias = "userName")]
    pub username: String,
    #[serde(default, alias = "FullName", alias = "fullName")]
    pub display_name: Option<String>,
    #[serde(default, alias = "Roles")]
    pub roles: Vec<String>,
    #[serde(default, alias = "Permissions")]
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn new(
        username: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: None,
            roles: roles.into_iter().map(Into::into).collect(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the `/auth/me` body, which may be wrapped in `{ "user": ... }`.
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let body = match body {
            Value::Object(mut obj) if obj.contains_key("user") => {
                obj.remove("user").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(body).map_err(|e| ApiError::decode(format!("invalid user: {e}")))
    }

    /// Name used in the top bar and as the `DeletedBy` audit value.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}
