//! # farmdesk-api - Admin Backend Client
//!
//! REST client for the farm management backend. Every response is normalised
//! into [`farmdesk_core`] types at this boundary, so callers never see the
//! backend's envelope variations.
//!
//! ## Public API
//!
//! ### Backend Abstraction
//! - [`Backend`] / [`LocalBackend`] - Operations the dashboard performs
//! - [`ApiClient`] - HTTP implementation with bearer authentication
//! - [`ApiConfig`] - Base URL, token, timeout and column sync endpoint
//!
//! ### Requests and Responses
//! - [`ListQuery`] - Page, page size and filters
//! - [`CurrentUser`] - Identity and claims from `GET /auth/me`
//!
//! ### Errors
//! - [`ApiError`] - Transport, 401, server and decode failures, with
//!   [`ApiError::user_message()`] for alert text

pub mod backend;
pub mod client;
pub mod error;
pub mod http;
pub mod query;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod user;

pub use backend::{Backend, ColumnVisibility, LocalBackend};
pub use client::{parse_unique_body, ApiClient, ApiConfig};
pub use error::{ApiError, GENERIC_MESSAGE, SESSION_EXPIRED_MESSAGE};
pub use query::ListQuery;
pub use user::CurrentUser;
