//! Client side of the remote inspection REST API.
//!
//! Handlers never read credentials themselves: they ask an [`ApiConnector`] for an
//! [`InspectionApi`] bound to the caller's token and work site, and pass that down.

pub mod client;
pub mod error;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::witness::Witness;

pub use client::{HttpConnector, HttpInspectionApi};
pub use error::ApiError;

/// Bearer token plus the work site every request is scoped to.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub token: String,
    pub work_site_id: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("token", &"<redacted>")
            .field("work_site_id", &self.work_site_id)
            .finish()
    }
}

/// Result of a successful create (HTTP 201).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReport {
    pub id: Option<i64>,
}

/// The signature image sent with an approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Operations the portal performs against the API, already authenticated.
///
/// `endpoint` is a collection path such as `api/electrical/transformer/`.
#[async_trait]
pub trait InspectionApi: Send + Sync {
    async fn list_witnesses(&self) -> Result<Vec<Witness>, ApiError>;

    /// POST a new report. Only HTTP 201 counts as success.
    async fn create_report(&self, endpoint: &str, payload: &Value) -> Result<CreatedReport, ApiError>;

    async fn list_reports(&self, endpoint: &str) -> Result<Vec<Value>, ApiError>;

    async fn fetch_report(&self, endpoint: &str, id: i64) -> Result<Value, ApiError>;

    /// PUT the signature to an action URL taken from a report's `actions`. Only HTTP 200 counts.
    async fn approve(&self, action_url: &str, signature: SignatureFile) -> Result<(), ApiError>;
}

/// Builds authenticated API handles from session credentials.
pub trait ApiConnector: Send + Sync {
    fn connect(&self, credentials: ApiCredentials) -> Arc<dyn InspectionApi>;
}
