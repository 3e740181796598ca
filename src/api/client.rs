use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::parse_non_field_errors;
use super::{ApiConnector, ApiCredentials, ApiError, CreatedReport, InspectionApi, SignatureFile};
use crate::models::witness::Witness;

const WITNESS_PATH: &str = "api/auth/user/witness/";

/// Hands out [`HttpInspectionApi`] handles that share one connection pool.
#[derive(Clone)]
pub struct HttpConnector {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpConnector {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base(base_url)?,
        })
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self, credentials: ApiCredentials) -> Arc<dyn InspectionApi> {
        Arc::new(HttpInspectionApi {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials,
        })
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let mut raw = base_url.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))
}

pub struct HttpInspectionApi {
    http: reqwest::Client,
    base_url: Url,
    credentials: ApiCredentials,
}

impl HttpInspectionApi {
    pub fn new(base_url: &str, credentials: ApiCredentials) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base(base_url)?,
            credentials,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Url(format!("{path}: {e}")))
    }

    /// Bearer auth plus the `work_site_id` query every collection call carries.
    fn scoped(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.credentials.token)
            .query(&[("work_site_id", self.credentials.work_site_id.as_str())])
    }

    async fn expect_status(resp: Response, expected: StatusCode) -> Result<Response, ApiError> {
        if resp.status() == expected {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.bytes().await.unwrap_or_default();
        let non_field_errors = parse_non_field_errors(&body);
        log::warn!("Inspection API returned {status} (expected {})", expected.as_u16());
        Err(ApiError::Status { status, non_field_errors })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InspectionApi for HttpInspectionApi {
    async fn list_witnesses(&self) -> Result<Vec<Witness>, ApiError> {
        let req = self.scoped(self.http.get(self.url(WITNESS_PATH)?));
        let resp = Self::expect_status(req.send().await?, StatusCode::OK).await?;
        Self::decode(resp).await
    }

    async fn create_report(&self, endpoint: &str, payload: &Value) -> Result<CreatedReport, ApiError> {
        let req = self.scoped(self.http.post(self.url(endpoint)?)).json(payload);
        let resp = Self::expect_status(req.send().await?, StatusCode::CREATED).await?;
        // The body is informational; an unreadable one still means the report exists.
        let body = resp.bytes().await.unwrap_or_default();
        let id = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|v| v.get("id").and_then(Value::as_i64));
        Ok(CreatedReport { id })
    }

    async fn list_reports(&self, endpoint: &str) -> Result<Vec<Value>, ApiError> {
        let req = self.scoped(self.http.get(self.url(endpoint)?));
        let resp = Self::expect_status(req.send().await?, StatusCode::OK).await?;
        let body: Value = Self::decode(resp).await?;
        into_records(body)
    }

    async fn fetch_report(&self, endpoint: &str, id: i64) -> Result<Value, ApiError> {
        let path = format!("{}/{id}/", endpoint.trim_end_matches('/'));
        let req = self.scoped(self.http.get(self.url(&path)?));
        let resp = Self::expect_status(req.send().await?, StatusCode::OK).await?;
        Self::decode(resp).await
    }

    async fn approve(&self, action_url: &str, signature: SignatureFile) -> Result<(), ApiError> {
        // Absolute action URLs replace the base; relative ones resolve against it.
        let url = self
            .base_url
            .join(action_url)
            .map_err(|e| ApiError::Url(format!("{action_url}: {e}")))?;
        let part = Part::bytes(signature.bytes)
            .file_name(signature.file_name)
            .mime_str(&signature.mime)?;
        let form = Form::new().part("signature", part);
        let req = self
            .http
            .put(url)
            .bearer_auth(&self.credentials.token)
            .multipart(form);
        Self::expect_status(req.send().await?, StatusCode::OK).await?;
        Ok(())
    }
}

/// Accept either a bare array or a paginated `{"results": [...]}` envelope.
fn into_records(body: Value) -> Result<Vec<Value>, ApiError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ApiError::Decode("expected a list of reports".to_string())),
        },
        _ => Err(ApiError::Decode("expected a list of reports".to_string())),
    }
}
