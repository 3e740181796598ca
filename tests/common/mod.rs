//! Shared test infrastructure.
//!
//! - `sample_form()` - two-question form (Q1 required, Q2 optional) with two witness slots
//! - `FakeApi` - in-memory `InspectionApi` that records every call
//! - `FakeConnector` - hands the same `FakeApi` to every session

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use sitecheck::api::{ApiConnector, ApiCredentials, ApiError, CreatedReport, InspectionApi, SignatureFile};
use sitecheck::models::form::{FormDefinition, FormRegistry};
use sitecheck::models::witness::Witness;

// ============================================================================
// FORMS
// ============================================================================

pub const SAMPLE_FORMS: &str = r#"{
  "forms": [
    {
      "slug": "sample",
      "title": "Sample Checklist",
      "domain": "electrical",
      "report_type": "sample-checklist",
      "witness_slots": 2,
      "metadata": [
        { "name": "drawing_no", "label": "Drawing No", "max_len": 10, "required": true },
        { "name": "comments", "label": "Comments", "max_len": 50, "multiline": true }
      ],
      "checklist": [
        { "key": "Q1", "label": "Earthing done", "required": true, "choices": ["Yes", "No"] },
        { "key": "Q2", "label": "Area cleaned", "required": false, "choices": ["Yes", "No"] },
        { "key": "Q3", "label": "IR test recorded", "choices": ["Yes", "No", "N/A"] }
      ]
    }
  ]
}"#;

pub fn sample_registry() -> FormRegistry {
    FormRegistry::from_json(SAMPLE_FORMS).expect("sample forms load")
}

pub fn sample_form() -> Arc<FormDefinition> {
    sample_registry().get("sample").expect("sample form")
}

/// Form fields for a draft that passes validation.
pub fn valid_pairs() -> Vec<(String, String)> {
    [
        ("drawing_no", "DWG-7"),
        ("witness_1", "5"),
        ("witness_2", "7"),
        ("choice__Q1", "No"),
        ("choice__Q3", "N/A"),
        ("remark__Q1", "Pit 2 pending"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn witnesses() -> Vec<Witness> {
    vec![
        Witness { id: 5, username: "asha".to_string(), company: "EPC Contractor".to_string() },
        Witness { id: 7, username: "ben".to_string(), company: "Owner's Engineer".to_string() },
        Witness { id: 9, username: "chen".to_string(), company: String::new() },
    ]
}

// ============================================================================
// FAKE API
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListWitnesses,
    Create { endpoint: String, payload: Value },
    List { endpoint: String },
    Fetch { endpoint: String, id: i64 },
    Approve { url: String, file_name: String, len: usize },
}

fn status(code: u16) -> ApiError {
    ApiError::Status { status: code, non_field_errors: Vec::new() }
}

pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub witness_status: Mutex<u16>,
    pub create_result: Mutex<Result<Option<i64>, (u16, Vec<String>)>>,
    pub reports: Mutex<Vec<Value>>,
    pub approve_status: Mutex<u16>,
    /// When set, create calls wait for a permit before answering.
    pub create_gate: Option<Arc<Semaphore>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            witness_status: Mutex::new(200),
            create_result: Mutex::new(Ok(Some(101))),
            reports: Mutex::new(Vec::new()),
            approve_status: Mutex::new(200),
            create_gate: None,
        }
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self { create_gate: Some(gate), ..Self::default() }
    }

    pub fn failing_create(status: u16, non_field_errors: &[&str]) -> Self {
        let fake = Self::default();
        *fake.create_result.lock().unwrap() =
            Err((status, non_field_errors.iter().map(|s| s.to_string()).collect()));
        fake
    }

    pub fn with_reports(reports: Vec<Value>) -> Self {
        let fake = Self::default();
        *fake.reports.lock().unwrap() = reports;
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Create { .. }))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl InspectionApi for FakeApi {
    async fn list_witnesses(&self) -> Result<Vec<Witness>, ApiError> {
        self.record(Call::ListWitnesses);
        match *self.witness_status.lock().unwrap() {
            200 => Ok(witnesses()),
            code => Err(status(code)),
        }
    }

    async fn create_report(&self, endpoint: &str, payload: &Value) -> Result<CreatedReport, ApiError> {
        self.record(Call::Create { endpoint: endpoint.to_string(), payload: payload.clone() });
        if let Some(gate) = &self.create_gate {
            let _permit = gate.acquire().await.expect("gate open");
        }
        match self.create_result.lock().unwrap().clone() {
            Ok(id) => Ok(CreatedReport { id }),
            Err((code, non_field_errors)) => Err(ApiError::Status { status: code, non_field_errors }),
        }
    }

    async fn list_reports(&self, endpoint: &str) -> Result<Vec<Value>, ApiError> {
        self.record(Call::List { endpoint: endpoint.to_string() });
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn fetch_report(&self, endpoint: &str, id: i64) -> Result<Value, ApiError> {
        self.record(Call::Fetch { endpoint: endpoint.to_string(), id });
        self.reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
            .cloned()
            .ok_or_else(|| status(404))
    }

    async fn approve(&self, action_url: &str, signature: SignatureFile) -> Result<(), ApiError> {
        self.record(Call::Approve {
            url: action_url.to_string(),
            file_name: signature.file_name,
            len: signature.bytes.len(),
        });
        match *self.approve_status.lock().unwrap() {
            200 => Ok(()),
            code => Err(status(code)),
        }
    }
}

pub struct FakeConnector {
    pub api: Arc<FakeApi>,
    pub connected: Mutex<Vec<ApiCredentials>>,
}

impl FakeConnector {
    pub fn new(api: Arc<FakeApi>) -> Self {
        Self { api, connected: Mutex::new(Vec::new()) }
    }
}

impl ApiConnector for FakeConnector {
    fn connect(&self, credentials: ApiCredentials) -> Arc<dyn InspectionApi> {
        self.connected.lock().unwrap().push(credentials);
        self.api.clone()
    }
}

// ============================================================================
// REPORT FIXTURES
// ============================================================================

pub fn pending_report(id: i64) -> Value {
    json!({
        "id": id,
        "drawing_no": "DWG-7",
        "comments": "",
        "status": "Pending approval",
        "created_at": "2026-03-14T09:30:00+05:30",
        "witness_1": { "id": 5, "username": "asha", "company": "EPC Contractor" },
        "witness_2": 7,
        "checklists": {
            "Q1": { "choice": "Yes", "remark": "", "verbose_name": "Earthing done" },
            "Q3": { "choice": "N/A", "remark": "Not applicable on LV side", "verbose_name": "IR test recorded" }
        },
        "actions": [
            { "name": "print", "url": "/api/electrical/sample-checklist/4/print/" },
            { "name": "approve", "url": "/api/electrical/sample-checklist/4/approve/" }
        ]
    })
}

pub fn approved_report(id: i64) -> Value {
    let mut report = pending_report(id);
    report["status"] = json!("Approved");
    report["actions"] = json!([]);
    report
}
