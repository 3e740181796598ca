use std::collections::BTreeMap;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiError, InspectionApi};
use crate::models::checklist::ChecklistResponse;
use crate::models::form::FormDefinition;

/// Name of the action entry that grants the approve capability.
pub const APPROVE_ACTION: &str = "approve";

#[derive(Debug, Deserialize)]
struct Action {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
}

/// A submitted report as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub id: i64,
    pub data: Value,
    /// Present only while the current user may approve the report.
    pub approve_url: Option<String>,
}

impl ReportRecord {
    pub fn from_value(data: Value) -> Result<Self, ApiError> {
        let id = data
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::Decode("report has no numeric id".to_string()))?;
        let approve_url = find_action(&data, APPROVE_ACTION);
        Ok(Self { id, data, approve_url })
    }

    /// Field rendered as text: strings verbatim, numbers and booleans formatted, null as empty.
    pub fn field_text(&self, name: &str) -> String {
        value_text(self.data.get(name))
    }

    /// Stored answers. Malformed entries are skipped rather than failing the page.
    pub fn checklists(&self) -> BTreeMap<String, ChecklistResponse> {
        let Some(Value::Object(map)) = self.data.get("checklists") else {
            return BTreeMap::new();
        };
        map.iter()
            .filter_map(|(key, v)| {
                serde_json::from_value::<ChecklistResponse>(v.clone())
                    .ok()
                    .map(|r| (key.clone(), r))
            })
            .collect()
    }
}

fn find_action(data: &Value, name: &str) -> Option<String> {
    let actions = data.get("actions")?.as_array()?;
    actions
        .iter()
        .filter_map(|a| serde_json::from_value::<Action>(a.clone()).ok())
        .find(|a| a.name == name && !a.url.is_empty())
        .map(|a| a.url)
}

pub(crate) fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// One line of the report listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub id: i64,
    pub reference: String,
    pub created_at: String,
    pub status: String,
}

impl ReportSummary {
    /// Summarise a list entry. `reference` is the form's first metadata field.
    pub fn from_value(form: &FormDefinition, data: &Value) -> Option<Self> {
        let id = data.get("id").and_then(Value::as_i64)?;
        let reference = form
            .metadata
            .first()
            .map(|f| value_text(data.get(&f.name)))
            .unwrap_or_default();
        let raw_created = value_text(data.get("created_at"));
        let created_at = DateTime::parse_from_rfc3339(&raw_created)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or(raw_created);
        let status = value_text(data.get("status"));
        Some(Self { id, reference, created_at, status })
    }
}

/// GET one report and pick out its approve capability.
pub async fn load(api: &dyn InspectionApi, form: &FormDefinition, id: i64) -> Result<ReportRecord, ApiError> {
    let data = api.fetch_report(&form.endpoint(), id).await?;
    ReportRecord::from_value(data)
}

/// GET the form's report collection, newest first as the API orders it.
pub async fn list(api: &dyn InspectionApi, form: &FormDefinition) -> Result<Vec<ReportSummary>, ApiError> {
    let records = api.list_reports(&form.endpoint()).await?;
    Ok(records
        .iter()
        .filter_map(|r| ReportSummary::from_value(form, r))
        .collect())
}
