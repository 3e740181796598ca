use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::form::FormDefinition;

/// The answer to one checklist question. `label` is copied from the schema when the
/// answer is entered and travels to the API as `verbose_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(rename = "verbose_name", default)]
    pub label: String,
}

impl ChecklistResponse {
    pub fn has_choice(&self) -> bool {
        self.choice.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChecklistError {
    #[error("unknown checklist question '{0}'")]
    UnknownKey(String),
    #[error("'{choice}' is not an allowed answer for '{key}'")]
    InvalidChoice { key: String, choice: String },
}

/// Per-question responses for one form, keyed by question key.
///
/// Updates merge field-wise: a choice never clobbers a remark and vice versa, so
/// the two setters commute.
#[derive(Debug, Clone)]
pub struct ChecklistState {
    form: Arc<FormDefinition>,
    responses: BTreeMap<String, ChecklistResponse>,
    errors: Vec<String>,
}

impl ChecklistState {
    pub fn new(form: Arc<FormDefinition>) -> Self {
        Self {
            form,
            responses: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn set_choice(&mut self, key: &str, choice: &str) -> Result<(), ChecklistError> {
        let item = self
            .form
            .item(key)
            .ok_or_else(|| ChecklistError::UnknownKey(key.to_string()))?;
        if !item.allows(choice) {
            return Err(ChecklistError::InvalidChoice {
                key: key.to_string(),
                choice: choice.to_string(),
            });
        }
        let label = item.label.clone();
        let entry = self.responses.entry(key.to_string()).or_default();
        entry.choice = Some(choice.to_string());
        entry.label = label;
        Ok(())
    }

    pub fn set_remark(&mut self, key: &str, remark: &str) -> Result<(), ChecklistError> {
        let item = self
            .form
            .item(key)
            .ok_or_else(|| ChecklistError::UnknownKey(key.to_string()))?;
        let label = item.label.clone();
        let entry = self.responses.entry(key.to_string()).or_default();
        entry.remark = Some(remark.to_string());
        if entry.label.is_empty() {
            entry.label = label;
        }
        Ok(())
    }

    pub fn response(&self, key: &str) -> Option<&ChecklistResponse> {
        self.responses.get(key)
    }

    pub fn responses(&self) -> &BTreeMap<String, ChecklistResponse> {
        &self.responses
    }

    /// Check every required question has a choice. Stores the labels of the
    /// unanswered ones for display and returns whether there were none.
    pub fn validate(&mut self) -> bool {
        self.errors = self
            .form
            .checklist
            .iter()
            .filter(|item| item.required)
            .filter(|item| !self.responses.get(&item.key).is_some_and(|r| r.has_choice()))
            .map(|item| item.label.clone())
            .collect();
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
