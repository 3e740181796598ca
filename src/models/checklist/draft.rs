use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::state::ChecklistState;
use crate::models::form::FormDefinition;
use crate::models::form::validate::{validate_metadata, validate_witness_slots};
use crate::models::witness::witnesses_distinct;

/// Prefix of the form field carrying the answer to question `key`.
pub const CHOICE_PREFIX: &str = "choice__";
/// Prefix of the form field carrying the remark for question `key`.
pub const REMARK_PREFIX: &str = "remark__";

/// Everything a user has entered on one checklist form before it is sent.
#[derive(Debug, Clone)]
pub struct ChecklistDraft {
    pub metadata: BTreeMap<String, String>,
    pub witnesses: Vec<Option<i64>>,
    pub checklist: ChecklistState,
    errors: Vec<String>,
}

impl ChecklistDraft {
    pub fn new(form: Arc<FormDefinition>) -> Self {
        let witnesses = vec![None; form.witness_slots];
        Self {
            metadata: BTreeMap::new(),
            witnesses,
            checklist: ChecklistState::new(form),
            errors: Vec::new(),
        }
    }

    /// Rebuild a draft from posted form fields, applied in the order received.
    ///
    /// Fields that do not belong to the form are ignored, as are answers outside a
    /// question's allowed choices.
    pub fn from_pairs(form: Arc<FormDefinition>, pairs: &[(String, String)]) -> Self {
        let mut draft = Self::new(Arc::clone(&form));
        for (name, value) in pairs {
            if let Some(key) = name.strip_prefix(CHOICE_PREFIX) {
                if value.is_empty() {
                    continue;
                }
                if let Err(e) = draft.checklist.set_choice(key, value) {
                    log::warn!("Form '{}': ignoring answer: {e}", form.slug);
                }
            } else if let Some(key) = name.strip_prefix(REMARK_PREFIX) {
                let remark = value.trim();
                if remark.is_empty() {
                    continue;
                }
                if let Err(e) = draft.checklist.set_remark(key, remark) {
                    log::warn!("Form '{}': ignoring remark: {e}", form.slug);
                }
            } else if let Some(slot) = witness_slot(name, form.witness_slots) {
                draft.witnesses[slot] = value.trim().parse::<i64>().ok();
            } else if form.metadata.iter().any(|f| &f.name == name) {
                draft.metadata.insert(name.clone(), value.clone());
            }
        }
        draft
    }

    pub fn form(&self) -> &FormDefinition {
        self.checklist.form()
    }

    pub fn witnesses_distinct(&self) -> bool {
        witnesses_distinct(&self.witnesses)
    }

    /// Metadata, witness-slot and required-question checks. The messages are kept
    /// for display; returns whether there were none.
    pub fn validate(&mut self) -> bool {
        let mut errors = validate_metadata(self.form(), &self.metadata);
        errors.extend(validate_witness_slots(&self.witnesses));
        self.checklist.validate();
        errors.extend(self.checklist.errors().iter().cloned());
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// JSON body for the create call: metadata fields, `witness_N` ids and `checklists`.
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        for field in &self.form().metadata {
            let value = self.metadata.get(&field.name).map(|v| v.trim()).unwrap_or("");
            body.insert(field.name.clone(), Value::String(value.to_string()));
        }
        for (i, id) in self.witnesses.iter().enumerate() {
            let value = id.map(Value::from).unwrap_or(Value::Null);
            body.insert(format!("witness_{}", i + 1), value);
        }
        let checklists = serde_json::to_value(self.checklist.responses()).unwrap_or(Value::Null);
        body.insert("checklists".to_string(), checklists);
        Value::Object(body)
    }
}

/// Zero-based slot index for a `witness_N` field, if N is within the form's slots.
fn witness_slot(name: &str, slots: usize) -> Option<usize> {
    let n: usize = name.strip_prefix("witness_")?.parse().ok()?;
    (1..=slots).contains(&n).then(|| n - 1)
}
