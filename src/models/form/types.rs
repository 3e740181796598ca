use serde::{Deserialize, Serialize};

/// Payload keys owned by the submission itself; metadata fields may not reuse them.
pub const RESERVED_FIELD_NAMES: &[&str] = &["checklists", "witness_1", "witness_2", "witness_3", "csrf_token"];

fn default_choices() -> Vec<String> {
    vec!["Yes".to_string(), "No".to_string()]
}

fn default_true() -> bool {
    true
}

/// One question on a checklist. Immutable once the registry is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItemSchema {
    pub key: String,
    pub label: String,
    #[serde(default = "default_choices")]
    pub choices: Vec<String>,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl ChecklistItemSchema {
    pub fn allows(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }
}

/// A free-text field that sits next to the checklist (drawing number, location, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub label: String,
    pub max_len: usize,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiline: bool,
}

/// Everything needed to render, validate and post one kind of inspection report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub slug: String,
    pub title: String,
    pub domain: String,
    pub report_type: String,
    pub witness_slots: usize,
    #[serde(default)]
    pub metadata: Vec<MetadataField>,
    pub checklist: Vec<ChecklistItemSchema>,
}

impl FormDefinition {
    pub fn item(&self, key: &str) -> Option<&ChecklistItemSchema> {
        self.checklist.iter().find(|i| i.key == key)
    }

    /// Collection path on the remote API, relative to the API root.
    pub fn endpoint(&self) -> String {
        format!("api/{}/{}/", self.domain, self.report_type)
    }

    /// Payload names of the witness slots, `witness_1` onwards.
    pub fn witness_field_names(&self) -> Vec<String> {
        (1..=self.witness_slots).map(|n| format!("witness_{n}")).collect()
    }

    /// Union of all choice columns, in first-seen order. Used for the report table header.
    pub fn choice_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for item in &self.checklist {
            for choice in &item.choices {
                if !columns.contains(choice) {
                    columns.push(choice.clone());
                }
            }
        }
        columns
    }
}
