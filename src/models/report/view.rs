use serde_json::Value;

use super::types::{ReportRecord, value_text};
use crate::models::form::FormDefinition;
use crate::models::witness::Witness;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRow {
    pub number: usize,
    pub label: String,
    /// One flag per report column: set where the stored choice equals that column.
    pub marks: Vec<bool>,
    pub remark: String,
}

impl ChecklistRow {
    /// Cell text per column: a tick where marked, blank elsewhere.
    pub fn cells(&self) -> Vec<&'static str> {
        self.marks.iter().map(|&m| if m { "✓" } else { "" }).collect()
    }
}

/// Fixed table layout of a report, ready for the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub metadata: Vec<FieldRow>,
    pub witnesses: Vec<FieldRow>,
    pub columns: Vec<String>,
    pub rows: Vec<ChecklistRow>,
    pub approve_url: Option<String>,
}

/// Project a fetched record onto the form's layout. Rows follow schema order; a
/// stored `verbose_name` wins over the current schema label.
pub fn project(form: &FormDefinition, record: &ReportRecord) -> ReportView {
    let metadata = form
        .metadata
        .iter()
        .map(|f| FieldRow {
            label: f.label.clone(),
            value: record.field_text(&f.name),
        })
        .collect();

    let witnesses = form
        .witness_field_names()
        .iter()
        .enumerate()
        .map(|(i, name)| FieldRow {
            label: format!("Witness {}", i + 1),
            value: witness_text(record.data.get(name)),
        })
        .collect();

    let columns = form.choice_columns();
    let answers = record.checklists();
    let rows = form
        .checklist
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let answer = answers.get(&item.key);
            let choice = answer.and_then(|a| a.choice.as_deref());
            let label = answer
                .map(|a| a.label.trim())
                .filter(|l| !l.is_empty())
                .unwrap_or(item.label.as_str())
                .to_string();
            ChecklistRow {
                number: i + 1,
                label,
                marks: columns.iter().map(|c| choice == Some(c.as_str())).collect(),
                remark: answer.and_then(|a| a.remark.clone()).unwrap_or_default(),
            }
        })
        .collect();

    ReportView {
        id: record.id,
        title: form.title.clone(),
        status: record.field_text("status"),
        metadata,
        witnesses,
        columns,
        rows,
        approve_url: record.approve_url.clone(),
    }
}

/// Witness fields come back either as a bare id or as a nested user object.
fn witness_text(value: Option<&Value>) -> String {
    match value {
        Some(v @ Value::Object(_)) => serde_json::from_value::<Witness>(v.clone())
            .map(|w| w.display_name())
            .unwrap_or_else(|_| value_text(v.get("username"))),
        Some(Value::Number(n)) => format!("#{n}"),
        other => value_text(other),
    }
}
