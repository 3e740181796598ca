use std::collections::BTreeMap;

use super::types::{FormDefinition, MetadataField};

/// Validate a single metadata value against its descriptor. Empty optional values are fine.
pub fn validate_field(field: &MetadataField, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        if field.required {
            return Some(format!("{} is required", field.label));
        }
        return None;
    }
    if trimmed.chars().count() > field.max_len {
        return Some(format!("{} must be at most {} characters", field.label, field.max_len));
    }
    None
}

/// Validate every metadata field of `form`, in declaration order.
pub fn validate_metadata(form: &FormDefinition, values: &BTreeMap<String, String>) -> Vec<String> {
    form.metadata
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.name).map(String::as_str).unwrap_or("");
            validate_field(field, value)
        })
        .collect()
}

/// One message per witness slot left unselected.
pub fn validate_witness_slots(selected: &[Option<i64>]) -> Vec<String> {
    selected
        .iter()
        .enumerate()
        .filter(|(_, id)| id.is_none())
        .map(|(i, _)| format!("Witness {} is required", i + 1))
        .collect()
}
