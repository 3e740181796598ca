use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;

use super::types::{FormDefinition, RESERVED_FIELD_NAMES};

const BUNDLED_FORMS: &str = include_str!("../../../data/forms.json");

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid form catalogue JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate form slug '{0}'")]
    DuplicateSlug(String),
    #[error("form '{form}': duplicate checklist key '{key}'")]
    DuplicateKey { form: String, key: String },
    #[error("form '{form}': checklist item '{key}' has no choices")]
    NoChoices { form: String, key: String },
    #[error("form '{form}': witness_slots must be 2 or 3, got {slots}")]
    WitnessSlots { form: String, slots: usize },
    #[error("form '{form}': metadata field '{name}' is invalid or clashes with a reserved name")]
    BadMetadataField { form: String, name: String },
}

#[derive(Deserialize)]
struct Catalogue {
    forms: Vec<FormDefinition>,
}

/// All checklist forms known to the application, in catalogue order.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: Vec<Arc<FormDefinition>>,
    by_slug: HashMap<String, usize>,
}

impl FormRegistry {
    /// Load the catalogue compiled into the binary.
    pub fn load_bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_FORMS)
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let catalogue: Catalogue = serde_json::from_str(json)?;
        let mut registry = FormRegistry::default();
        for form in catalogue.forms {
            check_form(&form)?;
            if registry.by_slug.contains_key(&form.slug) {
                return Err(RegistryError::DuplicateSlug(form.slug));
            }
            registry.by_slug.insert(form.slug.clone(), registry.forms.len());
            registry.forms.push(Arc::new(form));
        }
        log::info!("Loaded {} checklist forms", registry.forms.len());
        Ok(registry)
    }

    pub fn get(&self, slug: &str) -> Option<Arc<FormDefinition>> {
        self.by_slug.get(slug).map(|&i| Arc::clone(&self.forms[i]))
    }

    pub fn all(&self) -> &[Arc<FormDefinition>] {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

fn check_form(form: &FormDefinition) -> Result<(), RegistryError> {
    if !(2..=3).contains(&form.witness_slots) {
        return Err(RegistryError::WitnessSlots {
            form: form.slug.clone(),
            slots: form.witness_slots,
        });
    }

    let mut keys = HashSet::new();
    let mut labels = HashSet::new();
    for item in &form.checklist {
        if !keys.insert(item.key.as_str()) {
            return Err(RegistryError::DuplicateKey {
                form: form.slug.clone(),
                key: item.key.clone(),
            });
        }
        if item.choices.is_empty() {
            return Err(RegistryError::NoChoices {
                form: form.slug.clone(),
                key: item.key.clone(),
            });
        }
        if !labels.insert(item.label.trim()) {
            log::warn!("Form '{}': label of '{}' repeats an earlier question", form.slug, item.key);
        }
    }

    for field in &form.metadata {
        let clashes = RESERVED_FIELD_NAMES.contains(&field.name.as_str())
            || field.name.starts_with("choice__")
            || field.name.starts_with("remark__");
        if field.name.trim().is_empty() || field.max_len == 0 || clashes {
            return Err(RegistryError::BadMetadataField {
                form: form.slug.clone(),
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}
