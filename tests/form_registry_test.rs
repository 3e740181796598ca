//! Form catalogue loading and its load-time checks.

mod common;

use std::collections::HashSet;

use sitecheck::models::form::{FormRegistry, RegistryError};

use common::*;

#[test]
fn bundled_catalogue_loads() {
    let registry = FormRegistry::load_bundled().expect("bundled forms");

    assert_eq!(registry.len(), 8);
    for slug in ["ac-distribution-board", "transformer", "cable-tray", "ht-cable", "scada-panel", "roof-top-work", "culvert-work", "idt"] {
        assert!(registry.get(slug).is_some(), "missing form {slug}");
    }
}

#[test]
fn bundled_forms_have_distinct_labels_and_required_questions() {
    let registry = FormRegistry::load_bundled().expect("bundled forms");

    for form in registry.all() {
        let labels: HashSet<&str> = form.checklist.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels.len(), form.checklist.len(), "repeated label in {}", form.slug);
        assert!(form.checklist.iter().any(|i| i.required), "{} has no required question", form.slug);
        assert!(form.checklist.iter().all(|i| !i.label.contains('{')), "templating residue in {}", form.slug);
    }
}

#[test]
fn defaults_apply_to_choices_and_required() {
    let json = r#"{"forms": [{
        "slug": "x", "title": "X", "domain": "civil", "report_type": "x-report", "witness_slots": 2,
        "checklist": [{ "key": "a", "label": "A" }]
    }]}"#;
    let registry = FormRegistry::from_json(json).expect("load");
    let item = &registry.get("x").expect("form").checklist[0];

    assert_eq!(item.choices, vec!["Yes", "No"]);
    assert!(item.required);
}

#[test]
fn endpoint_and_witness_names_follow_form() {
    let form = sample_form();

    assert_eq!(form.endpoint(), "api/electrical/sample-checklist/");
    assert_eq!(form.witness_field_names(), vec!["witness_1", "witness_2"]);
    assert_eq!(form.choice_columns(), vec!["Yes", "No", "N/A"]);
}

#[test]
fn unknown_slug_is_none() {
    assert!(sample_registry().get("does-not-exist").is_none());
}

fn single_form(checklist: &str, witness_slots: usize, metadata: &str) -> String {
    format!(
        r#"{{"forms": [{{"slug": "f", "title": "F", "domain": "d", "report_type": "r",
            "witness_slots": {witness_slots}, "metadata": {metadata}, "checklist": {checklist}}}]}}"#
    )
}

#[test]
fn duplicate_key_is_rejected() {
    let json = single_form(r#"[{"key": "a", "label": "A"}, {"key": "a", "label": "B"}]"#, 2, "[]");
    assert!(matches!(FormRegistry::from_json(&json), Err(RegistryError::DuplicateKey { .. })));
}

#[test]
fn duplicate_label_is_only_a_warning() {
    let json = single_form(r#"[{"key": "a", "label": "Same"}, {"key": "b", "label": "Same"}]"#, 2, "[]");
    assert!(FormRegistry::from_json(&json).is_ok());
}

#[test]
fn empty_choices_are_rejected() {
    let json = single_form(r#"[{"key": "a", "label": "A", "choices": []}]"#, 2, "[]");
    assert!(matches!(FormRegistry::from_json(&json), Err(RegistryError::NoChoices { .. })));
}

#[test]
fn witness_slots_outside_two_to_three_are_rejected() {
    for slots in [0, 1, 4] {
        let json = single_form(r#"[{"key": "a", "label": "A"}]"#, slots, "[]");
        assert!(matches!(FormRegistry::from_json(&json), Err(RegistryError::WitnessSlots { .. })));
    }
}

#[test]
fn reserved_metadata_names_are_rejected() {
    for name in ["checklists", "witness_1", "choice__a"] {
        let metadata = format!(r#"[{{"name": "{name}", "label": "L", "max_len": 5}}]"#);
        let json = single_form(r#"[{"key": "a", "label": "A"}]"#, 2, &metadata);
        assert!(
            matches!(FormRegistry::from_json(&json), Err(RegistryError::BadMetadataField { .. })),
            "{name} accepted"
        );
    }
}

#[test]
fn duplicate_slug_is_rejected() {
    let form = r#"{"slug": "f", "title": "F", "domain": "d", "report_type": "r", "witness_slots": 2,
        "checklist": [{"key": "a", "label": "A"}]}"#;
    let json = format!(r#"{{"forms": [{form}, {form}]}}"#);
    assert!(matches!(FormRegistry::from_json(&json), Err(RegistryError::DuplicateSlug(_))));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(FormRegistry::from_json("{"), Err(RegistryError::Parse(_))));
}
