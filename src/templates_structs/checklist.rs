use askama::Template;

use super::PageContext;
use crate::models::checklist::{CHOICE_PREFIX, ChecklistDraft, REMARK_PREFIX};
use crate::models::witness::Witness;

pub struct MetadataInput {
    pub name: String,
    pub label: String,
    pub max_len: usize,
    pub required: bool,
    pub multiline: bool,
    pub value: String,
}

pub struct WitnessOption {
    pub id: i64,
    pub label: String,
    pub selected: bool,
}

pub struct WitnessSlot {
    pub name: String,
    pub label: String,
    pub options: Vec<WitnessOption>,
}

pub struct ChoiceOption {
    pub value: String,
    pub checked: bool,
}

pub struct QuestionRow {
    pub number: usize,
    pub choice_field: String,
    pub remark_field: String,
    pub label: String,
    pub required: bool,
    pub options: Vec<ChoiceOption>,
    pub remark: String,
}

#[derive(Template)]
#[template(path = "checklist/form.html")]
pub struct ChecklistFormTemplate {
    pub ctx: PageContext,
    pub slug: String,
    pub title: String,
    pub metadata: Vec<MetadataInput>,
    pub witness_slots: Vec<WitnessSlot>,
    pub questions: Vec<QuestionRow>,
    pub errors: Vec<String>,
    pub alert: Option<String>,
}

impl ChecklistFormTemplate {
    /// Lay out a draft, keeping whatever the user already entered.
    pub fn build(
        ctx: PageContext,
        draft: &ChecklistDraft,
        witnesses: &[Witness],
        errors: Vec<String>,
        alert: Option<String>,
    ) -> Self {
        let form = draft.form();

        let metadata = form
            .metadata
            .iter()
            .map(|f| MetadataInput {
                name: f.name.clone(),
                label: f.label.clone(),
                max_len: f.max_len,
                required: f.required,
                multiline: f.multiline,
                value: draft.metadata.get(&f.name).cloned().unwrap_or_default(),
            })
            .collect();

        let witness_slots = form
            .witness_field_names()
            .into_iter()
            .zip(&draft.witnesses)
            .enumerate()
            .map(|(i, (name, selected))| WitnessSlot {
                name,
                label: format!("Witness {}", i + 1),
                options: witnesses
                    .iter()
                    .map(|w| WitnessOption {
                        id: w.id,
                        label: w.display_name(),
                        selected: *selected == Some(w.id),
                    })
                    .collect(),
            })
            .collect();

        let questions = form
            .checklist
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let response = draft.checklist.response(&item.key);
                let current = response.and_then(|r| r.choice.as_deref());
                QuestionRow {
                    number: i + 1,
                    choice_field: format!("{CHOICE_PREFIX}{}", item.key),
                    remark_field: format!("{REMARK_PREFIX}{}", item.key),
                    label: item.label.clone(),
                    required: item.required,
                    options: item
                        .choices
                        .iter()
                        .map(|c| ChoiceOption {
                            value: c.clone(),
                            checked: current == Some(c.as_str()),
                        })
                        .collect(),
                    remark: response.and_then(|r| r.remark.clone()).unwrap_or_default(),
                }
            })
            .collect();

        Self {
            ctx,
            slug: form.slug.clone(),
            title: form.title.clone(),
            metadata,
            witness_slots,
            questions,
            errors,
            alert,
        }
    }
}

#[derive(Template)]
#[template(path = "checklist/submitted.html")]
pub struct SubmittedTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub report_id: Option<i64>,
    pub listing_url: String,
    pub delay_secs: u64,
}
