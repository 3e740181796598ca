use crate::api::{ApiError, CreatedReport, InspectionApi};
use crate::models::witness::DUPLICATE_WITNESS_MESSAGE;

use super::draft::ChecklistDraft;
use super::guard::SubmitGuard;

/// Alert for any failed create call without server-provided detail.
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong while submitting. Please try again.";
/// Alert for a click that arrives while the same form is still being sent.
pub const IN_FLIGHT_MESSAGE: &str = "This checklist is already being submitted.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The API answered 201.
    Created(CreatedReport),
    /// Two witness slots hold the same person. Nothing was sent.
    DuplicateWitness,
    /// Validation messages, in display order. Nothing was sent.
    Invalid(Vec<String>),
    /// Another submission of this form by this session is outstanding. Nothing was sent.
    InFlight,
    /// The create call failed; the user may resubmit.
    Failed(String),
}

impl SubmitOutcome {
    /// Blocking alert to show for this outcome, if any.
    pub fn alert(&self) -> Option<&str> {
        match self {
            SubmitOutcome::DuplicateWitness => Some(DUPLICATE_WITNESS_MESSAGE),
            SubmitOutcome::InFlight => Some(IN_FLIGHT_MESSAGE),
            SubmitOutcome::Failed(message) => Some(message),
            SubmitOutcome::Created(_) | SubmitOutcome::Invalid(_) => None,
        }
    }
}

/// Failure text for the user: the server's `non_field_errors` verbatim, else the generic alert.
pub fn failure_message(err: &ApiError) -> String {
    let detail = err.non_field_errors();
    if detail.is_empty() {
        SUBMIT_FAILED_MESSAGE.to_string()
    } else {
        detail.join(" ")
    }
}

/// Send a checklist draft once.
///
/// Witness distinctness is checked first, then validation; either failure returns
/// before any request. `owner` identifies the submitting session for the in-flight
/// guard. There is no retry.
pub async fn submit(
    api: &dyn InspectionApi,
    guard: &SubmitGuard,
    owner: &str,
    draft: &mut ChecklistDraft,
) -> SubmitOutcome {
    if !draft.witnesses_distinct() {
        return SubmitOutcome::DuplicateWitness;
    }
    if !draft.validate() {
        return SubmitOutcome::Invalid(draft.errors().to_vec());
    }

    let slug = draft.form().slug.clone();
    let Some(_ticket) = guard.try_acquire(format!("{owner}:{slug}")) else {
        log::info!("Ignoring repeated submit of '{slug}' while one is outstanding");
        return SubmitOutcome::InFlight;
    };

    let endpoint = draft.form().endpoint();
    match api.create_report(&endpoint, &draft.to_payload()).await {
        Ok(created) => {
            log::info!("Submitted '{slug}' report (id {:?})", created.id);
            SubmitOutcome::Created(created)
        }
        Err(e) => {
            log::error!("Submitting '{slug}' failed: {e}");
            SubmitOutcome::Failed(failure_message(&e))
        }
    }
}
