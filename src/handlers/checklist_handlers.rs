use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::{api_for, form_for};
use crate::api::{ApiConnector, ApiError, InspectionApi};
use crate::app::AppState;
use crate::auth::csrf;
use crate::auth::session::{owner_key, require_credentials};
use crate::errors::{AppError, render};
use crate::models::checklist::{self, ChecklistDraft, SubmitOutcome};
use crate::models::witness::Witness;
use crate::templates_structs::{ChecklistFormTemplate, FormCard, FormIndexTemplate, PageContext, SubmittedTemplate};

const WITNESS_LOAD_FAILED: &str = "Could not load the witness list. Please reload the page.";

/// Witnesses for the session's site, from cache when fresh.
async fn witness_list(state: &AppState, api: &dyn InspectionApi, work_site_id: &str) -> Result<Vec<Witness>, ApiError> {
    if let Some(list) = state.witnesses.get(work_site_id) {
        return Ok(list);
    }
    let list = api.list_witnesses().await?;
    state.witnesses.put(work_site_id, list.clone());
    Ok(list)
}

/// GET /forms — catalogue of checklist forms.
pub async fn index(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &state, None);
    let forms = state
        .registry
        .all()
        .iter()
        .map(|f| FormCard {
            slug: f.slug.clone(),
            title: f.title.clone(),
            domain: f.domain.clone(),
            question_count: f.checklist.len(),
        })
        .collect();
    render(FormIndexTemplate { ctx, forms })
}

/// GET /forms/{slug}/new — empty checklist.
pub async fn new_form(
    state: web::Data<AppState>,
    connector: web::Data<dyn ApiConnector>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let form = form_for(&state, &path.into_inner())?;
    let credentials = require_credentials(&session)?;
    let api = api_for(&session, connector.get_ref())?;

    let (witnesses, alert) = match witness_list(&state, api.as_ref(), &credentials.work_site_id).await {
        Ok(list) => (list, None),
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Loading witnesses failed: {e}");
            (Vec::new(), Some(WITNESS_LOAD_FAILED.to_string()))
        }
    };

    let draft = ChecklistDraft::new(form);
    let ctx = PageContext::build(&session, &state, Some(&draft.form().slug));
    render(ChecklistFormTemplate::build(ctx, &draft, &witnesses, Vec::new(), alert))
}

/// POST /forms/{slug} — validate and send a checklist.
///
/// Rejected drafts are rendered again with everything the user entered.
pub async fn submit(
    state: web::Data<AppState>,
    connector: web::Data<dyn ApiConnector>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let pairs = form.into_inner();
    let submitted_token = pairs
        .iter()
        .find(|(name, _)| name == "csrf_token")
        .map(|(_, v)| v.as_str())
        .unwrap_or("");
    csrf::validate_csrf(&session, submitted_token)?;

    let definition = form_for(&state, &path.into_inner())?;
    let credentials = require_credentials(&session)?;
    let api = api_for(&session, connector.get_ref())?;
    let owner = owner_key(&session);

    let mut draft = ChecklistDraft::from_pairs(definition, &pairs);
    let outcome = checklist::submit(api.as_ref(), &state.guard, &owner, &mut draft).await;

    let slug = draft.form().slug.clone();
    let (errors, alert) = match outcome {
        SubmitOutcome::Created(created) => {
            let ctx = PageContext::build(&session, &state, Some(&slug));
            return render(SubmittedTemplate {
                ctx,
                title: draft.form().title.clone(),
                report_id: created.id,
                listing_url: format!("/reports/{slug}"),
                delay_secs: state.redirect_delay_secs,
            });
        }
        SubmitOutcome::Invalid(errors) => (errors, None),
        other => (Vec::new(), other.alert().map(str::to_string)),
    };

    let witnesses = match witness_list(&state, api.as_ref(), &credentials.work_site_id).await {
        Ok(list) => list,
        Err(e) => {
            log::error!("Reloading witnesses failed: {e}");
            Vec::new()
        }
    };
    let ctx = PageContext::build(&session, &state, Some(&slug));
    render(ChecklistFormTemplate::build(ctx, &draft, &witnesses, errors, alert))
}
