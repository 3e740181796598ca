use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::{api_for, form_for};
use crate::api::ApiConnector;
use crate::app::AppState;
use crate::auth::csrf;
use crate::auth::session::{owner_key, set_flash};
use crate::errors::{AppError, render};
use crate::models::report::{self, ApproveOutcome};
use crate::templates_structs::{PageContext, ReportDetailTemplate, ReportListTemplate};

#[derive(Deserialize)]
pub struct ApproveForm {
    pub csrf_token: String,
    #[serde(default)]
    pub signature_data_uri: String,
}

/// GET /reports/{slug} — submitted reports of one form.
pub async fn list(
    state: web::Data<AppState>,
    connector: web::Data<dyn ApiConnector>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let form = form_for(&state, &path.into_inner())?;
    let api = api_for(&session, connector.get_ref())?;
    let reports = report::list(api.as_ref(), &form).await?;

    let ctx = PageContext::build(&session, &state, Some(&form.slug));
    render(ReportListTemplate {
        ctx,
        slug: form.slug.clone(),
        title: form.title.clone(),
        reports,
    })
}

/// GET /reports/{slug}/{id} — read-only report with the approve control when allowed.
pub async fn detail(
    state: web::Data<AppState>,
    connector: web::Data<dyn ApiConnector>,
    session: Session,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (slug, id) = path.into_inner();
    let form = form_for(&state, &slug)?;
    let api = api_for(&session, connector.get_ref())?;

    let record = match report::load(api.as_ref(), &form, id).await {
        Ok(r) => r,
        Err(crate::api::ApiError::Status { status: 404, .. }) => return Err(AppError::NotFound),
        Err(e) => return Err(e.into()),
    };
    let view = report::project(&form, &record);

    let ctx = PageContext::build(&session, &state, Some(&form.slug));
    render(ReportDetailTemplate { ctx, slug, view })
}

/// POST /reports/{slug}/{id}/approve — approve with a signature image, then reload the report.
pub async fn approve(
    state: web::Data<AppState>,
    connector: web::Data<dyn ApiConnector>,
    session: Session,
    path: web::Path<(String, i64)>,
    form: web::Form<ApproveForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (slug, id) = path.into_inner();
    let definition = form_for(&state, &slug)?;
    let api = api_for(&session, connector.get_ref())?;
    let owner = owner_key(&session);

    let outcome = report::approve(api.as_ref(), &state.guard, &owner, &definition, id, &form.signature_data_uri).await;
    let message = match outcome {
        ApproveOutcome::Approved => "Report approved".to_string(),
        ApproveOutcome::NotApprovable => "This report cannot be approved".to_string(),
        ApproveOutcome::InFlight => "This report is already being approved".to_string(),
        ApproveOutcome::Invalid(message) | ApproveOutcome::Failed(message) => message,
    };
    set_flash(&session, message);

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/reports/{slug}/{id}")))
        .finish())
}
