use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::{ApiConnector, ApiCredentials};
use crate::app::AppState;
use crate::auth::csrf;
use crate::auth::session::{get_credentials, store_credentials};
use crate::errors::{AppError, render};
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub api_token: String,
    pub work_site_id: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(state: &AppState, session: &Session, work_site_id: &str, error: Option<String>) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error,
        app_name: state.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        work_site_id: work_site_id.to_string(),
    };
    render(tmpl)
}

pub async fn login_page(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    // Already signed in: go straight to the forms
    if get_credentials(&session).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/forms"))
            .finish());
    }
    login_form(&state, &session, "", None)
}

/// Store the API token and work site after checking them against the witness directory.
pub async fn login_submit(
    state: web::Data<AppState>,
    connector: web::Data<dyn ApiConnector>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let token = form.api_token.trim();
    let work_site_id = form.work_site_id.trim();
    if token.is_empty() || work_site_id.is_empty() {
        return login_form(&state, &session, work_site_id, Some("API token and work site are required".to_string()));
    }
    if !work_site_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return login_form(&state, &session, work_site_id, Some("Work site id may only contain letters, digits, '-' and '_'".to_string()));
    }

    let credentials = ApiCredentials {
        token: token.to_string(),
        work_site_id: work_site_id.to_string(),
    };
    let api = connector.connect(credentials.clone());
    match api.list_witnesses().await {
        Ok(witnesses) => {
            state.witnesses.put(work_site_id, witnesses);
            session.renew();
            store_credentials(&session, &credentials)?;
            log::info!("Signed in to work site {work_site_id}");
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/forms"))
                .finish())
        }
        Err(e) if e.is_unauthorized() => {
            log::warn!("Login for work site {work_site_id} rejected: {e}");
            login_form(&state, &session, work_site_id, Some("The inspection service rejected this token".to_string()))
        }
        Err(e) => {
            log::error!("Login for work site {work_site_id} failed: {e}");
            login_form(&state, &session, work_site_id, Some("Could not reach the inspection service".to_string()))
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}
