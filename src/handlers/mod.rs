pub mod auth_handlers;
pub mod checklist_handlers;
pub mod report_handlers;

use std::sync::Arc;

use actix_session::Session;
use actix_web::web;

use crate::api::{ApiConnector, InspectionApi};
use crate::app::AppState;
use crate::auth::session::require_credentials;
use crate::errors::AppError;
use crate::models::form::FormDefinition;

/// Authenticated API handle for the current session.
pub(crate) fn api_for(session: &Session, connector: &dyn ApiConnector) -> Result<Arc<dyn InspectionApi>, AppError> {
    let credentials = require_credentials(session)?;
    Ok(connector.connect(credentials))
}

pub(crate) fn form_for(state: &web::Data<AppState>, slug: &str) -> Result<Arc<FormDefinition>, AppError> {
    state.registry.get(slug).ok_or(AppError::NotFound)
}
