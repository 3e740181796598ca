// Template context structures for Askama templates, organized by page family.

use actix_session::Session;

use crate::app::AppState;
use crate::auth::csrf;
use crate::auth::session::{get_work_site, take_flash};

mod checklist;
mod common;
mod report;

pub use self::checklist::{
    ChecklistFormTemplate, ChoiceOption, MetadataInput, QuestionRow, SubmittedTemplate, WitnessOption, WitnessSlot,
};
pub use self::common::{FormCard, FormIndexTemplate, LoginTemplate};
pub use self::report::{ReportDetailTemplate, ReportListTemplate};

/// Sidebar entry for one checklist form.
pub struct NavLink {
    pub slug: String,
    pub title: String,
    pub active: bool,
}

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.app_name`, `ctx.nav`, etc.
pub struct PageContext {
    pub app_name: String,
    pub work_site_id: String,
    pub flash: Option<String>,
    pub csrf_token: String,
    pub nav: Vec<NavLink>,
}

impl PageContext {
    pub fn build(session: &Session, state: &AppState, active_slug: Option<&str>) -> Self {
        let nav = state
            .registry
            .all()
            .iter()
            .map(|f| NavLink {
                slug: f.slug.clone(),
                title: f.title.clone(),
                active: Some(f.slug.as_str()) == active_slug,
            })
            .collect();
        Self {
            app_name: state.app_name.clone(),
            work_site_id: get_work_site(session).unwrap_or_default(),
            flash: take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
            nav,
        }
    }
}
