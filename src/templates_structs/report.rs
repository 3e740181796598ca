use askama::Template;

use super::PageContext;
use crate::models::report::{ReportSummary, ReportView};

#[derive(Template)]
#[template(path = "report/list.html")]
pub struct ReportListTemplate {
    pub ctx: PageContext,
    pub slug: String,
    pub title: String,
    pub reports: Vec<ReportSummary>,
}

#[derive(Template)]
#[template(path = "report/detail.html")]
pub struct ReportDetailTemplate {
    pub ctx: PageContext,
    pub slug: String,
    pub view: ReportView,
}
