use askama::Template;

use super::PageContext;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub work_site_id: String,
}

/// Catalogue card on the landing page.
pub struct FormCard {
    pub slug: String,
    pub title: String,
    pub domain: String,
    pub question_count: usize,
}

#[derive(Template)]
#[template(path = "forms.html")]
pub struct FormIndexTemplate {
    pub ctx: PageContext,
    pub forms: Vec<FormCard>,
}
