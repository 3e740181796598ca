use actix_web::{HttpResponse, web};

use crate::auth;
use crate::config::AppConfig;
use crate::errors::NOT_FOUND_PAGE;
use crate::handlers;
use crate::models::checklist::SubmitGuard;
use crate::models::form::FormRegistry;
use crate::models::witness::WitnessCache;

/// Body limit for urlencoded posts. A signature data URI of up to 2 MiB grows by a
/// third as base64 and again when percent-encoded.
pub const FORM_LIMIT_BYTES: usize = 8 * 1024 * 1024;

/// Process-wide state shared by all workers.
pub struct AppState {
    pub registry: FormRegistry,
    pub witnesses: WitnessCache,
    pub guard: SubmitGuard,
    pub app_name: String,
    pub redirect_delay_secs: u64,
}

impl AppState {
    pub fn new(registry: FormRegistry, config: &AppConfig) -> Self {
        Self {
            registry,
            witnesses: WitnessCache::default(),
            guard: SubmitGuard::new(),
            app_name: config.app_name.clone(),
            redirect_delay_secs: config.redirect_delay_secs,
        }
    }
}

/// All routes. The caller supplies session middleware and app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(handlers::auth_handlers::login_page))
        .route("/login", web::post().to(handlers::auth_handlers::login_submit))
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/forms"))
                .finish()
        }))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .app_data(web::FormConfig::default().limit(FORM_LIMIT_BYTES))
                .route("/logout", web::post().to(handlers::auth_handlers::logout))
                .route("/forms", web::get().to(handlers::checklist_handlers::index))
                .route("/forms/{slug}/new", web::get().to(handlers::checklist_handlers::new_form))
                .route("/forms/{slug}", web::post().to(handlers::checklist_handlers::submit))
                .route("/reports/{slug}", web::get().to(handlers::report_handlers::list))
                .route("/reports/{slug}/{id}", web::get().to(handlers::report_handlers::detail))
                .route("/reports/{slug}/{id}/approve", web::post().to(handlers::report_handlers::approve))
                .default_service(web::to(not_found)),
        );
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(NOT_FOUND_PAGE)
}
