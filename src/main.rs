use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use sitecheck::api::{ApiConnector, HttpConnector};
use sitecheck::app::{self, AppState};
use sitecheck::config::AppConfig;
use sitecheck::models::form::FormRegistry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let registry = FormRegistry::load_bundled().map_err(std::io::Error::other)?;
    let connector: Arc<dyn ApiConnector> =
        Arc::new(HttpConnector::new(&config.api_url).map_err(std::io::Error::other)?);
    let state = web::Data::new(AppState::new(registry, &config));
    let connector = web::Data::from(connector);

    let secret_key = config.cookie_key();
    let cookie_secure = config.cookie_secure;

    log::info!("Using inspection API at {}", config.api_url);
    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(connector.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(app::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
