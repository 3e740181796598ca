use actix_session::Session;

use crate::api::ApiCredentials;
use crate::auth::csrf;
use crate::errors::AppError;

const TOKEN_KEY: &str = "api_token";
const SITE_KEY: &str = "work_site_id";
const OWNER_KEY: &str = "owner_key";
const FLASH_KEY: &str = "flash";

/// API credentials stored at login, if any.
pub fn get_credentials(session: &Session) -> Option<ApiCredentials> {
    let token = session.get::<String>(TOKEN_KEY).unwrap_or(None)?;
    let work_site_id = session.get::<String>(SITE_KEY).unwrap_or(None)?;
    Some(ApiCredentials { token, work_site_id })
}

pub fn require_credentials(session: &Session) -> Result<ApiCredentials, AppError> {
    get_credentials(session).ok_or_else(|| AppError::Session("No API credentials in session".to_string()))
}

pub fn store_credentials(session: &Session, credentials: &ApiCredentials) -> Result<(), AppError> {
    session
        .insert(TOKEN_KEY, &credentials.token)
        .and_then(|_| session.insert(SITE_KEY, &credentials.work_site_id))
        .and_then(|_| session.insert(OWNER_KEY, csrf::generate_token()))
        .map_err(|e| AppError::Session(format!("Failed to store credentials: {e}")))
}

pub fn get_work_site(session: &Session) -> Option<String> {
    session.get::<String>(SITE_KEY).unwrap_or(None)
}

/// Stable per-login identifier used to key in-flight submissions.
pub fn owner_key(session: &Session) -> String {
    if let Ok(Some(key)) = session.get::<String>(OWNER_KEY) {
        return key;
    }
    let key = csrf::generate_token();
    let _ = session.insert(OWNER_KEY, &key);
    key
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    let _ = session.insert(FLASH_KEY, message.into());
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
