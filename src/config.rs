use actix_web::cookie::Key;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_APP_NAME: &str = "Site Inspections";
const DEFAULT_REDIRECT_DELAY_SECS: u64 = 2;

#[derive(Debug, thiserror::Error)]
#[error("invalid value for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub redirect_delay_secs: u64,
    pub cookie_secure: bool,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND.to_string(),
            session_key: None,
            redirect_delay_secs: DEFAULT_REDIRECT_DELAY_SECS,
            cookie_secure: false,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = lookup("SITECHECK_API_URL").unwrap_or(defaults.api_url);
        reqwest::Url::parse(&api_url).map_err(|e| ConfigError {
            var: "SITECHECK_API_URL",
            reason: e.to_string(),
        })?;

        let redirect_delay_secs = match lookup("SITECHECK_REDIRECT_DELAY_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
                var: "SITECHECK_REDIRECT_DELAY_SECS",
                reason: format!("'{raw}' is not a whole number of seconds"),
            })?,
            None => defaults.redirect_delay_secs,
        };

        let cookie_secure = match lookup("SITECHECK_COOKIE_SECURE").as_deref().map(str::trim) {
            None | Some("") => defaults.cookie_secure,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                return Err(ConfigError {
                    var: "SITECHECK_COOKIE_SECURE",
                    reason: format!("'{other}' is not a boolean"),
                });
            }
        };

        Ok(Self {
            api_url,
            bind_addr: lookup("SITECHECK_BIND").unwrap_or(defaults.bind_addr),
            session_key: lookup("SESSION_KEY"),
            redirect_delay_secs,
            cookie_secure,
            app_name: lookup("SITECHECK_APP_NAME").unwrap_or(defaults.app_name),
        })
    }

    /// Cookie signing/encryption key. Falls back to a random key, which logs everyone
    /// out on restart.
    pub fn cookie_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}
