use serde::Deserialize;

/// Failure talking to the inspection API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API answered with status {status}")]
    Status {
        status: u16,
        non_field_errors: Vec<String>,
    },
    #[error("could not decode API response: {0}")]
    Decode(String),
    #[error("invalid API URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Messages the server wants shown to the user as-is, if any.
    pub fn non_field_errors(&self) -> &[String] {
        match self {
            ApiError::Status { non_field_errors, .. } => non_field_errors,
            _ => &[],
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    non_field_errors: Vec<String>,
}

/// Pull `non_field_errors` out of an error body. Anything unparseable yields none.
pub fn parse_non_field_errors(body: &[u8]) -> Vec<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.non_field_errors)
        .unwrap_or_default()
}
