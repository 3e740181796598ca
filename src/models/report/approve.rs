use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::types::load;
use crate::api::{InspectionApi, SignatureFile};
use crate::models::checklist::{SubmitGuard, failure_message};
use crate::models::form::FormDefinition;

pub const MAX_SIGNATURE_BYTES: usize = 2 * 1024 * 1024;
pub const SIGNATURE_REQUIRED_MESSAGE: &str = "Please upload a signature image before approving.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// The API answered 200.
    Approved,
    /// The signature was missing or unusable. Nothing was sent.
    Invalid(String),
    /// The report carries no approve action (already approved, or not ours to approve).
    NotApprovable,
    /// An approval of this report by this session is outstanding.
    InFlight,
    Failed(String),
}

/// Decode a `data:image/<type>;base64,<payload>` URI into the file to upload.
pub fn parse_signature_data_uri(uri: &str) -> Result<SignatureFile, String> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(SIGNATURE_REQUIRED_MESSAGE.to_string());
    }
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| "Signature must be an image".to_string())?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| "Signature must be an image".to_string())?;
    if !mime.starts_with("image/") {
        return Err("Signature must be an image".to_string());
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| "Signature image could not be read".to_string())?;
    if bytes.is_empty() {
        return Err(SIGNATURE_REQUIRED_MESSAGE.to_string());
    }
    if bytes.len() > MAX_SIGNATURE_BYTES {
        return Err("Signature image is too large (max 2 MB)".to_string());
    }
    Ok(SignatureFile {
        file_name: format!("signature.{}", extension_for(mime)),
        mime: mime.to_string(),
        bytes,
    })
}

fn extension_for(mime: &str) -> &str {
    match mime.trim_start_matches("image/") {
        "jpeg" => "jpg",
        "svg+xml" => "svg",
        other => other,
    }
}

/// Approve report `id` with the given signature.
///
/// The report is re-fetched so the approve URL always comes from the API, never
/// from the browser.
pub async fn approve(
    api: &dyn InspectionApi,
    guard: &SubmitGuard,
    owner: &str,
    form: &FormDefinition,
    id: i64,
    signature_data_uri: &str,
) -> ApproveOutcome {
    let signature = match parse_signature_data_uri(signature_data_uri) {
        Ok(s) => s,
        Err(message) => return ApproveOutcome::Invalid(message),
    };

    let Some(_ticket) = guard.try_acquire(format!("{owner}:approve:{}:{id}", form.slug)) else {
        return ApproveOutcome::InFlight;
    };

    let record = match load(api, form, id).await {
        Ok(r) => r,
        Err(e) => {
            log::error!("Loading '{}' report {id} for approval failed: {e}", form.slug);
            return ApproveOutcome::Failed(failure_message(&e));
        }
    };
    let Some(url) = record.approve_url else {
        return ApproveOutcome::NotApprovable;
    };

    match api.approve(&url, signature).await {
        Ok(()) => {
            log::info!("Approved '{}' report {id}", form.slug);
            ApproveOutcome::Approved
        }
        Err(e) => {
            log::error!("Approving '{}' report {id} failed: {e}", form.slug);
            ApproveOutcome::Failed(failure_message(&e))
        }
    }
}
