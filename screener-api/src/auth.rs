//! Optional API-key protection.

use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::state::ApiConfig;

/// Rejects the request when an API key is configured and the `X-Api-Key`
/// header is missing or wrong. With no key configured, access is open.
pub(crate) fn verify_api_key(config: &ApiConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    if let Some(expected) = &config.api_key {
        let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(ApiError::unauthorized(
                "Missing or invalid API key. Pass it as the X-Api-Key header.",
            ));
        }
    }
    Ok(())
}
