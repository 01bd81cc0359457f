//! The API's response envelope.
//!
//! Every endpoint answers `{success, message?, data?}`. Error bodies are less
//! regular: some carry `message`, some `error`, some only a `title`.

use serde::Deserialize;

fn default_success() -> bool {
    true
}

/// Envelope around every API payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Pull a human-readable message out of an error body, if it has one.
///
/// Non-JSON bodies are used verbatim when short enough to show to a user.
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => [parsed.message, parsed.error, parsed.title]
            .into_iter()
            .flatten()
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty()),
        Err(_) if body.len() <= 200 && !body.starts_with('<') && !body.starts_with('{') => {
            Some(body.to_string())
        }
        Err(_) => None,
    }
}
