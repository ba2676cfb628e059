//! Provider error bodies and status classification

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::AiErrorKind;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ProviderError>,
}

/// Union of the Gemini (`status`, numeric `code`) and OpenAI (`type`, string `code`) shapes
#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
    status: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Pull a readable message out of a provider error body
pub(crate) fn extract_api_error(body: &str) -> String {
    let Ok(ErrorEnvelope { error: Some(err) }) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return body.trim().to_string();
    };

    let message = err.message.unwrap_or_else(|| "unknown error".to_string());
    match err.status.or(err.kind) {
        Some(label) => format!("{} ({})", message, label),
        None => message,
    }
}

/// Map an unsuccessful HTTP status (plus body) to an error kind
pub(crate) fn classify_status(status: StatusCode, body: &str) -> AiErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiErrorKind::Auth,
        StatusCode::TOO_MANY_REQUESTS => AiErrorKind::RateLimit,
        // Gemini answers 400 for a bad key
        StatusCode::BAD_REQUEST
            if body.contains("API_KEY_INVALID") || body.contains("API key not valid") =>
        {
            AiErrorKind::Auth
        }
        s if s.is_server_error() => AiErrorKind::Network,
        _ => AiErrorKind::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_gemini_error() {
        let body = r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            extract_api_error(body),
            "Resource exhausted (RESOURCE_EXHAUSTED)"
        );
    }

    #[test]
    fn test_extract_openai_error() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(
            extract_api_error(body),
            "Incorrect API key provided (invalid_request_error)"
        );
    }

    #[test]
    fn test_extract_non_json_body() {
        assert_eq!(extract_api_error(" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            AiErrorKind::Auth
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            AiErrorKind::RateLimit
        );
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST, "API key not valid. Please pass a valid API key."),
            AiErrorKind::Auth
        );
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST, "invalid argument"),
            AiErrorKind::Malformed
        );
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            AiErrorKind::Network
        );
    }
}
