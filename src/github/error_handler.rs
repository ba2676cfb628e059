//! GitHub API error detection and classification
//!
//! Turns octocrab errors into `ScribeError` variants the orchestrators can
//! act on. Classification reads the structured `GitHubError` (status code,
//! message, `errors` array) instead of a formatted error string.

use std::process::Command;

use crate::error::ScribeError;

/// Classifies an octocrab error into a more specific ScribeError if possible
pub fn classify_github_error(err: octocrab::Error) -> ScribeError {
    if let octocrab::Error::GitHub { source, .. } = &err {
        let status = source.status_code.as_u16();
        let details = error_details(source.errors.as_deref().unwrap_or_default());

        return match status {
            401 => ScribeError::AuthenticationFailed(format!(
                "token rejected by GitHub ({})",
                source.message
            )),
            403 if is_rate_limit_error(&source.message) => ScribeError::GitHubApi(
                "API rate limit exceeded. Please wait a few minutes and try again.".to_string(),
            ),
            404 => ScribeError::GitHubApi(
                "Not found. The repository or branch may be private or may not exist.".to_string(),
            ),
            422 if is_draft_unsupported(&source.message, &details) => {
                ScribeError::DraftUnsupported(join_message(&source.message, &details))
            }
            422 => ScribeError::GitHubValidation(join_message(&source.message, &details)),
            _ => ScribeError::GitHubApi(join_message(&source.message, &details)),
        };
    }

    // Transport, parsing and other non-API failures
    ScribeError::GitHubApi(error_chain(&err))
}

/// `outer: cause: root cause` for an error and its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Messages from the `errors` array of a GitHub error body
fn error_details(errors: &[serde_json::Value]) -> Vec<String> {
    errors
        .iter()
        .filter_map(|e| match e {
            serde_json::Value::String(s) => Some(s.clone()),
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
        })
        .collect()
}

fn join_message(message: &str, details: &[String]) -> String {
    if details.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", message, details.join("; "))
    }
}

/// GitHub reports draft-less plans as a 422 whose details mention draft pull requests
fn is_draft_unsupported(message: &str, details: &[String]) -> bool {
    std::iter::once(message)
        .chain(details.iter().map(String::as_str))
        .any(|m| {
            let m = m.to_ascii_lowercase();
            m.contains("draft pull request") && m.contains("not supported")
        })
}

fn is_rate_limit_error(message: &str) -> bool {
    message.to_ascii_lowercase().contains("rate limit")
}

/// Attempt to open a URL in the default browser
///
/// Returns true if the browser was successfully launched, false otherwise.
#[allow(unused_variables)]
pub fn open_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(url).spawn().is_ok()
    }
    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(url).spawn().is_ok()
    }
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()
            .is_ok()
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_unsupported_in_error_details() {
        let errors = vec![json!({
            "resource": "PullRequest",
            "code": "custom",
            "message": "Draft pull requests are not supported in this repository."
        })];
        let details = error_details(&errors);
        assert!(is_draft_unsupported("Validation Failed", &details));
    }

    #[test]
    fn test_draft_unsupported_in_message() {
        assert!(is_draft_unsupported(
            "Draft pull requests are not supported in this repository.",
            &[]
        ));
    }

    #[test]
    fn test_other_validation_errors_are_not_draft() {
        let errors = vec![json!({
            "resource": "PullRequest",
            "code": "custom",
            "message": "A pull request already exists for octo:feature."
        })];
        let details = error_details(&errors);
        assert!(!is_draft_unsupported("Validation Failed", &details));
        assert_eq!(
            join_message("Validation Failed", &details),
            "Validation Failed: A pull request already exists for octo:feature."
        );
    }

    #[test]
    fn test_string_error_details() {
        let errors = vec![json!("No commits between main and feature")];
        assert_eq!(
            error_details(&errors),
            vec!["No commits between main and feature".to_string()]
        );
    }

    #[derive(Debug, thiserror::Error)]
    #[error("failed to send request")]
    struct Transport(#[source] std::io::Error);

    #[test]
    fn test_transport_errors_read_as_cause_chain() {
        let err = Transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(error_chain(&err), "failed to send request: connection refused");
        assert!(!error_chain(&err).contains("Transport"));
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limit_error("API rate limit exceeded for user"));
        assert!(!is_rate_limit_error("Resource not accessible by integration"));
    }
}
