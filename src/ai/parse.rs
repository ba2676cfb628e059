//! Turning raw model output into commit messages and PR content

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::ai::GeneratedContent;
use crate::error::{AiErrorKind, Result, ScribeError};

/// Opening fence with an optional info string, e.g. "```text"
static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").expect("valid fence regex"));

#[derive(Debug, Deserialize)]
struct PrContentJson {
    title: String,
    #[serde(default)]
    body: String,
}

/// Strip markdown fences and surrounding whitespace from a commit message
pub fn clean_commit_message(response: &str) -> String {
    let trimmed = response.trim();
    let without_open = OPENING_FENCE.replace(trimmed, "");
    without_open
        .trim_end()
        .trim_end_matches("```")
        .trim()
        .to_string()
}

/// Extract JSON content from a response (handles markdown code blocks)
fn extract_json_from_markdown(response: &str) -> String {
    let trimmed = response.trim();

    // Fenced block, with or without a "json" tag; an unclosed fence takes the rest
    if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + 3..];
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        let content = rest.find("```").map_or(rest, |end| &rest[..end]).trim();
        if content.starts_with('{') {
            return content.to_string();
        }
    }

    // Raw JSON object anywhere in the response
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Parse PR title and body from the model's JSON answer
pub fn parse_pr_content(provider: &'static str, response: &str) -> Result<GeneratedContent> {
    let json_str = extract_json_from_markdown(response);

    if !json_str.starts_with('{') {
        return Err(ScribeError::ai(
            provider,
            AiErrorKind::Malformed,
            format!("response has no JSON object: {}", preview(response, 100)),
        ));
    }

    if let Ok(parsed) = serde_json::from_str::<PrContentJson>(&json_str) {
        return finish(provider, parsed.title, parsed.body);
    }

    // Models regularly emit raw newlines inside strings; pull the fields out by hand
    if let Some(title) = extract_json_field(&json_str, "title") {
        let body = extract_json_field(&json_str, "body").unwrap_or_default();
        return finish(provider, title, body);
    }

    Err(ScribeError::ai(
        provider,
        AiErrorKind::Malformed,
        format!("could not read title/body: {}...", preview(&json_str, 200)),
    ))
}

fn finish(provider: &'static str, title: String, body: String) -> Result<GeneratedContent> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ScribeError::ai(
            provider,
            AiErrorKind::Malformed,
            "generated pull request title is empty",
        ));
    }
    Ok(GeneratedContent {
        title,
        body: body.trim().to_string(),
    })
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Extract a string field from potentially malformed JSON
fn extract_json_field(json: &str, field: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*""#, regex::escape(field));
    let re = Regex::new(&pattern).ok()?;
    let start = re.find(json)?.end();

    let mut value = String::new();
    let mut chars = json[start..].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('t') => value.push('\t'),
                Some(other) => value.push(other),
                None => break,
            },
            '"' => break,
            _ => value.push(c),
        }
    }

    Some(value)
}
