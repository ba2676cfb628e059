//! Prompt templates for AI generation
//!
//! Each generator gets a system prompt (rules, language, style, template)
//! and a user prompt carrying the diff.

use crate::ai::diff::{smart_truncate_diff, MAX_DIFF_CHARS};
use crate::core::config::{Config, Language, Style};
use crate::github::{BranchPair, DiffSummary};

/// System and user prompt for one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Language and verbosity for generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromptSettings {
    pub language: Language,
    pub style: Style,
}

impl PromptSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.language,
            style: config.style,
        }
    }
}

fn language_rule(language: Language) -> String {
    match language {
        Language::English => "Write everything in English.".to_string(),
        other => format!(
            "Write the prose in {}. Keep code identifiers, file paths and conventional commit type prefixes (feat, fix, ...) in English.",
            other.english_name()
        ),
    }
}

fn commit_style_rule(style: Style) -> &'static str {
    match style {
        Style::Simple => "Output a single subject line only, no body.",
        Style::Normal => {
            "Output a subject line, a blank line, then at most 5 short bullet points describing the key changes."
        }
        Style::Detailed => {
            "Output a subject line, a blank line, then a body explaining what changed and why, grouped by area, using bullet points where helpful."
        }
    }
}

fn pr_style_rule(style: Style) -> &'static str {
    match style {
        Style::Simple => "The body is one or two sentences summarizing the change.",
        Style::Normal => {
            "The body has a short summary paragraph followed by a bullet list of key changes."
        }
        Style::Detailed => {
            "The body has sections for Summary, Changes, Testing and Notes (breaking changes, migration steps, risks)."
        }
    }
}

fn template_rule(template: Option<&str>, what: &str) -> String {
    match template {
        Some(template) => format!(
            "\n\nThe repository provides this {what} template. Follow its structure and fill in every section that applies:\n<template>\n{}\n</template>",
            template.trim()
        ),
        None => String::new(),
    }
}

/// Build the prompts for commit message generation
pub fn commit_prompts(diff: &str, settings: PromptSettings, template: Option<&str>) -> PromptPair {
    let system = format!(
        r#"You write git commit messages from staged diffs.

Rules:
1. Use conventional commit format: type(scope): description
2. Types: feat, fix, docs, style, refactor, perf, test, build, ci, chore
3. Keep the first line under 72 characters, imperative mood, no trailing period
4. {style}
5. {language}
6. Output only the commit message, no explanations and no code fences{template}"#,
        style = commit_style_rule(settings.style),
        language = language_rule(settings.language),
        template = template_rule(template, "commit message"),
    );

    let user = format!(
        "Staged diff:\n```diff\n{}\n```",
        smart_truncate_diff(diff, MAX_DIFF_CHARS)
    );

    PromptPair { system, user }
}

/// Build the prompts for PR title/body generation
pub fn pr_prompts(
    diff: &DiffSummary,
    branches: &BranchPair,
    settings: PromptSettings,
    template: Option<&str>,
) -> PromptPair {
    let system = format!(
        r#"You write GitHub pull request titles and descriptions from branch diffs.

Requirements for title:
1. Clear and concise (max 72 characters)
2. Conventional commit style prefix when it fits (feat:, fix:, ...)
3. No period at the end

Requirements for body:
1. {style}
2. Markdown formatting
3. Do not invent issue numbers

{language}{template}

Respond in this exact JSON format:
{{
  "title": "PR title here",
  "body": "PR body here"
}}"#,
        style = pr_style_rule(settings.style),
        language = language_rule(settings.language),
        template = template_rule(template, "pull request"),
    );

    let files = diff
        .files
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Merging `{compare}` into `{base}`.\n\nChanged files ({count}):\n{files}\n\nDiff:\n```diff\n{diff}\n```",
        compare = branches.compare,
        base = branches.base,
        count = diff.files.len(),
        diff = smart_truncate_diff(&diff.raw_text, MAX_DIFF_CHARS),
    );

    PromptPair { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> DiffSummary {
        DiffSummary {
            files: vec!["src/a.rs".to_string(), "README.md".to_string()],
            raw_text: "diff --git a/src/a.rs b/src/a.rs\n+fn a() {}\n".to_string(),
        }
    }

    fn pair() -> BranchPair {
        BranchPair {
            base: "main".to_string(),
            compare: "feature/x".to_string(),
        }
    }

    #[test]
    fn test_commit_prompt_carries_diff_and_style() {
        let prompt = commit_prompts(
            "+added line",
            PromptSettings {
                language: Language::English,
                style: Style::Simple,
            },
            None,
        );
        assert!(prompt.system.contains("single subject line"));
        assert!(prompt.system.contains("Write everything in English."));
        assert!(!prompt.system.contains("<template>"));
        assert!(prompt.user.contains("+added line"));
    }

    #[test]
    fn test_commit_prompt_language_and_template() {
        let prompt = commit_prompts(
            "+x",
            PromptSettings {
                language: Language::Japanese,
                style: Style::Detailed,
            },
            Some("type(scope): subject\n\nbody\n"),
        );
        assert!(prompt.system.contains("Japanese"));
        assert!(prompt.system.contains("<template>\ntype(scope): subject\n\nbody\n</template>"));
    }

    #[test]
    fn test_pr_prompt_lists_files_and_branches() {
        let prompt = pr_prompts(&summary(), &pair(), PromptSettings::default(), None);
        assert!(prompt.user.contains("Merging `feature/x` into `main`"));
        assert!(prompt.user.contains("Changed files (2):\n- src/a.rs\n- README.md"));
        assert!(prompt.user.contains("+fn a() {}"));
        assert!(prompt.system.contains(r#""title": "PR title here""#));
    }

    #[test]
    fn test_pr_prompt_includes_template() {
        let prompt = pr_prompts(
            &summary(),
            &pair(),
            PromptSettings::default(),
            Some("## Summary\n\n## Testing\n"),
        );
        assert!(prompt.system.contains("pull request template"));
        assert!(prompt.system.contains("## Testing"));
    }
}
