//! Branch comparison via the compare API

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, ScribeError};
use crate::github::client::GitHubClient;

/// Base and compare branch of a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPair {
    /// Branch the changes merge into
    pub base: String,
    /// Branch carrying the changes
    pub compare: String,
}

/// Files touched between two branches plus their combined patch text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub files: Vec<String>,
    pub raw_text: String,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    files: Vec<CompareFile>,
}

#[derive(Debug, Deserialize)]
struct CompareFile {
    filename: String,
    #[serde(default)]
    status: String,
    previous_filename: Option<String>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    patch: Option<String>,
}

impl CompareFile {
    /// Render this file as a unified diff section
    fn to_unified(&self) -> String {
        let old = self.previous_filename.as_deref().unwrap_or(&self.filename);
        let mut out = format!("diff --git a/{} b/{}\n", old, self.filename);

        match self.status.as_str() {
            "added" => out.push_str("new file\n"),
            "removed" => out.push_str("deleted file\n"),
            "renamed" => out.push_str(&format!("rename from {}\nrename to {}\n", old, self.filename)),
            _ => {}
        }

        match &self.patch {
            Some(patch) => {
                out.push_str(&format!("--- a/{}\n+++ b/{}\n", old, self.filename));
                out.push_str(patch);
                if !patch.ends_with('\n') {
                    out.push('\n');
                }
            }
            // GitHub drops the patch for binary files and for very large text diffs
            None => out.push_str(&format!(
                "(patch omitted for {}, +{}/-{} lines)\n",
                self.filename, self.additions, self.deletions
            )),
        }

        out
    }
}

impl CompareResponse {
    fn into_summary(self) -> DiffSummary {
        let raw_text = self.files.iter().map(CompareFile::to_unified).collect();
        let files = self.files.into_iter().map(|f| f.filename).collect();
        DiffSummary { files, raw_text }
    }
}

/// Compare operations handler
pub struct CompareHandler<'a> {
    client: &'a GitHubClient,
}

impl<'a> CompareHandler<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Diff `compare` against `base` as GitHub would show it in a pull request
    pub async fn diff(&self, branches: &BranchPair) -> Result<DiffSummary> {
        let route = compare_route(&self.client.owner, &self.client.repo, branches)?;

        let response: CompareResponse = self.client.octocrab().get(&route, None::<&()>).await?;
        let summary = response.into_summary();
        debug!(
            base = %branches.base,
            compare = %branches.compare,
            files = summary.files.len(),
            "fetched branch diff"
        );

        Ok(summary)
    }
}

/// `/repos/{owner}/{repo}/compare/{base}...{compare}` with each ref percent-encoded
///
/// Slashes inside branch names stay literal; `#`, `?`, `%` and spaces are escaped.
pub(crate) fn compare_route(owner: &str, repo: &str, branches: &BranchPair) -> Result<String> {
    let mut url = Url::parse("https://api.github.com/")
        .map_err(|e| ScribeError::GitHubApi(e.to_string()))?;
    let refs = format!("{}...{}", branches.base, branches.compare);

    url.path_segments_mut()
        .map_err(|_| ScribeError::GitHubApi("cannot build compare route".to_string()))?
        .clear()
        .extend(["repos", owner, repo, "compare"])
        .extend(refs.split('/'));

    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_response_to_summary() {
        let payload = r#"{
            "status": "ahead",
            "ahead_by": 2,
            "files": [
                {"filename": "src/x.rs", "status": "added", "additions": 1, "deletions": 0,
                 "patch": "@@ -0,0 +1 @@\n+pub fn x() {}"},
                {"filename": "assets/logo.png", "status": "modified", "additions": 0, "deletions": 0},
                {"filename": "docs/new.md", "previous_filename": "docs/old.md", "status": "renamed",
                 "patch": "@@ -1 +1 @@\n-old\n+new\n"}
            ]
        }"#;
        let response: CompareResponse = serde_json::from_str(payload).unwrap();
        let summary = response.into_summary();

        assert_eq!(
            summary.files,
            vec!["src/x.rs", "assets/logo.png", "docs/new.md"]
        );
        assert!(summary
            .raw_text
            .contains("diff --git a/src/x.rs b/src/x.rs\nnew file\n--- a/src/x.rs\n+++ b/src/x.rs\n@@ -0,0 +1 @@\n+pub fn x() {}\n"));
        assert!(summary
            .raw_text
            .contains("(patch omitted for assets/logo.png, +0/-0 lines)"));
        assert!(summary
            .raw_text
            .contains("diff --git a/docs/old.md b/docs/new.md\nrename from docs/old.md"));
    }

    #[test]
    fn test_large_text_diff_is_not_called_binary() {
        let payload = r#"{"files": [
            {"filename": "data/fixtures.json", "status": "modified", "additions": 4000, "deletions": 12}
        ]}"#;
        let response: CompareResponse = serde_json::from_str(payload).unwrap();
        let summary = response.into_summary();

        assert!(summary
            .raw_text
            .contains("(patch omitted for data/fixtures.json, +4000/-12 lines)"));
        assert!(!summary.raw_text.contains("Binary files"));

        let prompt_diff = crate::ai::diff::smart_truncate_diff(&summary.raw_text, 10);
        assert!(!prompt_diff.contains("binary file"));
    }

    fn pair(base: &str, compare: &str) -> BranchPair {
        BranchPair {
            base: base.to_string(),
            compare: compare.to_string(),
        }
    }

    #[test]
    fn test_compare_route_keeps_slashes() {
        assert_eq!(
            compare_route("octo", "widgets", &pair("release/1.2", "feature/x")).unwrap(),
            "/repos/octo/widgets/compare/release/1.2...feature/x"
        );
    }

    #[test]
    fn test_compare_route_escapes_url_delimiters() {
        assert_eq!(
            compare_route("o", "r", &pair("main", "fix#12")).unwrap(),
            "/repos/o/r/compare/main...fix%2312"
        );
        assert_eq!(
            compare_route("o", "r", &pair("main", "feat?x")).unwrap(),
            "/repos/o/r/compare/main...feat%3Fx"
        );
        assert_eq!(
            compare_route("o", "r", &pair("100%", "my branch")).unwrap(),
            "/repos/o/r/compare/100%25...my%20branch"
        );
    }

    #[test]
    fn test_identical_branches_have_empty_summary() {
        let response: CompareResponse =
            serde_json::from_str(r#"{"status": "identical", "files": []}"#).unwrap();
        let summary = response.into_summary();
        assert!(summary.is_empty());
        assert!(summary.raw_text.is_empty());
    }

    #[test]
    fn test_missing_files_field_is_empty() {
        let response: CompareResponse = serde_json::from_str(r#"{"status": "identical"}"#).unwrap();
        assert!(response.into_summary().is_empty());
    }
}
