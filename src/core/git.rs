//! Local git repository operations
//!
//! This module provides a wrapper around git2 for the operations the
//! generators need:
//! - Repository discovery and validation
//! - Branch and remote lookup
//! - Staged diff generation and staging
//! - Commit / pull request template discovery

use std::fs;
use std::path::{Path, PathBuf};

use git2::{DiffOptions, IndexAddOption, Repository};
use tracing::debug;

use crate::error::{Result, ScribeError};

/// Repository-relative locations searched for a pull request template, in order
pub const PR_TEMPLATE_PATHS: &[&str] = &[
    ".github/pull_request_template.md",
    ".github/PULL_REQUEST_TEMPLATE.md",
    "pull_request_template.md",
    "PULL_REQUEST_TEMPLATE.md",
    "docs/pull_request_template.md",
    "docs/PULL_REQUEST_TEMPLATE.md",
];

/// Directory holding multiple pull request templates
const PR_TEMPLATE_DIR: &str = ".github/PULL_REQUEST_TEMPLATE";

/// Commit template file used when `commit.template` is not configured
const COMMIT_TEMPLATE_FILE: &str = ".gitmessage";

/// Kind of template a repository can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Commit,
    PullRequest,
}

/// Local version-control operations used by the generators
#[cfg_attr(test, mockall::automock)]
pub trait LocalVcs {
    /// Unified diff of the index against HEAD
    fn staged_diff(&self) -> Result<String>;

    /// Stage every working-tree change, including deletions and untracked files
    fn stage_all(&self) -> Result<()>;

    /// Find a repository-provided template
    fn discover_template(&self, kind: TemplateKind) -> Result<Option<String>>;

    /// Name of the checked-out branch
    fn current_branch(&self) -> Result<String>;
}

/// Wrapper for local git repository operations
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the git repository in the current directory
    pub fn open_current_dir() -> Result<Self> {
        Self::discover(".")
    }

    /// Discover a git repository from the given path
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| ScribeError::NotGitRepository)?;
        Ok(Self { repo })
    }

    /// Check if the current directory is a git repository
    pub fn is_git_repository() -> bool {
        Repository::discover(".").is_ok()
    }

    /// Get the remote URL for a given remote name
    pub fn remote_url(&self, remote_name: &str) -> Result<String> {
        let remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ScribeError::NoGitHubRemote)?;
        remote
            .url()
            .map(|s| s.to_string())
            .ok_or(ScribeError::NoGitHubRemote)
    }

    /// Get the origin remote URL
    pub fn origin_url(&self) -> Result<String> {
        self.remote_url("origin")
    }

    /// Get the repository root directory
    pub fn root_dir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(|p| p.to_path_buf())
            .ok_or(ScribeError::NotGitRepository)
    }

    /// Path of the `.git` directory
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Tree of the HEAD commit, `None` before the first commit
    fn head_tree(&self) -> Result<Option<git2::Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the commit template configured through `commit.template`
    fn configured_commit_template(&self, root: &Path) -> Option<PathBuf> {
        let config = self.repo.config().ok()?;
        let raw = config.get_path("commit.template").ok()?;
        Some(if raw.is_absolute() {
            raw
        } else {
            root.join(raw)
        })
    }

    fn pr_template_candidates(root: &Path) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> =
            PR_TEMPLATE_PATHS.iter().map(|p| root.join(p)).collect();

        // Multiple-template directory: first markdown file by name
        if let Ok(entries) = fs::read_dir(root.join(PR_TEMPLATE_DIR)) {
            let mut extra: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
                .collect();
            extra.sort();
            candidates.extend(extra);
        }

        candidates
    }
}

/// Render a git2 diff as unified patch text
fn diff_to_text(diff: &git2::Diff<'_>) -> Result<String> {
    let mut diff_text = String::new();
    diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            diff_text.push(line.origin());
        }
        diff_text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;
    Ok(diff_text)
}

/// Read a template file, ignoring missing or blank files
fn read_template(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    if contents.trim().is_empty() {
        None
    } else {
        debug!(path = %path.display(), "using template");
        Some(contents)
    }
}

impl LocalVcs for GitRepository {
    fn staged_diff(&self) -> Result<String> {
        let head = self.head_tree()?;
        let index = self.repo.index()?;

        let diff = self.repo.diff_tree_to_index(
            head.as_ref(),
            Some(&index),
            Some(&mut DiffOptions::new()),
        )?;

        diff_to_text(&diff)
    }

    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        // add_all skips removed files; update_all stages the deletions
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    fn discover_template(&self, kind: TemplateKind) -> Result<Option<String>> {
        let root = self.root_dir()?;

        let candidates = match kind {
            TemplateKind::Commit => {
                let mut paths = Vec::new();
                if let Some(configured) = self.configured_commit_template(&root) {
                    paths.push(configured);
                }
                paths.push(root.join(COMMIT_TEMPLATE_FILE));
                paths
            }
            TemplateKind::PullRequest => Self::pr_template_candidates(&root),
        };

        Ok(candidates.iter().find_map(|p| read_template(p)))
    }

    fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => {
                if head.is_branch() {
                    Ok(head.shorthand().unwrap_or("HEAD").to_string())
                } else {
                    Ok("HEAD".to_string())
                }
            }
            Err(e) => {
                if e.code() == git2::ErrorCode::UnbornBranch {
                    if let Ok(config) = self.repo.config() {
                        if let Ok(branch) = config.get_string("init.defaultBranch") {
                            return Ok(branch);
                        }
                    }
                    Ok("main".to_string())
                } else {
                    Err(e.into())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepository) {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let git = GitRepository::discover(dir.path()).unwrap();
        (dir, git)
    }

    fn commit_all(git: &GitRepository, message: &str) {
        let repo = &git.repo;
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("test", "test@example.com").unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn test_staged_diff_empty_on_clean_tree() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        commit_all(&git, "initial");

        assert!(git.staged_diff().unwrap().is_empty());
    }

    #[test]
    fn test_stage_all_picks_up_modified_and_new_files() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        commit_all(&git, "initial");

        fs::write(dir.path().join("a.txt"), "two\n").unwrap();
        fs::write(dir.path().join("b.txt"), "new\n").unwrap();
        assert!(git.staged_diff().unwrap().is_empty());

        git.stage_all().unwrap();
        let diff = git.staged_diff().unwrap();
        assert!(diff.contains("diff --git a/a.txt b/a.txt"));
        assert!(diff.contains("-one"));
        assert!(diff.contains("+two"));
        assert!(diff.contains("b/b.txt"));
    }

    #[test]
    fn test_stage_all_stages_deletions() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("gone.txt"), "bye\n").unwrap();
        commit_all(&git, "initial");

        fs::remove_file(dir.path().join("gone.txt")).unwrap();
        git.stage_all().unwrap();

        let diff = git.staged_diff().unwrap();
        assert!(diff.contains("deleted file"));
        assert!(diff.contains("-bye"));
    }

    #[test]
    fn test_staged_diff_before_first_commit() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("first.txt"), "hello\n").unwrap();
        git.stage_all().unwrap();

        let diff = git.staged_diff().unwrap();
        assert!(diff.contains("+hello"));
    }

    #[test]
    fn test_discover_pr_template_prefers_github_dir() {
        let (dir, git) = init_repo();
        fs::create_dir_all(dir.path().join(".github")).unwrap();
        fs::write(
            dir.path().join(".github/pull_request_template.md"),
            "## Summary\n",
        )
        .unwrap();
        fs::write(dir.path().join("PULL_REQUEST_TEMPLATE.md"), "## Root\n").unwrap();

        let template = git.discover_template(TemplateKind::PullRequest).unwrap();
        assert_eq!(template.as_deref(), Some("## Summary\n"));
    }

    #[test]
    fn test_discover_pr_template_in_template_dir() {
        let (dir, git) = init_repo();
        let tpl_dir = dir.path().join(PR_TEMPLATE_DIR);
        fs::create_dir_all(&tpl_dir).unwrap();
        fs::write(tpl_dir.join("feature.md"), "## Feature\n").unwrap();
        fs::write(tpl_dir.join("bugfix.md"), "## Bugfix\n").unwrap();

        let template = git.discover_template(TemplateKind::PullRequest).unwrap();
        assert_eq!(template.as_deref(), Some("## Bugfix\n"));
    }

    #[test]
    fn test_discover_commit_template() {
        let (dir, git) = init_repo();
        assert!(git
            .discover_template(TemplateKind::Commit)
            .unwrap()
            .is_none());

        fs::write(dir.path().join(".gitmessage"), "type(scope): subject\n").unwrap();
        let template = git.discover_template(TemplateKind::Commit).unwrap();
        assert_eq!(template.as_deref(), Some("type(scope): subject\n"));
    }

    #[test]
    fn test_blank_template_is_ignored() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join(".gitmessage"), "   \n").unwrap();
        assert!(git
            .discover_template(TemplateKind::Commit)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_current_branch_after_commit() {
        let (dir, git) = init_repo();
        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        commit_all(&git, "initial");

        let branch = git.current_branch().unwrap();
        assert!(!branch.is_empty());
        assert_eq!(git.repo.head().unwrap().shorthand(), Some(branch.as_str()));
    }

    #[test]
    fn test_missing_origin_is_reported() {
        let (_dir, git) = init_repo();
        assert!(matches!(
            git.origin_url(),
            Err(ScribeError::NoGitHubRemote)
        ));
    }
}
