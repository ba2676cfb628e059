//! Branch operations

use octocrab::models::repos::Branch;

use crate::error::Result;
use crate::github::client::GitHubClient;

/// Information about a remote branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    /// Branch name
    pub name: String,
    /// Whether this is the default branch
    pub is_default: bool,
    /// Whether this is a protected branch
    pub protected: bool,
}

/// Branch operations handler
pub struct BranchHandler<'a> {
    client: &'a GitHubClient,
}

impl<'a> BranchHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// List remote branches, default branch first
    pub async fn list(&self) -> Result<Vec<BranchInfo>> {
        let first_page = self
            .client
            .repos()
            .list_branches()
            .per_page(100)
            .send()
            .await?;
        let branches = self.client.octocrab().all_pages(first_page).await?;

        let repo = self.client.repos().get().await?;
        let default_branch = repo.default_branch.unwrap_or_else(|| "main".to_string());

        Ok(branch_infos(branches, &default_branch))
    }
}

fn branch_infos(branches: Vec<Branch>, default_branch: &str) -> Vec<BranchInfo> {
    let mut infos: Vec<BranchInfo> = branches
        .into_iter()
        .map(|b| BranchInfo {
            is_default: b.name == default_branch,
            name: b.name,
            protected: b.protected,
        })
        .collect();

    sort_default_first(&mut infos);
    infos
}

/// Default branch first, the rest alphabetically
pub fn sort_default_first(branches: &mut [BranchInfo]) {
    branches.sort_by(|a, b| b.is_default.cmp(&a.is_default).then(a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, is_default: bool) -> BranchInfo {
        BranchInfo {
            name: name.to_string(),
            is_default,
            protected: false,
        }
    }

    #[test]
    fn test_every_fetched_branch_is_offered() {
        let names: Vec<String> = (0..150).map(|i| format!("topic-{:03}", i)).collect();
        let payload: Vec<serde_json::Value> = names
            .iter()
            .chain(std::iter::once(&"main".to_string()))
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "commit": {"sha": "abc123", "url": "https://api.github.com/commits/abc123"},
                    "protected": name == "main"
                })
            })
            .collect();
        let branches: Vec<Branch> = serde_json::from_value(serde_json::Value::Array(payload)).unwrap();

        let infos = branch_infos(branches, "main");
        assert_eq!(infos.len(), 151);
        assert_eq!(infos[0].name, "main");
        assert!(infos[0].is_default && infos[0].protected);
        assert_eq!(infos[150].name, "topic-149");
    }

    #[test]
    fn test_sort_default_first() {
        let mut branches = vec![info("zeta", false), info("main", true), info("alpha", false)];
        sort_default_first(&mut branches);
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["main", "alpha", "zeta"]);
    }
}
