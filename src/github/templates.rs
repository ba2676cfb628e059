//! Pull request templates stored on the remote

use tracing::debug;

use crate::core::git::PR_TEMPLATE_PATHS;
use crate::github::client::GitHubClient;

/// Template lookups against the repository contents API
pub struct TemplateHandler<'a> {
    client: &'a GitHubClient,
}

impl<'a> TemplateHandler<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// First pull request template found on `base`
    ///
    /// Lookup failures count as "no template"; the template only shapes the prompt.
    pub async fn pull_request_template(&self, base: &str) -> Option<String> {
        for path in PR_TEMPLATE_PATHS {
            let items = match self
                .client
                .repos()
                .get_content()
                .path(*path)
                .r#ref(base)
                .send()
                .await
            {
                Ok(items) => items,
                Err(e) => {
                    debug!(path, error = %e, "no remote template");
                    continue;
                }
            };

            let content = items
                .items
                .into_iter()
                .next()
                .and_then(|item| item.decoded_content())
                .filter(|text| !text.trim().is_empty());

            if content.is_some() {
                debug!(path, base, "using remote pull request template");
                return content;
            }
        }

        None
    }
}
