//! GitHub repository permission check

use super::client::{endpoint, SocialClient};
use super::error::SocialError;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

/// GitHub's page size ceiling for repository listings
const REPOS_PER_PAGE: usize = 100;
const MAX_REPO_PAGES: u32 = 10;

impl SocialClient {
    /// Whether the token's owner has access to `repository_name` in the
    /// configured organisation
    ///
    /// An empty token is denied without contacting GitHub. The listing is
    /// paged until the repository is found or a short page ends it. Any
    /// failure is treated as a denial.
    pub async fn has_commit_permission(&self, token: &str, repository_name: &str) -> bool {
        if token.trim().is_empty() {
            tracing::debug!("No GitHub token supplied, permission denied");
            return false;
        }

        for page in 1..=MAX_REPO_PAGES {
            let repos = match self.fetch_organisation_repositories(token, page).await {
                Ok(repos) => repos,
                Err(err) => {
                    tracing::warn!(error = %err, page, "GitHub permission check failed");
                    return false;
                }
            };
            if grants_access(&repos, repository_name) {
                tracing::debug!(repository = repository_name, page, "GitHub permission granted");
                return true;
            }
            if repos.len() < REPOS_PER_PAGE {
                break;
            }
        }

        tracing::debug!(repository = repository_name, "GitHub permission denied");
        false
    }

    async fn fetch_organisation_repositories(
        &self,
        token: &str,
        page: u32,
    ) -> Result<Vec<Value>, SocialError> {
        let url = endpoint(
            &self.config.github_api,
            &format!("{}repos", self.config.repository_url),
        );
        let request = self
            .http
            .get(url)
            .query(&[("per_page", REPOS_PER_PAGE.to_string()), ("page", page.to_string())])
            .header(AUTHORIZATION, format!("token {}", token))
            .header(ACCEPT, "application/vnd.github+json");

        match self.send_json(request).await? {
            Value::Array(repos) => Ok(repos),
            _ => Err(SocialError::UnexpectedResponse(
                "repository listing is not an array".to_string(),
            )),
        }
    }
}

fn grants_access(repos: &[Value], repository_name: &str) -> bool {
    repos
        .iter()
        .filter(|repo| repo["name"] == repository_name)
        .any(|repo| repo["permissions"]["pull"].as_bool().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SocialConfig;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(base: String) -> SocialClient {
        SocialClient::new(SocialConfig {
            github_api: base,
            ..SocialConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_grants_access_requires_matching_repo() {
        let repos = vec![
            json!({"name": "dipy", "permissions": {"pull": true}}),
            json!({"name": "dipy.org", "permissions": {"pull": false}}),
        ];
        assert!(grants_access(&repos, "dipy"));
        assert!(!grants_access(&repos, "dipy.org"));
        assert!(!grants_access(&repos, "nibabel"));
    }

    #[tokio::test]
    async fn test_empty_token_denied_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(server.url());
        assert!(!client.has_commit_permission("", "dipy.org").await);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_permission_granted_for_listed_repo() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/orgs/nipy/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .match_header("authorization", "token gh-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"name": "nibabel", "permissions": {"pull": false}},
                    {"name": "dipy.org", "permissions": {"admin": false, "push": true, "pull": true}}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(server.url());
        assert!(client.has_commit_permission("gh-token", "dipy.org").await);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_denied() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/orgs/nipy/repos")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        assert!(!client.has_commit_permission("revoked", "dipy.org").await);
    }

    #[tokio::test]
    async fn test_unreachable_github_is_denied() {
        let client = client_for("http://127.0.0.1:1".to_string());
        assert!(!client.has_commit_permission("gh-token", "dipy.org").await);
    }

    #[tokio::test]
    async fn test_permission_found_on_second_page() {
        let mut server = mockito::Server::new_async().await;
        let filler: Vec<Value> = (0..REPOS_PER_PAGE)
            .map(|i| json!({"name": format!("repo-{}", i), "permissions": {"pull": true}}))
            .collect();
        let first = server
            .mock("GET", "/orgs/nipy/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(Value::Array(filler).to_string())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/orgs/nipy/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(json!([{"name": "dipy.org", "permissions": {"pull": true}}]).to_string())
            .create_async()
            .await;

        let client = client_for(server.url());
        assert!(client.has_commit_permission("gh-token", "dipy.org").await);

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_short_page_stops_paging() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("GET", "/orgs/nipy/repos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([{"name": "nibabel", "permissions": {"pull": true}}]).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(server.url());
        assert!(!client.has_commit_permission("gh-token", "dipy.org").await);

        listing.assert_async().await;
    }
}
