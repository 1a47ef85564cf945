//! octocrab-backed implementation of [`GitHubApi`].

use super::response::{classify_failure, next_page_from_headers, parse_rate_limit};
use super::types::{FileContent, RepositoryPayload};
use super::{
    ApiError, ContentResponse, CreatedPullRequest, GitHubApi, PullRequestRequest,
    RepositoryPage, RepositoryResponse,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;
use url::Url;

/// Repositories requested per listing page.
const REPOS_PER_PAGE: u8 = 100;

/// GitHub client talking to the REST API through octocrab.
#[derive(Clone)]
pub struct OctocrabApi {
    octocrab: Octocrab,
}

/// Status, headers and body of a raw response.
struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl OctocrabApi {
    /// Builds an authenticated client.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token
    /// * `base_url` - Optional API base URL (GitHub Enterprise)
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    pub fn new(token: &str, base_url: Option<&Url>) -> Result<Self, ApiError> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(base_url) = base_url {
            builder = builder.base_uri(base_url.as_str())?;
        }
        Ok(Self {
            octocrab: builder.build()?,
        })
    }

    /// Issues a GET without status mapping, keeping the headers.
    async fn get_raw(&self, route: &str) -> Result<RawResponse, ApiError> {
        debug!(route, "GET");
        let response = self.octocrab._get(route).await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = self.octocrab.body_to_string(response).await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Fetches `route`, mapping failures onto [`ApiError`].
    async fn get_checked(&self, route: &str, resource: &str) -> Result<RawResponse, ApiError> {
        let response = self.get_raw(route).await?;
        if !response.is_success() {
            return Err(classify_failure(
                response.status,
                resource,
                &response.headers,
                &response.body,
            ));
        }
        Ok(response)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(
    response: &RawResponse,
    resource: &str,
) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidResponse {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}

fn map_octocrab_error(error: octocrab::Error, resource: &str) -> ApiError {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            if status == 404 {
                ApiError::NotFound {
                    resource: resource.to_string(),
                    rate: None,
                }
            } else {
                ApiError::Status {
                    status,
                    resource: resource.to_string(),
                    message: source.message.clone(),
                }
            }
        }
        other => ApiError::GitHubError(other),
    }
}

#[async_trait]
impl GitHubApi for OctocrabApi {
    async fn list_org_repositories(
        &self,
        org: &str,
        page: u32,
    ) -> Result<RepositoryPage, ApiError> {
        let route = format!("/orgs/{org}/repos?type=all&per_page={REPOS_PER_PAGE}&page={page}");
        let resource = format!("orgs/{org}/repos (page {page})");
        let response = self.get_checked(&route, &resource).await?;

        let payload: Vec<RepositoryPayload> = parse_body(&response, &resource)?;
        let repositories = payload
            .into_iter()
            .map(|repo| repo.into_repository(org))
            .collect();

        Ok(RepositoryPage {
            repositories,
            next_page: next_page_from_headers(&response.headers),
            rate: parse_rate_limit(&response.headers),
        })
    }

    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<ContentResponse, ApiError> {
        let route = format!("/repos/{owner}/{repo}/contents/{path}");
        let resource = format!("{owner}/{repo}/{path}");
        let response = self.get_checked(&route, &resource).await?;

        // A directory listing comes back as an array and fails here.
        let content: FileContent = parse_body(&response, &resource)?;

        Ok(ContentResponse {
            content,
            rate: parse_rate_limit(&response.headers),
        })
    }

    async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryResponse, ApiError> {
        let route = format!("/repos/{owner}/{repo}");
        let resource = format!("{owner}/{repo}");
        let response = self.get_checked(&route, &resource).await?;

        let payload: RepositoryPayload = parse_body(&response, &resource)?;

        Ok(RepositoryResponse {
            repository: payload.into_repository(owner),
            rate: parse_rate_limit(&response.headers),
        })
    }

    async fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<CreatedPullRequest, ApiError> {
        let resource = format!("{}/{} pulls", request.owner, request.repo);
        let pr = self
            .octocrab
            .pulls(&request.owner, &request.repo)
            .create(&request.title, &request.head, &request.base)
            .body(&request.body)
            .send()
            .await
            .map_err(|e| map_octocrab_error(e, &resource))?;

        let url = pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| {
                format!(
                    "https://github.com/{}/{}/pull/{}",
                    request.owner, request.repo, pr.number
                )
            });

        Ok(CreatedPullRequest {
            number: pr.number,
            url,
        })
    }
}
