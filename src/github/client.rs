// src/github/client.rs
// =============================================================================
// A thin client for the handful of GitHub REST endpoints we need.
//
// Endpoints:
//   GET /user                               -> verify_credentials()
//   GET /rate_limit                         -> rate_limit()
//   GET /repos/{owner}/{repo}               -> resolve_repository()
//   GET /repos/{owner}/{repo}/contents/{p}  -> list_directory()
//
// Error policy:
// - verify_credentials() never fails, it only logs and returns a bool
// - resolve_repository() classifies 404/403/401 so the user gets an
//   actionable message instead of a bare status code; a 403 caused by an
//   exhausted rate limit stays an Api error with GitHub's message
// - list_directory() hands transport/API errors back to the caller, which
//   decides to skip that subtree
// =============================================================================

use crate::error::{Result, VisualizerError};
use crate::github::types::{
    AuthenticatedUser, ContentEntry, ContentsResponse, RateLimit, RateLimitResponse,
    RepositoryHandle, RepositoryReference,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const SCOPES_HEADER: &str = "X-OAuth-Scopes";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

pub struct GitHubClient {
    client: Client,
    api_url: Url,
    has_token: bool,
}

impl GitHubClient {
    /// Creates a client for the given API root (https://api.github.com for
    /// github.com, https://host/api/v3 for GitHub Enterprise)
    pub fn new(api_url: Url, token: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(token)?)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_url,
            has_token: token.is_some(),
        })
    }

    /// Checks that the token is accepted and logs the scopes it grants
    ///
    /// Returns false for a rejected token and for any other failure. This is
    /// a diagnostic aid only, nothing stops the run when it returns false.
    pub async fn verify_credentials(&self) -> bool {
        if !self.has_token {
            warn!("No token configured, skipping credential check");
            return false;
        }

        let url = match self.endpoint(&["user"]) {
            Ok(url) => url,
            Err(e) => {
                warn!("Error verifying token: {}", e);
                return false;
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error verifying token: {}", e);
                return false;
            }
        };

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                warn!("{}", VisualizerError::InvalidCredentials);
                false
            }
            status if status.is_success() => {
                let scopes = parse_scopes(response.headers());

                match response.json::<AuthenticatedUser>().await {
                    Ok(user) => {
                        info!(login = %user.login, "Token verified. Available scopes: {:?}", scopes);
                        true
                    }
                    Err(e) => {
                        warn!("Error verifying token: {}", e);
                        false
                    }
                }
            }
            status => {
                warn!("Error verifying token: HTTP {}", status);
                false
            }
        }
    }

    /// Reads the core API quota (informational)
    pub async fn rate_limit(&self) -> Result<RateLimit> {
        let url = self.endpoint(&["rate_limit"])?;
        let response = check_status(self.client.get(url).send().await?).await?;
        let body: RateLimitResponse = response.json().await?;
        Ok(body.resources.core)
    }

    /// Looks up the repository, turning 404/403/401 into dedicated errors
    pub async fn resolve_repository(
        &self,
        reference: &RepositoryReference,
    ) -> Result<RepositoryHandle> {
        let url = self.endpoint(&["repos", reference.owner.as_str(), reference.name.as_str()])?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(VisualizerError::RepositoryNotFound {
                full_name: reference.full_name(),
            }),
            StatusCode::FORBIDDEN => {
                let quota_spent = is_rate_limited(response.headers());
                let error = api_error(response).await;

                let rate_limited = quota_spent
                    || matches!(&error, VisualizerError::Api { message, .. }
                        if message.to_lowercase().contains("rate limit"));
                if rate_limited {
                    return Err(error);
                }

                Err(VisualizerError::RepositoryAccessDenied {
                    full_name: reference.full_name(),
                })
            }
            StatusCode::UNAUTHORIZED => Err(VisualizerError::InvalidCredentials),
            _ => {
                let handle: RepositoryHandle = check_status(response).await?.json().await?;
                debug!(
                    repository = %handle.full_name,
                    private = handle.private,
                    branch = ?handle.default_branch,
                    "Resolved repository"
                );
                Ok(handle)
            }
        }
    }

    /// Lists one directory of the repository ("" is the root)
    pub async fn list_directory(
        &self,
        handle: &RepositoryHandle,
        path: &str,
    ) -> Result<Vec<ContentEntry>> {
        let mut segments = vec!["repos"];
        segments.extend(handle.full_name.split('/'));
        segments.push("contents");
        segments.extend(path.split('/').filter(|s| !s.is_empty()));

        let url = self.endpoint(&segments)?;
        debug!(path = %path, "Listing directory");

        let response = check_status(self.client.get(url).send().await?).await?;
        let contents: ContentsResponse = response.json().await?;
        Ok(contents.into_entries())
    }

    // Appends path segments to the API root, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| VisualizerError::InvalidUrlFormat(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

// Builds the headers sent with every request
//
// A token that cannot be sent as a header value (control characters, a
// pasted newline) is rejected instead of silently going out unauthenticated.
fn default_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("repo-visualizer/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| VisualizerError::InvalidCredentials)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

// GitHub answers 403 with x-ratelimit-remaining: 0 once the quota is spent
fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|remaining| remaining.trim() == "0")
}

// X-OAuth-Scopes: "repo, read:org" -> ["repo", "read:org"]
fn parse_scopes(headers: &HeaderMap) -> Vec<String> {
    headers
        .get(SCOPES_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|scope| !scope.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

// Passes a successful response through, anything else becomes an Api error
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(api_error(response).await)
}

// VisualizerError::Api for a failed response, keeping GitHub's "message"
// field when there is one
async fn api_error(response: Response) -> VisualizerError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json.get("message")?.as_str().map(String::from))
        .unwrap_or(body);

    VisualizerError::Api {
        status: status.as_u16(),
        message,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why default_headers instead of adding headers to every request?
//    - GitHub rejects requests without a User-Agent
//    - Setting them once on the Client means no request can forget them
//
// 2. What does set_sensitive(true) do?
//    - It keeps the token out of Debug output of the header map
//
// 3. Why does verify_credentials() return bool and not Result?
//    - The caller only prints what happened, it never stops the run
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::ContentType;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(Url::parse(&server.uri()).unwrap(), token).unwrap()
    }

    fn handle() -> RepositoryHandle {
        RepositoryHandle {
            full_name: "octocat/Hello-World".to_string(),
            default_branch: Some("main".to_string()),
            private: false,
        }
    }

    #[test]
    fn test_token_that_is_not_a_header_value_is_rejected() {
        let api_url = Url::parse(DEFAULT_API_URL).unwrap();

        let result = GitHubClient::new(api_url.clone(), Some("abc\n"));
        assert!(matches!(result, Err(VisualizerError::InvalidCredentials)));

        assert!(GitHubClient::new(api_url, Some("abc")).is_ok());
    }

    #[test]
    fn test_is_rate_limited() {
        let mut headers = HeaderMap::new();
        assert!(!is_rate_limited(&headers));

        headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from_static("12"));
        assert!(!is_rate_limited(&headers));

        headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from_static("0"));
        assert!(is_rate_limited(&headers));
    }

    #[test]
    fn test_parse_scopes() {
        let mut headers = HeaderMap::new();
        headers.insert(SCOPES_HEADER, HeaderValue::from_static("repo, read:org,  ,gist"));
        assert_eq!(parse_scopes(&headers), vec!["repo", "read:org", "gist"]);
        assert!(parse_scopes(&HeaderMap::new()).is_empty());
    }

    #[tokio::test]
    async fn test_verify_credentials_accepts_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer good-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-OAuth-Scopes", "repo, read:org")
                    .set_body_json(json!({ "login": "octocat" })),
            )
            .mount(&server)
            .await;

        assert!(client_for(&server, Some("good-token")).verify_credentials().await);
    }

    #[tokio::test]
    async fn test_verify_credentials_rejects_bad_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        assert!(!client_for(&server, Some("revoked")).verify_credentials().await);
    }

    #[tokio::test]
    async fn test_verify_credentials_treats_other_failures_as_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!client_for(&server, Some("token")).verify_credentials().await);
        assert!(!client_for(&server, None).verify_credentials().await);
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {
                    "core": { "limit": 60, "remaining": 57, "reset": 1700000000, "used": 3 },
                    "search": { "limit": 10, "remaining": 10, "reset": 1700000000, "used": 0 }
                },
                "rate": { "limit": 60, "remaining": 57, "reset": 1700000000, "used": 3 }
            })))
            .mount(&server)
            .await;

        let limit = client_for(&server, None).rate_limit().await.unwrap();
        assert_eq!(limit.limit, 60);
        assert_eq!(limit.remaining, 57);
    }

    #[tokio::test]
    async fn test_resolve_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "full_name": "octocat/Hello-World",
                "default_branch": "master",
                "private": false
            })))
            .mount(&server)
            .await;

        let reference = RepositoryReference::new("octocat", "Hello-World");
        let handle = client_for(&server, None)
            .resolve_repository(&reference)
            .await
            .unwrap();
        assert_eq!(handle.full_name, "octocat/Hello-World");
        assert_eq!(handle.default_branch.as_deref(), Some("master"));
    }

    #[tokio::test]
    async fn test_resolve_repository_classifies_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/private"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/throttled"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .set_body_json(json!({
                        "message": "API rate limit exceeded for 1.2.3.4."
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/secondary"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "You have exceeded a secondary rate limit."
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/revoked"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/broken"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);

        let missing = client
            .resolve_repository(&RepositoryReference::new("octocat", "missing"))
            .await;
        assert!(matches!(
            missing,
            Err(VisualizerError::RepositoryNotFound { ref full_name }) if full_name == "octocat/missing"
        ));

        let private = client
            .resolve_repository(&RepositoryReference::new("octocat", "private"))
            .await;
        assert!(matches!(
            private,
            Err(VisualizerError::RepositoryAccessDenied { .. })
        ));

        // an exhausted quota is not an access problem
        let throttled = client
            .resolve_repository(&RepositoryReference::new("octocat", "throttled"))
            .await;
        match throttled {
            Err(VisualizerError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API rate limit exceeded for 1.2.3.4.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        let secondary = client
            .resolve_repository(&RepositoryReference::new("octocat", "secondary"))
            .await;
        assert!(matches!(
            secondary,
            Err(VisualizerError::Api { status: 403, .. })
        ));

        let revoked = client
            .resolve_repository(&RepositoryReference::new("octocat", "revoked"))
            .await;
        assert!(matches!(revoked, Err(VisualizerError::InvalidCredentials)));

        let broken = client
            .resolve_repository(&RepositoryReference::new("octocat", "broken"))
            .await;
        match broken {
            Err(VisualizerError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_root_and_nested_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "README.md", "path": "README.md", "type": "file" },
                { "name": "src", "path": "src", "type": "dir" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World/contents/src/my%20dir"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "main.py", "path": "src/my dir/main.py", "type": "file" }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server, None);

        let root = client.list_directory(&handle(), "").await.unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root[1].content_type, ContentType::Dir);

        let nested = client.list_directory(&handle(), "src/my dir").await.unwrap();
        assert_eq!(nested[0].path, "src/my dir/main.py");
    }

    #[tokio::test]
    async fn test_list_directory_propagates_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World/contents/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server, None)
            .list_directory(&handle(), "gone")
            .await;
        match result {
            Err(VisualizerError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
