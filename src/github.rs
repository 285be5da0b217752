//! Contributor listing via the GitHub REST API.
//!
//! ## Pagination
//!
//! `GET /repos/{owner}/{repo}/contributors` returns at most 100 entries per
//! page. Further pages are advertised in the RFC 8288 `Link` header:
//!
//! ```text
//! Link: <https://api.github.com/repositories/1/contributors?per_page=100&page=2>; rel="next",
//!       <https://api.github.com/repositories/1/contributors?per_page=100&page=5>; rel="last"
//! ```
//!
//! [`fetch_contributors`] follows `rel="next"` until it disappears and returns
//! all pages concatenated in the order the API delivered them (by contribution
//! count, descending). Any failed request aborts the listing; there is no
//! retry.
//!
//! ## Filtering
//!
//! [`filter_contributors`] drops excluded logins. Matching is exact and
//! case-sensitive, and the relative order of the remaining contributors is
//! preserved.

use crate::config::AppConfig;
use crate::http::{HttpClient, HttpError};
use crate::types::Contributor;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Page size requested from the API (the maximum GitHub allows).
pub const PER_PAGE: u32 = 100;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("GitHub API returned status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Malformed contributor list from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Pagination loop: {0} was already fetched")]
    PaginationLoop(String),
}

/// URL of the first contributors page.
pub fn contributors_url(api_url: &str, org: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}/{}/contributors?per_page={}",
        api_url.trim_end_matches('/'),
        org,
        repo,
        PER_PAGE
    )
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// ```
/// use contrib_wall::github::parse_next_link;
///
/// let header = r#"<https://api.example/x?page=2>; rel="next", <https://api.example/x?page=3>; rel="last""#;
/// assert_eq!(parse_next_link(header).as_deref(), Some("https://api.example/x?page=2"));
/// ```
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"'))
                .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"))
        });
        is_next.then(|| url.to_string())
    })
}

/// Fetch every contributor of `config.org/config.repo`, in API order.
pub fn fetch_contributors(
    client: &impl HttpClient,
    config: &AppConfig,
) -> Result<Vec<Contributor>, FetchError> {
    let auth = format!("Bearer {}", config.oauth);
    let headers = [
        ("Authorization", auth.as_str()),
        ("Accept", ACCEPT),
        ("X-GitHub-Api-Version", API_VERSION),
    ];

    let mut contributors = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(contributors_url(&config.api_url, &config.org, &config.repo));

    while let Some(url) = next.take() {
        if !visited.insert(url.clone()) {
            return Err(FetchError::PaginationLoop(url));
        }

        let response = client.get(&url, &headers)?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status,
            });
        }

        // 204 No Content is how GitHub answers for an empty repository
        let page: Vec<Contributor> = if response.status == 204 || response.body.is_empty() {
            Vec::new()
        } else {
            serde_json::from_slice(&response.body).map_err(|source| FetchError::Json {
                url: url.clone(),
                source,
            })?
        };
        debug!(url = %url, count = page.len(), "contributors page");
        contributors.extend(page);

        next = response.link.as_deref().and_then(parse_next_link);
    }

    info!(
        org = %config.org,
        repo = %config.repo,
        total = contributors.len(),
        "fetched contributors"
    );
    Ok(contributors)
}

/// Drop every contributor whose login is in `excluded`, keeping order.
pub fn filter_contributors(
    contributors: Vec<Contributor>,
    excluded: &HashSet<String>,
) -> Vec<Contributor> {
    contributors
        .into_iter()
        .filter(|c| !excluded.contains(&c.login))
        .collect()
}
