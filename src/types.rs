//! Shared types passed between pipeline stages.
//!
//! [`Contributor`] is what the GitHub API returns; [`DisplayContributor`] is
//! the projection handed to the page renderer, with the avatar pointing at the
//! locally cached copy instead of the remote URL.

use serde::{Deserialize, Serialize};

/// Directory (relative to the output root) that holds the copied avatars.
pub const AVATARS_DIR: &str = "avatars";

/// A contributor as reported by `GET /repos/{owner}/{repo}/contributors`.
///
/// Only the fields the page needs are kept; everything else in the API
/// payload (contribution counts, node ids, …) is ignored on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    /// Profile page, e.g. `https://github.com/alice`.
    pub html_url: String,
    pub avatar_url: String,
}

/// A contributor as the page template sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayContributor {
    pub name: String,
    pub profile_url: String,
    /// Path of the cached avatar relative to the page, e.g. `avatars/alice.jpg`.
    pub avatar_url: String,
}

impl DisplayContributor {
    pub fn from_contributor(contributor: &Contributor) -> Self {
        Self {
            name: contributor.login.clone(),
            profile_url: contributor.html_url.clone(),
            avatar_url: format!("{}/{}", AVATARS_DIR, avatar_file_name(&contributor.login)),
        }
    }
}

/// File name of a contributor's cached avatar.
pub fn avatar_file_name(login: &str) -> String {
    format!("{login}.jpg")
}

/// Everything the page renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub org: String,
    pub repo: String,
    /// Edge length of the square avatars, used for `<img>` width/height.
    pub avatar_size: u32,
    pub contributors: Vec<DisplayContributor>,
}
