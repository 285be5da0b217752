//! Avatar download and caching.
//!
//! For every contributor that survived filtering, one at a time:
//!
//! 1. `GET` the avatar URL (no auth; avatars are public).
//! 2. Anything but `200 OK` aborts the run.
//! 3. Sniff, decode, resize to a `size × size` square and re-encode as JPEG
//!    (see [`crate::imaging`]).
//! 4. Write `<cache_dir>/<login>.jpg`, replacing any previous file.
//!
//! ## Output Structure
//!
//! ```text
//! imgCache/
//! ├── alice.jpg
//! ├── bob.jpg
//! └── dependabot[bot].jpg
//! ```
//!
//! The cache directory is created if it does not exist. Files are never
//! versioned; the cache is a scratch area that the output assembler copies.

use crate::http::{HttpClient, HttpError};
use crate::imaging::{AvatarParams, ImagingError, process_avatar};
use crate::types::{Contributor, avatar_file_name};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("Received non 200 response code {status} for avatar of {login} ({url})")]
    Status {
        login: String,
        url: String,
        status: u16,
    },
    #[error("Avatar of {login}: {source}")]
    Decode {
        login: String,
        #[source]
        source: ImagingError,
    },
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Login {0:?} cannot be used as a file name")]
    InvalidLogin(String),
}

/// A freshly written cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAvatar {
    pub login: String,
    pub path: PathBuf,
    /// Sniffed type of the downloaded source image.
    pub content_type: String,
}

/// Progress notification, sent after each avatar is written.
#[derive(Debug, Clone)]
pub struct AvatarEvent {
    /// 1-based position in the contributor list.
    pub position: usize,
    pub total: usize,
    pub avatar: CachedAvatar,
}

/// GitHub logins are `[A-Za-z0-9-]` plus `[bot]` suffixes, but the login
/// becomes a path component, so refuse anything that could escape the cache.
fn is_safe_login(login: &str) -> bool {
    !login.is_empty()
        && login != "."
        && login != ".."
        && !login.contains(['/', '\\', '\0'])
}

/// Download, resize and cache one contributor's avatar.
pub fn fetch_avatar(
    client: &impl HttpClient,
    contributor: &Contributor,
    cache_dir: &Path,
    params: &AvatarParams,
) -> Result<CachedAvatar, AvatarError> {
    let login = &contributor.login;
    if !is_safe_login(login) {
        return Err(AvatarError::InvalidLogin(login.clone()));
    }

    let response = client.get(&contributor.avatar_url, &[])?;
    if response.status != 200 {
        return Err(AvatarError::Status {
            login: login.clone(),
            url: contributor.avatar_url.clone(),
            status: response.status,
        });
    }

    let (jpeg, content_type) =
        process_avatar(&response.body, params).map_err(|source| AvatarError::Decode {
            login: login.clone(),
            source,
        })?;

    let path = cache_dir.join(avatar_file_name(login));
    fs::write(&path, &jpeg).map_err(|source| AvatarError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(login = %login, content_type = %content_type, path = %path.display(), "avatar cached");

    Ok(CachedAvatar {
        login: login.clone(),
        path,
        content_type,
    })
}

/// Cache avatars for all `contributors`, sequentially, stopping at the first
/// failure.
pub fn fetch_avatars(
    client: &impl HttpClient,
    contributors: &[Contributor],
    cache_dir: &Path,
    params: &AvatarParams,
    events: Option<Sender<AvatarEvent>>,
) -> Result<Vec<CachedAvatar>, AvatarError> {
    fs::create_dir_all(cache_dir).map_err(|source| AvatarError::Io {
        path: cache_dir.to_path_buf(),
        source,
    })?;

    let total = contributors.len();
    let mut cached = Vec::with_capacity(total);
    for (idx, contributor) in contributors.iter().enumerate() {
        let avatar = fetch_avatar(client, contributor, cache_dir, params)?;
        if let Some(tx) = &events {
            // Printer gone means nobody is listening; keep working
            let _ = tx.send(AvatarEvent {
                position: idx + 1,
                total,
                avatar: avatar.clone(),
            });
        }
        cached.push(avatar);
    }

    info!(count = cached.len(), size = params.size, "avatars cached");
    Ok(cached)
}
