//! Output directory assembly.
//!
//! The output directory is disposable: every run deletes it and rebuilds it
//! from the rendered page and the avatar cache.
//!
//! ## Output Structure
//!
//! ```text
//! output/
//! ├── contributors.html
//! └── avatars/
//!     ├── alice.jpg
//!     └── bob.jpg
//! ```

use crate::types::AVATARS_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the generated page inside the output directory.
pub const PAGE_FILENAME: &str = "contributors.html";

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> AssembleError + '_ {
    move |source| AssembleError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Paths of a freshly assembled output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub page: PathBuf,
    pub avatars_dir: PathBuf,
    /// Number of files copied from the cache.
    pub avatar_files: usize,
}

/// Replace `output_dir` with `html` as `contributors.html` plus a copy of
/// `cache_dir` under `avatars/`.
pub fn assemble(output_dir: &Path, html: &str, cache_dir: &Path) -> Result<OutputLayout, AssembleError> {
    // A missing directory is the normal first-run case
    if let Err(e) = fs::remove_dir_all(output_dir) {
        debug!(path = %output_dir.display(), error = %e, "output directory not removed");
    }
    fs::create_dir_all(output_dir).map_err(io_at(output_dir))?;

    let page = output_dir.join(PAGE_FILENAME);
    fs::write(&page, html).map_err(io_at(&page))?;

    let avatars_dir = output_dir.join(AVATARS_DIR);
    let avatar_files = copy_dir_recursive(cache_dir, &avatars_dir)?;
    info!(output = %output_dir.display(), avatar_files, "output assembled");

    Ok(OutputLayout {
        page,
        avatars_dir,
        avatar_files,
    })
}

/// Copy the tree under `src` into `dst`, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, AssembleError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| AssembleError::Io {
            path: e.path().unwrap_or(src).to_path_buf(),
            source: e.into(),
        })?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_at(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_at(&target))?;
            copied += 1;
        }
    }
    Ok(copied)
}
