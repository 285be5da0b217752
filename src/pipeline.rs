//! The end-to-end build: fetch → filter → avatars → render → assemble.
//!
//! Every stage receives the loaded [`AppConfig`] explicitly; there is no
//! process-wide state. The HTTP client is injected so the whole pipeline can
//! run against canned responses in tests.
//!
//! The output directory is only touched in the final step, after every
//! avatar has been cached and the page rendered. A run that fails earlier
//! leaves any previous output exactly as it was.

use crate::assemble::{self, AssembleError};
use crate::avatars::{self, AvatarError, AvatarEvent};
use crate::config::{self, AppConfig, ConfigError};
use crate::github::{self, FetchError};
use crate::http::{HttpClient, HttpError};
use crate::imaging::AvatarParams;
use crate::render::{self, PageTemplate, RenderError};
use crate::types::{Contributor, DisplayContributor, PageData};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("Cache directory {cache} must not be inside the output directory {output}")]
    CacheInsideOutput { cache: PathBuf, output: PathBuf },
    #[error("Output directory {output} must not be inside the cache directory {cache}")]
    OutputInsideCache { output: PathBuf, cache: PathBuf },
    #[error("Could not resolve {path}: {source}")]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the build reads and writes, and which page template it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub template: PageTemplate,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            cache_dir: PathBuf::from("imgCache"),
            template: PageTemplate::Builtin,
        }
    }
}

/// Contributors before and after filtering.
#[derive(Debug, Clone)]
pub struct ContributorList {
    /// Number of contributors the API returned.
    pub total: usize,
    pub kept: Vec<Contributor>,
}

/// Summary of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub total: usize,
    pub contributors: Vec<DisplayContributor>,
    pub page: PathBuf,
    pub avatars_dir: PathBuf,
    pub avatar_files: usize,
}

/// Fetch the contributor list and drop excluded logins.
pub fn list(client: &impl HttpClient, config: &AppConfig) -> Result<ContributorList, Error> {
    let all = github::fetch_contributors(client, config)?;
    let total = all.len();
    let kept = github::filter_contributors(all, &config.excluded_set());
    info!(total, kept = kept.len(), "filtered contributors");
    Ok(ContributorList { total, kept })
}

/// Run the whole pipeline with an already loaded config.
pub fn build(
    client: &impl HttpClient,
    config: &AppConfig,
    options: &BuildOptions,
    events: Option<Sender<AvatarEvent>>,
) -> Result<BuildReport, Error> {
    check_layout(options)?;

    let ContributorList { total, kept } = list(client, config)?;

    avatars::fetch_avatars(
        client,
        &kept,
        &options.cache_dir,
        &AvatarParams::square(config.avatar_size),
        events,
    )?;

    let contributors: Vec<DisplayContributor> =
        kept.iter().map(DisplayContributor::from_contributor).collect();
    let page = PageData {
        org: config.org.clone(),
        repo: config.repo.clone(),
        avatar_size: config.avatar_size,
        contributors,
    };
    let html = render::render_page(&page, &options.template)?;

    let layout = assemble::assemble(&options.output_dir, &html, &options.cache_dir)?;

    Ok(BuildReport {
        total,
        contributors: page.contributors,
        page: layout.page,
        avatars_dir: layout.avatars_dir,
        avatar_files: layout.avatar_files,
    })
}

/// Load the config at `config_path`, then [`build`].
///
/// No request is made unless the config loads and validates.
pub fn build_from_file(
    client: &impl HttpClient,
    config_path: &Path,
    options: &BuildOptions,
    events: Option<Sender<AvatarEvent>>,
) -> Result<BuildReport, Error> {
    let config = config::load_config(config_path)?;
    build(client, &config, options, events)
}

/// The output and cache directories must be disjoint.
///
/// Clearing the output must not wipe the cache, and copying the cache must
/// not recurse into its own destination. Paths are compared in absolute,
/// lexically normalised form so `./output` and `output/cache` still collide.
fn check_layout(options: &BuildOptions) -> Result<(), Error> {
    let output = absolute_dir(&options.output_dir)?;
    let cache = absolute_dir(&options.cache_dir)?;
    if cache.starts_with(&output) {
        return Err(Error::CacheInsideOutput {
            cache: options.cache_dir.clone(),
            output: options.output_dir.clone(),
        });
    }
    if output.starts_with(&cache) {
        return Err(Error::OutputInsideCache {
            output: options.output_dir.clone(),
            cache: options.cache_dir.clone(),
        });
    }
    Ok(())
}

/// `std::path::absolute` plus removal of `.` and `..` components.
fn absolute_dir(path: &Path) -> Result<PathBuf, Error> {
    let absolute = std::path::absolute(path).map_err(|source| Error::ResolvePath {
        path: path.to_path_buf(),
        source,
    })?;
    let mut normalised = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalised.pop();
            }
            other => normalised.push(other),
        }
    }
    Ok(normalised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::http::tests::MockHttp;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    const API: &str = "https://api.test";

    fn options_in(tmp: &TempDir) -> BuildOptions {
        BuildOptions {
            output_dir: tmp.path().join("output"),
            cache_dir: tmp.path().join("imgCache"),
            template: PageTemplate::Builtin,
        }
    }

    /// alice, bot1, bob on a single page, each with a served avatar.
    fn acme_mock() -> MockHttp {
        MockHttp::new()
            .ok(
                &github::contributors_url(API, "acme", "widgets"),
                contributors_json(&logins(&["alice", "bot1", "bob"])),
            )
            .ok(&avatar_url("alice"), png_bytes(80, 80))
            .ok(&avatar_url("bot1"), jpeg_bytes(80, 80))
            .ok(&avatar_url("bob"), jpeg_bytes(100, 50))
    }

    fn acme_config() -> AppConfig {
        AppConfig {
            excluded: vec!["bot1".to_string()],
            ..test_config(API)
        }
    }

    #[test]
    fn list_filters_excluded() {
        let http = acme_mock();
        let list = list(&http, &acme_config()).unwrap();
        assert_eq!(list.total, 3);
        let names: Vec<&str> = list.kept.iter().map(|c| c.login.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn build_produces_page_and_avatars() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        let http = acme_mock();

        let report = build(&http, &acme_config(), &options, None).unwrap();

        assert_eq!(report.total, 3);
        let names: Vec<&str> = report.contributors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(report.avatar_files, 2);

        let html = fs::read_to_string(&report.page).unwrap();
        assert!(html.contains("alice"));
        assert!(html.contains("bob"));
        assert!(!html.contains("bot1"));

        for login in ["alice", "bob"] {
            let path = options.output_dir.join(format!("avatars/{login}.jpg"));
            assert_eq!(image::image_dimensions(&path).unwrap(), (64, 64));
        }
        assert!(!options.output_dir.join("avatars/bot1.jpg").exists());
        assert!(!options.cache_dir.join("bot1.jpg").exists());
        assert!(!http.requested_urls().contains(&avatar_url("bot1")));
    }

    #[test]
    fn avatar_failure_leaves_output_untouched() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        let http = acme_mock().route(
            &avatar_url("bob"),
            HttpResponse {
                status: 404,
                link: None,
                body: Vec::new(),
            },
        );

        let result = build(&http, &acme_config(), &options, None);
        assert!(matches!(result, Err(Error::Avatar(AvatarError::Status { status: 404, .. }))));
        assert!(!options.output_dir.exists());
    }

    #[test]
    fn template_failure_keeps_previous_output() {
        let tmp = TempDir::new().unwrap();
        let mut options = options_in(&tmp);
        fs::create_dir_all(&options.output_dir).unwrap();
        fs::write(options.output_dir.join("contributors.html"), "previous").unwrap();
        let template = tmp.path().join("broken.tera");
        fs::write(&template, "{{ nope.nope }}").unwrap();
        options.template = PageTemplate::File(template);

        let result = build(&acme_mock(), &acme_config(), &options, None);
        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(
            fs::read_to_string(options.output_dir.join("contributors.html")).unwrap(),
            "previous"
        );
    }

    #[test]
    fn cache_inside_output_is_rejected_before_any_request() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            output_dir: tmp.path().join("output"),
            cache_dir: tmp.path().join("output/cache"),
            template: PageTemplate::Builtin,
        };
        let http = acme_mock();
        let result = build(&http, &acme_config(), &options, None);
        assert!(matches!(result, Err(Error::CacheInsideOutput { .. })));
        assert!(http.get_requests().is_empty());
    }

    #[test]
    fn cache_inside_output_is_rejected_across_spellings() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            output_dir: tmp.path().join("./output"),
            cache_dir: tmp.path().join("output/./cache"),
            template: PageTemplate::Builtin,
        };
        let previous = options.output_dir.join("contributors.html");
        fs::create_dir_all(&options.output_dir).unwrap();
        fs::write(&previous, "previous").unwrap();

        let http = acme_mock();
        let result = build(&http, &acme_config(), &options, None);
        assert!(matches!(result, Err(Error::CacheInsideOutput { .. })));
        assert!(http.get_requests().is_empty());
        assert_eq!(fs::read_to_string(&previous).unwrap(), "previous");
    }

    #[test]
    fn output_inside_cache_is_rejected_before_any_request() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            output_dir: tmp.path().join("imgCache/out"),
            cache_dir: tmp.path().join("imgCache"),
            template: PageTemplate::Builtin,
        };
        let http = acme_mock();
        let result = build(&http, &acme_config(), &options, None);
        assert!(matches!(result, Err(Error::OutputInsideCache { .. })));
        assert!(http.get_requests().is_empty());
        assert!(!options.output_dir.exists());
    }

    #[test]
    fn same_directory_for_output_and_cache_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            output_dir: tmp.path().join("site"),
            cache_dir: tmp.path().join("other/../site"),
            template: PageTemplate::Builtin,
        };
        let result = build(&acme_mock(), &acme_config(), &options, None);
        assert!(matches!(result, Err(Error::CacheInsideOutput { .. })));
    }

    #[test]
    fn sibling_directories_with_shared_prefix_are_allowed() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            output_dir: tmp.path().join("output"),
            cache_dir: tmp.path().join("output-cache"),
            template: PageTemplate::Builtin,
        };
        assert!(check_layout(&options).is_ok());
    }

    #[test]
    fn relative_paths_are_resolved_against_the_working_directory() {
        let options = BuildOptions {
            output_dir: PathBuf::from("./output"),
            cache_dir: PathBuf::from("output/cache"),
            template: PageTemplate::Builtin,
        };
        assert!(matches!(
            check_layout(&options),
            Err(Error::CacheInsideOutput { .. })
        ));
        assert!(check_layout(&BuildOptions::default()).is_ok());
    }

    #[test]
    fn build_from_file_missing_token_makes_no_requests() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        fs::write(&config_path, "org: acme\nrepo: widgets\n").unwrap();
        let http = acme_mock();

        let result = build_from_file(&http, &config_path, &options_in(&tmp), None);
        assert!(matches!(result, Err(Error::Config(ConfigError::MissingToken))));
        assert!(http.get_requests().is_empty());
    }

    #[test]
    fn default_options_match_documented_paths() {
        let options = BuildOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("output"));
        assert_eq!(options.cache_dir, PathBuf::from("imgCache"));
        assert_eq!(options.template, PageTemplate::Builtin);
    }
}
