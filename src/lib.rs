//! # contrib-wall
//!
//! Generates a static HTML page listing a GitHub repository's contributors,
//! with locally cached, resized avatar images.
//!
//! # Architecture: Linear Pipeline
//!
//! ```text
//! 1. Config     config.yaml  →  AppConfig
//! 2. Fetch      GitHub API   →  Vec<Contributor>       (paged, 100 per page)
//! 3. Filter     excluded     →  Vec<Contributor>       (order preserved)
//! 4. Avatars    avatar URLs  →  imgCache/<login>.jpg   (square JPEG, q90)
//! 5. Render     PageData     →  HTML string
//! 6. Assemble   HTML + cache →  output/
//! ```
//!
//! Everything runs sequentially and any failure ends the run. The output
//! directory is only replaced once every earlier step has succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | YAML config loading, defaults and validation |
//! | [`http`] | Blocking `GET` behind the [`http::HttpClient`] trait |
//! | [`github`] | Paged contributor listing and exclusion filter |
//! | [`avatars`] | Avatar download into the cache directory |
//! | [`imaging`] | Sniff, decode, square-resize and JPEG-encode avatars |
//! | [`render`] | Built-in (Maud) or external (Tera) page rendering |
//! | [`assemble`] | Output directory rebuild |
//! | [`pipeline`] | Stage orchestration and the unified [`pipeline::Error`] |
//! | [`types`] | Types shared between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Configuration
//!
//! The loaded [`config::AppConfig`] is passed by reference into each stage.
//! Nothing reads configuration from global state, so the pipeline can be run
//! several times in one process (as the tests do) with different settings.
//!
//! ## Exhaustive Decode Outcome
//!
//! Avatar bytes are sniffed, and decoding yields either an image or an
//! explicit unsupported-format marker carrying the sniffed content type. The
//! resize step refuses the latter with an error naming what was received,
//! typically an HTML error page or an exotic image format.
//!
//! ## Maud Page, Optional Tera Template
//!
//! The built-in page is compiled in with Maud: no template file to ship, and
//! all interpolation is escaped. Users who want their own markup can point
//! `--template` at a Tera file that receives the same [`types::PageData`].

pub mod assemble;
pub mod avatars;
pub mod config;
pub mod github;
pub mod http;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
