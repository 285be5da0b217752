//! Contributor page rendering.
//!
//! ## Built-in page
//!
//! By default the page is generated with [maud](https://maud.lambda.xyz/):
//! a header with `org/repo` and a grid of round avatars, each linking to the
//! contributor's GitHub profile. CSS is embedded at compile time from
//! `static/contributors.css`. All interpolation is auto-escaped.
//!
//! ## External template
//!
//! A [Tera](https://keats.github.io/tera/) template file can replace the
//! built-in page. It receives [`PageData`] as its context:
//!
//! ```text
//! {{ org }}  {{ repo }}  {{ avatar_size }}
//! {% for c in contributors %}
//!   {{ c.name }}  {{ c.profile_url }}  {{ c.avatar_url }}
//! {% endfor %}
//! ```
//!
//! Syntax errors and references to missing fields are hard errors.

use crate::types::PageData;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Could not read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template error in {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },
}

/// Which page to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageTemplate {
    #[default]
    Builtin,
    /// Tera template file on disk.
    File(PathBuf),
}

const CSS: &str = include_str!("../static/contributors.css");

/// Render the contributors page to an HTML string.
pub fn render_page(data: &PageData, template: &PageTemplate) -> Result<String, RenderError> {
    match template {
        PageTemplate::Builtin => Ok(render_builtin(data).into_string()),
        PageTemplate::File(path) => render_template_file(path, data),
    }
}

/// Render `data` with the Tera template at `path`, HTML auto-escaping on.
pub fn render_template_file(path: &Path, data: &PageData) -> Result<String, RenderError> {
    let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let template_error = |source| RenderError::Template {
        path: path.to_path_buf(),
        source,
    };
    let context = tera::Context::from_serialize(data).map_err(template_error)?;
    tera::Tera::one_off(&source, &context, true).map_err(template_error)
}

fn render_builtin(data: &PageData) -> Markup {
    let title = format!("{}/{} contributors", data.org, data.repo);
    let size = data.avatar_size;

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body style={ "--avatar-size: " (size) "px" } {
                header.page-header {
                    h1 { (data.org) " / " (data.repo) }
                    p { (contributor_count(data.contributors.len())) }
                }
                ul.contributor-grid {
                    @for c in &data.contributors {
                        li {
                            a href=(c.profile_url) title=(c.name) {
                                img src=(c.avatar_url) alt=(c.name) width=(size) height=(size) loading="lazy";
                                span.name { (c.name) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn contributor_count(n: usize) -> String {
    match n {
        1 => "1 contributor".to_string(),
        n => format!("{n} contributors"),
    }
}
