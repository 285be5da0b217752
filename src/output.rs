//! CLI output formatting.
//!
//! Every entity is shown as a positional index plus its login, with
//! secondary details on indented lines:
//!
//! ```text
//! Contributors: 42 fetched, 2 excluded, 40 on the page
//!
//! 001 alice
//!     Profile: https://github.com/alice
//! 002 bob
//!     Profile: https://github.com/bob
//! ```
//!
//! Avatar progress during `build`:
//!
//! ```text
//! 001/040 alice → imgCache/alice.jpg (image/png)
//! ```
//!
//! Each `format_*` function is pure (returns `Vec<String>` or `String`) for
//! testability; the `print_*` wrappers write to stdout.

use crate::avatars::AvatarEvent;
use crate::config::TOKEN_HELP;
use crate::pipeline::{BuildReport, ContributorList, Error};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// One-line fetch/filter summary.
pub fn format_summary(total: usize, kept: usize) -> String {
    format!(
        "Contributors: {} fetched, {} excluded, {} on the page",
        total,
        total.saturating_sub(kept),
        kept
    )
}

/// Summary plus one entry per kept contributor (the `fetch` command).
pub fn format_contributor_list(list: &ContributorList) -> Vec<String> {
    let mut lines = vec![format_summary(list.total, list.kept.len())];
    if !list.kept.is_empty() {
        lines.push(String::new());
    }
    for (idx, contributor) in list.kept.iter().enumerate() {
        lines.push(format!("{} {}", format_index(idx + 1), contributor.login));
        lines.push(format!("    Profile: {}", contributor.html_url));
    }
    lines
}

/// One progress line per cached avatar.
pub fn format_avatar_event(event: &AvatarEvent) -> String {
    format!(
        "{}/{} {} → {} ({})",
        format_index(event.position),
        format_index(event.total),
        event.avatar.login,
        event.avatar.path.display(),
        event.avatar.content_type
    )
}

/// Closing lines after a successful build.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    vec![
        format_summary(report.total, report.contributors.len()),
        format!("Page → {}", report.page.display()),
        format!(
            "Avatars → {} ({} files)",
            report.avatars_dir.display(),
            report.avatar_files
        ),
    ]
}

/// Lines shown when a command fails.
///
/// Any config failure (missing file, bad YAML, missing token) is preceded by
/// the token help text, since a missing or incomplete `config.yaml` is the
/// usual first-run problem.
pub fn format_error(err: &Error) -> Vec<String> {
    let mut lines = Vec::new();
    if matches!(err, Error::Config(_)) {
        lines.extend(TOKEN_HELP.lines().map(str::to_string));
    }
    lines.push(format!("Error: {}", err));
    lines
}

pub fn print_error(err: &Error) {
    for line in format_error(err) {
        println!("{}", line);
    }
}

pub fn print_contributor_list(list: &ContributorList) {
    for line in format_contributor_list(list) {
        println!("{}", line);
    }
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}
