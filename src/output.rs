//! CLI output formatting for `build` and `check`.
//!
//! Output is page-centric: each page is listed by position and title, with
//! its source path and what the pre-render did to it as indented context
//! lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 よくある質問 | 雅やか → faq.html
//!     Blocks: breadcrumb, page header
//!     Components: header, footer
//! 002 お問い合わせ → contact.html
//!     Components: header, footer
//!     Error: malformed JSON in data-breadcrumb: EOF while parsing a list
//!
//! Assets
//!     css/common.css
//!
//! Rendered 2 pages, copied 1 asset (noindex)
//! ```
//!
//! ## Check
//!
//! ```text
//! faq.html
//!     data present but no #breadcrumb placeholder
//!
//! 1 problem in 1 page
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) and a
//! `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::site::{BuildSummary, PageCheck, PageSummary};

/// Longest title shown before truncation, in characters.
const TITLE_WIDTH: usize = 40;

// ============================================================================
// Helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max).collect();
        format!("{kept}...")
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn page_lines(index: usize, page: &PageSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} \u{2192} {}",
        format_index(index),
        truncate(&page.title, TITLE_WIDTH),
        page.path.display()
    )];

    let blocks: Vec<&str> = [
        (page.breadcrumb, "breadcrumb"),
        (page.page_header, "page header"),
    ]
    .into_iter()
    .filter_map(|(done, name)| done.then_some(name))
    .collect();
    if !blocks.is_empty() {
        lines.push(format!("{}Blocks: {}", indent(1), blocks.join(", ")));
    }

    let components: Vec<&str> = [
        (page.injection.header, "header"),
        (page.injection.footer, "footer"),
    ]
    .into_iter()
    .filter_map(|(done, name)| done.then_some(name))
    .collect();
    if !components.is_empty() {
        lines.push(format!("{}Components: {}", indent(1), components.join(", ")));
    }

    for error in &page.errors {
        lines.push(format!("{}Error: {}", indent(1), error));
    }
    lines
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !summary.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in summary.pages.iter().enumerate() {
            lines.extend(page_lines(i + 1, page));
        }
    }

    if !summary.assets.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Assets".to_string());
        for asset in &summary.assets {
            lines.push(format!("{}{}", indent(1), asset.display()));
        }
    }

    let noindex = summary.pages.iter().any(|page| page.injection.noindex);
    lines.push(String::new());
    lines.push(format!(
        "Rendered {}, copied {}{}",
        plural(summary.pages.len(), "page"),
        plural(summary.assets.len(), "asset"),
        if noindex { " (noindex)" } else { "" }
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(checks: &[PageCheck]) -> Vec<String> {
    if checks.is_empty() {
        return vec!["All pages valid".to_string()];
    }

    let mut lines = Vec::new();
    for check in checks {
        lines.push(check.path.display().to_string());
        for problem in &check.problems {
            lines.push(format!("{}{}", indent(1), problem));
        }
    }
    let problems: usize = checks.iter().map(|check| check.problems.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "{} in {}",
        plural(problems, "problem"),
        plural(checks.len(), "page")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(checks: &[PageCheck]) {
    for line in format_check_output(checks) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
