//! Static pre-rendering of a site directory.
//!
//! `build` walks the source tree, runs the template and component injection
//! over every HTML page and copies everything else unchanged:
//!
//! ```text
//! site/                        dist/
//! ├── config.toml     (read)   │
//! ├── index.html      ──────▶  ├── index.html   (head, header, footer filled)
//! ├── faq.html        ──────▶  ├── faq.html     (+ breadcrumb, page header)
//! ├── css/common.css  ──────▶  ├── css/common.css
//! └── images/...      ──────▶  └── images/...
//! ```
//!
//! Pages are independent and rendered in parallel on the global rayon pool.
//! Interactive behaviors are not part of the static output; they belong to
//! the page at load time (see [`boot`](crate::boot)).

use crate::components::{self, Injection};
use crate::config::{self, ConfigError, SiteConfig};
use crate::dom;
use crate::page::{ATTR_STRUCTURED_DATA, PageConfig, TemplateError};
use crate::template::{self, BREADCRUMB_ID, PAGE_HEADER_ID, StepOutcome, TemplateReport};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    MissingSource(PathBuf),
}

/// File names never copied to the output.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

fn is_page(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("html" | "htm")
    )
}

/// Load the site configuration: an explicit file if given, otherwise
/// `config.toml` at the source root, otherwise the stock defaults.
pub fn load_site_config(source: &Path, config_file: Option<&Path>) -> Result<SiteConfig, SiteError> {
    let site = match config_file {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(source)?,
    };
    Ok(site)
}

/// One page after pre-rendering.
pub struct RenderedPage {
    pub html: String,
    pub template: TemplateReport,
    pub injection: Injection,
}

/// Apply the template and inject components into one HTML document.
pub fn render_page(html: &str, site: &SiteConfig) -> RenderedPage {
    let document = dom::parse_document(html);
    let template = template::init_template(&document, site);
    let injection = components::inject_components(&document, site);
    RenderedPage {
        html: dom::serialize_document(&document),
        template,
        injection,
    }
}

/// Per-page result of a build, relative to the source root.
#[derive(Debug)]
pub struct PageSummary {
    pub path: PathBuf,
    pub title: String,
    pub breadcrumb: bool,
    pub page_header: bool,
    pub injection: Injection,
    /// Render steps that failed; the page is still written.
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub pages: Vec<PageSummary>,
    pub assets: Vec<PathBuf>,
}

impl BuildSummary {
    pub fn error_count(&self) -> usize {
        self.pages.iter().map(|page| page.errors.len()).sum()
    }
}

/// Source files, relative to `source`, split into pages and assets.
///
/// The root `config.toml` and anything under `exclude` are skipped, so
/// building into a subdirectory of the source is safe. Both paths are
/// canonicalized first, so `./dist` and `dist` name the same directory.
fn collect_files(
    source: &Path,
    exclude: Option<&Path>,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), SiteError> {
    let mut pages = Vec::new();
    let mut assets = Vec::new();

    let source = fs::canonicalize(source)?;
    let exclude = exclude.map(fs::canonicalize).transpose()?;
    let walker = WalkDir::new(&source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| Some(entry.path()) != exclude.as_deref());

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&source) else {
            continue;
        };
        if relative == Path::new("config.toml") {
            continue;
        }
        if is_page(relative) {
            pages.push(relative.to_path_buf());
        } else {
            assets.push(relative.to_path_buf());
        }
    }
    Ok((pages, assets))
}

fn build_page(source: &Path, output: &Path, relative: &Path, site: &SiteConfig) -> Result<PageSummary, SiteError> {
    let html = fs::read_to_string(source.join(relative))?;
    let rendered = render_page(&html, site);

    let destination = output.join(relative);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&destination, rendered.html)?;

    let errors: Vec<String> = rendered.template.errors().map(|err| err.to_string()).collect();
    for error in &errors {
        warn!(page = %relative.display(), %error, "page written with a failed render step");
    }
    debug!(page = %relative.display(), "page rendered");

    Ok(PageSummary {
        path: relative.to_path_buf(),
        title: rendered.template.config.title.clone(),
        breadcrumb: matches!(rendered.template.breadcrumb, StepOutcome::Rendered),
        page_header: matches!(rendered.template.page_header, StepOutcome::Rendered),
        injection: rendered.injection,
        errors,
    })
}

/// Pre-render every page under `source` into `output` and copy the assets.
pub fn build(source: &Path, output: &Path, site: &SiteConfig) -> Result<BuildSummary, SiteError> {
    if !source.is_dir() {
        return Err(SiteError::MissingSource(source.to_path_buf()));
    }
    fs::create_dir_all(output)?;
    let (pages, assets) = collect_files(source, Some(output))?;
    info!(
        pages = pages.len(),
        assets = assets.len(),
        source = %source.display(),
        "building site"
    );

    let pages = pages
        .par_iter()
        .map(|relative| build_page(source, output, relative, site))
        .collect::<Result<Vec<_>, _>>()?;

    for relative in &assets {
        let destination = output.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source.join(relative), &destination)?;
    }

    info!(output = %output.display(), "build complete");
    Ok(BuildSummary { pages, assets })
}

// ============================================================================
// Check
// ============================================================================

/// Problems found in one page.
#[derive(Debug)]
pub struct PageCheck {
    pub path: PathBuf,
    pub problems: Vec<String>,
}

/// Find configuration problems in a single page without modifying it.
pub fn check_page(html: &str, site: &SiteConfig) -> Vec<String> {
    let document = dom::parse_document(html);
    let config = PageConfig::read(&document, &site.defaults);
    let mut problems = Vec::new();

    let mut check_json = |result: Result<bool, TemplateError>, placeholder: &str| match result {
        Err(err) => problems.push(err.to_string()),
        Ok(true) if dom::element_by_id(&document, placeholder).is_none() => {
            problems.push(format!("data present but no #{placeholder} placeholder"));
        }
        Ok(_) => {}
    };
    check_json(config.breadcrumb_entries().map(|e| e.is_some()), BREADCRUMB_ID);
    check_json(config.page_header_data().map(|h| h.is_some()), PAGE_HEADER_ID);

    if let Some(raw) = &config.structured_data {
        if let Err(err) = serde_json::from_str::<serde_json::Value>(raw) {
            problems.push(format!("malformed JSON in {ATTR_STRUCTURED_DATA}: {err}"));
        }
    }
    problems
}

/// Check every page under `source`. Pages without problems are omitted.
pub fn check(source: &Path, site: &SiteConfig) -> Result<Vec<PageCheck>, SiteError> {
    if !source.is_dir() {
        return Err(SiteError::MissingSource(source.to_path_buf()));
    }
    let (pages, _) = collect_files(source, None)?;
    let mut checks = Vec::new();
    for relative in pages {
        let html = fs::read_to_string(source.join(&relative))?;
        let problems = check_page(&html, site);
        if !problems.is_empty() {
            checks.push(PageCheck {
                path: relative,
                problems,
            });
        }
    }
    Ok(checks)
}
