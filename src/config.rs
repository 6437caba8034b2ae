//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The stock defaults
//! describe the live miyabiyaka site; a `config.toml` in the source root only
//! needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = "miyabiyaka（みやびやか）着付け教室"
//! base_path = "/miyabiyaka"          # Prefix for internal links and stylesheets
//! origin = "https://example.com"     # Used to build og:url
//! under_construction = true          # Emit <meta name="robots" content="noindex, nofollow">
//!
//! [defaults]                         # Used when a page omits a data-* attribute
//! title = "miyabiyaka（みやびやか）着付け教室"
//! og_image = "https://example.com/images/ogp.jpg"
//! page_type = "website"
//! current_path = "/miyabiyaka/"
//!
//! [fonts]
//! font_host = "https://fonts.googleapis.com"
//! static_host = "https://fonts.gstatic.com"
//!
//! [behavior]
//! menu_breakpoint = 768              # Menu closes when resized wider than this
//! resize_debounce_ms = 250
//! header_scroll_threshold = 100
//! scroll_top_threshold = 300
//! fallback_header_height = 80
//!
//! [[navigation]]
//! label = "教室について"
//! href = "about.html"                # Relative to base_path
//!
//! [processing]
//! max_processes = 4                  # Omit for auto = CPU cores
//! ```
//!
//! Arrays (`navigation`, `footer_groups`) replace the stock list as a whole.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name, used for `og:site_name`.
    pub site_name: String,
    /// Path prefix of every internal link and stylesheet (e.g. `/miyabiyaka`).
    pub base_path: String,
    /// Scheme and host the site is served from, prepended to `og:url`.
    pub origin: String,
    /// While true, every page carries a noindex/nofollow robots directive.
    pub under_construction: bool,
    /// Fallback values for pages that omit a `data-*` attribute.
    pub defaults: PageDefaults,
    pub brand: BrandConfig,
    pub fonts: FontConfig,
    /// Thresholds and timings of the interactive behaviors.
    pub behavior: BehaviorConfig,
    /// Global navigation links rendered in the site header.
    pub navigation: Vec<NavLink>,
    /// Link groups rendered in the site footer.
    pub footer_groups: Vec<FooterGroup>,
    /// Parallel build settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: SITE_NAME.to_string(),
            base_path: "/miyabiyaka".to_string(),
            origin: "https://example.com".to_string(),
            under_construction: true,
            defaults: PageDefaults::default(),
            brand: BrandConfig::default(),
            fonts: FontConfig::default(),
            behavior: BehaviorConfig::default(),
            navigation: default_navigation(),
            footer_groups: default_footer_groups(),
            processing: ProcessingConfig::default(),
        }
    }
}

const SITE_NAME: &str = "miyabiyaka（みやびやか）着付け教室";

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "base_path must start with '/'".into(),
            ));
        }
        match url::Url::parse(&self.origin) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Validation(
                    "origin must be an absolute http(s) URL".into(),
                ));
            }
        }
        if self.fonts.font_host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fonts.font_host must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.behavior.fade_in_threshold) {
            return Err(ConfigError::Validation(
                "behavior.fade_in_threshold must be between 0 and 1".into(),
            ));
        }
        if self.behavior.menu_breakpoint == 0 {
            return Err(ConfigError::Validation(
                "behavior.menu_breakpoint must be non-zero".into(),
            ));
        }
        if let Some(link) = self.navigation.iter().find(|l| l.label.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "navigation entry '{}' has an empty label",
                link.href
            )));
        }
        Ok(())
    }

    /// Resolve a path relative to `base_path`.
    ///
    /// Absolute URLs (anything with a scheme) are returned unchanged.
    pub fn link(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Path of a stylesheet under `<base_path>/css/`.
    pub fn stylesheet(&self, file: &str) -> String {
        self.link(&format!("css/{file}"))
    }

    /// Absolute URL of a site path, used for `og:url`.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), path)
    }
}

/// Values used when a page does not set the corresponding root attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageDefaults {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub page_type: String,
    pub current_path: String,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            title: SITE_NAME.to_string(),
            description: "miyabiyaka（みやびやか）は首藤ルリ子が主宰する着付け教室です。"
                .to_string(),
            keywords: "miyabiyaka,みやびやか,着付け教室".to_string(),
            og_title: SITE_NAME.to_string(),
            og_description: "首藤ルリ子が主宰する着付け教室。".to_string(),
            og_image: "https://example.com/images/ogp.jpg".to_string(),
            page_type: "website".to_string(),
            current_path: "/miyabiyaka/".to_string(),
        }
    }
}

/// Logo and footer text of the site chrome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    pub logo_main: String,
    pub logo_sub: String,
    /// Footer description, one entry per line.
    pub description: Vec<String>,
    pub copyright: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            logo_main: "miyabiyaka".to_string(),
            logo_sub: "みやびやか 着付け教室".to_string(),
            description: vec![
                "首藤ルリ子が主宰する着付け教室です。".to_string(),
                "伝統的な着付け技術を丁寧にお教えいたします。".to_string(),
            ],
            copyright: format!("© 2025 {SITE_NAME}. All Rights Reserved."),
        }
    }
}

/// Web font loading. The preconnect hints and stylesheet are only added
/// when the page does not already link to `font_host`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub font_host: String,
    pub static_host: String,
    pub stylesheet: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_host: "https://fonts.googleapis.com".to_string(),
            static_host: "https://fonts.gstatic.com".to_string(),
            stylesheet: "https://fonts.googleapis.com/css2?family=Noto+Sans+JP:wght@400;500;700&family=Noto+Serif+JP:wght@400;700&display=swap".to_string(),
        }
    }
}

/// Thresholds and timings used by the page behaviors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorConfig {
    /// Viewport width above which an open mobile menu is closed on resize.
    pub menu_breakpoint: u32,
    pub resize_debounce_ms: u64,
    /// Scroll offset past which the header gets `is-scrolled`.
    pub header_scroll_threshold: f64,
    /// Scroll offset past which the scroll-to-top button is shown.
    pub scroll_top_threshold: f64,
    /// Header height assumed by smooth scrolling when `.header` is missing.
    pub fallback_header_height: f64,
    /// Visible fraction that counts as "in view" for fade-in elements.
    pub fade_in_threshold: f64,
    /// Bottom root margin for fade-in observation (negative shrinks the viewport).
    pub fade_in_bottom_margin: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            menu_breakpoint: 768,
            resize_debounce_ms: 250,
            header_scroll_threshold: 100.0,
            scroll_top_threshold: 300.0,
            fallback_header_height: 80.0,
            fade_in_threshold: 0.1,
            fade_in_bottom_margin: -100.0,
        }
    }
}

/// A header navigation link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub label: String,
    /// Relative to `base_path` unless absolute.
    pub href: String,
    /// Render as the call-to-action item.
    #[serde(default)]
    pub cta: bool,
}

impl NavLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
            cta: false,
        }
    }
}

/// A titled column of footer links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterGroup {
    pub title: String,
    pub links: Vec<NavLink>,
}

fn default_navigation() -> Vec<NavLink> {
    vec![
        NavLink::new("教室について", "about.html"),
        NavLink::new("コース案内", "course.html"),
        NavLink::new("料金表", "price.html"),
        NavLink::new("講師紹介", "instructor.html"),
        NavLink::new("アクセス", "access.html"),
        NavLink::new("よくある質問", "faq.html"),
        NavLink::new("ブログ", "blog/index.html"),
        NavLink {
            cta: true,
            ..NavLink::new("お問い合わせ", "contact.html")
        },
    ]
}

fn default_footer_groups() -> Vec<FooterGroup> {
    vec![
        FooterGroup {
            title: "教室案内".to_string(),
            links: vec![
                NavLink::new("教室について", "about.html"),
                NavLink::new("コース案内", "course.html"),
                NavLink::new("料金表", "price.html"),
                NavLink::new("講師紹介", "instructor.html"),
            ],
        },
        FooterGroup {
            title: "サポート".to_string(),
            links: vec![
                NavLink::new("アクセス", "access.html"),
                NavLink::new("よくある質問", "faq.html"),
                NavLink::new("お問い合わせ", "contact.html"),
                NavLink::new("ブログ", "blog/index.html"),
            ],
        },
        FooterGroup {
            title: "その他".to_string(),
            links: vec![
                NavLink::new("教室概要", "company.html"),
                NavLink::new("プライバシーポリシー", "privacy.html"),
                NavLink::new("サイトマップ", "sitemap.html"),
            ],
        },
    ]
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pages rendered in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the given source directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_file(&root.join("config.toml"))
}

/// Load an explicit config file. A missing file yields the stock config.
pub fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# miyabiyaka site configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Shown as og:site_name.
site_name = "miyabiyaka（みやびやか）着付け教室"

# Prefix for every internal link and stylesheet.
base_path = "/miyabiyaka"

# Scheme and host the site is served from; og:url = origin + current path.
origin = "https://example.com"

# Keep search engines out until launch. Set to false when the site goes public.
under_construction = true

# ---------------------------------------------------------------------------
# Page defaults (used when a page omits the matching data-* attribute)
# ---------------------------------------------------------------------------
[defaults]
title = "miyabiyaka（みやびやか）着付け教室"
description = "miyabiyaka（みやびやか）は首藤ルリ子が主宰する着付け教室です。"
keywords = "miyabiyaka,みやびやか,着付け教室"
og_title = "miyabiyaka（みやびやか）着付け教室"
og_description = "首藤ルリ子が主宰する着付け教室。"
og_image = "https://example.com/images/ogp.jpg"
page_type = "website"
current_path = "/miyabiyaka/"

# ---------------------------------------------------------------------------
# Header and footer text
# ---------------------------------------------------------------------------
[brand]
logo_main = "miyabiyaka"
logo_sub = "みやびやか 着付け教室"
description = [
  "首藤ルリ子が主宰する着付け教室です。",
  "伝統的な着付け技術を丁寧にお教えいたします。",
]
copyright = "© 2025 miyabiyaka（みやびやか）着付け教室. All Rights Reserved."

# ---------------------------------------------------------------------------
# Web fonts (skipped when a page already links to font_host)
# ---------------------------------------------------------------------------
[fonts]
font_host = "https://fonts.googleapis.com"
static_host = "https://fonts.gstatic.com"
stylesheet = "https://fonts.googleapis.com/css2?family=Noto+Sans+JP:wght@400;500;700&family=Noto+Serif+JP:wght@400;700&display=swap"

# ---------------------------------------------------------------------------
# Interactive behavior
# ---------------------------------------------------------------------------
[behavior]
# An open mobile menu closes when the window is resized wider than this.
menu_breakpoint = 768
# Quiet period before a resize is acted on.
resize_debounce_ms = 250
# Scroll offset past which the header is styled as scrolled.
header_scroll_threshold = 100.0
# Scroll offset past which the scroll-to-top button appears.
scroll_top_threshold = 300.0
# Header height assumed by in-page anchor scrolling when no header exists.
fallback_header_height = 80.0
# Fade-in elements appear once this fraction is visible...
fade_in_threshold = 0.1
# ...inside the viewport shrunk by this bottom margin.
fade_in_bottom_margin = -100.0

# ---------------------------------------------------------------------------
# Header navigation (href is relative to base_path)
# ---------------------------------------------------------------------------
[[navigation]]
label = "教室について"
href = "about.html"

[[navigation]]
label = "コース案内"
href = "course.html"

[[navigation]]
label = "料金表"
href = "price.html"

[[navigation]]
label = "講師紹介"
href = "instructor.html"

[[navigation]]
label = "アクセス"
href = "access.html"

[[navigation]]
label = "よくある質問"
href = "faq.html"

[[navigation]]
label = "ブログ"
href = "blog/index.html"

[[navigation]]
label = "お問い合わせ"
href = "contact.html"
cta = true

# ---------------------------------------------------------------------------
# Footer link groups
# ---------------------------------------------------------------------------
[[footer_groups]]
title = "教室案内"
links = [
  { label = "教室について", href = "about.html" },
  { label = "コース案内", href = "course.html" },
  { label = "料金表", href = "price.html" },
  { label = "講師紹介", href = "instructor.html" },
]

[[footer_groups]]
title = "サポート"
links = [
  { label = "アクセス", href = "access.html" },
  { label = "よくある質問", href = "faq.html" },
  { label = "お問い合わせ", href = "contact.html" },
  { label = "ブログ", href = "blog/index.html" },
]

[[footer_groups]]
title = "その他"
links = [
  { label = "教室概要", href = "company.html" },
  { label = "プライバシーポリシー", href = "privacy.html" },
  { label = "サイトマップ", href = "sitemap.html" },
]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum pages rendered in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
