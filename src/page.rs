//! Page configuration read from the root `<html>` element.
//!
//! Every page declares its SEO metadata and optional structured blocks as
//! `data-*` attributes on `<html>`:
//!
//! ```html
//! <html lang="ja"
//!       data-page-title="よくある質問 | miyabiyaka"
//!       data-current-path="/miyabiyaka/faq.html"
//!       data-breadcrumb='[{"name":"ホーム","url":"/miyabiyaka/"},{"name":"よくある質問","url":null}]'
//!       data-page-header='{"title":"よくある質問","subtitle":"FAQ"}'
//!       data-additional-css="faq.css">
//! ```
//!
//! Absent or empty attributes fall back to [`PageDefaults`]. The JSON-valued
//! attributes are kept as raw strings here and only decoded by the render
//! step that consumes them.

use crate::config::PageDefaults;
use crate::dom;
use crate::types::{BreadcrumbEntry, PageHeader};
use kuchiki::NodeRef;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("malformed JSON in {attribute}: {source}")]
    Json {
        attribute: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub const ATTR_TITLE: &str = "data-page-title";
pub const ATTR_DESCRIPTION: &str = "data-page-description";
pub const ATTR_KEYWORDS: &str = "data-page-keywords";
pub const ATTR_OG_TITLE: &str = "data-og-title";
pub const ATTR_OG_DESCRIPTION: &str = "data-og-description";
pub const ATTR_OG_IMAGE: &str = "data-og-image";
pub const ATTR_PAGE_TYPE: &str = "data-page-type";
pub const ATTR_CURRENT_PATH: &str = "data-current-path";
pub const ATTR_BREADCRUMB: &str = "data-breadcrumb";
pub const ATTR_PAGE_HEADER: &str = "data-page-header";
pub const ATTR_ADDITIONAL_CSS: &str = "data-additional-css";
pub const ATTR_STRUCTURED_DATA: &str = "data-structured-data";

/// Per-page settings, immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub page_type: String,
    pub current_path: String,
    /// Raw JSON array of `{name, url}`.
    pub breadcrumb: Option<String>,
    /// Raw JSON object `{title, subtitle, bgImage}`.
    pub page_header: Option<String>,
    /// Comma-separated stylesheet file names under `<base>/css/`.
    pub additional_css: Option<String>,
    /// JSON-LD payload, inserted verbatim.
    pub structured_data: Option<String>,
}

impl PageConfig {
    /// Read the page configuration from the document root.
    ///
    /// A document without an `<html>` element yields the defaults.
    pub fn read(document: &NodeRef, defaults: &PageDefaults) -> Self {
        let root = dom::root_element(document);
        let get = |name: &str| root.as_ref().and_then(|r| dom::non_empty_attr(r, name));
        let or_default = |name: &str, fallback: &str| get(name).unwrap_or_else(|| fallback.to_string());

        Self {
            title: or_default(ATTR_TITLE, &defaults.title),
            description: or_default(ATTR_DESCRIPTION, &defaults.description),
            keywords: or_default(ATTR_KEYWORDS, &defaults.keywords),
            og_title: or_default(ATTR_OG_TITLE, &defaults.og_title),
            og_description: or_default(ATTR_OG_DESCRIPTION, &defaults.og_description),
            og_image: or_default(ATTR_OG_IMAGE, &defaults.og_image),
            page_type: or_default(ATTR_PAGE_TYPE, &defaults.page_type),
            current_path: or_default(ATTR_CURRENT_PATH, &defaults.current_path),
            breadcrumb: get(ATTR_BREADCRUMB),
            page_header: get(ATTR_PAGE_HEADER),
            additional_css: get(ATTR_ADDITIONAL_CSS),
            structured_data: get(ATTR_STRUCTURED_DATA),
        }
    }

    /// Decode `data-breadcrumb`. `Ok(None)` when the page has no breadcrumb.
    pub fn breadcrumb_entries(&self) -> Result<Option<Vec<BreadcrumbEntry>>, TemplateError> {
        self.breadcrumb
            .as_deref()
            .map(|raw| {
                serde_json::from_str(raw).map_err(|source| TemplateError::Json {
                    attribute: ATTR_BREADCRUMB,
                    source,
                })
            })
            .transpose()
    }

    /// Decode `data-page-header`. `Ok(None)` when the page has no header block.
    pub fn page_header_data(&self) -> Result<Option<PageHeader>, TemplateError> {
        self.page_header
            .as_deref()
            .map(|raw| {
                serde_json::from_str(raw).map_err(|source| TemplateError::Json {
                    attribute: ATTR_PAGE_HEADER,
                    source,
                })
            })
            .transpose()
    }

    /// Additional stylesheet file names, trimmed, empties dropped.
    pub fn additional_stylesheets(&self) -> Vec<&str> {
        self.additional_css
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::page_with_root_attrs;

    #[test]
    fn missing_attributes_use_defaults() {
        let doc = page_with_root_attrs("");
        let defaults = PageDefaults::default();
        let config = PageConfig::read(&doc, &defaults);
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.page_type, "website");
        assert_eq!(config.current_path, "/miyabiyaka/");
        assert_eq!(config.breadcrumb, None);
        assert_eq!(config.structured_data, None);
    }

    #[test]
    fn empty_attribute_counts_as_missing() {
        let doc = page_with_root_attrs(r#"data-page-title="" data-breadcrumb="""#);
        let config = PageConfig::read(&doc, &PageDefaults::default());
        assert_eq!(config.title, PageDefaults::default().title);
        assert_eq!(config.breadcrumb, None);
    }

    #[test]
    fn attributes_override_defaults() {
        let doc = page_with_root_attrs(
            r#"data-page-title="料金表" data-og-image="/img/price.jpg" data-current-path="/miyabiyaka/price.html""#,
        );
        let config = PageConfig::read(&doc, &PageDefaults::default());
        assert_eq!(config.title, "料金表");
        assert_eq!(config.og_image, "/img/price.jpg");
        assert_eq!(config.current_path, "/miyabiyaka/price.html");
        // og:title is independent of the page title
        assert_eq!(config.og_title, PageDefaults::default().og_title);
    }

    #[test]
    fn additional_stylesheets_are_trimmed() {
        let doc = page_with_root_attrs(r#"data-additional-css=" faq.css, price.css ,,""#);
        let config = PageConfig::read(&doc, &PageDefaults::default());
        assert_eq!(config.additional_stylesheets(), vec!["faq.css", "price.css"]);
    }

    #[test]
    fn breadcrumb_entries_decode_in_order() {
        let doc = page_with_root_attrs(
            r#"data-breadcrumb='[{"name":"ホーム","url":"/miyabiyaka/"},{"name":"FAQ","url":null}]'"#,
        );
        let config = PageConfig::read(&doc, &PageDefaults::default());
        let entries = config.breadcrumb_entries().unwrap().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ホーム");
        assert_eq!(entries[1].name, "FAQ");
    }

    #[test]
    fn malformed_breadcrumb_is_an_error() {
        let doc = page_with_root_attrs(r#"data-breadcrumb="[{name: oops""#);
        let config = PageConfig::read(&doc, &PageDefaults::default());
        let err = config.breadcrumb_entries().unwrap_err();
        assert!(err.to_string().contains(ATTR_BREADCRUMB));
    }

    #[test]
    fn absent_page_header_is_none() {
        let doc = page_with_root_attrs("");
        let config = PageConfig::read(&doc, &PageDefaults::default());
        assert!(config.page_header_data().unwrap().is_none());
    }
}
