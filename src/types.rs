//! Records decoded from the JSON-valued page attributes.
//!
//! `data-breadcrumb` carries a `Vec<BreadcrumbEntry>` and `data-page-header`
//! a single `PageHeader`. Both are parsed lazily by the template step that
//! needs them, so a malformed value only fails that step.

use serde::{Deserialize, Serialize};

/// One step of the breadcrumb trail.
///
/// Order is significant: the last entry is the current page and is rendered
/// without a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Title block shown at the top of inner pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHeader {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Background image URL, emitted as an inline style only when present.
    #[serde(default, rename = "bgImage")]
    pub bg_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_accepts_null_url() {
        let entries: Vec<BreadcrumbEntry> = serde_json::from_str(
            r#"[{"name":"ホーム","url":"/miyabiyaka/"},{"name":"よくある質問","url":null}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].url.as_deref(), Some("/miyabiyaka/"));
        assert_eq!(entries[1].url, None);
    }

    #[test]
    fn breadcrumb_url_may_be_omitted() {
        let entries: Vec<BreadcrumbEntry> =
            serde_json::from_str(r#"[{"name":"料金表"}]"#).unwrap();
        assert_eq!(entries[0].url, None);
    }

    #[test]
    fn page_header_reads_camel_case_bg_image() {
        let header: PageHeader = serde_json::from_str(
            r#"{"title":"料金表","subtitle":"Price","bgImage":"/miyabiyaka/images/price.jpg"}"#,
        )
        .unwrap();
        assert_eq!(header.bg_image.as_deref(), Some("/miyabiyaka/images/price.jpg"));
        assert_eq!(header.subtitle, "Price");
    }

    #[test]
    fn page_header_without_title_is_rejected() {
        let result: Result<PageHeader, _> = serde_json::from_str(r#"{"subtitle":"x"}"#);
        assert!(result.is_err());
    }
}
