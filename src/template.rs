//! Page template orchestration.
//!
//! Runs once per page, before any content-loaded handling:
//!
//! ```text
//! <html data-*>  →  PageConfig  →  head tags
//!                              ├─→ #breadcrumb   (if data + placeholder)
//!                              └─→ #page-header  (if data + placeholder)
//! ```
//!
//! The two body render steps are independent. A missing placeholder or
//! missing data skips the step; malformed JSON fails only that step and is
//! reported in the [`TemplateReport`].

use crate::config::SiteConfig;
use crate::dom;
use crate::head;
use crate::page::{PageConfig, TemplateError};
use crate::render;
use kuchiki::NodeRef;
use tracing::{debug, warn};

pub const BREADCRUMB_ID: &str = "breadcrumb";
pub const PAGE_HEADER_ID: &str = "page-header";

/// Why a render step did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The page declares no data for this block.
    NoData,
    /// The page has data but no placeholder element to render into.
    NoPlaceholder,
}

#[derive(Debug)]
pub enum StepOutcome {
    Rendered,
    Skipped(SkipReason),
    Failed(TemplateError),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// Result of templating one page.
#[derive(Debug)]
pub struct TemplateReport {
    pub config: PageConfig,
    pub breadcrumb: StepOutcome,
    pub page_header: StepOutcome,
}

impl TemplateReport {
    /// Errors of the failed steps, in render order.
    pub fn errors(&self) -> impl Iterator<Item = &TemplateError> {
        [&self.breadcrumb, &self.page_header]
            .into_iter()
            .filter_map(|outcome| match outcome {
                StepOutcome::Failed(err) => Some(err),
                _ => None,
            })
    }
}

/// Apply the page template: head synthesis, then breadcrumb and page header.
pub fn init_template(document: &NodeRef, site: &SiteConfig) -> TemplateReport {
    let config = PageConfig::read(document, &site.defaults);

    head::generate_head(document, &config, site);

    let breadcrumb = render_step(document, BREADCRUMB_ID, config.breadcrumb.is_some(), || {
        Ok(config.breadcrumb_entries()?.map(|entries| render::breadcrumb(&entries)))
    });
    let page_header = render_step(document, PAGE_HEADER_ID, config.page_header.is_some(), || {
        Ok(config.page_header_data()?.map(|data| render::page_header(&data)))
    });

    TemplateReport {
        config,
        breadcrumb,
        page_header,
    }
}

fn render_step<F>(document: &NodeRef, placeholder_id: &str, has_data: bool, render: F) -> StepOutcome
where
    F: FnOnce() -> Result<Option<maud::Markup>, TemplateError>,
{
    if !has_data {
        return StepOutcome::Skipped(SkipReason::NoData);
    }
    let Some(placeholder) = dom::element_by_id(document, placeholder_id) else {
        debug!(placeholder = placeholder_id, "placeholder missing, skipping");
        return StepOutcome::Skipped(SkipReason::NoPlaceholder);
    };
    match render() {
        Ok(Some(markup)) => {
            dom::set_inner_html(&placeholder, &markup.into_string());
            StepOutcome::Rendered
        }
        Ok(None) => StepOutcome::Skipped(SkipReason::NoData),
        Err(err) => {
            warn!(placeholder = placeholder_id, error = %err, "render step failed");
            StepOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{count, page_with_body};

    const BREADCRUMB: &str =
        r#"data-breadcrumb='[{"name":"ホーム","url":"/miyabiyaka/"},{"name":"料金表","url":null}]'"#;
    const PAGE_HEADER: &str = r#"data-page-header='{"title":"料金表","subtitle":"Price"}'"#;

    #[test]
    fn renders_breadcrumb_into_placeholder() {
        let doc = page_with_body(BREADCRUMB, r#"<div id="breadcrumb"></div>"#);
        let report = init_template(&doc, &SiteConfig::default());
        assert!(matches!(report.breadcrumb, StepOutcome::Rendered));
        assert_eq!(count(&doc, "#breadcrumb li.breadcrumb__item"), 2);
        assert_eq!(count(&doc, "#breadcrumb a.breadcrumb__link"), 1);
    }

    #[test]
    fn missing_placeholder_is_skipped_silently() {
        let doc = page_with_body(BREADCRUMB, "<main></main>");
        let report = init_template(&doc, &SiteConfig::default());
        assert!(matches!(
            report.breadcrumb,
            StepOutcome::Skipped(SkipReason::NoPlaceholder)
        ));
        assert_eq!(report.errors().count(), 0);
    }

    #[test]
    fn missing_data_leaves_placeholder_untouched() {
        let doc = page_with_body("", r#"<div id="breadcrumb">static</div>"#);
        let report = init_template(&doc, &SiteConfig::default());
        assert!(matches!(report.breadcrumb, StepOutcome::Skipped(SkipReason::NoData)));
        let placeholder = dom::element_by_id(&doc, "breadcrumb").unwrap();
        assert_eq!(placeholder.text_contents(), "static");
    }

    #[test]
    fn malformed_breadcrumb_fails_only_its_step() {
        let attrs = format!(r#"data-breadcrumb="[oops" {PAGE_HEADER}"#);
        let doc = page_with_body(
            &attrs,
            r#"<div id="breadcrumb"></div><div id="page-header"></div>"#,
        );
        let report = init_template(&doc, &SiteConfig::default());
        assert!(report.breadcrumb.is_failed());
        assert!(matches!(report.page_header, StepOutcome::Rendered));
        assert_eq!(report.errors().count(), 1);
        assert_eq!(count(&doc, "#breadcrumb *"), 0);
        assert_eq!(count(&doc, "#page-header h1.page-header__title"), 1);
        // Head synthesis already happened
        assert_eq!(count(&doc, r#"meta[property="og:title"]"#), 1);
    }

    #[test]
    fn page_header_rendered_with_title() {
        let doc = page_with_body(PAGE_HEADER, r#"<div id="page-header"></div>"#);
        init_template(&doc, &SiteConfig::default());
        let title = dom::select_first(&doc, ".page-header__title").unwrap();
        assert_eq!(title.text_contents(), "料金表");
    }

    #[test]
    fn report_carries_page_config() {
        let doc = page_with_body(r#"data-page-title="FAQ""#, "");
        let report = init_template(&doc, &SiteConfig::default());
        assert_eq!(report.config.title, "FAQ");
    }
}
