//! Full page load: template, component injection, behaviors.
//!
//! [`load`] reproduces the order a browser page goes through: the template
//! runs as soon as the document is parsed, then the content-loaded step
//! injects the header and footer and binds the header behavior, then the
//! page-level behaviors are bound.

use crate::behaviors::{self, header};
use crate::components::{self, Injection};
use crate::config::SiteConfig;
use crate::dom;
use crate::runtime::{Environment, Page};
use crate::template::{self, TemplateReport};

pub struct LoadedPage {
    pub page: Page,
    pub template: TemplateReport,
    pub injection: Injection,
}

/// Parse `html` and bring it up as an interactive page.
pub fn load(html: &str, site: &SiteConfig, env: Environment) -> LoadedPage {
    let document = dom::parse_document(html);
    let template = template::init_template(&document, site);

    let mut page = Page::new(document, env);
    let injection = components::on_content_loaded(&mut page, site, Some(&header::init_header));
    behaviors::init_page_interactions(&mut page, site);

    LoadedPage {
        page,
        template,
        injection,
    }
}
