//! Shared header and footer injection.
//!
//! Pages carry empty `#header` and `#footer` mount points; the injector fills
//! them with the site-wide markup from [`render`] and, while the site is
//! under construction, adds a `robots` noindex directive. Header behavior is
//! bound through an explicit callback so the injector stays independent of
//! [`behaviors::header`](crate::behaviors::header).

use crate::config::SiteConfig;
use crate::dom;
use crate::head::{self, MetaAttr};
use crate::render;
use crate::runtime::Page;
use kuchiki::NodeRef;
use tracing::debug;

pub const HEADER_ID: &str = "header";
pub const FOOTER_ID: &str = "footer";

pub const ROBOTS_NOINDEX: &str = "noindex, nofollow";

/// What [`inject_components`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Injection {
    pub noindex: bool,
    pub header: bool,
    pub footer: bool,
}

/// Header initializer invoked once the header markup is in place.
pub type HeaderInit<'a> = &'a dyn Fn(&mut Page, &SiteConfig);

fn inject(document: &NodeRef, id: &str, markup: maud::Markup) -> bool {
    match dom::element_by_id(document, id) {
        Some(placeholder) => {
            dom::set_inner_html(&placeholder, &markup.into_string());
            true
        }
        None => {
            debug!(placeholder = id, "placeholder missing, not injected");
            false
        }
    }
}

/// Add the noindex directive when needed and fill the header and footer
/// placeholders.
pub fn inject_components(document: &NodeRef, site: &SiteConfig) -> Injection {
    let noindex = site.under_construction;
    if noindex {
        head::ensure_meta_tag(document, MetaAttr::Name, "robots", ROBOTS_NOINDEX);
    }
    Injection {
        noindex,
        header: inject(document, HEADER_ID, render::site_header(site)),
        footer: inject(document, FOOTER_ID, render::site_footer(site)),
    }
}

/// Content-loaded step: inject components, then run the header initializer
/// if one was supplied.
pub fn on_content_loaded(
    page: &mut Page,
    site: &SiteConfig,
    header_init: Option<HeaderInit<'_>>,
) -> Injection {
    let injection = inject_components(page.document(), site);
    match header_init {
        Some(init) => init(page, site),
        None => debug!("no header initializer supplied"),
    }
    injection
}
