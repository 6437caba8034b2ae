//! Meta-tag synthesis for the document `<head>`.
//!
//! Each helper is idempotent on its identity: a `<meta>` is identified by
//! its attribute kind and key (`name="description"`, `property="og:title"`),
//! a stylesheet by its exact `href`. Repeated calls update in place instead
//! of duplicating tags.

use crate::config::{FontConfig, SiteConfig};
use crate::dom;
use crate::page::PageConfig;
use kuchiki::NodeRef;

/// Which attribute identifies a `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    /// `<meta name="...">` (description, keywords, Twitter cards)
    Name,
    /// `<meta property="...">` (Open Graph)
    Property,
}

impl MetaAttr {
    pub fn as_str(self) -> &'static str {
        match self {
            MetaAttr::Name => "name",
            MetaAttr::Property => "property",
        }
    }
}

/// Ensure a `<head>` exists and return it.
///
/// The HTML parser always synthesizes one, so this only creates a head for
/// documents built by hand.
fn ensure_head(document: &NodeRef) -> NodeRef {
    if let Some(head) = dom::head(document) {
        return head;
    }
    let head = dom::create_element("head", &[]);
    match dom::root_element(document) {
        Some(root) => root.prepend(head.clone()),
        None => document.append(head.clone()),
    }
    head
}

/// Find the `<meta>` identified by `(attr, key)`, creating it if missing,
/// and set its content.
pub fn ensure_meta_tag(document: &NodeRef, attr: MetaAttr, key: &str, content: &str) -> NodeRef {
    let head = ensure_head(document);
    let existing = head
        .descendants()
        .find(|node| dom::is_tag(node, "meta") && dom::attr(node, attr.as_str()).as_deref() == Some(key));
    let meta = existing.unwrap_or_else(|| {
        let meta = dom::create_element("meta", &[(attr.as_str(), key)]);
        head.append(meta.clone());
        meta
    });
    dom::set_attr(&meta, "content", content);
    meta
}

/// Append `<link rel="stylesheet">` unless a link with exactly this href exists.
///
/// Returns whether a link was added.
pub fn ensure_stylesheet(document: &NodeRef, href: &str) -> bool {
    let present = document
        .descendants()
        .any(|node| dom::is_tag(&node, "link") && dom::attr(&node, "href").as_deref() == Some(href));
    if present {
        return false;
    }
    ensure_head(document).append(dom::create_element(
        "link",
        &[("rel", "stylesheet"), ("href", href)],
    ));
    true
}

/// Set the document title, creating `<title>` if needed.
pub fn set_title(document: &NodeRef, title: &str) {
    let title_el = dom::select_first(document, "title").unwrap_or_else(|| {
        let el = dom::create_element("title", &[]);
        ensure_head(document).append(el.clone());
        el
    });
    dom::set_text(&title_el, title);
}

/// Add preconnect hints and the font stylesheet unless the page already
/// links to the font host.
///
/// Returns whether the links were added.
pub fn ensure_font_links(document: &NodeRef, fonts: &FontConfig) -> bool {
    let already_linked = document.descendants().any(|node| {
        dom::is_tag(&node, "link")
            && dom::attr(&node, "href").is_some_and(|href| href.contains(&fonts.font_host))
    });
    if already_linked {
        return false;
    }
    let head = ensure_head(document);
    head.append(dom::create_element(
        "link",
        &[("rel", "preconnect"), ("href", &fonts.font_host)],
    ));
    head.append(dom::create_element(
        "link",
        &[
            ("rel", "preconnect"),
            ("href", &fonts.static_host),
            ("crossorigin", "anonymous"),
        ],
    ));
    head.append(dom::create_element(
        "link",
        &[("href", &fonts.stylesheet), ("rel", "stylesheet")],
    ));
    true
}

/// Set the JSON-LD `<script>` to carry `payload` verbatim.
///
/// An existing `application/ld+json` script has its text replaced, so a
/// page rendered twice still carries a single block.
pub fn ensure_structured_data(document: &NodeRef, payload: &str) {
    let script = match dom::select_first(document, r#"script[type="application/ld+json"]"#) {
        Some(existing) => {
            for child in existing.children().collect::<Vec<_>>() {
                child.detach();
            }
            existing
        }
        None => {
            let script = dom::create_element("script", &[("type", "application/ld+json")]);
            ensure_head(document).append(script.clone());
            script
        }
    };
    script.append(NodeRef::new_text(payload));
}

/// Synthesize every head tag a page needs from its configuration.
pub fn generate_head(document: &NodeRef, page: &PageConfig, site: &SiteConfig) {
    set_title(document, &page.title);

    ensure_meta_tag(document, MetaAttr::Name, "description", &page.description);
    ensure_meta_tag(document, MetaAttr::Name, "keywords", &page.keywords);

    // Open Graph
    let og = [
        ("og:title", page.og_title.clone()),
        ("og:description", page.og_description.clone()),
        ("og:type", page.page_type.clone()),
        ("og:url", site.absolute_url(&page.current_path)),
        ("og:image", page.og_image.clone()),
        ("og:site_name", site.site_name.clone()),
    ];
    for (key, content) in &og {
        ensure_meta_tag(document, MetaAttr::Property, key, content);
    }

    // Twitter card
    let twitter = [
        ("twitter:card", "summary_large_image"),
        ("twitter:title", page.og_title.as_str()),
        ("twitter:description", page.og_description.as_str()),
        ("twitter:image", page.og_image.as_str()),
    ];
    for (key, content) in twitter {
        ensure_meta_tag(document, MetaAttr::Name, key, content);
    }

    ensure_font_links(document, &site.fonts);

    for core in ["common.css", "header.css", "footer.css"] {
        ensure_stylesheet(document, &site.stylesheet(core));
    }
    for extra in page.additional_stylesheets() {
        ensure_stylesheet(document, &site.stylesheet(extra));
    }

    if let Some(payload) = &page.structured_data {
        ensure_structured_data(document, payload);
    }
}
