//! In-page anchor links scroll smoothly, leaving room for the fixed header.

use crate::config::BehaviorConfig;
use crate::dom;
use crate::runtime::{Behavior, Event, Page, PageState, ScrollBehavior};
use kuchiki::NodeRef;

struct SmoothScroll {
    links: Vec<NodeRef>,
    fallback_header_height: f64,
}

impl SmoothScroll {
    fn header_height(&self, page: &PageState) -> f64 {
        dom::select_first(page.document(), ".header")
            .map(|header| page.rect(&header).height)
            .filter(|height| *height > 0.0)
            .unwrap_or(self.fallback_header_height)
    }
}

impl Behavior for SmoothScroll {
    fn name(&self) -> &'static str {
        "smooth-scroll"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        let Event::Click { target } = event else {
            return;
        };
        let Some(link) = dom::closest_of(target, &self.links) else {
            return;
        };
        let href = dom::attr(&link, "href").unwrap_or_default();

        if href == "#" {
            page.prevent_default();
            page.scroll_to(0.0, ScrollBehavior::Smooth);
            return;
        }

        let id = href.strip_prefix('#').unwrap_or(&href);
        let Some(destination) = dom::element_by_id(page.document(), id) else {
            return;
        };
        page.prevent_default();
        let top = page.rect(&destination).top - self.header_height(page);
        page.scroll_to(top, ScrollBehavior::Smooth);
    }
}

/// Bind every `a[href^="#"]` present at load.
pub fn init_smooth_scroll(page: &mut Page, behavior: &BehaviorConfig) {
    let links = dom::select_all(page.document(), r##"a[href^="#"]"##);
    if links.is_empty() {
        return;
    }
    page.register(Box::new(SmoothScroll {
        links,
        fallback_header_height: behavior.fallback_header_height,
    }));
}
