//! FAQ accordion.
//!
//! Clicking an `.accordion__header` toggles `is-open` on its parent item and
//! animates the item's `.accordion__body` through `max-height`. Items are
//! independent; opening one leaves the others as they are.

use crate::dom;
use crate::runtime::{Behavior, Event, Page, PageState};
use kuchiki::NodeRef;

struct Accordion {
    headers: Vec<NodeRef>,
}

impl Behavior for Accordion {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        let Event::Click { target } = event else {
            return;
        };
        let Some(header) = dom::closest_of(target, &self.headers) else {
            return;
        };
        let Some(item) = header.parent() else {
            return;
        };
        let body = dom::select_first(&item, ".accordion__body");

        if dom::has_class(&item, "is-open") {
            dom::remove_class(&item, "is-open");
            if let Some(body) = &body {
                dom::remove_style_property(body, "max-height");
            }
            dom::set_attr(&header, "aria-expanded", "false");
        } else {
            dom::add_class(&item, "is-open");
            if let Some(body) = &body {
                let height = page.rect(body).scroll_height;
                dom::set_style_property(body, "max-height", &format!("{height}px"));
            }
            dom::set_attr(&header, "aria-expanded", "true");
        }
    }
}

/// Bind every `.accordion__header`, starting collapsed.
pub fn init_accordion(page: &mut Page) {
    let headers = dom::select_all(page.document(), ".accordion__header");
    if headers.is_empty() {
        return;
    }
    for header in &headers {
        dom::set_attr(header, "aria-expanded", "false");
    }
    page.register(Box::new(Accordion { headers }));
}
