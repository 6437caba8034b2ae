//! "Back to top" button, shown once the page has scrolled far enough.

use crate::config::BehaviorConfig;
use crate::dom;
use crate::render;
use crate::runtime::{Behavior, Event, FrameId, Page, PageState, ScrollBehavior};
use kuchiki::NodeRef;

pub const VISIBLE_CLASS: &str = "is-visible";

struct ScrollTop {
    button: NodeRef,
    threshold: f64,
    pending: Option<FrameId>,
}

impl Behavior for ScrollTop {
    fn name(&self) -> &'static str {
        "scroll-top"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        match event {
            Event::Scroll if self.pending.is_none() => {
                self.pending = Some(page.request_animation_frame());
            }
            Event::AnimationFrame(id) if Some(*id) == self.pending => {
                self.pending = None;
                if page.scroll_y() > self.threshold {
                    dom::add_class(&self.button, VISIBLE_CLASS);
                } else {
                    dom::remove_class(&self.button, VISIBLE_CLASS);
                }
            }
            Event::Click { target }
                if dom::closest_of(target, std::slice::from_ref(&self.button)).is_some() =>
            {
                page.scroll_to(0.0, ScrollBehavior::Smooth);
            }
            _ => {}
        }
    }
}

/// Append the button to `<body>` and bind it.
pub fn init_scroll_to_top(page: &mut Page, behavior: &BehaviorConfig) {
    let Some(body) = dom::body(page.document()) else {
        return;
    };
    let Some(button) = dom::parse_fragment(&render::scroll_top_button().into_string())
        .into_iter()
        .find(|node| node.as_element().is_some())
    else {
        return;
    };
    body.append(button.clone());
    page.register(Box::new(ScrollTop {
        button,
        threshold: behavior.scroll_top_threshold,
        pending: None,
    }));
}
