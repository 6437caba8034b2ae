//! Fade-in on first appearance.
//!
//! Elements marked `.fade-in` get `is-visible` the first time they enter the
//! (bottom-shrunk) viewport and are then unobserved, so the class is added
//! at most once per element.

use crate::config::BehaviorConfig;
use crate::dom;
use crate::runtime::{Behavior, Event, ObserverId, ObserverOptions, Page, PageState, RootMargin};

pub const FADE_IN_CLASS: &str = "fade-in";
pub const VISIBLE_CLASS: &str = "is-visible";

struct FadeIn {
    observer: ObserverId,
}

impl Behavior for FadeIn {
    fn name(&self) -> &'static str {
        "fade-in"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        let Event::Intersection { observer, entries } = event else {
            return;
        };
        if *observer != self.observer {
            return;
        }
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            dom::add_class(&entry.target, VISIBLE_CLASS);
            page.unobserve(self.observer, &entry.target);
        }
    }
}

/// Observe every `.fade-in` element. Returns the observer, or `None` when
/// the page has nothing to fade in.
pub fn init_fade_in(page: &mut Page, behavior: &BehaviorConfig) -> Option<ObserverId> {
    let targets = dom::select_all(page.document(), &format!(".{FADE_IN_CLASS}"));
    if targets.is_empty() {
        return None;
    }

    let observer = page.state_mut().create_observer(ObserverOptions {
        threshold: behavior.fade_in_threshold,
        root_margin: RootMargin {
            top: 0.0,
            bottom: behavior.fade_in_bottom_margin,
        },
    });
    for target in &targets {
        page.state_mut().observe(observer, target);
    }
    page.register(Box::new(FadeIn { observer }));
    Some(observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{Environment, IntersectionEntry, Rect};
    use crate::test_helpers::{find, location, page_with_body};

    fn fade_page() -> Page {
        let doc = page_with_body(
            "",
            r#"<section id="a" class="fade-in"></section><section id="b" class="fade-in"></section>"#,
        );
        let mut env = Environment::new(location("index.html"));
        env.viewport.height = 800.0;
        let mut page = Page::new(doc, env);
        let a = find(page.document(), "#a");
        let b = find(page.document(), "#b");
        page.state_mut().layout_mut().place(&a, Rect::new(100.0, 300.0));
        page.state_mut().layout_mut().place(&b, Rect::new(1500.0, 300.0));
        page
    }

    #[test]
    fn visible_elements_fade_in_on_check() {
        let mut page = fade_page();
        init_fade_in(&mut page, &BehaviorConfig::default()).unwrap();
        page.check_intersections();
        assert!(dom::has_class(&find(page.document(), "#a"), VISIBLE_CLASS));
        assert!(!dom::has_class(&find(page.document(), "#b"), VISIBLE_CLASS));
    }

    #[test]
    fn element_fades_in_after_scrolling_into_view() {
        let mut page = fade_page();
        init_fade_in(&mut page, &BehaviorConfig::default()).unwrap();
        page.check_intersections();

        // Root box 1000..1700 after the -100 bottom margin; 200 of 300 visible
        page.scroll_to(1000.0);
        page.check_intersections();
        assert!(dom::has_class(&find(page.document(), "#b"), VISIBLE_CLASS));
    }

    #[test]
    fn bottom_margin_delays_fade_in() {
        let mut page = fade_page();
        init_fade_in(&mut page, &BehaviorConfig::default()).unwrap();
        // Root box 820..1520: 20 of 300 visible, under the 0.1 threshold
        page.scroll_to(820.0);
        page.check_intersections();
        assert!(!dom::has_class(&find(page.document(), "#b"), VISIBLE_CLASS));
    }

    #[test]
    fn fires_once_then_stops_observing() {
        let mut page = fade_page();
        let observer = init_fade_in(&mut page, &BehaviorConfig::default()).unwrap();
        let a = find(page.document(), "#a");
        let entry = IntersectionEntry {
            target: a.clone(),
            is_intersecting: true,
            ratio: 1.0,
        };

        page.deliver_intersections(observer, vec![entry.clone()]);
        assert!(dom::has_class(&a, VISIBLE_CLASS));
        assert!(!page.state().is_observing(observer, &a));

        // Remove the class; a repeated report must not bring it back
        dom::remove_class(&a, VISIBLE_CLASS);
        page.deliver_intersections(observer, vec![entry]);
        assert!(!dom::has_class(&a, VISIBLE_CLASS));
        assert_eq!(page.state().observed_count(observer), 1);
    }

    #[test]
    fn non_intersecting_entry_is_ignored() {
        let mut page = fade_page();
        let observer = init_fade_in(&mut page, &BehaviorConfig::default()).unwrap();
        let b = find(page.document(), "#b");
        page.deliver_intersections(
            observer,
            vec![IntersectionEntry {
                target: b.clone(),
                is_intersecting: false,
                ratio: 0.0,
            }],
        );
        assert!(!dom::has_class(&b, VISIBLE_CLASS));
        assert!(page.state().is_observing(observer, &b));
    }

    #[test]
    fn nothing_bound_without_targets() {
        let doc = page_with_body("", "<main></main>");
        let mut page = Page::new(doc, Environment::new(location("index.html")));
        assert!(init_fade_in(&mut page, &BehaviorConfig::default()).is_none());
        assert!(page.behavior_names().is_empty());
    }
}
