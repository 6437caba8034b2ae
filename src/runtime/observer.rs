//! Intersection observation.
//!
//! An observer watches a set of targets against the viewport shrunk or grown
//! by a root margin. Entries are produced only when a target's state changes
//! (the first check always reports), and only for targets that are still
//! observed, so `unobserve` is a true one-shot unsubscribe.
//!
//! Only the vertical axis is modelled; the site never scrolls horizontally.

use super::event::{IntersectionEntry, ObserverId};
use super::layout::{Layout, Rect};
use kuchiki::NodeRef;

/// Margins applied to the viewport before testing intersection.
/// Negative values shrink the root box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction at which a target counts as intersecting.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

#[derive(Debug)]
struct Observation {
    target: NodeRef,
    last: Option<bool>,
}

#[derive(Debug)]
struct Observer {
    id: ObserverId,
    options: ObserverOptions,
    observations: Vec<Observation>,
}

#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<Observer>,
}

/// Visible fraction of `rect` inside the root box `[root_top, root_bottom]`.
fn visible_ratio(rect: Rect, root_top: f64, root_bottom: f64) -> f64 {
    if rect.height <= 0.0 {
        return if rect.top >= root_top && rect.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }
    let visible = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    (visible.max(0.0) / rect.height).min(1.0)
}

/// Whether a target with the given ratio counts as intersecting.
///
/// A zero threshold needs some overlap; any other threshold needs that
/// fraction to be visible.
fn meets_threshold(ratio: f64, threshold: f64) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

impl ObserverRegistry {
    pub fn create(&mut self, id: ObserverId, options: ObserverOptions) {
        self.observers.push(Observer {
            id,
            options,
            observations: Vec::new(),
        });
    }

    fn observer_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.observers.iter_mut().find(|o| o.id == id)
    }

    pub fn observe(&mut self, id: ObserverId, target: &NodeRef) {
        if let Some(observer) = self.observer_mut(id) {
            if !observer.observations.iter().any(|o| &o.target == target) {
                observer.observations.push(Observation {
                    target: target.clone(),
                    last: None,
                });
            }
        }
    }

    pub fn unobserve(&mut self, id: ObserverId, target: &NodeRef) {
        if let Some(observer) = self.observer_mut(id) {
            observer.observations.retain(|o| &o.target != target);
        }
    }

    pub fn is_observing(&self, id: ObserverId, target: &NodeRef) -> bool {
        self.observers
            .iter()
            .find(|o| o.id == id)
            .is_some_and(|o| o.observations.iter().any(|obs| &obs.target == target))
    }

    pub fn observed_count(&self, id: ObserverId) -> usize {
        self.observers
            .iter()
            .find(|o| o.id == id)
            .map_or(0, |o| o.observations.len())
    }

    /// Drop entries whose target is no longer observed.
    pub fn retain_observed(&self, id: ObserverId, entries: Vec<IntersectionEntry>) -> Vec<IntersectionEntry> {
        entries
            .into_iter()
            .filter(|entry| self.is_observing(id, &entry.target))
            .collect()
    }

    /// Compute state changes for every observer against the current viewport.
    pub fn compute(
        &mut self,
        layout: &Layout,
        scroll_y: f64,
        viewport_height: f64,
    ) -> Vec<(ObserverId, Vec<IntersectionEntry>)> {
        let mut batches = Vec::new();
        for observer in &mut self.observers {
            let root_top = scroll_y - observer.options.root_margin.top;
            let root_bottom = scroll_y + viewport_height + observer.options.root_margin.bottom;
            let mut entries = Vec::new();
            for observation in &mut observer.observations {
                let ratio = visible_ratio(layout.rect(&observation.target), root_top, root_bottom);
                let intersecting = meets_threshold(ratio, observer.options.threshold);
                if observation.last != Some(intersecting) {
                    observation.last = Some(intersecting);
                    entries.push(IntersectionEntry {
                        target: observation.target.clone(),
                        is_intersecting: intersecting,
                        ratio,
                    });
                }
            }
            if !entries.is_empty() {
                batches.push((observer.id, entries));
            }
        }
        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn ratio_of_partially_visible_box() {
        let rect = Rect::new(900.0, 200.0);
        // Root box 0..1000: 100 of 200 visible
        assert_eq!(visible_ratio(rect, 0.0, 1000.0), 0.5);
    }

    #[test]
    fn ratio_of_box_below_root_is_zero() {
        assert_eq!(visible_ratio(Rect::new(1200.0, 100.0), 0.0, 1000.0), 0.0);
    }

    #[test]
    fn zero_height_box_inside_root_counts_fully() {
        assert_eq!(visible_ratio(Rect::new(10.0, 0.0), 0.0, 1000.0), 1.0);
    }

    #[test]
    fn negative_bottom_margin_shrinks_root() {
        let mut registry = ObserverRegistry::default();
        let mut layout = Layout::new();
        let target = dom::create_element("div", &[]);
        layout.place(&target, Rect::new(950.0, 100.0));

        let id = ObserverId(1);
        registry.create(
            id,
            ObserverOptions {
                threshold: 0.1,
                root_margin: RootMargin {
                    top: 0.0,
                    bottom: -100.0,
                },
            },
        );
        registry.observe(id, &target);

        // Viewport 0..1000 shrunk to 0..900: target starts at 950, not visible
        let batches = registry.compute(&layout, 0.0, 1000.0);
        assert!(!batches[0].1[0].is_intersecting);

        // Scroll 200: root 200..1100, 100% of 950..1050 visible
        let batches = registry.compute(&layout, 200.0, 1000.0);
        assert!(batches[0].1[0].is_intersecting);
    }

    #[test]
    fn unchanged_state_produces_no_entry() {
        let mut registry = ObserverRegistry::default();
        let layout = Layout::new();
        let target = dom::create_element("div", &[]);
        let id = ObserverId(7);
        registry.create(id, ObserverOptions::default());
        registry.observe(id, &target);
        assert_eq!(registry.compute(&layout, 0.0, 800.0).len(), 1);
        assert!(registry.compute(&layout, 0.0, 800.0).is_empty());
    }

    #[test]
    fn unobserved_targets_are_filtered() {
        let mut registry = ObserverRegistry::default();
        let target = dom::create_element("div", &[]);
        let id = ObserverId(3);
        registry.create(id, ObserverOptions::default());
        registry.observe(id, &target);
        registry.unobserve(id, &target);
        let entries = vec![IntersectionEntry {
            target,
            is_intersecting: true,
            ratio: 1.0,
        }];
        assert!(registry.retain_observed(id, entries).is_empty());
        assert_eq!(registry.observed_count(id), 0);
    }
}
