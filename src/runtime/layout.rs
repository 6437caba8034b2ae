//! Element geometry supplied by the host.
//!
//! There is no layout engine; whoever drives the page (a test, a headless
//! harness) places the elements whose geometry matters. Unplaced elements
//! have a zero-sized box at the top of the document.

use kuchiki::NodeRef;

/// Vertical box of an element in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Distance from the top of the document.
    pub top: f64,
    /// Rendered height (`offsetHeight`).
    pub height: f64,
    /// Full content height, including overflow (`scrollHeight`).
    pub scroll_height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height,
            scroll_height: height,
        }
    }

    pub fn with_scroll_height(self, scroll_height: f64) -> Self {
        Self {
            scroll_height,
            ..self
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    boxes: Vec<(NodeRef, Rect)>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the box of `node`, replacing any previous one.
    pub fn place(&mut self, node: &NodeRef, rect: Rect) {
        match self.boxes.iter_mut().find(|(n, _)| n == node) {
            Some(entry) => entry.1 = rect,
            None => self.boxes.push((node.clone(), rect)),
        }
    }

    pub fn rect(&self, node: &NodeRef) -> Rect {
        self.boxes
            .iter()
            .find(|(n, _)| n == node)
            .map(|(_, rect)| *rect)
            .unwrap_or_default()
    }
}
