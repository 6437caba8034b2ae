//! Events delivered to page behaviors.

use kuchiki::NodeRef;

/// Handle of a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// Handle of a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId(pub(crate) u64);

/// Handle of an intersection observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(pub(crate) u64);

/// A change in one observed element's visibility.
#[derive(Debug, Clone)]
pub struct IntersectionEntry {
    pub target: NodeRef,
    pub is_intersecting: bool,
    /// Visible fraction of the target's height, `0.0..=1.0`.
    pub ratio: f64,
}

/// Everything a behavior can react to.
///
/// DOM events carry their target; scheduling events carry the handle the
/// behavior received when it scheduled them.
#[derive(Debug, Clone)]
pub enum Event {
    Click { target: NodeRef },
    KeyDown { key: String },
    /// The window scroll offset changed.
    Scroll,
    /// The viewport size changed.
    Resize,
    Submit { form: NodeRef },
    Blur { target: NodeRef },
    Input { target: NodeRef },
    /// An image finished loading.
    Load { target: NodeRef },
    Timer(TimerId),
    AnimationFrame(FrameId),
    Intersection {
        observer: ObserverId,
        entries: Vec<IntersectionEntry>,
    },
}

/// How a programmatic scroll should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A programmatic scroll issued by a behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// What happened to the default action of a dispatched event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
}
