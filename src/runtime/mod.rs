//! In-process model of one loaded page.
//!
//! A [`Page`] owns the parsed document plus the browser state the site's
//! behaviors depend on: location, viewport, scroll offset, focus, a clock
//! with timeouts, an animation-frame queue, and intersection observers.
//!
//! # Execution model
//!
//! Single-threaded and run-to-completion. [`Page::dispatch`] hands an event
//! to every registered [`Behavior`] in registration order. Events a behavior
//! causes while handling (a programmatic scroll emits `Scroll`) are queued
//! and delivered after the current event finishes, before `dispatch`
//! returns.
//!
//! Nothing happens on its own: timeouts fire when the host calls
//! [`Page::advance`], animation frames on [`Page::run_frame`], and
//! intersection changes on [`Page::check_intersections`].

pub mod event;
pub mod layout;
pub mod observer;

pub use event::{
    DispatchOutcome, Event, FrameId, IntersectionEntry, ObserverId, ScrollBehavior, ScrollRequest,
    TimerId,
};
pub use layout::{Layout, Rect};
pub use observer::{ObserverOptions, RootMargin};

use crate::dom;
use kuchiki::NodeRef;
use observer::ObserverRegistry;
use std::collections::VecDeque;
use tracing::debug;
use url::Url;

/// A unit of page behavior bound once at load.
pub trait Behavior {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn handle(&mut self, page: &mut PageState, event: &Event);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Host-provided facts about where and how the page is displayed.
#[derive(Debug, Clone)]
pub struct Environment {
    pub location: Url,
    pub viewport: Viewport,
    /// Whether `<img loading="lazy">` is handled natively.
    pub native_lazy_loading: bool,
    pub layout: Layout,
}

impl Environment {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            viewport: Viewport::default(),
            native_lazy_loading: true,
            layout: Layout::new(),
        }
    }
}

#[derive(Debug)]
struct Timeout {
    id: TimerId,
    due: u64,
}

/// Mutable page state shared by all behaviors.
#[derive(Debug)]
pub struct PageState {
    document: NodeRef,
    location: Url,
    viewport: Viewport,
    scroll_y: f64,
    layout: Layout,
    native_lazy_loading: bool,
    now_ms: u64,
    next_handle: u64,
    timeouts: Vec<Timeout>,
    frames: Vec<FrameId>,
    observers: ObserverRegistry,
    focused: Option<NodeRef>,
    dialogs: Vec<String>,
    scroll_requests: Vec<ScrollRequest>,
    queued: VecDeque<Event>,
    default_prevented: bool,
}

impl PageState {
    fn new(document: NodeRef, env: Environment) -> Self {
        Self {
            document,
            location: env.location,
            viewport: env.viewport,
            scroll_y: 0.0,
            layout: env.layout,
            native_lazy_loading: env.native_lazy_loading,
            now_ms: 0,
            next_handle: 1,
            timeouts: Vec::new(),
            frames: Vec::new(),
            observers: ObserverRegistry::default(),
            focused: None,
            dialogs: Vec::new(),
            scroll_requests: Vec::new(),
            queued: VecDeque::new(),
            default_prevented: false,
        }
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn rect(&self, node: &NodeRef) -> Rect {
        self.layout.rect(node)
    }

    pub fn supports_native_lazy_loading(&self) -> bool {
        self.native_lazy_loading
    }

    /// Milliseconds since load.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    // ------------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------------

    pub fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        let id = TimerId(self.next_handle());
        self.timeouts.push(Timeout {
            id,
            due: self.now_ms + delay_ms,
        });
        id
    }

    pub fn clear_timeout(&mut self, id: TimerId) {
        self.timeouts.retain(|t| t.id != id);
    }

    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    pub fn request_animation_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_handle());
        self.frames.push(id);
        id
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    // ------------------------------------------------------------------------
    // Intersection observers
    // ------------------------------------------------------------------------

    pub fn create_observer(&mut self, options: ObserverOptions) -> ObserverId {
        let id = ObserverId(self.next_handle());
        self.observers.create(id, options);
        id
    }

    pub fn observe(&mut self, observer: ObserverId, target: &NodeRef) {
        self.observers.observe(observer, target);
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: &NodeRef) {
        self.observers.unobserve(observer, target);
    }

    pub fn is_observing(&self, observer: ObserverId, target: &NodeRef) -> bool {
        self.observers.is_observing(observer, target)
    }

    pub fn observed_count(&self, observer: ObserverId) -> usize {
        self.observers.observed_count(observer)
    }

    // ------------------------------------------------------------------------
    // Window effects
    // ------------------------------------------------------------------------

    /// Scroll the window. A `Scroll` event follows once the current event
    /// has been handled.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest { top, behavior });
        self.scroll_y = top.max(0.0);
        self.queued.push_back(Event::Scroll);
    }

    /// Programmatic scrolls issued so far, oldest first.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    pub fn focus(&mut self, node: &NodeRef) {
        self.focused = Some(node.clone());
    }

    pub fn focused(&self) -> Option<&NodeRef> {
        self.focused.as_ref()
    }

    /// Show a modal message (`alert`).
    pub fn alert(&mut self, message: &str) {
        self.dialogs.push(message.to_string());
    }

    /// Messages shown so far, oldest first.
    pub fn dialogs(&self) -> &[String] {
        &self.dialogs
    }

    /// Cancel the default action of the event being dispatched.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// A loaded page and the behaviors bound to it.
pub struct Page {
    state: PageState,
    behaviors: Vec<Box<dyn Behavior>>,
}

impl Page {
    pub fn new(document: NodeRef, env: Environment) -> Self {
        Self {
            state: PageState::new(document, env),
            behaviors: Vec::new(),
        }
    }

    pub fn document(&self) -> &NodeRef {
        self.state.document()
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PageState {
        &mut self.state
    }

    /// Bind a behavior. It receives every event dispatched from now on.
    pub fn register(&mut self, behavior: Box<dyn Behavior>) {
        debug!(behavior = behavior.name(), "behavior bound");
        self.behaviors.push(behavior);
    }

    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    fn deliver(&mut self, event: &Event) -> DispatchOutcome {
        self.state.default_prevented = false;
        for behavior in &mut self.behaviors {
            behavior.handle(&mut self.state, event);
        }
        DispatchOutcome {
            default_prevented: std::mem::take(&mut self.state.default_prevented),
        }
    }

    /// Deliver an event, then every event it caused.
    pub fn dispatch(&mut self, event: Event) -> DispatchOutcome {
        let outcome = self.deliver(&event);
        while let Some(follow_up) = self.state.queued.pop_front() {
            self.deliver(&follow_up);
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // User input
    // ------------------------------------------------------------------------

    pub fn click(&mut self, target: &NodeRef) -> DispatchOutcome {
        self.dispatch(Event::Click {
            target: target.clone(),
        })
    }

    pub fn key_down(&mut self, key: &str) -> DispatchOutcome {
        self.dispatch(Event::KeyDown {
            key: key.to_string(),
        })
    }

    /// User scroll to an absolute offset.
    pub fn scroll_to(&mut self, top: f64) {
        self.state.scroll_y = top.max(0.0);
        self.dispatch(Event::Scroll);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.state.viewport = Viewport { width, height };
        self.dispatch(Event::Resize);
    }

    /// Submit a form. When the default is not prevented the browser would
    /// navigate; here the outcome simply reports it.
    pub fn submit(&mut self, form: &NodeRef) -> DispatchOutcome {
        self.dispatch(Event::Submit { form: form.clone() })
    }

    pub fn focus(&mut self, target: &NodeRef) {
        self.state.focus(target);
    }

    /// Move focus away from `target`.
    pub fn blur(&mut self, target: &NodeRef) {
        if self.state.focused.as_ref() == Some(target) {
            self.state.focused = None;
        }
        self.dispatch(Event::Blur {
            target: target.clone(),
        });
    }

    /// Replace a control's value as typing would, then fire `input`.
    pub fn input(&mut self, target: &NodeRef, value: &str) {
        dom::set_control_value(target, value);
        self.dispatch(Event::Input {
            target: target.clone(),
        });
    }

    pub fn image_loaded(&mut self, image: &NodeRef) {
        self.dispatch(Event::Load {
            target: image.clone(),
        });
    }

    // ------------------------------------------------------------------------
    // Time and rendering
    // ------------------------------------------------------------------------

    /// Move the clock forward, firing due timeouts in order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.state.now_ms + ms;
        loop {
            let next = self
                .state
                .timeouts
                .iter()
                .filter(|t| t.due <= target)
                .min_by_key(|t| (t.due, t.id))
                .map(|t| (t.id, t.due));
            let Some((id, due)) = next else {
                break;
            };
            self.state.now_ms = due;
            self.state.clear_timeout(id);
            self.dispatch(Event::Timer(id));
        }
        self.state.now_ms = target;
    }

    /// Run one animation frame. Frames requested while it runs wait for the next.
    pub fn run_frame(&mut self) {
        let frames = std::mem::take(&mut self.state.frames);
        for frame in frames {
            self.dispatch(Event::AnimationFrame(frame));
        }
    }

    /// Compute intersection changes from layout and viewport and deliver them.
    pub fn check_intersections(&mut self) {
        let batches = self.state.observers.compute(
            &self.state.layout,
            self.state.scroll_y,
            self.state.viewport.height,
        );
        for (observer, entries) in batches {
            self.dispatch(Event::Intersection { observer, entries });
        }
    }

    /// Deliver host-reported intersection entries. Entries for targets the
    /// observer no longer watches are dropped.
    pub fn deliver_intersections(&mut self, observer: ObserverId, entries: Vec<IntersectionEntry>) {
        let entries = self.state.observers.retain_observed(observer, entries);
        if entries.is_empty() {
            return;
        }
        self.dispatch(Event::Intersection { observer, entries });
    }
}
