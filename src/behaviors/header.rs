//! Site header behavior: mobile menu, scrolled styling, active link.
//!
//! Bound by the component injector once the header markup is in place.

use crate::config::{BehaviorConfig, SiteConfig};
use crate::dom;
use crate::runtime::{Behavior, Event, FrameId, Page, PageState, TimerId};
use kuchiki::NodeRef;
use tracing::debug;

pub const MENU_BUTTON_ID: &str = "menuButton";
pub const HEADER_NAV_ID: &str = "headerNav";

const LABEL_OPEN: &str = "メニューを開く";
const LABEL_CLOSE: &str = "メニューを閉じる";

/// Bind all header behaviors.
pub fn init_header(page: &mut Page, site: &SiteConfig) {
    init_mobile_menu(page, &site.behavior);
    init_scroll_header(page, &site.behavior);
    highlight_active_page(page);
}

// ============================================================================
// Mobile menu
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

struct MobileMenu {
    button: NodeRef,
    nav: NodeRef,
    overlay: NodeRef,
    body: NodeRef,
    state: MenuState,
    breakpoint: f64,
    debounce_ms: u64,
    resize_timer: Option<TimerId>,
}

impl MobileMenu {
    fn open(&mut self) {
        dom::add_class(&self.nav, "is-open");
        dom::add_class(&self.button, "is-active");
        dom::add_class(&self.overlay, "is-visible");
        dom::set_attr(&self.button, "aria-expanded", "true");
        dom::set_attr(&self.button, "aria-label", LABEL_CLOSE);
        dom::set_style_property(&self.body, "overflow", "hidden");
        self.state = MenuState::Open;
    }

    fn close(&mut self) {
        dom::remove_class(&self.nav, "is-open");
        dom::remove_class(&self.button, "is-active");
        dom::remove_class(&self.overlay, "is-visible");
        dom::set_attr(&self.button, "aria-expanded", "false");
        dom::set_attr(&self.button, "aria-label", LABEL_OPEN);
        dom::remove_style_property(&self.body, "overflow");
        self.state = MenuState::Closed;
    }
}

impl Behavior for MobileMenu {
    fn name(&self) -> &'static str {
        "mobile-menu"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        match event {
            Event::Click { target } => {
                if dom::closest_of(target, std::slice::from_ref(&self.button)).is_some() {
                    match self.state {
                        MenuState::Open => self.close(),
                        MenuState::Closed => self.open(),
                    }
                } else if dom::closest_of(target, std::slice::from_ref(&self.overlay)).is_some() {
                    self.close();
                }
            }
            Event::KeyDown { key } if key == "Escape" && self.state == MenuState::Open => {
                self.close();
            }
            Event::Resize => {
                if let Some(pending) = self.resize_timer.take() {
                    page.clear_timeout(pending);
                }
                self.resize_timer = Some(page.set_timeout(self.debounce_ms));
            }
            Event::Timer(id) if Some(*id) == self.resize_timer => {
                self.resize_timer = None;
                if page.viewport().width > self.breakpoint {
                    self.close();
                }
            }
            _ => {}
        }
    }
}

/// Bind the hamburger menu. Needs `#menuButton` and `#headerNav`; appends
/// the click-to-close overlay to `<body>`.
pub fn init_mobile_menu(page: &mut Page, behavior: &BehaviorConfig) {
    let document = page.document().clone();
    let (Some(button), Some(nav), Some(body)) = (
        dom::element_by_id(&document, MENU_BUTTON_ID),
        dom::element_by_id(&document, HEADER_NAV_ID),
        dom::body(&document),
    ) else {
        debug!("menu button or nav missing, mobile menu not bound");
        return;
    };

    let overlay = dom::create_element("div", &[("class", "header__overlay")]);
    body.append(overlay.clone());

    page.register(Box::new(MobileMenu {
        button,
        nav,
        overlay,
        body,
        state: MenuState::Closed,
        breakpoint: f64::from(behavior.menu_breakpoint),
        debounce_ms: behavior.resize_debounce_ms,
        resize_timer: None,
    }));
}

// ============================================================================
// Scrolled header
// ============================================================================

struct ScrollHeader {
    header: NodeRef,
    threshold: f64,
    pending: Option<FrameId>,
}

impl Behavior for ScrollHeader {
    fn name(&self) -> &'static str {
        "scroll-header"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        match event {
            Event::Scroll if self.pending.is_none() => {
                self.pending = Some(page.request_animation_frame());
            }
            Event::AnimationFrame(id) if Some(*id) == self.pending => {
                self.pending = None;
                if page.scroll_y() > self.threshold {
                    dom::add_class(&self.header, "is-scrolled");
                } else {
                    dom::remove_class(&self.header, "is-scrolled");
                }
            }
            _ => {}
        }
    }
}

/// Toggle `is-scrolled` on `.header`, at most once per animation frame.
pub fn init_scroll_header(page: &mut Page, behavior: &BehaviorConfig) {
    let Some(header) = dom::select_first(page.document(), ".header") else {
        return;
    };
    page.register(Box::new(ScrollHeader {
        header,
        threshold: behavior.header_scroll_threshold,
        pending: None,
    }));
}

// ============================================================================
// Active link
// ============================================================================

/// Whether a link path points at the current page. `/` and `/index.html`
/// are the same page.
pub fn is_current_path(link_path: &str, current_path: &str) -> bool {
    link_path == current_path
        || (current_path == "/" && link_path == "/index.html")
        || (current_path == "/index.html" && link_path == "/")
}

/// Mark the header link of the current page with `is-active` and
/// `aria-current="page"`. Runs once.
pub fn highlight_active_page(page: &mut Page) {
    let location = page.state().location().clone();
    for link in dom::select_all(page.document(), ".header__nav-link") {
        let Some(href) = dom::attr(&link, "href") else {
            continue;
        };
        let Ok(resolved) = location.join(&href) else {
            continue;
        };
        if is_current_path(resolved.path(), location.path()) {
            dom::add_class(&link, "is-active");
            dom::set_attr(&link, "aria-current", "page");
        }
    }
}
