//! Interactive page behaviors.
//!
//! Each `init_*` function inspects the page once, binds at most one
//! [`Behavior`](crate::runtime::Behavior) and does nothing when its markup is
//! absent. They are independent of each other; the only thing they share is
//! the document.
//!
//! | Module | Markup | Behavior |
//! |--------|--------|----------|
//! | [`header`] | `#menuButton`, `#headerNav`, `.header` | mobile menu, scrolled header, active link |
//! | [`fade_in`] | `.fade-in` | `is-visible` on first appearance |
//! | [`smooth_scroll`] | `a[href^="#"]` | offset smooth scrolling |
//! | [`accordion`] | `.accordion__header` | open/close items |
//! | [`form`] | `.form` | client-side validation |
//! | [`lazy_load`] | `img[loading="lazy"]` | `loaded` marker, `data-src` swap |
//! | [`scroll_top`] | (appended) | back-to-top button |

pub mod accordion;
pub mod fade_in;
pub mod form;
pub mod header;
pub mod lazy_load;
pub mod scroll_top;
pub mod smooth_scroll;

use crate::config::SiteConfig;
use crate::runtime::Page;

/// Bind the page-level behaviors, in load order. The header is bound
/// separately by the component injector.
pub fn init_page_interactions(page: &mut Page, site: &SiteConfig) {
    fade_in::init_fade_in(page, &site.behavior);
    smooth_scroll::init_smooth_scroll(page, &site.behavior);
    accordion::init_accordion(page);
    form::init_form_validation(page);
    lazy_load::init_lazy_load(page);
    scroll_top::init_scroll_to_top(page, &site.behavior);
}
