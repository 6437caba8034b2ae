//! `img[loading="lazy"]` handling.
//!
//! With native lazy loading the browser fetches the image and the behavior
//! only adds `loaded` when it arrives. Without it, images are watched by an
//! intersection observer and their `data-src` is swapped in on first sight.

use crate::dom;
use crate::runtime::{Behavior, Event, ObserverId, ObserverOptions, Page, PageState};
use kuchiki::NodeRef;

pub const LOADED_CLASS: &str = "loaded";

enum Mode {
    Native,
    Observed(ObserverId),
}

struct LazyImages {
    images: Vec<NodeRef>,
    mode: Mode,
}

impl Behavior for LazyImages {
    fn name(&self) -> &'static str {
        "lazy-images"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        match (&self.mode, event) {
            (Mode::Native, Event::Load { target }) if self.images.contains(target) => {
                dom::add_class(target, LOADED_CLASS);
            }
            (Mode::Observed(id), Event::Intersection { observer, entries }) if observer == id => {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    let image = &entry.target;
                    if let Some(src) =
                        dom::non_empty_attr(image, "data-src").or_else(|| dom::attr(image, "src"))
                    {
                        dom::set_attr(image, "src", &src);
                    }
                    dom::add_class(image, LOADED_CLASS);
                    page.unobserve(*id, image);
                }
            }
            _ => {}
        }
    }
}

/// Bind lazy images, natively or through an observer depending on the
/// environment.
pub fn init_lazy_load(page: &mut Page) {
    let images = dom::select_all(page.document(), r#"img[loading="lazy"]"#);
    if images.is_empty() {
        return;
    }

    let mode = if page.state().supports_native_lazy_loading() {
        Mode::Native
    } else {
        let observer = page.state_mut().create_observer(ObserverOptions::default());
        for image in &images {
            page.state_mut().observe(observer, image);
        }
        Mode::Observed(observer)
    };
    page.register(Box::new(LazyImages { images, mode }));
}
