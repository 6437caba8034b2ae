//! Shared test utilities for the miyabiyaka test suite.
//!
//! Provides page builders, selector lookups and fixture setup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = page_with_body(r#"data-page-title="料金表""#, r#"<div id="header"></div>"#);
//! let mut page = Page::new(doc, Environment::new(location("price.html")));
//!
//! let button = find(page.document(), "#menuButton");
//! assert_eq!(count(page.document(), ".header__nav-link"), 8);
//! ```

use kuchiki::NodeRef;
use std::path::Path;
use tempfile::TempDir;
use url::Url;

use crate::dom;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Page builders
// =========================================================================

/// A minimal document whose `<html>` carries `attrs`.
pub fn page_with_root_attrs(attrs: &str) -> NodeRef {
    page_with_body(attrs, "")
}

/// A document with `attrs` on `<html>` and `body` as body content.
pub fn page_with_body(attrs: &str, body: &str) -> NodeRef {
    dom::parse_document(&format!(
        "<!DOCTYPE html><html lang=\"ja\" {attrs}><head><meta charset=\"UTF-8\"></head><body>{body}</body></html>"
    ))
}

/// Page URL under the default origin and base path.
pub fn location(path: &str) -> Url {
    Url::parse(&format!("https://example.com/miyabiyaka/{path}")).unwrap()
}

// =========================================================================
// Lookups
// =========================================================================

/// Find the first match for `selector`. Panics if nothing matches.
pub fn find(node: &NodeRef, selector: &str) -> NodeRef {
    dom::select_first(node, selector)
        .unwrap_or_else(|| panic!("no element matches '{selector}'"))
}

/// Number of elements matching `selector`.
pub fn count(node: &NodeRef, selector: &str) -> usize {
    dom::select_all(node, selector).len()
}
