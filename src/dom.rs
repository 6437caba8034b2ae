//! Thin helpers over the kuchiki DOM.
//!
//! Everything that mutates a document goes through these functions: element
//! creation, attribute and class-list edits, inline style properties, and
//! inner-HTML replacement. They mirror the handful of browser DOM operations
//! the site scripts rely on (`classList`, `style`, `innerHTML`, `value`).

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::TendrilSink;
use kuchiki::{Attribute, ExpandedName, NodeRef};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse a complete HTML document.
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// Create a detached HTML element with the given attributes.
pub fn create_element(tag: &str, attrs: &[(&str, &str)]) -> NodeRef {
    NodeRef::new_element(
        QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs.iter().map(|(name, value)| {
            (
                ExpandedName::new(Namespace::from(""), LocalName::from(*name)),
                Attribute {
                    prefix: None,
                    value: (*value).to_string(),
                },
            )
        }),
    )
}

pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element()
        .is_some_and(|el| el.name.local.as_ref().eq_ignore_ascii_case(tag))
}

// ============================================================================
// Lookup
// ============================================================================

/// All elements under `node` (inclusive) matching a CSS selector, in document order.
///
/// An invalid selector matches nothing.
pub fn select_all(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(matches) => matches.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    }
}

/// First element under `node` (inclusive) matching a CSS selector.
pub fn select_first(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    node.select_first(selector)
        .ok()
        .map(|el| el.as_node().clone())
}

/// Element with the given `id`, compared literally (no selector escaping).
pub fn element_by_id(document: &NodeRef, id: &str) -> Option<NodeRef> {
    document
        .descendants()
        .find(|node| attr(node, "id").as_deref() == Some(id))
}

/// The root `<html>` element.
pub fn root_element(document: &NodeRef) -> Option<NodeRef> {
    select_first(document, "html")
}

pub fn head(document: &NodeRef) -> Option<NodeRef> {
    select_first(document, "head")
}

pub fn body(document: &NodeRef) -> Option<NodeRef> {
    select_first(document, "body")
}

/// Nearest inclusive ancestor that is one of `candidates`.
pub fn closest_of(node: &NodeRef, candidates: &[NodeRef]) -> Option<NodeRef> {
    node.inclusive_ancestors()
        .find(|ancestor| candidates.contains(ancestor))
}

// ============================================================================
// Attributes and classes
// ============================================================================

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let el = node.as_element()?;
    let attrs = el.attributes.borrow();
    attrs.get(name).map(str::to_string)
}

/// Attribute value, treating an empty value the same as a missing one.
pub fn non_empty_attr(node: &NodeRef, name: &str) -> Option<String> {
    attr(node, name).filter(|value| !value.is_empty())
}

pub fn has_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .is_some_and(|el| el.attributes.borrow().contains(name))
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().remove(name);
    }
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

pub fn add_class(node: &NodeRef, class: &str) {
    let current = attr(node, "class").unwrap_or_default();
    if current.split_whitespace().any(|c| c == class) {
        return;
    }
    let updated = if current.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {class}", current.trim())
    };
    set_attr(node, "class", &updated);
}

pub fn remove_class(node: &NodeRef, class: &str) {
    let Some(current) = attr(node, "class") else {
        return;
    };
    let remaining: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    set_attr(node, "class", &remaining.join(" "));
}

// ============================================================================
// Inline style
// ============================================================================

fn style_declarations(node: &NodeRef) -> Vec<(String, String)> {
    attr(node, "style")
        .unwrap_or_default()
        .split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim();
            (!property.is_empty()).then(|| (property.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn write_style(node: &NodeRef, declarations: &[(String, String)]) {
    if declarations.is_empty() {
        remove_attr(node, "style");
        return;
    }
    let style = declarations
        .iter()
        .map(|(property, value)| format!("{property}: {value};"))
        .collect::<Vec<_>>()
        .join(" ");
    set_attr(node, "style", &style);
}

/// Value of one inline style property (e.g. `overflow`).
pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    style_declarations(node)
        .into_iter()
        .find(|(p, _)| p == property)
        .map(|(_, v)| v)
}

pub fn set_style_property(node: &NodeRef, property: &str, value: &str) {
    let mut declarations = style_declarations(node);
    match declarations.iter_mut().find(|(p, _)| p == property) {
        Some(existing) => existing.1 = value.to_string(),
        None => declarations.push((property.to_string(), value.to_string())),
    }
    write_style(node, &declarations);
}

/// Remove an inline style property, dropping the `style` attribute when it empties.
pub fn remove_style_property(node: &NodeRef, property: &str) {
    let mut declarations = style_declarations(node);
    declarations.retain(|(p, _)| p != property);
    write_style(node, &declarations);
}

// ============================================================================
// Content
// ============================================================================

fn clear_children(node: &NodeRef) {
    while let Some(child) = node.first_child() {
        child.detach();
    }
}

/// Replace the children of `node` with text.
pub fn set_text(node: &NodeRef, text: &str) {
    clear_children(node);
    if !text.is_empty() {
        node.append(NodeRef::new_text(text));
    }
}

/// Parse body-level markup into detached nodes, in order.
pub fn parse_fragment(markup: &str) -> Vec<NodeRef> {
    let fragment = parse_document(&format!(
        "<!DOCTYPE html><html><head></head><body>{markup}</body></html>"
    ));
    let Some(body) = body(&fragment) else {
        return Vec::new();
    };
    let nodes: Vec<NodeRef> = body.children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// Replace the children of `node` with parsed markup, like assigning `innerHTML`.
///
/// The markup is parsed as body content, so it should be flow content
/// (`nav`, `div`, `header`, ...).
pub fn set_inner_html(node: &NodeRef, markup: &str) {
    clear_children(node);
    for child in parse_fragment(markup) {
        node.append(child);
    }
}

/// Serialized markup of the children of `node`, like reading `innerHTML`.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Current value of a form control.
///
/// `<textarea>` values are its text; everything else uses the `value` attribute.
pub fn control_value(node: &NodeRef) -> String {
    if is_tag(node, "textarea") {
        node.text_contents()
    } else {
        attr(node, "value").unwrap_or_default()
    }
}

pub fn set_control_value(node: &NodeRef, value: &str) {
    if is_tag(node, "textarea") {
        set_text(node, value);
    } else {
        set_attr(node, "value", value);
    }
}

/// Serialize a whole document, doctype included.
pub fn serialize_document(document: &NodeRef) -> String {
    document.to_string()
}
