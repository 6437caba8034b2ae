//! Client-side validation for `.form` contact forms.
//!
//! Submission is always intercepted; there is no backend. A valid form shows
//! an acknowledgment and resets, an invalid one marks each failing field with
//! `is-error` and focuses the first of them.

use crate::dom;
use crate::runtime::{Behavior, Event, Page, PageState};
use kuchiki::NodeRef;
use regex::Regex;
use std::sync::LazyLock;

pub const ERROR_CLASS: &str = "is-error";

pub const MSG_REQUIRED: &str = "この項目は必須です";
pub const MSG_EMAIL: &str = "メールアドレスの形式が正しくありません";
pub const MSG_TEL: &str = "電話番号の形式が正しくありません";
pub const MSG_ACCEPTED: &str =
    "お問い合わせを受け付けました。\n（※このフォームは送信機能が実装されていません）";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static TEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\-]+$").expect("valid tel pattern"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Digits and hyphens only.
pub fn is_valid_tel(value: &str) -> bool {
    TEL_PATTERN.is_match(value)
}

/// The `.form__error` slot next to a field, if its container has one.
fn error_slot(field: &NodeRef) -> Option<NodeRef> {
    field
        .parent()
        .and_then(|container| dom::select_first(&container, ".form__error"))
}

fn mark_error(field: &NodeRef, message: &str) {
    dom::add_class(field, ERROR_CLASS);
    if let Some(slot) = error_slot(field) {
        dom::set_text(&slot, message);
    }
}

fn clear_error(field: &NodeRef) {
    dom::remove_class(field, ERROR_CLASS);
    if let Some(slot) = error_slot(field) {
        dom::set_text(&slot, "");
    }
}

fn is_blank(field: &NodeRef) -> bool {
    dom::control_value(field).trim().is_empty()
}

/// A control's state at load, restored on reset.
enum Initial {
    Value(String),
    Checked(bool),
    /// `selected` flag of each option, in document order.
    Selected(Vec<(NodeRef, bool)>),
}

fn is_checkable(control: &NodeRef) -> bool {
    dom::is_tag(control, "input")
        && matches!(dom::attr(control, "type").as_deref(), Some("checkbox" | "radio"))
}

impl Initial {
    fn capture(control: &NodeRef) -> Self {
        if dom::is_tag(control, "select") {
            let options = dom::select_all(control, "option")
                .into_iter()
                .map(|option| {
                    let selected = dom::has_attr(&option, "selected");
                    (option, selected)
                })
                .collect();
            Initial::Selected(options)
        } else if is_checkable(control) {
            Initial::Checked(dom::has_attr(control, "checked"))
        } else {
            Initial::Value(dom::control_value(control))
        }
    }

    fn restore(&self, control: &NodeRef) {
        match self {
            Initial::Value(value) => dom::set_control_value(control, value),
            Initial::Checked(checked) => toggle_attr(control, "checked", *checked),
            Initial::Selected(options) => {
                for (option, selected) in options {
                    toggle_attr(option, "selected", *selected);
                }
            }
        }
    }
}

fn toggle_attr(node: &NodeRef, name: &str, on: bool) {
    if on {
        dom::set_attr(node, name, "");
    } else {
        dom::remove_attr(node, name);
    }
}

struct BoundForm {
    form: NodeRef,
    controls: Vec<(NodeRef, Initial)>,
}

impl BoundForm {
    fn bind(form: NodeRef) -> Self {
        let controls = dom::select_all(&form, "input, textarea, select")
            .into_iter()
            .map(|control| {
                let initial = Initial::capture(&control);
                (control, initial)
            })
            .collect();
        Self { form, controls }
    }

    fn owns_control(&self, target: &NodeRef) -> bool {
        self.controls.iter().any(|(control, _)| control == target)
    }

    /// Run every check, updating field markers. Returns whether all passed.
    fn validate(&self) -> bool {
        let mut valid = true;

        for field in dom::select_all(&self.form, "[required]") {
            if is_blank(&field) {
                valid = false;
                mark_error(&field, MSG_REQUIRED);
            } else {
                clear_error(&field);
            }
        }

        for field in dom::select_all(&self.form, r#"input[type="email"]"#) {
            let value = dom::control_value(&field);
            if !value.is_empty() && !is_valid_email(&value) {
                valid = false;
                mark_error(&field, MSG_EMAIL);
            }
        }

        for field in dom::select_all(&self.form, r#"input[type="tel"]"#) {
            let value = dom::control_value(&field);
            if !value.is_empty() && !is_valid_tel(&value) {
                valid = false;
                mark_error(&field, MSG_TEL);
            }
        }

        valid
    }

    /// Restore text values, checked state and option selection from load.
    fn reset(&self) {
        for (control, initial) in &self.controls {
            initial.restore(control);
        }
    }

    fn submit(&self, page: &mut PageState) {
        page.prevent_default();
        if self.validate() {
            page.alert(MSG_ACCEPTED);
            self.reset();
        } else if let Some(first) = dom::select_first(&self.form, &format!(".{ERROR_CLASS}")) {
            page.focus(&first);
        }
    }
}

struct FormValidation {
    forms: Vec<BoundForm>,
}

impl Behavior for FormValidation {
    fn name(&self) -> &'static str {
        "form-validation"
    }

    fn handle(&mut self, page: &mut PageState, event: &Event) {
        match event {
            Event::Submit { form } => {
                if let Some(bound) = self.forms.iter().find(|b| &b.form == form) {
                    bound.submit(page);
                }
            }
            Event::Blur { target } if self.forms.iter().any(|b| b.owns_control(target)) => {
                if dom::has_attr(target, "required") && is_blank(target) {
                    mark_error(target, MSG_REQUIRED);
                } else {
                    clear_error(target);
                }
            }
            Event::Input { target } if self.forms.iter().any(|b| b.owns_control(target)) => {
                if dom::has_class(target, ERROR_CLASS) && !is_blank(target) {
                    clear_error(target);
                }
            }
            _ => {}
        }
    }
}

/// Bind validation to every `.form` on the page.
pub fn init_form_validation(page: &mut Page) {
    let forms: Vec<BoundForm> = dom::select_all(page.document(), ".form")
        .into_iter()
        .map(BoundForm::bind)
        .collect();
    if forms.is_empty() {
        return;
    }
    page.register(Box::new(FormValidation { forms }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Environment;
    use crate::test_helpers::{find, location, page_with_body};

    const CONTACT: &str = r#"
        <form class="form" id="contact">
          <div class="form__group">
            <input type="text" id="name" name="name" required>
            <p class="form__error" id="name-error"></p>
          </div>
          <div class="form__group">
            <input type="email" id="email" name="email" required>
            <p class="form__error" id="email-error"></p>
          </div>
          <div class="form__group">
            <input type="tel" id="tel" name="tel">
            <p class="form__error" id="tel-error"></p>
          </div>
          <div class="form__group">
            <textarea id="message" name="message" required></textarea>
            <p class="form__error" id="message-error"></p>
          </div>
          <input type="hidden" id="source" name="source" value="contact-page">
        </form>"#;

    fn contact_page() -> Page {
        let doc = page_with_body("", CONTACT);
        let mut page = Page::new(doc, Environment::new(location("contact.html")));
        init_form_validation(&mut page);
        page
    }

    fn fill(page: &mut Page, id: &str, value: &str) {
        let field = find(page.document(), &format!("#{id}"));
        page.input(&field, value);
    }

    fn error_text(page: &Page, id: &str) -> String {
        find(page.document(), &format!("#{id}-error")).text_contents()
    }

    fn has_error(page: &Page, id: &str) -> bool {
        dom::has_class(&find(page.document(), &format!("#{id}")), ERROR_CLASS)
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("hanako@example.jp"));
        assert!(!is_valid_email("hanako@example"));
        assert!(!is_valid_email("hana ko@example.jp"));
        assert!(!is_valid_email("@example.jp"));
        assert!(!is_valid_email("not-an-email"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn tel_pattern() {
        assert!(is_valid_tel("03-1234-5678"));
        assert!(is_valid_tel("0312345678"));
        assert!(!is_valid_tel("+81 3 1234"));
        assert!(!is_valid_tel(""));
        assert!(is_valid_tel("090-1234"));
        assert!(!is_valid_tel("090 1234"));
    }

    #[test]
    fn empty_submit_marks_required_fields() {
        let mut page = contact_page();
        let form = find(page.document(), "#contact");
        let outcome = page.submit(&form);

        assert!(outcome.default_prevented);
        assert!(page.state().dialogs().is_empty());
        for id in ["name", "email", "message"] {
            assert!(has_error(&page, id), "{id} should be marked");
            assert_eq!(error_text(&page, id), MSG_REQUIRED);
        }
        assert!(!has_error(&page, "tel"));
        assert_eq!(page.state().focused(), Some(&find(page.document(), "#name")));
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let mut page = contact_page();
        fill(&mut page, "name", "   ");
        page.submit(&find(page.document(), "#contact"));
        assert!(has_error(&page, "name"));
    }

    #[test]
    fn malformed_email_and_tel_are_reported() {
        let mut page = contact_page();
        fill(&mut page, "name", "山田花子");
        fill(&mut page, "email", "hanako-at-example");
        fill(&mut page, "tel", "03 1234 5678");
        fill(&mut page, "message", "体験レッスンについて");
        page.submit(&find(page.document(), "#contact"));

        assert!(!has_error(&page, "name"));
        assert_eq!(error_text(&page, "email"), MSG_EMAIL);
        assert_eq!(error_text(&page, "tel"), MSG_TEL);
        assert_eq!(page.state().focused(), Some(&find(page.document(), "#email")));
        assert!(page.state().dialogs().is_empty());
    }

    #[test]
    fn valid_submit_acknowledges_and_resets() {
        let mut page = contact_page();
        fill(&mut page, "name", "山田花子");
        fill(&mut page, "email", "hanako@example.jp");
        fill(&mut page, "tel", "03-1234-5678");
        fill(&mut page, "message", "よろしくお願いします");
        let outcome = page.submit(&find(page.document(), "#contact"));

        assert!(outcome.default_prevented);
        assert_eq!(page.state().dialogs(), &[MSG_ACCEPTED.to_string()]);
        assert_eq!(dom::control_value(&find(page.document(), "#name")), "");
        assert_eq!(dom::control_value(&find(page.document(), "#message")), "");
        assert_eq!(
            dom::control_value(&find(page.document(), "#source")),
            "contact-page"
        );
    }

    #[test]
    fn reset_restores_checked_and_selected_state() {
        let doc = page_with_body(
            "",
            r#"<form class="form" id="trial">
                <div class="form__group"><input type="text" id="who" required></div>
                <input type="checkbox" id="news" checked>
                <input type="radio" id="weekday" name="day">
                <select id="course">
                    <option id="basic" value="basic">基本</option>
                    <option id="formal" value="formal" selected>礼装</option>
                </select>
            </form>"#,
        );
        let mut page = Page::new(doc, Environment::new(location("trial.html")));
        init_form_validation(&mut page);

        dom::remove_attr(&find(page.document(), "#news"), "checked");
        dom::set_attr(&find(page.document(), "#weekday"), "checked", "");
        dom::remove_attr(&find(page.document(), "#formal"), "selected");
        dom::set_attr(&find(page.document(), "#basic"), "selected", "");
        fill(&mut page, "who", "山田花子");
        page.submit(&find(page.document(), "#trial"));

        assert_eq!(page.state().dialogs().len(), 1);
        assert!(dom::has_attr(&find(page.document(), "#news"), "checked"));
        assert!(!dom::has_attr(&find(page.document(), "#weekday"), "checked"));
        assert!(dom::has_attr(&find(page.document(), "#formal"), "selected"));
        assert!(!dom::has_attr(&find(page.document(), "#basic"), "selected"));
        assert_eq!(dom::control_value(&find(page.document(), "#who")), "");
    }

    #[test]
    fn blur_marks_blank_required_field() {
        let mut page = contact_page();
        let name = find(page.document(), "#name");
        page.focus(&name);
        page.blur(&name);
        assert!(has_error(&page, "name"));
        assert_eq!(error_text(&page, "name"), MSG_REQUIRED);
        assert!(page.state().focused().is_none());
    }

    #[test]
    fn blur_on_optional_field_clears() {
        let mut page = contact_page();
        let tel = find(page.document(), "#tel");
        dom::add_class(&tel, ERROR_CLASS);
        page.blur(&tel);
        assert!(!has_error(&page, "tel"));
    }

    #[test]
    fn typing_clears_marker() {
        let mut page = contact_page();
        page.submit(&find(page.document(), "#contact"));
        assert!(has_error(&page, "message"));

        fill(&mut page, "message", " ");
        assert!(has_error(&page, "message"), "blank input keeps the marker");

        fill(&mut page, "message", "こんにちは");
        assert!(!has_error(&page, "message"));
        assert_eq!(error_text(&page, "message"), "");
    }

    #[test]
    fn events_outside_forms_are_ignored() {
        let doc = page_with_body(
            "",
            &format!(r#"{CONTACT}<input id="search" required>"#),
        );
        let mut page = Page::new(doc, Environment::new(location("contact.html")));
        init_form_validation(&mut page);
        let search = find(page.document(), "#search");
        page.blur(&search);
        assert!(!dom::has_class(&search, ERROR_CLASS));
    }
}
