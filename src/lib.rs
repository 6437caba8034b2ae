//! # miyabiyaka
//!
//! Page templating and interactive behavior for the miyabiyaka kimono-dressing
//! school site. Pages are plain HTML that declare their metadata as `data-*`
//! attributes on `<html>` and leave empty mount points for shared blocks.
//!
//! # Architecture: Two Surfaces
//!
//! ```text
//! 1. Build    site/*.html  →  dist/*.html   (head tags, header, footer, blocks)
//! 2. Load     one page     →  Page          (event-driven behaviors)
//! ```
//!
//! The **build** ([`site`]) is what the CLI runs: the template and the
//! component injector are applied to every page ahead of time, in parallel.
//!
//! The **page runtime** ([`runtime`], [`behaviors`], [`boot`]) models what
//! happens after a browser loads a page: the same template and injection,
//! then behaviors bound to the document that react to clicks, scrolling,
//! resizing, form input and visibility changes. It runs in-process against
//! a host-supplied layout and clock, so every behavior is testable without a
//! browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging, stock defaults |
//! | [`types`] | JSON payloads of the `data-*` attributes (`BreadcrumbEntry`, `PageHeader`) |
//! | [`dom`] | Thin helpers over kuchiki: lookup, attributes, classes, inline style |
//! | [`page`] | Per-page configuration read from the root element |
//! | [`head`] | Idempotent `<meta>`/`<link>` synthesis |
//! | [`render`] | Maud markup for breadcrumb, page header, site header and footer |
//! | [`template`] | Orchestrates head synthesis and the body render steps |
//! | [`components`] | Header/footer injection and the noindex directive |
//! | [`runtime`] | Page state, event dispatch, timers, frames, intersection observers |
//! | [`behaviors`] | Header, fade-in, smooth scroll, accordion, form, lazy images, scroll-to-top |
//! | [`boot`] | Full page load in browser order |
//! | [`site`] | Directory build and check |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud for Shared Markup
//!
//! Shared blocks are rendered with [Maud](https://maud.lambda.xyz/), so all
//! text coming from page attributes or configuration is escaped. A page
//! title containing `<script>` shows up as text, never as markup.
//!
//! ## Render Steps Fail Alone
//!
//! A page with malformed `data-breadcrumb` JSON still gets its head tags,
//! page header, header and footer. The failure is reported in the
//! [`template::TemplateReport`] and logged; it never aborts the page or the
//! build.
//!
//! ## Explicit Wiring
//!
//! The noindex directive is driven by `under_construction` in the config,
//! and the header behavior is handed to the injector as a callback. Nothing
//! is discovered through globals.

pub mod behaviors;
pub mod boot;
pub mod components;
pub mod config;
pub mod dom;
pub mod head;
pub mod output;
pub mod page;
pub mod render;
pub mod runtime;
pub mod site;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
