//! HTML fragments injected into page placeholders.
//!
//! Uses [maud](https://maud.lambda.xyz/) like the rest of the crate's markup.
//! All interpolated values are escaped, including the names and titles that
//! come from page `data-*` JSON.
//!
//! | Fragment | Placeholder |
//! |----------|-------------|
//! | [`breadcrumb`] | `#breadcrumb` |
//! | [`page_header`] | `#page-header` |
//! | [`site_header`] | `#header` |
//! | [`site_footer`] | `#footer` |
//! | [`scroll_top_button`] | appended to `<body>` at runtime |

use crate::config::{NavLink, SiteConfig};
use crate::types::{BreadcrumbEntry, PageHeader};
use maud::{Markup, html};

/// Renders the breadcrumb trail. The last entry is the current page and is
/// not a link.
pub fn breadcrumb(entries: &[BreadcrumbEntry]) -> Markup {
    html! {
        nav.breadcrumb aria-label="パンくずリスト" {
            div.container {
                ol.breadcrumb__list {
                    @for (index, entry) in entries.iter().enumerate() {
                        li.breadcrumb__item {
                            @if index + 1 == entries.len() {
                                span.breadcrumb__current { (entry.name) }
                            } @else {
                                a.breadcrumb__link href=[entry.url.as_deref()] { (entry.name) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the title block of an inner page.
pub fn page_header(header: &PageHeader) -> Markup {
    let background = header
        .bg_image
        .as_deref()
        .map(|url| format!("background-image: url('{}');", css_url(url)));

    html! {
        div.page-header style=[background] {
            div.page-header__content {
                h1.page-header__title { (header.title) }
                p.page-header__subtitle { (header.subtitle) }
            }
        }
    }
}

/// Percent-encodes the characters that could close a quoted CSS `url()`
/// or start another declaration.
fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' | '"' | '\\' | '(' | ')' | ';' | '<' | '>' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_whitespace() || c.is_control() => {
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

fn header_nav_item(site: &SiteConfig, link: &NavLink) -> Markup {
    let href = site.link(&link.href);
    html! {
        @if link.cta {
            li class="header__nav-item header__nav-item--cta" {
                a class="header__nav-link header__nav-link--cta" href=(href) { (link.label) }
            }
        } @else {
            li.header__nav-item {
                a.header__nav-link href=(href) { (link.label) }
            }
        }
    }
}

/// Renders the site header: logo, mobile menu button, global navigation.
///
/// The `menuButton` and `headerNav` ids are the hooks of the header behavior.
pub fn site_header(site: &SiteConfig) -> Markup {
    html! {
        header.header {
            div.header__container {
                div.header__logo {
                    a.header__logo-link href=(site.link("index.html")) {
                        h1.header__logo-text {
                            span.header__logo-main { (site.brand.logo_main) }
                            span.header__logo-sub { (site.brand.logo_sub) }
                        }
                    }
                }
                button.header__menu-button #menuButton aria-label="メニューを開く" aria-expanded="false" {
                    span.header__menu-icon {}
                    span.header__menu-icon {}
                    span.header__menu-icon {}
                }
                nav.header__nav #headerNav {
                    ul.header__nav-list {
                        @for link in &site.navigation {
                            (header_nav_item(site, link))
                        }
                    }
                }
            }
        }
    }
}

/// Renders the site footer: brand block, grouped links, copyright.
pub fn site_footer(site: &SiteConfig) -> Markup {
    let brand = &site.brand;
    html! {
        footer.footer {
            div.footer__container {
                div.footer__content {
                    div.footer__info {
                        div.footer__logo {
                            h2.footer__logo-text {
                                span.footer__logo-main { (brand.logo_main) }
                                span.footer__logo-sub { (brand.logo_sub) }
                            }
                        }
                        p.footer__description {
                            @for (index, line) in brand.description.iter().enumerate() {
                                @if index > 0 { br; }
                                (line)
                            }
                        }
                    }
                    nav.footer__nav {
                        @for group in &site.footer_groups {
                            div.footer__nav-group {
                                h3.footer__nav-title { (group.title) }
                                ul.footer__nav-list {
                                    @for link in &group.links {
                                        li.footer__nav-item {
                                            a.footer__nav-link href=(site.link(&link.href)) { (link.label) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                div.footer__copyright {
                    p.footer__copyright-text { (brand.copyright) }
                }
            }
        }
    }
}

/// The floating "back to top" control.
pub fn scroll_top_button() -> Markup {
    html! {
        button.scroll-top type="button" aria-label="ページトップへ戻る" { "↑" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, url: Option<&str>) -> BreadcrumbEntry {
        BreadcrumbEntry {
            name: name.to_string(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn breadcrumb_links_all_but_last() {
        let entries = vec![
            entry("ホーム", Some("/miyabiyaka/")),
            entry("ブログ", Some("/miyabiyaka/blog/index.html")),
            entry("記事", None),
        ];
        let html = breadcrumb(&entries).into_string();
        assert_eq!(html.matches("breadcrumb__item").count(), 3);
        assert_eq!(html.matches("breadcrumb__link").count(), 2);
        assert_eq!(html.matches("breadcrumb__current").count(), 1);
        // Order preserved
        let home = html.find("ホーム").unwrap();
        let blog = html.find("ブログ").unwrap();
        let post = html.find("記事").unwrap();
        assert!(home < blog && blog < post);
        assert!(html.contains(r#"<span class="breadcrumb__current">記事</span>"#));
    }

    #[test]
    fn breadcrumb_last_entry_is_not_linked_even_with_url() {
        let html = breadcrumb(&[entry("FAQ", Some("/miyabiyaka/faq.html"))]).into_string();
        assert!(!html.contains("href"));
        assert!(html.contains("breadcrumb__current"));
    }

    #[test]
    fn breadcrumb_link_without_url_has_no_href() {
        let html = breadcrumb(&[entry("A", None), entry("B", None)]).into_string();
        assert!(html.contains(r#"<a class="breadcrumb__link">A</a>"#));
    }

    #[test]
    fn breadcrumb_escapes_names() {
        let html = breadcrumb(&[entry("<script>x</script>", None)]).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_breadcrumb_renders_empty_list() {
        let html = breadcrumb(&[]).into_string();
        assert!(html.contains("breadcrumb__list"));
        assert!(!html.contains("breadcrumb__item"));
    }

    #[test]
    fn page_header_background_only_when_present() {
        let mut header = PageHeader {
            title: "料金表".to_string(),
            subtitle: "Price".to_string(),
            bg_image: None,
        };
        assert!(!page_header(&header).into_string().contains("style="));

        header.bg_image = Some("/miyabiyaka/images/price.jpg".to_string());
        let html = page_header(&header).into_string();
        assert!(html.contains("background-image: url('/miyabiyaka/images/price.jpg');"));
        assert!(html.contains(r#"<h1 class="page-header__title">料金表</h1>"#));
        assert!(html.contains(r#"<p class="page-header__subtitle">Price</p>"#));
    }

    #[test]
    fn page_header_background_cannot_escape_url() {
        let header = PageHeader {
            title: "料金表".to_string(),
            subtitle: "Price".to_string(),
            bg_image: Some("x'); background-color: red; --a: url('y".to_string()),
        };
        let doc = crate::dom::parse_document(&page_header(&header).into_string());
        let block = crate::dom::select_first(&doc, ".page-header").unwrap();
        assert_eq!(crate::dom::style_property(&block, "background-color"), None);
        assert_eq!(
            crate::dom::style_property(&block, "background-image").as_deref(),
            Some("url('x%27%29%3B%20background-color:%20red%3B%20--a:%20url%28%27y')")
        );
    }

    #[test]
    fn page_header_keeps_ordinary_image_paths() {
        assert_eq!(css_url("/miyabiyaka/images/price.jpg"), "/miyabiyaka/images/price.jpg");
        assert_eq!(css_url("/images/a b.jpg"), "/images/a%20b.jpg");
    }

    #[test]
    fn site_header_has_menu_hooks() {
        let html = site_header(&SiteConfig::default()).into_string();
        assert!(html.contains(r#"id="menuButton""#));
        assert!(html.contains(r#"id="headerNav""#));
        assert!(html.contains(r#"aria-expanded="false""#));
        assert_eq!(html.matches("header__menu-icon").count(), 3);
    }

    #[test]
    fn site_header_links_use_base_path() {
        let html = site_header(&SiteConfig::default()).into_string();
        assert!(html.contains(r#"href="/miyabiyaka/about.html""#));
        assert!(html.contains(r#"href="/miyabiyaka/index.html""#));
        assert!(html.contains("header__nav-link--cta"));
    }

    #[test]
    fn site_footer_renders_groups_and_copyright() {
        let site = SiteConfig::default();
        let html = site_footer(&site).into_string();
        assert_eq!(html.matches("footer__nav-group").count(), 3);
        assert!(html.contains("プライバシーポリシー"));
        assert!(html.contains("All Rights Reserved."));
        assert!(html.contains("<br>"));
    }
}
