use std::collections::BTreeSet;

use scraper::{Html, Selector};
use url::Url;

/// Collect the distinct same-origin link targets present on a rendered page.
///
/// Every anchor href is resolved against `base_url` first, so relative links
/// count as same-origin. Authority comparison is host + port only; scheme is
/// deliberately ignored, so an https page collects http links to the same
/// host.
pub fn collect_links(html: &str, base_url: &Url) -> BTreeSet<String> {
    let doc = Html::parse_document(html);
    let mut links = BTreeSet::new();

    let Ok(sel) = Selector::parse("a[href]") else {
        return links;
    };

    for el in doc.select(&sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        if same_authority(&resolved, base_url) {
            links.insert(resolved.to_string());
        }
    }

    links
}

fn same_authority(a: &Url, b: &Url) -> bool {
    a.host_str().is_some() && a.host_str() == b.host_str() && a.port() == b.port()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://ex.com/").unwrap()
    }

    #[test]
    fn duplicate_anchors_collapse_and_foreign_hosts_excluded() {
        let html = r#"
            <a href="https://ex.com/a">a</a>
            <a href="https://ex.com/a">a again</a>
            <a href="https://other.com/b">b</a>
        "#;
        let links = collect_links(html, &base());
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://ex.com/a"));
    }

    #[test]
    fn relative_hrefs_resolve_to_same_origin() {
        let html = r#"<a href="/about">about</a><a href="contact.html">contact</a>"#;
        let links = collect_links(html, &base());
        assert!(links.contains("https://ex.com/about"));
        assert!(links.contains("https://ex.com/contact.html"));
    }

    #[test]
    fn scheme_is_ignored_in_authority_comparison() {
        let html = r#"<a href="http://ex.com/plain">p</a>"#;
        let links = collect_links(html, &base());
        assert!(links.contains("http://ex.com/plain"));
    }

    #[test]
    fn explicit_port_makes_a_different_authority() {
        let html = r#"<a href="https://ex.com:8443/x">x</a>"#;
        let links = collect_links(html, &base());
        assert!(links.is_empty());
    }

    #[test]
    fn anchors_without_usable_targets_are_skipped() {
        let html = r#"
            <a>no href</a>
            <a href="mailto:hi@ex.com">mail</a>
            <a href="javascript:void(0)">js</a>
        "#;
        let links = collect_links(html, &base());
        assert!(links.is_empty());
    }
}
