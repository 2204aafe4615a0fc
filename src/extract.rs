use scraper::{ElementRef, Html, Node, Selector};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// Subtrees a browser never renders as text.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start on their own line when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Ordered section-name → CSS selector table, supplied as configuration and
/// passed by value to extraction.
#[derive(Debug, Clone)]
pub struct SelectorMap(Vec<(String, String)>);

impl SelectorMap {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, s)| (n.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for SelectorMap {
    /// The fixed profile-page table.
    fn default() -> Self {
        Self::new(vec![
            ("about_me".into(), "p".into()),
            ("education".into(), "ul".into()),
            ("work_experience".into(), "div".into()),
            ("skills".into(), "ul".into()),
        ])
    }
}

/// Extracted text for one visited page. Sections keep selector-map order and
/// serialize flat alongside `source_link`.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub source_link: String,
    pub sections: Vec<(String, Vec<String>)>,
}

impl Serialize for PageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len() + 1))?;
        map.serialize_entry("source_link", &self.source_link)?;
        for (name, texts) in &self.sections {
            map.serialize_entry(name, texts)?;
        }
        map.end()
    }
}

/// Run every selector in `selectors` against a rendered page.
///
/// A selector that fails to parse degrades to an empty section rather than
/// failing the page; `source_link` is always set.
pub fn extract(html: &str, url: &str, selectors: &SelectorMap) -> PageRecord {
    let doc = Html::parse_document(html);
    let mut sections = Vec::with_capacity(selectors.len());

    for (name, raw) in selectors.iter() {
        let texts = match Selector::parse(raw) {
            Ok(sel) => doc.select(&sel).map(visible_text).collect(),
            Err(e) => {
                debug!("selector {raw:?} for section {name:?} rejected: {e}");
                Vec::new()
            }
        };
        sections.push((name.to_string(), texts));
    }

    PageRecord {
        source_link: url.to_string(),
        sections,
    }
}

/// Text of an element as a user would see it: script/style subtrees skipped,
/// block boundaries becoming line breaks, result trimmed.
fn visible_text(el: ElementRef) -> String {
    if SKIP_TAGS.contains(&el.value().name()) {
        return String::new();
    }
    let mut out = String::new();
    collect_visible(el, &mut out);
    out.trim().to_string()
}

fn collect_visible(el: ElementRef, out: &mut String) {
    for child in el.children() {
        if let Node::Text(text) = child.value() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIP_TAGS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block && !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            collect_visible(child_el, out);
            if block && !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_collected_in_document_order() {
        let html = "<p>first</p><div><p>second</p></div><p>third</p>";
        let map = SelectorMap::new(vec![("about_me".into(), "p".into())]);
        let record = extract(html, "https://ex.com/", &map);
        assert_eq!(
            record.sections[0].1,
            vec!["first".to_string(), "second".into(), "third".into()]
        );
    }

    #[test]
    fn invalid_selector_degrades_to_empty_section() {
        let map = SelectorMap::new(vec![
            ("good".into(), "p".into()),
            ("bad".into(), "][".into()),
        ]);
        let record = extract("<p>hello</p>", "https://ex.com/", &map);
        assert_eq!(record.sections[0].1, vec!["hello".to_string()]);
        assert_eq!(record.sections[1].0, "bad");
        assert!(record.sections[1].1.is_empty());
    }

    #[test]
    fn script_and_style_contents_are_not_visible_text() {
        let html =
            "<div><script>var x = 1;</script><style>.a{color:red}</style>Work at Acme</div>";
        let map = SelectorMap::new(vec![("work_experience".into(), "div".into())]);
        let record = extract(html, "https://ex.com/", &map);
        assert_eq!(record.sections[0].1, vec!["Work at Acme".to_string()]);
    }

    #[test]
    fn block_children_are_separated_by_line_breaks() {
        let html = "<div><p>Acme Corp</p><p>2019 to 2022</p></div>";
        let map = SelectorMap::new(vec![("work_experience".into(), "div".into())]);
        let record = extract(html, "https://ex.com/", &map);
        assert_eq!(
            record.sections[0].1,
            vec!["Acme Corp\n2019 to 2022".to_string()]
        );
    }

    #[test]
    fn page_without_matches_keeps_all_default_sections() {
        let record = extract(
            "<html><body></body></html>",
            "https://ex.com/empty",
            &SelectorMap::default(),
        );
        assert_eq!(record.source_link, "https://ex.com/empty");
        let names: Vec<&str> = record.sections.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["about_me", "education", "work_experience", "skills"]);
        assert!(record.sections.iter().all(|(_, texts)| texts.is_empty()));
    }

    #[test]
    fn element_text_is_trimmed() {
        let html = "<p>  padded  </p>";
        let map = SelectorMap::new(vec![("about_me".into(), "p".into())]);
        let record = extract(html, "https://ex.com/", &map);
        assert_eq!(record.sections[0].1, vec!["padded".to_string()]);
    }
}
