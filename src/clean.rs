use std::collections::HashSet;

use crate::extract::PageRecord;

/// Normalize one raw extracted string.
///
/// Step order matters for output compatibility: trim first, then newline →
/// space, then carriage returns deleted, then NBSP → space.
pub fn clean_text(raw: &str) -> String {
    raw.trim()
        .replace('\n', " ")
        .replace('\r', "")
        .replace('\u{a0}', " ")
}

/// Produce the cleaned copy of a record: every section normalized, empties
/// dropped, and exact post-normalization duplicates removed keeping the
/// first occurrence in order.
pub fn clean_record(record: PageRecord) -> PageRecord {
    let PageRecord {
        source_link,
        sections,
    } = record;

    let sections = sections
        .into_iter()
        .map(|(name, texts)| {
            let mut seen = HashSet::new();
            let cleaned = texts
                .iter()
                .map(|t| clean_text(t))
                .filter(|t| !t.is_empty() && seen.insert(t.clone()))
                .collect();
            (name, cleaned)
        })
        .collect();

    PageRecord {
        source_link,
        sections,
    }
}

// ── Tests ──
