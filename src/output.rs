use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::crawl::CrawlResult;

/// Serialize the crawl result as pretty JSON: 4-space indent, non-ASCII
/// characters emitted literally.
pub fn to_json_string(result: &CrawlResult) -> Result<String> {
    let mut buf = Vec::new();
    let fmt = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    result
        .serialize(&mut ser)
        .context("failed to serialize crawl result")?;
    Ok(String::from_utf8(buf)?)
}

/// Write the final document. Called exactly once, after a fully successful
/// crawl; a failed run leaves any previous output file untouched.
pub fn write_json(path: &Path, result: &CrawlResult) -> Result<()> {
    let json = to_json_string(result)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

// ── Tests ──
