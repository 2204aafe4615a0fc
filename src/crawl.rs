use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use url::Url;

use crate::browser::{BrowserOptions, Session};
use crate::clean;
use crate::extract::{self, PageRecord, SelectorMap};
use crate::links;
use crate::output;

/// Top-level persisted artifact: page URL → its record. Every key equals its
/// record's `source_link`.
pub type CrawlResult = BTreeMap<String, PageRecord>;

pub struct CrawlConfig {
    pub base_url: Url,
    pub output_file: PathBuf,
    pub driver_path: Option<PathBuf>,
    pub headless: bool,
    /// Pause between successive page fetches, in seconds.
    pub delay: f64,
    pub selectors: SelectorMap,
}

impl CrawlConfig {
    fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            driver_path: self.driver_path.clone(),
            headless: self.headless,
        }
    }
}

pub struct CrawlSummary {
    pub pages: usize,
    pub strings: usize,
}

/// Full crawl: launch the browser, run to completion or first failure, and
/// always release the browser before returning.
pub async fn run(config: &CrawlConfig) -> Result<CrawlSummary> {
    let session = Session::launch(&config.browser_options()).await?;
    let result = crawl_site(&session, config).await;
    session.shutdown().await;
    result
}

async fn crawl_site(session: &Session, config: &CrawlConfig) -> Result<CrawlSummary> {
    session.goto(config.base_url.as_str()).await?;
    let html = session.content().await?;
    let all_links = links::collect_links(&html, &config.base_url);
    info!(
        "Collected {} same-origin links from {}",
        all_links.len(),
        config.base_url
    );

    let mut site_data = CrawlResult::new();
    for link in &all_links {
        println!("Scraping {link}");
        session.goto(link).await?;
        let page_html = session.content().await?;
        let record = extract::extract(&page_html, link, &config.selectors);
        site_data.insert(link.clone(), record);
        tokio::time::sleep(Duration::from_secs_f64(config.delay.max(0.0))).await;
    }

    let cleaned = clean_result(site_data);
    let strings = cleaned
        .values()
        .flat_map(|r| r.sections.iter())
        .map(|(_, texts)| texts.len())
        .sum();

    output::write_json(&config.output_file, &cleaned)?;

    Ok(CrawlSummary {
        pages: cleaned.len(),
        strings,
    })
}

/// Normalize every record before persistence.
fn clean_result(result: CrawlResult) -> CrawlResult {
    result
        .into_iter()
        .map(|(url, record)| (url, clean::clean_record(record)))
        .collect()
}

/// Fetch only the base page and return its same-origin link set.
pub async fn discover(base_url: &Url, opts: &BrowserOptions) -> Result<BTreeSet<String>> {
    let session = Session::launch(opts).await?;
    let result = async {
        session.goto(base_url.as_str()).await?;
        let html = session.content().await?;
        Ok(links::collect_links(&html, base_url))
    }
    .await;
    session.shutdown().await;
    result
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_preserves_the_key_source_link_invariant() {
        let mut result = CrawlResult::new();
        for url in ["https://ex.com/a", "https://ex.com/b"] {
            result.insert(
                url.into(),
                extract::extract("<p> raw \n text </p>", url, &SelectorMap::default()),
            );
        }
        let cleaned = clean_result(result);
        assert_eq!(cleaned.len(), 2);
        for (key, record) in &cleaned {
            assert_eq!(key, &record.source_link);
        }
    }
}
