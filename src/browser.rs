use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const BODY_WAIT: Duration = Duration::from_secs(10);
const BODY_POLL: Duration = Duration::from_millis(100);

pub struct BrowserOptions {
    /// Chrome/Chromium binary. Auto-detected when None.
    pub driver_path: Option<PathBuf>,
    pub headless: bool,
}

/// A single browser session with one tab, reused for every navigation.
pub struct Session {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl Session {
    pub async fn launch(opts: &BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder().arg("--disable-gpu");
        // with_head means NOT headless
        if !opts.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &opts.driver_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch browser")?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("cdp handler: {e}");
                }
            }
        });

        // A tab failure must still release the browser we just launched.
        let page = match browser.new_page("about:blank").await.context("failed to open tab") {
            Ok(page) => page,
            Err(e) => {
                teardown(browser, handler_task).await;
                return Err(e);
            }
        };

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Navigate to `url` and block until the document has a <body>, failing
    /// after a bounded wait. No retry; the caller aborts on error.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigation failed: {url}"))?;

        let deadline = Instant::now() + BODY_WAIT;
        loop {
            if self.page.find_element("body").await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(anyhow!("timed out waiting for <body> on {url}"));
            }
            tokio::time::sleep(BODY_POLL).await;
        }
    }

    /// Rendered HTML of the current document.
    pub async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .context("failed to read page content")
    }

    /// Close the browser. Attempted unconditionally on every exit path; a
    /// close error is logged, never propagated.
    pub async fn shutdown(self) {
        teardown(self.browser, self.handler_task).await;
    }
}

async fn teardown(mut browser: Browser, handler_task: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        warn!("browser close: {e}");
    }
    let _ = browser.wait().await;
    handler_task.abort();
}
