use std::time::Duration;

use chromiumoxide::{error::CdpError, Browser, BrowserConfig};
use futures::StreamExt;

use crate::{
    config::Config,
    error::Error,
    fetch::{ChannelPage, PageFetcher},
};

/// Loads the page in headless Chromium and captures the DOM after client-side
/// rendering has had `settle_delay` to finish.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    user_agent: String,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserFetcher {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            navigation_timeout: config.request_timeout,
            settle_delay: config.settle_delay,
        }
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<String, Error> {
        let navigate = async {
            let page = browser.new_page(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, CdpError>(page)
        };

        let page = tokio::time::timeout(self.navigation_timeout, navigate)
            .await
            .map_err(|_| Error::Browser(format!("navigation timed out after {:?}", self.navigation_timeout)))?
            .map_err(browser_error)?;

        tokio::time::sleep(self.settle_delay).await;

        page.content().await.map_err(browser_error)
    }
}

impl PageFetcher for BrowserFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<ChannelPage, Error> {
        let config = BrowserConfig::builder()
            .arg("--ignore-certificate-errors")
            .arg(format!("--user-agent={}", self.user_agent))
            .request_timeout(self.navigation_timeout)
            .build()
            .map_err(Error::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to launch headless browser"))
            .map_err(browser_error)?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let rendered = self
            .render(&browser, url)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to render page"));

        if let Err(e) = browser.close().await {
            tracing::warn!(error = ?e, "Failed to close headless browser");
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!(error = ?e, "Failed waiting for headless browser to exit");
        }
        handler_task.abort();

        let html = rendered?;
        if html.trim().is_empty() {
            return Err(Error::EmptyPage(url.to_string()));
        }

        tracing::info!(bytes = html.len(), "Rendered page");
        Ok(html.into())
    }
}

fn browser_error(e: CdpError) -> Error {
    Error::Browser(e.to_string())
}
