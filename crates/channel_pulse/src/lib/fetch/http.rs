use std::ops::Deref;

use reqwest::header::ACCEPT_LANGUAGE;

use crate::{
    config::Config,
    error::Error,
    fetch::{ChannelPage, PageFetcher},
};

/// Fetches the page with a single GET; no scripts are executed.
#[derive(Debug, Clone)]
pub struct HttpFetcher(pub reqwest::Client);

impl Deref for HttpFetcher {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HttpFetcher {
    /// Builds a client impersonating a desktop browser. Certificate checks are
    /// off because the listing site serves a certificate that does not verify.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(true)
            .timeout(config.request_timeout)
            .build()
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to build http client"))?;

        Ok(HttpFetcher(client))
    }
}

impl PageFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<ChannelPage, Error> {
        let html = self
            .get(url)
            .header(ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8")
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .inspect_err(|e| tracing::error!(error = ?e, "Request failed"))?
            .text()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to read response body"))?;

        if html.trim().is_empty() {
            tracing::error!("Response body is empty");
            return Err(Error::EmptyPage(url.to_string()));
        }

        tracing::info!(bytes = html.len(), "Fetched page");
        Ok(html.into())
    }
}
