#[cfg(feature = "browser")]
pub mod browser;
pub mod http;

use std::{future::Future, ops::Deref, path::Path};

use crate::error::Error;

pub trait PageFetcher {
    /// Retrieves the markup of `url` as it should be handed to extraction.
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<ChannelPage, Error>>;
}

impl<T: PageFetcher> PageFetcher for &T {
    async fn fetch_page(&self, url: &str) -> Result<ChannelPage, Error> {
        (**self).fetch_page(url).await
    }
}

/// Raw (or browser-rendered) HTML of the channel listing page.
#[derive(Debug, Clone)]
pub struct ChannelPage(String);

impl Deref for ChannelPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ChannelPage {
    pub fn new(html: String) -> Self {
        ChannelPage(html)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for ChannelPage {
    fn from(value: String) -> Self {
        ChannelPage(value)
    }
}

impl From<&str> for ChannelPage {
    fn from(value: &str) -> Self {
        ChannelPage(value.to_string())
    }
}

/// Writes the page verbatim so the markup the extractor saw can be inspected.
#[tracing::instrument(skip(page), fields(path = %path.display(), bytes = page.len()))]
pub fn save_debug_html(page: &ChannelPage, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, page.as_bytes())
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to save debug html"))?;
    tracing::info!("Saved fetched page for debugging");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_debug_html_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug_dynamic_page.html");
        let page = ChannelPage::from("<html><body>央视 <a href=\"rtsp://x/1\">CCTV</a></body></html>");

        save_debug_html(&page, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), *page);
    }

    #[test]
    fn test_save_debug_html_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("page.html");

        let result = save_debug_html(&ChannelPage::from("<html></html>"), &path);
        assert_eq!(
            result.unwrap_err().kind(),
            std::io::ErrorKind::NotFound
        );
    }
}
