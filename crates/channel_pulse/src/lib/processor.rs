pub mod builder;

use std::path::PathBuf;

use channel_store::{Channel, PlaylistStore, WriteOutcome};

use crate::{
    error::Error,
    fetch::{save_debug_html, ChannelPage, PageFetcher},
    parser::ChannelExtractor,
};

/// Runs fetch, extract and write once, in that order. Any stage failing, or
/// extraction yielding nothing, ends the run before the playlist is touched.
#[derive(Debug)]
pub struct ChannelPlaylistProcessor<F, E, W>
where
    F: PageFetcher,
    E: ChannelExtractor,
    W: PlaylistStore,
{
    target_url: String,
    debug_html_path: Option<PathBuf>,
    fetcher: F,
    extractor: E,
    store: W,
}

#[derive(Debug)]
pub struct RunReport {
    pub channels: Vec<Channel>,
    pub output: WriteOutcome,
}

impl<F, E, W> ChannelPlaylistProcessor<F, E, W>
where
    F: PageFetcher,
    E: ChannelExtractor,
    W: PlaylistStore,
{
    /// Loads the channel listing page, keeping a copy on disk when asked to
    #[tracing::instrument(skip(self), fields(url = %self.target_url))]
    async fn fetch(&self) -> Result<ChannelPage, Error> {
        let page = self.fetcher.fetch_page(&self.target_url).await?;

        // the debug copy is a side artifact, losing it must not stop the run
        if let Some(path) = &self.debug_html_path {
            if let Err(e) = save_debug_html(&page, path) {
                tracing::warn!(error = %e, path = %path.display(), "Continuing without debug html");
            }
        }

        Ok(page)
    }

    #[tracing::instrument(skip_all)]
    fn extract(&self, page: &ChannelPage) -> Result<Vec<Channel>, Error> {
        let channels = self.extractor.extract(page)?;
        if channels.is_empty() {
            tracing::error!("No channels with a stream URL could be extracted");
            return Err(Error::EmptyResult);
        }
        Ok(channels)
    }

    #[tracing::instrument(skip_all, fields(count = channels.len()))]
    fn emit(&self, channels: &[Channel]) -> Result<WriteOutcome, Error> {
        self.store.write_playlist(channels).map_err(Error::Store)
    }

    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<RunReport, Error> {
        let page = self
            .fetch()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Fetch stage failed"))?;
        tracing::debug!(bytes = page.len(), "Page fetched");

        let channels = self
            .extract(&page)
            .inspect_err(|e| tracing::error!(error = %e, "Extract stage failed"))?;
        tracing::info!(count = channels.len(), "Channels parsed");

        let output = self
            .emit(&channels)
            .inspect_err(|e| tracing::error!(error = %e, "Emit stage failed"))?;

        if let WriteOutcome::Written { path, channels } = &output {
            tracing::info!(path = %path.display(), channels, "Playlist emitted");
        }

        Ok(RunReport { channels, output })
    }
}
