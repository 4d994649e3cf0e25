use std::path::PathBuf;

use channel_store::PlaylistStore;

use crate::{
    config::TARGET_URL, fetch::PageFetcher, parser::ChannelExtractor, ChannelPlaylistProcessor,
};

pub struct ChannelPlaylistProcessorBuilder<F = (), E = (), W = ()> {
    target_url: String,
    debug_html_path: Option<PathBuf>,
    fetcher: F,
    extractor: E,
    store: W,
}

impl ChannelPlaylistProcessorBuilder {
    pub fn new() -> Self {
        Self {
            target_url: TARGET_URL.to_string(),
            debug_html_path: None,
            fetcher: (),
            extractor: (),
            store: (),
        }
    }
}

impl Default for ChannelPlaylistProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, E, W> ChannelPlaylistProcessorBuilder<F, E, W> {
    pub fn fetcher<F2: PageFetcher>(self, fetcher: F2) -> ChannelPlaylistProcessorBuilder<F2, E, W> {
        ChannelPlaylistProcessorBuilder {
            target_url: self.target_url,
            debug_html_path: self.debug_html_path,
            fetcher,
            extractor: self.extractor,
            store: self.store,
        }
    }

    pub fn extractor<E2: ChannelExtractor>(
        self,
        extractor: E2,
    ) -> ChannelPlaylistProcessorBuilder<F, E2, W> {
        ChannelPlaylistProcessorBuilder {
            target_url: self.target_url,
            debug_html_path: self.debug_html_path,
            fetcher: self.fetcher,
            extractor,
            store: self.store,
        }
    }

    pub fn store<W2: PlaylistStore>(self, store: W2) -> ChannelPlaylistProcessorBuilder<F, E, W2> {
        ChannelPlaylistProcessorBuilder {
            target_url: self.target_url,
            debug_html_path: self.debug_html_path,
            fetcher: self.fetcher,
            extractor: self.extractor,
            store,
        }
    }

    pub fn target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = target_url.into();
        self
    }

    pub fn debug_html(mut self, path: Option<PathBuf>) -> Self {
        self.debug_html_path = path;
        self
    }
}

impl<F, E, W> ChannelPlaylistProcessorBuilder<F, E, W>
where
    F: PageFetcher,
    E: ChannelExtractor,
    W: PlaylistStore,
{
    pub fn build(self) -> ChannelPlaylistProcessor<F, E, W> {
        ChannelPlaylistProcessor {
            target_url: self.target_url,
            debug_html_path: self.debug_html_path,
            fetcher: self.fetcher,
            extractor: self.extractor,
            store: self.store,
        }
    }
}
