use std::path::PathBuf;

use crate::Channel;

pub mod m3u;

pub trait PlaylistStore {
    /// Persists `channels` in order. An empty slice must leave any existing
    /// output untouched.
    fn write_playlist(&self, channels: &[Channel]) -> anyhow::Result<WriteOutcome>;
}

impl<T: PlaylistStore> PlaylistStore for &T {
    fn write_playlist(&self, channels: &[Channel]) -> anyhow::Result<WriteOutcome> {
        (**self).write_playlist(channels)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, channels: usize },
    Skipped,
}
