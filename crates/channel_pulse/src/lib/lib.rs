pub mod config;
pub mod error;
pub mod fetch;
pub mod parser;
mod processor;
pub mod tracing;

pub use channel_store::{Channel, M3uFileStore, PlaylistStore, WriteOutcome};
pub use error::{Error, FailureKind};
pub use processor::{builder::ChannelPlaylistProcessorBuilder, ChannelPlaylistProcessor, RunReport};
