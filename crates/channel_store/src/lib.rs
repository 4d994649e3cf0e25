//! # Channel Store
//!
//! Domain types for scraped IPTV channels and the playlist stores that
//! persist them. The only store shipped here renders an extended M3U file,
//! overwriting it on every run.

mod domain;
mod store;

pub use domain::{Channel, DEFAULT_GROUP};
pub use store::m3u::{render_m3u, M3uFileStore, DEFAULT_EPG_URL};
pub use store::{PlaylistStore, WriteOutcome};
