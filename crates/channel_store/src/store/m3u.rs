use std::{fmt::Write, path::PathBuf};

use anyhow::Context;

use crate::{store::PlaylistStore, Channel, WriteOutcome};

/// EPG feed advertised in the playlist header.
pub const DEFAULT_EPG_URL: &str = "https://epg.51zmt.top:8001/xmltv.xml";

/// Writes channels as an extended M3U playlist, replacing the file on every
/// non-empty write.
#[derive(Debug, Clone)]
pub struct M3uFileStore {
    pub path: PathBuf,
    pub epg_url: String,
}

impl M3uFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            epg_url: DEFAULT_EPG_URL.to_string(),
        }
    }

    pub fn with_epg_url(mut self, epg_url: impl Into<String>) -> Self {
        self.epg_url = epg_url.into();
        self
    }
}

impl PlaylistStore for M3uFileStore {
    #[tracing::instrument(skip(self, channels), fields(path = %self.path.display(), count = channels.len()))]
    fn write_playlist(&self, channels: &[Channel]) -> anyhow::Result<WriteOutcome> {
        if channels.is_empty() {
            tracing::warn!("No channels to write, leaving playlist untouched");
            return Ok(WriteOutcome::Skipped);
        }

        let playlist = render_m3u(&self.epg_url, channels);

        std::fs::write(&self.path, playlist)
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to write playlist"))
            .with_context(|| format!("Failed to write playlist to {}", self.path.display()))?;

        tracing::info!("Playlist written");

        Ok(WriteOutcome::Written {
            path: self.path.clone(),
            channels: channels.len(),
        })
    }
}

/// Renders the playlist text. `tvg-id` is the 1-based position of the channel.
pub fn render_m3u(epg_url: &str, channels: &[Channel]) -> String {
    let mut out = format!("#EXTM3U x-tvg-url=\"{epg_url}\"\n");

    for (idx, channel) in channels.iter().enumerate() {
        let Channel {
            name,
            stream_url,
            group,
            logo,
        } = channel;

        // writing into a String never fails
        let _ = write!(
            out,
            "#EXTINF:-1 tvg-id=\"{}\" tvg-name=\"{name}\" tvg-logo=\"{logo}\" group-title=\"{group}\",{name}\n{stream_url}\n\n",
            idx + 1
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_channels() -> Vec<Channel> {
        vec![
            Channel::new("CCTV-1", "rtsp://10.0.0.1/cctv1")
                .with_group("央视")
                .with_logo("https://epg.51zmt.top:8001/tv/CCTV1.png"),
            Channel::new("湖南卫视", "rtsp://10.0.0.1/hunan").with_group("卫视"),
        ]
    }

    #[test]
    fn test_render_header_and_entries() {
        let rendered = render_m3u(DEFAULT_EPG_URL, &sample_channels());

        let expected = "#EXTM3U x-tvg-url=\"https://epg.51zmt.top:8001/xmltv.xml\"\n\
            #EXTINF:-1 tvg-id=\"1\" tvg-name=\"CCTV-1\" tvg-logo=\"https://epg.51zmt.top:8001/tv/CCTV1.png\" group-title=\"央视\",CCTV-1\n\
            rtsp://10.0.0.1/cctv1\n\
            \n\
            #EXTINF:-1 tvg-id=\"2\" tvg-name=\"湖南卫视\" tvg-logo=\"\" group-title=\"卫视\",湖南卫视\n\
            rtsp://10.0.0.1/hunan\n\
            \n";

        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_uses_default_group_label() {
        let rendered = render_m3u(DEFAULT_EPG_URL, &[Channel::new("Unknown", "rtsp://x/9")]);
        assert!(rendered.contains("group-title=\"默认分组\",Unknown\n"));
    }

    #[test]
    fn test_empty_input_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tv_channels.m3u8");
        std::fs::write(&path, "previous run").unwrap();

        let store = M3uFileStore::new(&path);
        let outcome = store.write_playlist(&[]).unwrap();

        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run");
    }

    #[test]
    fn test_empty_input_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tv_channels.m3u8");

        M3uFileStore::new(&path).write_playlist(&[]).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_write_overwrites_with_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tv_channels.m3u8");
        std::fs::write(&path, "stale content that is longer than nothing").unwrap();

        let store = M3uFileStore::new(&path);
        let channels = sample_channels();

        let outcome = store.write_playlist(&channels).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Written {
                path: path.clone(),
                channels: 2
            }
        );
        let first = std::fs::read(&path).unwrap();

        store.write_playlist(&channels).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert!(String::from_utf8(first)
            .unwrap()
            .starts_with("#EXTM3U x-tvg-url="));
    }

    #[test]
    fn test_custom_epg_url_in_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.m3u");

        M3uFileStore::new(&path)
            .with_epg_url("http://example.com/epg.xml")
            .write_playlist(&sample_channels())
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written.lines().next(),
            Some("#EXTM3U x-tvg-url=\"http://example.com/epg.xml\"")
        );
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.m3u");

        let result = M3uFileStore::new(&path).write_playlist(&sample_channels());
        assert!(result.is_err());
    }
}
