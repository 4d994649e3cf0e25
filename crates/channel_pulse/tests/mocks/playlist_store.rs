use std::sync::{Arc, Mutex};

use channel_pulse::{Channel, PlaylistStore, WriteOutcome};

#[derive(Clone, Default)]
pub struct MockPlaylistStore {
    pub written: Arc<Mutex<Vec<Vec<Channel>>>>,
    pub fail_with: Option<String>,
}

impl MockPlaylistStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl PlaylistStore for MockPlaylistStore {
    fn write_playlist(&self, channels: &[Channel]) -> anyhow::Result<WriteOutcome> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        self.written.lock().unwrap().push(channels.to_vec());
        Ok(WriteOutcome::Written {
            path: "mock.m3u8".into(),
            channels: channels.len(),
        })
    }
}
