/// Group label used when none of the group keywords could be recovered.
pub const DEFAULT_GROUP: &str = "默认分组";

/// A single playable channel scraped from the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub stream_url: String,
    pub group: String,
    /// Absolute logo URL, or empty when the page had no image for the channel.
    pub logo: String,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            name: String::new(),
            stream_url: String::new(),
            group: DEFAULT_GROUP.to_string(),
            logo: String::new(),
        }
    }
}

impl Channel {
    pub fn new(name: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream_url: stream_url.into(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = logo.into();
        self
    }
}
