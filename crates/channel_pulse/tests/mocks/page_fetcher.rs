use std::sync::{Arc, Mutex};

use channel_pulse::{
    fetch::{ChannelPage, PageFetcher},
    Error,
};

#[derive(Clone)]
pub struct MockPageFetcher {
    pub html: String,
    pub fail_with: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn from_fixture() -> Self {
        Self::new(include_str!("../fixtures/multicast.html"))
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

impl PageFetcher for MockPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<ChannelPage, Error> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Browser(msg.clone()));
        }
        Ok(ChannelPage::new(self.html.clone()))
    }
}
