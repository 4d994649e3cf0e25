use std::{path::PathBuf, time::Duration};

use channel_store::{DEFAULT_EPG_URL, DEFAULT_GROUP};

pub const TARGET_URL: &str = "https://epg.51zmt.top:8001/multicast/";
pub const LOGO_BASE_URL: &str = "https://epg.51zmt.top:8001";
pub const OUTPUT_PATH: &str = "tv_channels.m3u8";
pub const DEBUG_HTML_PATH: &str = "debug_dynamic_page.html";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const STREAM_PREFIX: &str = "rtsp://";
pub const GROUP_KEYWORDS: [&str; 6] = ["央视", "卫视", "地方", "体育", "电影", "新闻"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FetchMode {
    /// Plain HTTP GET
    Http,
    /// Headless Chromium, so client-side scripts run before capture
    Browser,
}

impl Default for FetchMode {
    /// The listing is rendered client-side, so render it whenever the
    /// browser fetcher is compiled in.
    fn default() -> Self {
        if cfg!(feature = "browser") {
            FetchMode::Browser
        } else {
            FetchMode::Http
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtractStrategy {
    /// Every stream anchor on the page, metadata from its container
    #[default]
    Anchor,
    /// One channel per table row
    Table,
}

/// Everything a run needs, handed to each stage explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub target_url: String,
    pub logo_base_url: String,
    pub epg_url: String,
    pub output_path: PathBuf,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Extra wait after the browser finishes navigation
    pub settle_delay: Duration,
    pub debug_html_path: Option<PathBuf>,
    pub fetch_mode: FetchMode,
    pub strategy: ExtractStrategy,
    pub stream_prefix: String,
    pub group_keywords: Vec<String>,
    pub default_group: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: TARGET_URL.into(),
            logo_base_url: LOGO_BASE_URL.into(),
            epg_url: DEFAULT_EPG_URL.into(),
            output_path: OUTPUT_PATH.into(),
            user_agent: USER_AGENT.into(),
            request_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(3),
            debug_html_path: Some(DEBUG_HTML_PATH.into()),
            fetch_mode: FetchMode::default(),
            strategy: ExtractStrategy::default(),
            stream_prefix: STREAM_PREFIX.into(),
            group_keywords: GROUP_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            default_group: DEFAULT_GROUP.into(),
        }
    }
}
