//! # Channel Parser
//!
//! Heuristics that turn the multicast listing page into [`Channel`] records.
//!
//! The listing page has no documented structure, so the guesswork lives
//! behind [`ChannelExtractor`] and each strategy is tested against fixed
//! HTML fixtures. Strategies are alternatives: pick the one matching the
//! markup the page currently serves.

mod anchor;
mod table;

use std::sync::LazyLock;

use channel_store::Channel;
use itertools::Itertools;
use scraper::{ElementRef, Selector};

use crate::{
    config::{Config, ExtractStrategy},
    error::Error,
    fetch::ChannelPage,
};

pub use anchor::AnchorExtractor;
pub use table::TableExtractor;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

pub trait ChannelExtractor {
    /// Extracts channels in document order. An empty vector means the page had
    /// no stream anchors; an error means the page lacks the expected structure.
    fn extract(&self, page: &ChannelPage) -> Result<Vec<Channel>, Error>;
}

impl<T: ChannelExtractor + ?Sized> ChannelExtractor for Box<T> {
    fn extract(&self, page: &ChannelPage) -> Result<Vec<Channel>, Error> {
        (**self).extract(page)
    }
}

impl<T: ChannelExtractor + ?Sized> ChannelExtractor for &T {
    fn extract(&self, page: &ChannelPage) -> Result<Vec<Channel>, Error> {
        (**self).extract(page)
    }
}

/// Returns the extractor selected by `config.strategy`.
pub fn extractor_from_config(config: &Config) -> Box<dyn ChannelExtractor + Send + Sync> {
    let rules = ExtractRules::from(config);
    match config.strategy {
        ExtractStrategy::Anchor => Box::new(AnchorExtractor::new(rules)),
        ExtractStrategy::Table => Box::new(TableExtractor::new(rules)),
    }
}

/// Page specific constants shared by every strategy.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub stream_prefix: String,
    pub logo_base_url: String,
    /// Checked in order, first keyword contained in the text wins.
    pub group_keywords: Vec<String>,
    pub default_group: String,
}

impl From<&Config> for ExtractRules {
    fn from(config: &Config) -> Self {
        Self {
            stream_prefix: config.stream_prefix.clone(),
            logo_base_url: config.logo_base_url.clone(),
            group_keywords: config.group_keywords.clone(),
            default_group: config.default_group.clone(),
        }
    }
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl ExtractRules {
    /// Hrefs with control characters are rejected, they would break the
    /// line structure of the playlist.
    fn is_stream_url(&self, href: &str) -> bool {
        href.starts_with(&self.stream_prefix) && !href.chars().any(char::is_control)
    }

    fn match_group(&self, text: &str) -> Option<&str> {
        self.group_keywords
            .iter()
            .find(|keyword| text.contains(keyword.as_str()))
            .map(String::as_str)
    }

    /// First keyword found in `candidates`, scanned in order, else the default.
    fn group_for<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> String {
        candidates
            .into_iter()
            .find_map(|text| self.match_group(text))
            .unwrap_or(self.default_group.as_str())
            .to_string()
    }

    fn logo_for(&self, img: Option<ElementRef>) -> String {
        img.and_then(|img| img.value().attr("src"))
            .map(|src| absolutize_logo(&self.logo_base_url, src))
            .unwrap_or_default()
    }
}

/// Leaves absolute `http(s)` URLs untouched and prefixes anything else with
/// `base_url`.
pub fn absolutize_logo(base_url: &str, src: &str) -> String {
    let src = src.trim();
    if src.is_empty() {
        return String::new();
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }

    match (base_url.ends_with('/'), src.starts_with('/')) {
        (true, true) => format!("{base_url}{}", &src[1..]),
        (false, false) => format!("{base_url}/{src}"),
        _ => format!("{base_url}{src}"),
    }
}

/// Name used when neither the anchor nor its container carry any text.
pub fn fallback_name(stream_url: &str) -> String {
    let start = stream_url
        .char_indices()
        .rev()
        .nth(5)
        .map_or(0, |(idx, _)| idx);
    format!("未知频道_{}", &stream_url[start..])
}

/// Trimmed `href` of an anchor, empty if missing.
fn href<'a>(anchor: &ElementRef<'a>) -> &'a str {
    anchor.value().attr("href").map(str::trim).unwrap_or_default()
}

/// Visible text: each text node trimmed with inner whitespace collapsed,
/// nodes concatenated without a separator (`<a>CCTV<b>1</b></a>` is `CCTV1`).
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(|node| node.split_whitespace().join(" "))
        .collect()
}

fn nearest_ancestor<'a>(element: ElementRef<'a>, names: &[&str]) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| names.contains(&ancestor.value().name()))
}
