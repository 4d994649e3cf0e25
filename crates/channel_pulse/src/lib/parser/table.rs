use std::sync::LazyLock;

use channel_store::Channel;
use scraper::{ElementRef, Html, Selector};

use crate::{error::Error, fetch::ChannelPage};

use super::{
    element_text, fallback_name, href, nearest_ancestor, ChannelExtractor, ExtractRules,
    ANCHOR_SELECTOR, IMG_SELECTOR,
};

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());
static CAPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("caption").unwrap());

/// One channel per table row, for the static listing that lays channels out
/// as `<tr>` rows. Logos are looked up inside the row only.
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    rules: ExtractRules,
}

impl TableExtractor {
    pub fn new(rules: ExtractRules) -> Self {
        Self { rules }
    }

    /// `None` when the row carries no stream URL (headers, spacer rows).
    fn channel_from_row(&self, row: ElementRef) -> Option<Channel> {
        let anchor = row
            .select(&ANCHOR_SELECTOR)
            .find(|anchor| self.rules.is_stream_url(href(anchor)));
        let cells = row.select(&CELL_SELECTOR).map(element_text).collect::<Vec<_>>();

        let stream_url = match anchor {
            Some(anchor) => href(&anchor).to_string(),
            None => cells
                .iter()
                .find_map(|cell| self.find_stream_url(cell))?
                .to_string(),
        };

        let name = anchor
            .map(element_text)
            .filter(|text| !text.is_empty() && !self.rules.is_stream_url(text))
            .or_else(|| cells.iter().find(|cell| self.is_name_cell(cell)).cloned())
            .unwrap_or_else(|| fallback_name(&stream_url));

        let row_text = element_text(row);
        let caption = nearest_ancestor(row, &["table"])
            .and_then(|table| table.select(&CAPTION_SELECTOR).next())
            .map(element_text);
        let group = self
            .rules
            .group_for([Some(row_text.as_str()), caption.as_deref()].into_iter().flatten());

        let logo = self.rules.logo_for(row.select(&IMG_SELECTOR).next());

        Some(Channel {
            name,
            stream_url,
            group,
            logo,
        })
    }

    /// Stream URL written out as plain text, up to the next whitespace.
    fn find_stream_url<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find(self.rules.stream_prefix.as_str())?;
        text[start..]
            .split_whitespace()
            .next()
            .filter(|url| self.rules.is_stream_url(url))
    }

    /// A cell that can serve as the channel name: not blank, not a bare
    /// channel number and not a URL.
    fn is_name_cell(&self, cell: &str) -> bool {
        !cell.is_empty()
            && !cell.chars().all(|c| c.is_ascii_digit())
            && !cell.contains(self.rules.stream_prefix.as_str())
    }
}

impl ChannelExtractor for TableExtractor {
    #[tracing::instrument(skip_all)]
    fn extract(&self, page: &ChannelPage) -> Result<Vec<Channel>, Error> {
        let document = Html::parse_document(page);

        let tables = document.select(&TABLE_SELECTOR).count();
        if tables == 0 {
            tracing::error!("Page has no channel table");
            return Err(Error::Parse("no <table> element found on the page"));
        }

        let channels = document
            .select(&ROW_SELECTOR)
            .filter_map(|row| self.channel_from_row(row))
            .collect::<Vec<_>>();

        tracing::info!(tables, count = channels.len(), "Parsed channels from table rows");
        Ok(channels)
    }
}
