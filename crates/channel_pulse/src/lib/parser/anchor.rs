use channel_store::Channel;
use itertools::Itertools;
use scraper::{ElementRef, Html};

use crate::{error::Error, fetch::ChannelPage};

use super::{
    element_text, fallback_name, href, nearest_ancestor, ChannelExtractor, ExtractRules,
    ANCHOR_SELECTOR, IMG_SELECTOR,
};

/// Elements whose text is scanned for a group keyword and searched for a logo.
const GROUP_CONTAINERS: &[&str] = &["div", "li", "span"];
/// Elements whose text can stand in for an anchor without a label.
const NAME_CONTAINERS: &[&str] = &["div", "li", "span", "td"];
/// Hrefs logged when the page has no stream anchors at all.
const MAX_LOGGED_HREFS: usize = 20;

/// One channel per stream anchor anywhere on the page, with group and logo
/// taken from the anchor's closest container. Suited to the script-rendered
/// listing.
#[derive(Debug, Clone, Default)]
pub struct AnchorExtractor {
    rules: ExtractRules,
}

impl AnchorExtractor {
    pub fn new(rules: ExtractRules) -> Self {
        Self { rules }
    }

    fn channel_from_anchor(&self, anchor: ElementRef) -> Channel {
        let stream_url = href(&anchor).to_string();
        let container = nearest_ancestor(anchor, GROUP_CONTAINERS);

        let name = Some(element_text(anchor))
            .filter(|text| !text.is_empty())
            .or_else(|| {
                nearest_ancestor(anchor, NAME_CONTAINERS)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
            })
            .unwrap_or_else(|| fallback_name(&stream_url));

        let container_text = container.map(element_text);
        let group = self.rules.group_for(container_text.as_deref());

        // closest preceding sibling image, else the first image in the container
        let img = anchor
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| sibling.value().name() == "img")
            .or_else(|| container.and_then(|c| c.select(&IMG_SELECTOR).next()));
        let logo = self.rules.logo_for(img);

        Channel {
            name,
            stream_url,
            group,
            logo,
        }
    }
}

impl ChannelExtractor for AnchorExtractor {
    #[tracing::instrument(skip_all)]
    fn extract(&self, page: &ChannelPage) -> Result<Vec<Channel>, Error> {
        let document = Html::parse_document(page);

        let anchors = document.select(&ANCHOR_SELECTOR).collect::<Vec<_>>();
        let stream_anchors = anchors
            .iter()
            .filter(|anchor| self.rules.is_stream_url(href(anchor)))
            .collect::<Vec<_>>();

        tracing::info!(count = stream_anchors.len(), "Found stream anchors");

        if stream_anchors.is_empty() {
            let hrefs = anchors
                .iter()
                .map(href)
                .filter(|href| !href.is_empty())
                .take(MAX_LOGGED_HREFS)
                .join(", ");
            tracing::warn!(%hrefs, "No stream anchors found, page hrefs listed for inspection");
            return Ok(Vec::new());
        }

        let channels = stream_anchors
            .into_iter()
            .map(|anchor| self.channel_from_anchor(*anchor))
            .collect::<Vec<_>>();

        tracing::info!(count = channels.len(), "Parsed channels");
        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<Channel> {
        AnchorExtractor::default()
            .extract(&ChannelPage::from(html))
            .expect("anchor extraction never fails")
    }

    #[test]
    fn test_one_record_per_stream_anchor_in_order() {
        let html = r#"
            <html><body>
              <ul>
                <li><a href="rtsp://10.0.0.1/1">CCTV-1</a></li>
                <li><a href="https://example.com/about">About</a></li>
                <li><a href=" rtsp://10.0.0.1/2 ">CCTV-2</a></li>
                <li><a href="rtsp://10.0.0.1/3">湖南卫视</a></li>
                <li><a>No href</a></li>
              </ul>
            </body></html>
        "#;

        let channels = extract(html);

        let names = channels.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        let urls = channels.iter().map(|c| c.stream_url.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["CCTV-1", "CCTV-2", "湖南卫视"]);
        assert_eq!(
            urls,
            ["rtsp://10.0.0.1/1", "rtsp://10.0.0.1/2", "rtsp://10.0.0.1/3"]
        );
    }

    #[test]
    fn test_group_from_container_text() {
        let html = r#"<div>卫视 <a href="rtsp://x/1">News1</a></div>"#;

        let channels = extract(html);

        assert_eq!(
            channels,
            vec![Channel::new("News1", "rtsp://x/1").with_group("卫视")]
        );
    }

    #[test]
    fn test_group_defaults_without_keyword() {
        let html = r#"<div><span>综合</span><div><a href="rtsp://x/1">Channel 1</a></div></div>"#;

        let channels = extract(html);

        assert_eq!(channels[0].group, "默认分组");
    }

    #[test]
    fn test_only_nearest_container_is_scanned() {
        // the keyword sits in an outer div, the anchor's own container has none
        let html = r#"<div>体育<div><a href="rtsp://x/1">Five</a></div></div>"#;

        assert_eq!(extract(html)[0].group, "默认分组");
    }

    #[test]
    fn test_anchor_outside_container_gets_defaults() {
        let html = r#"<body><a href="rtsp://x/1">Loose</a></body>"#;

        let channels = extract(html);

        assert_eq!(channels[0].group, "默认分组");
        assert_eq!(channels[0].logo, "");
    }

    #[test]
    fn test_empty_anchor_uses_container_text() {
        let html = r#"<table><tr><td>CCTV-5 体育 <a href="rtsp://x/5"></a></td></tr></table>"#;

        assert_eq!(extract(html)[0].name, "CCTV-5 体育");
    }

    #[test]
    fn test_empty_anchor_without_text_uses_url_tail() {
        let html = r#"<div><a href="rtsp://10.0.0.1/239001"><img src="/x.png"></a></div>"#;

        assert_eq!(extract(html)[0].name, "未知频道_239001");
    }

    #[test]
    fn test_logo_from_previous_sibling() {
        let html = r#"
            <div>
              <img src="/tv/wrong.png">
              <span>
                <img src="/tv/CCTV1.png">
                <a href="rtsp://x/1">CCTV-1</a>
              </span>
            </div>
        "#;

        assert_eq!(
            extract(html)[0].logo,
            "https://epg.51zmt.top:8001/tv/CCTV1.png"
        );
    }

    #[test]
    fn test_logo_from_container_when_no_sibling() {
        let html = r#"
            <li>
              <a href="rtsp://x/1">CCTV-1</a>
              <p><img src="https://cdn.example.com/cctv1.png"></p>
            </li>
        "#;

        assert_eq!(extract(html)[0].logo, "https://cdn.example.com/cctv1.png");
    }

    #[test]
    fn test_img_without_src_gives_empty_logo() {
        let html = r#"<div><img alt="logo"><a href="rtsp://x/1">CCTV-1</a></div>"#;

        assert_eq!(extract(html)[0].logo, "");
    }

    #[test]
    fn test_nested_text_nodes_join_without_space() {
        let html = r#"<div><a href="rtsp://x/1">CCTV<b>1</b></a></div>"#;

        assert_eq!(extract(html)[0].name, "CCTV1");
    }

    #[test]
    fn test_href_with_newline_is_skipped() {
        let html = "<div><a href=\"rtsp://x/1\nevil\">Broken</a><a href=\"rtsp://x/2\">Good</a></div>";

        let channels = extract(html);

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].stream_url, "rtsp://x/2");
    }

    #[test]
    fn test_no_stream_anchors_is_empty() {
        let html = r#"
            <html><body>
              <a href="https://epg.51zmt.top:8001/">Home</a>
              <a href="http://10.0.0.1/udp/239.1.1.1:5000">UDP</a>
            </body></html>
        "#;

        assert!(extract(html).is_empty());
        assert!(extract("").is_empty());
    }
}
