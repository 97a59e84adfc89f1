use serde::Serialize;

use crate::curation::composer::TRUNCATION_PLACEHOLDER;
use crate::links::find_links;

const LINK_FEATURE: &str = "app.bsky.richtext.facet#link";

/// Rich-text annotation; Bluesky indexes facets by UTF-8 byte offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetFeature {
    #[serde(rename = "$type")]
    pub kind: &'static str,
    pub uri: String,
}

/// One link facet per URL in `text`. A URL cut short by truncation (directly
/// followed by the placeholder) is left as plain text.
pub fn link_facets(text: &str) -> Vec<Facet> {
    find_links(text)
        .into_iter()
        .filter(|link| !text[link.end..].starts_with(TRUNCATION_PLACEHOLDER))
        .map(|link| Facet {
            index: ByteSlice {
                byte_start: link.start,
                byte_end: link.end,
            },
            features: vec![FacetFeature {
                kind: LINK_FEATURE,
                uri: link.url.to_string(),
            }],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation::PostComposer;
    use crate::models::{CandidateItem, RankedItem};

    #[test]
    fn test_link_facet_uses_byte_offsets() {
        let text = "【要約】 https://example.com/a";
        let facets = link_facets(text);

        assert_eq!(facets.len(), 1);
        let start = text.find("https").unwrap();
        assert_eq!(facets[0].index, ByteSlice { byte_start: start, byte_end: text.len() });
        assert_eq!(facets[0].features[0].uri, "https://example.com/a");
    }

    #[test]
    fn test_facet_serialization() {
        let facets = link_facets("see http://a.com");
        let json = serde_json::to_value(&facets).unwrap();

        assert_eq!(json[0]["index"]["byteStart"], 4);
        assert_eq!(json[0]["index"]["byteEnd"], 16);
        assert_eq!(json[0]["features"][0]["$type"], LINK_FEATURE);
    }

    #[test]
    fn test_link_cut_by_truncation_gets_no_facet() {
        let text = "1. Story\nhttps://example.com/articles/3/some-slug...";
        assert!(link_facets(text).is_empty());

        let text = "https://example.com/full\n2. Story\nhttps://exa...";
        let facets = link_facets(text);
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].features[0].uri, "https://example.com/full");

        let text = "Body mentions https://example.com/lo...\n\nLink:\nhttps://example.com/pr";
        let facets = link_facets(text);
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].features[0].uri, "https://example.com/pr");
    }

    #[test]
    fn test_truncated_root_only_links_real_items() {
        let items: Vec<CandidateItem> = (1..=20)
            .map(|i| CandidateItem {
                title: format!("A fairly long article title number {}", i),
                link: format!("https://example.com/articles/{}/some-slug-here", i),
                summary: String::new(),
                content: String::new(),
                published: None,
            })
            .collect();
        let links: Vec<String> = items.iter().map(|i| i.link.clone()).collect();

        let root = PostComposer::default().compose_root(&RankedItem::in_order(items));
        assert!(root.text.ends_with("/some-slug..."));

        let facets = link_facets(&root.text);
        assert!(!facets.is_empty());
        for facet in &facets {
            let uri = &facet.features[0].uri;
            assert!(links.contains(uri), "facet for unknown link {}", uri);
        }
    }

    #[test]
    fn test_no_links_no_facets() {
        assert!(link_facets("plain text").is_empty());
    }
}
