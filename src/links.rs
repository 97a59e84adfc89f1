use regex::Regex;
use std::sync::LazyLock;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'()\[\]{}]+"#).expect("Invalid link pattern")
});

/// A URL found in free text, as a UTF-8 byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub url: &'a str,
}

/// Finds `http(s)://` tokens, dropping sentence punctuation stuck to their end.
pub fn find_links(text: &str) -> Vec<LinkSpan<'_>> {
    LINK_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
            if url.ends_with("://") {
                return None;
            }
            Some(LinkSpan {
                start: m.start(),
                end: m.start() + url.len(),
                url,
            })
        })
        .collect()
}

pub fn contains_link(text: &str) -> bool {
    !find_links(text).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_links_with_offsets() {
        let text = "Read https://example.com/a and http://b.example/x?y=1.";
        let links = find_links(text);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://example.com/a");
        assert_eq!(&text[links[0].start..links[0].end], "https://example.com/a");
        assert_eq!(links[1].url, "http://b.example/x?y=1");
    }

    #[test]
    fn test_byte_offsets_after_multibyte_text() {
        let text = "記事URL: https://example.jp/記事";
        let links = find_links(text);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].start, text.find("https").unwrap());
        assert_eq!(links[0].end, text.len());
    }

    #[test]
    fn test_markdown_wrapped_link() {
        let links = find_links("1. [Title](https://example.com/post)");
        assert_eq!(links[0].url, "https://example.com/post");
    }

    #[test]
    fn test_no_links() {
        assert!(!contains_link("1. Title without a url"));
        assert!(!contains_link("just https:// alone"));
    }
}
