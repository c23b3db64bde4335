/// RSS-specific utility functions for the relay

/// Text normalisation for message bodies
pub mod text {
    pub const ELLIPSIS: &str = "...";

    /// Bounds `text` to `max_len` characters plus an ellipsis marker.
    ///
    /// Lengths are counted in characters, never bytes, so multi-byte text is
    /// never split inside a code point. Text that already carries the marker
    /// after at most `max_len` characters is returned unchanged.
    pub fn truncate(text: &str, max_len: usize) -> String {
        let trimmed = text.trim();
        if trimmed.chars().count() <= max_len {
            return trimmed.to_string();
        }

        if let Some(head) = trimmed.strip_suffix(ELLIPSIS) {
            if head.chars().count() <= max_len && head == head.trim_end() {
                return trimmed.to_string();
            }
        }

        let head: String = trimmed.chars().take(max_len).collect();
        format!("{}{}", head.trim_end(), ELLIPSIS)
    }
}

/// URL utilities for RSS feeds
pub mod url {
    use url::Url;

    /// Validate RSS feed URL format
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some()
        } else {
            false
        }
    }
}

/// RSS feed parsing utilities
pub mod feed {
    /// Extract clean text content from HTML
    pub fn extract_text_from_html(html: &str) -> String {
        // Tags become word breaks so "<p>a</p><p>b</p>" does not glue words together
        let stripped = html
            .chars()
            .fold((String::new(), false), |(mut text, in_tag), c| match c {
                '<' => {
                    text.push(' ');
                    (text, true)
                }
                '>' => (text, false),
                _ if !in_tag => {
                    text.push(c);
                    (text, in_tag)
                }
                _ => (text, in_tag),
            })
            .0;

        decode_entities(&stripped)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace(" .", ".")
            .replace(" ,", ",")
    }

    fn decode_entities(text: &str) -> String {
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&#x27;", "'")
            .replace("&amp;", "&")
    }
}
