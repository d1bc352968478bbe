// Utility functions

/// Escapes `& < > " '` for HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((pos, _)) => &text[..pos],
        None => text,
    }
}

/// Appends `t=<stamp>` using `&` when the URL already carries a query.
pub fn cache_bust_url(url: &str, stamp: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={stamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#39;s &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 50), "abc");
    }

    #[test]
    fn cache_buster_picks_separator() {
        assert_eq!(cache_bust_url("https://x/s.csv", 7), "https://x/s.csv?t=7");
        assert_eq!(
            cache_bust_url("https://x/pub?output=csv", 7),
            "https://x/pub?output=csv&t=7"
        );
    }
}
