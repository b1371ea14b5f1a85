// src/markdown.rs

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "file:", "data:"];
const SAFE_DATA_PREFIXES: &[&str] = &[
    "data:image/png",
    "data:image/gif",
    "data:image/jpeg",
    "data:image/webp",
];

/// 渲染正文为 HTML（丢弃原始 HTML）
pub fn to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;

    let events = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        other => Some(other),
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lowered = url.trim().to_ascii_lowercase();
    let unsafe_scheme = UNSAFE_SCHEMES.iter().any(|s| lowered.starts_with(s))
        && !SAFE_DATA_PREFIXES.iter().any(|p| lowered.starts_with(p));
    if unsafe_scheme {
        CowStr::Borrowed("")
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = to_html("# 今日\n\n- 散歩\n- **読書**");
        assert!(html.contains("<h1>今日</h1>"));
        assert!(html.contains("<li>散歩</li>"));
        assert!(html.contains("<strong>読書</strong>"));
    }

    #[test]
    fn test_raw_html_is_dropped() {
        let html = to_html("hello <script>alert(1)</script> world\n\n<div onclick=\"x\">block</div>\n");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<div"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_script_links_are_neutralized() {
        let html = to_html("[click](javascript:alert(1)) [ok](https://example.com)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("href=\"https://example.com\""));

        let html = to_html("![dot](data:image/png;base64,AAAA)");
        assert!(html.contains("data:image/png"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = to_html("a < b & c");
        assert!(html.contains("a &lt; b &amp; c"));
    }
}
