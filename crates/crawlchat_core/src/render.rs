//! Message renderer: raw text in, safe display markup out.
//!
//! Escaping always runs first. Links, the sources list and line breaks are
//! then built on the escaped text, so nothing in the input can produce
//! structural markup of its own.

use std::sync::LazyLock;

use regex::Regex;

const SOURCES_DELIMITER: &str = "Sources:";

/// Entities that end a URL match in escaped text.
const URL_TERMINATORS: [&str; 4] = ["&lt;", "&gt;", "&quot;", "&#39;"];

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("static url pattern"));

/// Render bot or system text into display markup. Never fails.
///
/// Do not feed the output back in: a second pass escapes the markup again.
pub fn render_markup(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let escaped = escape_markup(&normalized);

    if escaped.matches(SOURCES_DELIMITER).count() == 1 {
        if let Some((body, tail)) = escaped.split_once(SOURCES_DELIMITER) {
            let mut out = render_body(body.trim_end());
            out.push_str(&render_sources(tail));
            return out;
        }
    }

    render_body(&escaped)
}

/// Escape every character with meaning in markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_body(escaped: &str) -> String {
    linkify(escaped).replace('\n', "<br>")
}

fn render_sources(escaped_tail: &str) -> String {
    let items: String = escaped_tail
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with("http") {
                format!("<li>{}</li>", anchor(line))
            } else {
                format!("<li>{line}</li>")
            }
        })
        .collect();

    format!("<div class=\"sources\"><strong>{SOURCES_DELIMITER}</strong><ul>{items}</ul></div>")
}

/// Wrap every absolute http(s) URL in an anchor. Input must already be escaped.
fn linkify(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut copied = 0;
    let mut search_from = 0;

    // Resume right after the trimmed URL; the raw match may swallow a
    // following URL behind an escaped delimiter.
    while let Some(found) = URL_PATTERN.find_at(escaped, search_from) {
        let start = found.start();
        let url = trim_url(found.as_str());
        if url.ends_with("://") {
            search_from = start + url.len();
            continue;
        }
        let end = start + url.len();
        out.push_str(&escaped[copied..start]);
        out.push_str(&anchor(url));
        copied = end;
        search_from = end;
    }

    out.push_str(&escaped[copied..]);
    out
}

fn trim_url(candidate: &str) -> &str {
    let cut = URL_TERMINATORS
        .iter()
        .filter_map(|entity| candidate.find(entity))
        .min()
        .unwrap_or(candidate.len());
    candidate[..cut].trim_end_matches(['.', ',', '!', '?', ':', ')'])
}

fn anchor(url: &str) -> String {
    format!("<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{url}</a>")
}
