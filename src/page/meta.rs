//! Meta tag and title collection from raw markup.
//!
//! A lightweight regex scan over the document, in document order. Only the
//! `name`/`content` attribute pair matters here; a `<meta>` element missing
//! either attribute, or carrying an empty one, is skipped.

// ============================================================================
// Imports
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// MetaTag
// ============================================================================

/// One `<meta>` element with non-empty `name` and `content` attributes.
#[derive(Debug, Clone)]
pub(crate) struct MetaTag {
    /// Value of the `name` attribute.
    pub name: String,

    /// Value of the `content` attribute, verbatim.
    pub content: String,
}

// ============================================================================
// Regexes
// ============================================================================

static META_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?is)<meta\b[^>]*>"#).unwrap());
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    // Attribute pairs: key="value" or key='value' (no backreferences in Rust regex)
    Regex::new(r#"(?i)([a-zA-Z_:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<title[^>]*>(.*?)</title>"#).unwrap());

// ============================================================================
// Collectors
// ============================================================================

/// Collects the document's meta tags in document order.
pub(crate) fn collect_meta(html: &str) -> Vec<MetaTag> {
    META_TAG_RE
        .find_iter(html)
        .filter_map(|m| parse_meta_tag(m.as_str()))
        .collect()
}

fn parse_meta_tag(tag: &str) -> Option<MetaTag> {
    let mut name = None;
    let mut content = None;
    for cap in ATTR_RE.captures_iter(tag) {
        let key = &cap[1];
        let val = cap
            .get(2)
            .or_else(|| cap.get(3))
            .map(|m| m.as_str().to_string());
        if let Some(val) = val {
            match key.to_ascii_lowercase().as_str() {
                "name" => name = Some(val),
                "content" => content = Some(val),
                _ => {}
            }
        }
    }

    // Empty attributes count as absent, like a falsy check over the DOM.
    let name = name.filter(|n| !n.is_empty())?;
    let content = content.filter(|c| !c.is_empty())?;
    Some(MetaTag { name, content })
}

/// Extracts the `<title>` element's text, whitespace-normalized.
pub(crate) fn collect_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1).map(|m| normalize_ws(m.as_str())))
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

// ============================================================================
// Tests
// ============================================================================
