// Field normalization shared by every source profile
use crate::model::{CURRENCY, NO_LINK};
use url::Url;

/// Collapses whitespace runs (NBSP included) into single spaces and trims.
pub fn clean_text(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text, or `fallback` when nothing is left after trimming.
pub fn text_or(raw: Option<String>, fallback: &str) -> String {
    match raw.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

/// Resolves `href` against `base`; `None` when it is missing, blank or unresolvable.
pub fn absolute_url(base: &Url, href: Option<&str>) -> Option<String> {
    let href = href.map(str::trim).filter(|h| !h.is_empty())?;
    base.join(href).ok().map(String::from)
}

/// Detail link of a card. A missing href stays `#`, never prefixed.
pub fn resolve_link(base: &Url, href: Option<&str>) -> String {
    absolute_url(base, href).unwrap_or_else(|| NO_LINK.to_string())
}

/// Formats an amount as `"<amount> ₽"`; absent or empty amounts become `"0 ₽"`.
pub fn format_price(raw: Option<String>) -> String {
    let amount = raw
        .map(|s| clean_text(&s))
        .map(|s| s.trim_end_matches(CURRENCY).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "0".to_string());

    format!("{} {}", amount, CURRENCY)
}
