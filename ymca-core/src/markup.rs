//! Display-only cleanup of inline formatting embedded in message bodies.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// `<font ...>` opening tags, up to the first `>`. Closing tags are left alone.
static FONT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<font[^>]*>").expect("font tag regex"));

// ESC [ # RRGGBB m
static COLOR_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[#[0-9A-Fa-f]{6}m").expect("color escape regex"));

/// Remove font tags, then color escapes. Borrows when nothing matched.
pub fn strip(text: &str) -> Cow<'_, str> {
    match FONT_TAG.replace_all(text, "") {
        Cow::Borrowed(s) => COLOR_ESCAPE.replace_all(s, ""),
        Cow::Owned(s) => Cow::Owned(COLOR_ESCAPE.replace_all(&s, "").into_owned()),
    }
}
