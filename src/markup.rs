//! Inline rich-text markup: detection, escaping, the fragment tree and the
//! font-run rewriter.

pub mod parse;
pub mod rewrite;
pub mod serialize;
pub mod tree;

use memchr::{memchr, memchr_iter};

pub use parse::ParseError;
pub use rewrite::rewrite;
pub use serialize::serialize_runs;
pub use tree::{Attribute, Element, MarkupTree, Node, NodeId, NodeKind};

/// Heuristic sniff: does `text` contain something that looks like a tag?
///
/// Matches a `<` directly followed by an ASCII letter with a `>` somewhere
/// after it. This is not a parse. Plain text such as `a<b>c` is reported as
/// markup, while `a < b` and `1<2` are not.
#[inline]
pub fn contains_markup(text: &str) -> bool {
    let bytes = text.as_bytes();
    // Fast pre-scan: no '<' means no tags
    if memchr(b'<', bytes).is_none() {
        return false;
    }
    for lt in memchr_iter(b'<', bytes) {
        let opens_tag = bytes.get(lt + 1).is_some_and(u8::is_ascii_alphabetic);
        if opens_tag {
            return memchr(b'>', &bytes[lt + 2..]).is_some();
        }
    }
    false
}

/// Escape `& < > " '` in one pass, so `&` is never escaped twice.
#[inline]
pub fn escape_text_to(text: &str, out: &mut String) {
    html_escape::encode_quoted_attribute_to_string(text, out);
}

#[inline]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    escape_text_to(text, &mut out);
    out
}

/// Decode character references; borrows when `text` has no `&`.
#[inline]
pub fn decode_text(text: &str) -> std::borrow::Cow<'_, str> {
    if memchr(b'&', text.as_bytes()).is_none() {
        return std::borrow::Cow::Borrowed(text);
    }
    html_escape::decode_html_entities(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_detection_heuristic() {
        for markup in ["<p>x</p>", "a<br>b", "<B>bold</B>", "x<span style=\"a\">y", "a<b>c"] {
            assert!(contains_markup(markup), "missed {markup:?}");
        }
        for plain in ["", "plain", "a < b", "1<2", "x > y", "<>", "</>", "<1abc>", "<a"] {
            assert!(!contains_markup(plain), "false positive {plain:?}");
        }
        // A later tag-like construct still counts
        assert!(contains_markup("3 < 4 and <i>x</i>"));
    }

    #[test]
    fn escapes_reserved_characters_once() {
        let escaped = escape_text("a & b < c > d");
        assert_eq!(escaped, "a &amp; b &lt; c &gt; d");
        assert!(!escape_text("\"q\" 'q'").contains(['"', '\'']));
        // Already-escaped input is escaped again, not left alone
        assert_eq!(escape_text("&amp;"), "&amp;amp;");
    }

    #[test]
    fn escape_then_decode_is_identity() {
        for s in ["Tom & Jerry's \"<show>\"", "中文&英文", "", "&&&;"] {
            assert_eq!(decode_text(&escape_text(s)), s);
        }
    }
}
