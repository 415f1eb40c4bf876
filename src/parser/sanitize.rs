use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// Control characters XML 1.0 does not allow anywhere in a document.
static FORBIDDEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").unwrap());
static AMPERSAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(#?\w+;)?").unwrap());

/// Normalize raw upload bytes into text a strict XML reader will accept.
/// Never fails.
pub fn sanitize_xml(bytes: &[u8]) -> String {
    let text = decode(bytes);
    let text = FORBIDDEN_RE.replace_all(&text, "");
    escape_bare_ampersands(&text).into_owned()
}

/// UTF-8 first; Lattes exports are usually ISO-8859-1, where every byte is a code point.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s)),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// "P&D & Inovação" -> "P&amp;D &amp; Inovação", existing references untouched.
fn escape_bare_ampersands(text: &str) -> Cow<'_, str> {
    AMPERSAND_RE.replace_all(text, |caps: &Captures| match caps.get(1) {
        Some(entity) => format!("&{}", entity.as_str()),
        None => "&amp;".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_forbidden(c: char) -> bool {
        matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}')
    }

    #[test]
    fn strips_forbidden_controls() {
        let raw: Vec<u8> = (0u8..=0x7F).collect();
        let clean = sanitize_xml(&raw);
        assert!(!clean.chars().any(is_forbidden));
        assert!(clean.contains('\t'));
        assert!(clean.contains('\n'));
        assert!(clean.contains('\r'));
    }

    #[test]
    fn strips_controls_from_latin1_input() {
        let raw = b"<A NOME=\"Jo\xe3o\x01\x1f\"/>";
        let clean = sanitize_xml(raw);
        assert_eq!(clean, "<A NOME=\"João\"/>");
    }

    #[test]
    fn utf8_passes_through() {
        let raw = "<A NOME=\"Inovação\"/>".as_bytes();
        assert_eq!(sanitize_xml(raw), "<A NOME=\"Inovação\"/>");
    }

    #[test]
    fn drops_utf8_byte_order_mark() {
        assert_eq!(sanitize_xml(b"\xEF\xBB\xBF<A/>"), "<A/>");
    }

    #[test]
    fn escapes_bare_ampersand() {
        assert_eq!(sanitize_xml(b"A & B"), "A &amp; B");
        assert_eq!(sanitize_xml(b"P&D & Inovacao"), "P&amp;D &amp; Inovacao");
        assert_eq!(sanitize_xml(b"trailing &"), "trailing &amp;");
    }

    #[test]
    fn keeps_existing_references() {
        assert_eq!(sanitize_xml(b"A &amp; B"), "A &amp; B");
        assert_eq!(sanitize_xml(b"&lt;x&gt; &#233; &#xE9;"), "&lt;x&gt; &#233; &#xE9;");
    }

    #[test]
    fn idempotent() {
        let once = sanitize_xml(b"<A X=\"R&D &amp; \x02more\"/>");
        let twice = sanitize_xml(once.as_bytes());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize_xml(b""), "");
    }
}
