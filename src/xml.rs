//! XML text helpers shared by the OPF reader and the manifest writer.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use tamarind::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape XML special characters.
///
/// Replaces the five standard XML entities with their corresponding characters.
/// Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use tamarind::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
/// assert_eq!(unescape_xml("a & b"), "a & b"); // unchanged
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;"); // unknown entity
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

/// Resolve an entity reference name as reported by `Event::GeneralRef`
/// (the bytes between `&` and `;`).
///
/// Handles the five predefined entities plus decimal (`#NNN`) and
/// hexadecimal (`#xNNN`) character references. Returns `None` for anything
/// unknown so callers can keep the reference verbatim.
pub fn resolve_entity(name: &[u8]) -> Option<String> {
    match name {
        b"amp" => return Some("&".into()),
        b"lt" => return Some("<".into()),
        b"gt" => return Some(">".into()),
        b"quot" => return Some("\"".into()),
        b"apos" => return Some("'".into()),
        _ => {},
    }
    let name = std::str::from_utf8(name).ok()?;
    let digits = name.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_round_trip() {
        let original = "Beasts of <Burden> & \"Friends\"";
        assert_eq!(unescape_xml(&escape_xml(original)), original);
    }

    #[test]
    fn test_resolve_named_entities() {
        assert_eq!(resolve_entity(b"amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity(b"lt").as_deref(), Some("<"));
        assert_eq!(resolve_entity(b"nbsp"), None);
    }

    #[test]
    fn test_resolve_character_references() {
        assert_eq!(resolve_entity(b"#233").as_deref(), Some("\u{e9}"));
        assert_eq!(resolve_entity(b"#x2014").as_deref(), Some("\u{2014}"));
        assert_eq!(resolve_entity(b"#xZZ"), None);
    }
}
