//! Markup stripping for description fields.
//!
//! Calibre stores book descriptions as HTML. The manifest wants plain
//! text, so the markup is reduced to its text content: tags dropped,
//! entities resolved, text kept in document order with nothing inserted
//! between fragments.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::xml::{resolve_entity, unescape_xml};

/// Reduce an HTML/XML fragment to its text content.
///
/// Parsing is lenient: end-tag mismatches are tolerated and a parse error
/// ends the pass with whatever text was collected so far, so pathological
/// markup degrades to partial text instead of an error.
pub(crate) fn strip_markup(fragment: &str) -> String {
    let mut reader = Reader::from_str(fragment);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut text = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                if let Ok(raw) = std::str::from_utf8(t.as_ref()) {
                    text.push_str(&unescape_xml(raw));
                }
            },
            Ok(Event::CData(ref t)) => {
                if let Ok(raw) = std::str::from_utf8(t.as_ref()) {
                    text.push_str(raw);
                }
            },
            Ok(Event::GeneralRef(ref r)) => match resolve_entity(r.as_ref()) {
                Some(resolved) => text.push_str(&resolved),
                None => {
                    // Unknown entity, keep the reference verbatim
                    text.push('&');
                    text.push_str(&String::from_utf8_lossy(r.as_ref()));
                    text.push(';');
                },
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {},
        }
        buf.clear();
    }
    text
}
