//! Chapter text extraction.
//!
//! Walks a chapter's XHTML event stream and collects the rendered text of
//! block-level paragraph containers in document order. Inline markup is
//! dropped, entity references resolve to the characters they represent, and
//! whitespace runs collapse to single spaces. Input must already be decoded
//! text; bytes are decoded once at ingestion and never re-decoded here.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::epub::parser::{local_name, resolve_entity};
use crate::error::{Error, Result};

/// Block-level elements whose text content forms one paragraph.
const PARAGRAPH_TAGS: &[&[u8]] = &[
    b"p",
    b"h1",
    b"h2",
    b"h3",
    b"h4",
    b"h5",
    b"h6",
    b"blockquote",
    b"li",
];

fn is_paragraph_tag(local: &[u8]) -> bool {
    PARAGRAPH_TAGS.contains(&local)
}

fn is_skipped_tag(local: &[u8]) -> bool {
    local == b"script" || local == b"style"
}

/// Extract ordered paragraph texts from one chapter's XHTML document.
///
/// `path` is used only for error context.
pub fn extract_paragraphs(source: &str, path: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(source);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut buf_text = String::new();
    // Nesting depth of open paragraph containers; nested blocks fold into
    // the outermost one.
    let mut capture_depth = 0usize;
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if is_skipped_tag(local) {
                    skip_depth += 1;
                } else if skip_depth == 0 && is_paragraph_tag(local) {
                    if capture_depth == 0 {
                        buf_text.clear();
                    } else {
                        buf_text.push(' ');
                    }
                    capture_depth += 1;
                } else if capture_depth > 0 && skip_depth == 0 && local == b"br" {
                    buf_text.push(' ');
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if capture_depth > 0 && skip_depth == 0 && local == b"br" {
                    buf_text.push(' ');
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if is_skipped_tag(local) {
                    skip_depth = skip_depth.saturating_sub(1);
                } else if capture_depth > 0 && is_paragraph_tag(local) {
                    capture_depth -= 1;
                    if capture_depth == 0 {
                        flush(&mut buf_text, &mut paragraphs);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if capture_depth > 0 && skip_depth == 0 {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if capture_depth > 0 && skip_depth == 0 {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if capture_depth > 0 && skip_depth == 0 {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        buf_text.push_str(&resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::DocumentMalformed {
                    path: path.to_string(),
                    reason: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Collapse whitespace runs and push the paragraph unless it is empty.
fn flush(buf: &mut String, paragraphs: &mut Vec<String>) {
    let collapsed = buf.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        paragraphs.push(collapsed);
    }
    buf.clear();
}
