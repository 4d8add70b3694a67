//! Chapter re-serialization.
//!
//! Streams a chapter's original XHTML document into a new serialization,
//! preserving the XML declaration, doctype, `<head>` and every other shell
//! node verbatim, while the `<body>` children are replaced by freshly built
//! `<p>` elements holding the replacement paragraph texts.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::epub::parser::local_name;
use crate::error::{Error, Result};

/// Re-serialize a chapter document with its body replaced by `paragraphs`.
///
/// Paragraph texts are inserted as text content; markup-significant
/// characters are escaped here, exactly once. Returns the new document as a
/// UTF-8 string, or [`Error::DocumentMalformed`] if `source` cannot be
/// parsed or has no `<body>` element. `path` is used for error context.
pub fn rewrite_chapter(source: &str, paragraphs: &[String], path: &str) -> Result<String> {
    let mut reader = Reader::from_str(source);
    let mut writer = Writer::new(Vec::new());

    let malformed = |reason: String| Error::DocumentMalformed {
        path: path.to_string(),
        reason,
    };

    let mut found_body = false;
    // Depth inside the original body while its children are being dropped.
    let mut body_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| malformed(e.to_string()))?;

        if body_depth > 0 {
            // Discard original body content, tracking nesting so the
            // closing </body> is recognized.
            match event {
                Event::Start(_) => body_depth += 1,
                Event::End(e) => {
                    body_depth -= 1;
                    if body_depth == 0 {
                        writer.write_event(Event::End(e))?;
                    }
                }
                Event::Eof => return Err(malformed("unterminated body element".into())),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) if local_name(e.name().as_ref()) == b"body" => {
                found_body = true;
                body_depth = 1;
                writer.write_event(Event::Start(e))?;
                write_paragraphs(&mut writer, paragraphs)?;
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == b"body" => {
                found_body = true;
                let end_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                writer.write_event(Event::Start(e))?;
                write_paragraphs(&mut writer, paragraphs)?;
                writer.write_event(Event::End(BytesEnd::new(end_name)))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !found_body {
        return Err(malformed("no body element".into()));
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_paragraphs(writer: &mut Writer<Vec<u8>>, paragraphs: &[String]) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    for text in paragraphs {
        writer.write_event(Event::Start(BytesStart::new("p")))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("p")))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::extract::extract_paragraphs;

    const SHELL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title>Chapter 3</title>
<link rel="stylesheet" type="text/css" href="../css/main.css"/>
<style>p { text-indent: 1em; }</style>
</head>
<body class="chapter">
<p>Old first.</p>
<div><p>Old nested.</p></div>
</body>
</html>"#;

    fn rewrite(paragraphs: &[&str]) -> String {
        let paragraphs: Vec<String> = paragraphs.iter().map(|s| s.to_string()).collect();
        rewrite_chapter(SHELL, &paragraphs, "ch3.xhtml").unwrap()
    }

    #[test]
    fn test_body_is_replaced() {
        let out = rewrite(&["New first.", "New second."]);

        assert!(out.contains("<p>New first.</p>"));
        assert!(out.contains("<p>New second.</p>"));
        assert!(!out.contains("Old first."));
        assert!(!out.contains("Old nested."));
    }

    #[test]
    fn test_shell_is_preserved() {
        let out = rewrite(&["Text."]);

        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(out.contains("<!DOCTYPE html>"));
        assert!(out.contains("<title>Chapter 3</title>"));
        assert!(out.contains(r#"href="../css/main.css""#));
        assert!(out.contains("text-indent: 1em"));
        assert!(out.contains(r#"<body class="chapter">"#));
        assert!(out.contains("</html>"));
    }

    #[test]
    fn test_markup_characters_escaped_once() {
        let out = rewrite(&["AT&T says 1 < 2 & 3 > 2."]);

        assert!(out.contains("AT&amp;T"));
        assert!(!out.contains("&amp;amp;"));

        // Extracting the rewritten document yields the original text back.
        let paragraphs = extract_paragraphs(&out, "ch3.xhtml").unwrap();
        assert_eq!(paragraphs, vec!["AT&T says 1 < 2 & 3 > 2."]);
    }

    #[test]
    fn test_unicode_text_passes_through() {
        let out = rewrite(&["\u{201c}Caf\u{e9},\u{201d} she said\u{2014}twice."]);

        let paragraphs = extract_paragraphs(&out, "ch3.xhtml").unwrap();
        assert_eq!(
            paragraphs,
            vec!["\u{201c}Caf\u{e9},\u{201d} she said\u{2014}twice."]
        );
    }

    #[test]
    fn test_empty_body_element() {
        let shell = r#"<?xml version="1.0"?><html><head><title>T</title></head><body/></html>"#;
        let out = rewrite_chapter(shell, &["Added.".to_string()], "c.xhtml").unwrap();

        assert!(out.contains("<p>Added.</p>"));
        assert!(out.contains("</body>"));
    }

    #[test]
    fn test_missing_body_is_document_malformed() {
        let shell = r#"<?xml version="1.0"?><html><head><title>T</title></head></html>"#;
        let err = rewrite_chapter(shell, &[], "broken.xhtml").unwrap_err();

        assert!(
            matches!(err, Error::DocumentMalformed { ref path, .. } if path == "broken.xhtml")
        );
    }

    #[test]
    fn test_unparseable_shell_is_document_malformed() {
        let shell = "<html><body><p>text</div></html>";
        let err = rewrite_chapter(shell, &[], "broken.xhtml").unwrap_err();

        assert!(matches!(err, Error::DocumentMalformed { .. }));
    }
}
