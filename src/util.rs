//! Text decoding helpers.
//!
//! Chapter bytes are decoded to `String` exactly once, at ingestion. All
//! later stages (extraction, the ledger, the review engine, regeneration)
//! operate on already-decoded text and never touch raw bytes again.

use std::borrow::Cow;

use memchr::memmem;

/// Decode bytes to a string, handling various encodings.
///
/// 1. First tries strict UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252 (common in old ebooks)
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    // Windows-1252 is a superset of ISO-8859-1 and decodes any byte sequence.
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding name from an XML declaration, if one is present.
///
/// Scans only the first 100 bytes for `<?xml ... encoding="..." ?>`.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = memmem::find(prefix, b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = memmem::find_iter(after_xml, b"ncoding=")
        .find(|&p| p > 0 && after_xml[p - 1].eq_ignore_ascii_case(&b'e'))?;
    let after_enc = &after_xml[enc_pos + 8..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

/// Decode a chapter document, consulting its XML declaration for the
/// encoding when the bytes are not valid UTF-8.
pub fn decode_document(bytes: &[u8]) -> String {
    let hint = extract_xml_encoding(bytes);
    decode_text(bytes, hint).into_owned()
}
