//! EPUB container writing.
//!
//! Reassembles a [`Book`] into a valid zip container: `mimetype` first and
//! uncompressed, generated `META-INF/container.xml`, `content.opf`, and
//! `toc.ncx`, chapter documents in spine order, and every carried asset
//! copied through unchanged. Disk writes stage into a temporary file and
//! publish by atomic rename only on full success.

use std::io::{Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::book::Book;
use crate::error::Result;

/// Write a [`Book`] to an EPUB file on disk.
///
/// The archive is staged in the destination directory and renamed over
/// `path` only once fully written, so a failure mid-write never replaces a
/// previously valid output.
pub fn write_epub<P: AsRef<Path>>(book: &Book, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let staging = NamedTempFile::new_in(dir)?;
    write_epub_to_writer(book, staging.as_file())?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write a [`Book`] to any [`Write`] + [`Seek`] destination.
pub fn write_epub_to_writer<W: Write + Seek>(book: &Book, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    let options_stored =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let options_deflate =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    // 1. mimetype must be the first entry, stored without compression.
    zip.start_file("mimetype", options_stored)?;
    zip.write_all(b"application/epub+zip")?;

    // 2. META-INF/container.xml
    zip.start_file("META-INF/container.xml", options_deflate)?;
    zip.write_all(CONTAINER_XML.as_bytes())?;

    // Generate the identifier once for consistency between OPF and NCX.
    let identifier = if book.metadata.identifier.is_empty() {
        format!("urn:uuid:{}", uuid_v4())
    } else {
        book.metadata.identifier.clone()
    };

    // 3. content.opf
    let opf = generate_opf(book, &identifier);
    zip.start_file("OEBPS/content.opf", options_deflate)?;
    zip.write_all(opf.as_bytes())?;

    // 4. toc.ncx
    let ncx = generate_ncx(book, &identifier);
    zip.start_file("OEBPS/toc.ncx", options_deflate)?;
    zip.write_all(ncx.as_bytes())?;

    // 5. Chapter documents in spine order.
    for chapter in &book.chapters {
        zip.start_file(format!("OEBPS/{}", chapter.href), options_deflate)?;
        zip.write_all(chapter.source.as_bytes())?;
    }

    // 6. Carried-through assets.
    for (href, resource) in &book.resources {
        if href == "toc.ncx" || href == "content.opf" {
            continue;
        }
        zip.start_file(format!("OEBPS/{href}"), options_deflate)?;
        zip.write_all(&resource.data)?;
    }

    zip.finish()?;
    Ok(())
}

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

fn generate_opf(book: &Book, identifier: &str) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
    );

    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(&book.metadata.title)
    ));
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(identifier)
    ));

    let language = if book.metadata.language.is_empty() {
        "en"
    } else {
        &book.metadata.language
    };
    opf.push_str(&format!("    <dc:language>{language}</dc:language>\n"));

    for author in &book.metadata.authors {
        opf.push_str(&format!(
            "    <dc:creator>{}</dc:creator>\n",
            escape_xml(author)
        ));
    }

    opf.push_str("  </metadata>\n  <manifest>\n");

    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );

    for chapter in &book.chapters {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            escape_xml(&chapter.id),
            escape_xml(&chapter.href)
        ));
    }

    for (href, resource) in &book.resources {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            href_to_id(href),
            escape_xml(href),
            escape_xml(&resource.media_type)
        ));
    }

    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");

    for chapter in &book.chapters {
        opf.push_str(&format!(
            "    <itemref idref=\"{}\"/>\n",
            escape_xml(&chapter.id)
        ));
    }

    opf.push_str("  </spine>\n</package>\n");
    opf
}

fn generate_ncx(book: &Book, identifier: &str) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content=""#,
    );
    ncx.push_str(&escape_xml(identifier));
    ncx.push_str(
        r#""/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>"#,
    );
    ncx.push_str(&escape_xml(&book.metadata.title));
    ncx.push_str(
        r#"</text>
  </docTitle>
  <navMap>
"#,
    );

    for (index, chapter) in book.chapters.iter().enumerate() {
        let play_order = index + 1;
        ncx.push_str(&format!(
            "    <navPoint id=\"navpoint-{play_order}\" playOrder=\"{play_order}\">\n"
        ));
        ncx.push_str(&format!(
            "      <navLabel>\n        <text>{}</text>\n      </navLabel>\n",
            escape_xml(&chapter.title)
        ));
        ncx.push_str(&format!(
            "      <content src=\"{}\"/>\n    </navPoint>\n",
            escape_xml(&chapter.href)
        ));
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn href_to_id(href: &str) -> String {
    format!("res-{}", href.replace(['/', '.', ' ', '-'], "_"))
}

/// Generate a simple UUID v4 (random, not cryptographically secure).
fn uuid_v4() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345);

    let mut state = seed;
    let mut bytes = [0u8; 16];
    for byte in &mut bytes {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        *byte = (state >> 33) as u8;
    }

    // Set version (4) and variant (2)
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0],
        bytes[1],
        bytes[2],
        bytes[3],
        bytes[4],
        bytes[5],
        bytes[6],
        bytes[7],
        bytes[8],
        bytes[9],
        bytes[10],
        bytes[11],
        bytes[12],
        bytes[13],
        bytes[14],
        bytes[15]
    )
}
