//! EPUB container round-trip tests.

use std::io::{Cursor, Write};

use bookwash::epub::read_epub_from_reader;
use bookwash::{Book, Chapter, Error, Metadata, read_epub, write_epub};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

fn chapter_source(title: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>\n")).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{title}</title><link rel="stylesheet" type="text/css" href="css/main.css"/></head>
<body>
{body}</body>
</html>"#
    )
}

fn sample_book() -> Book {
    let mut book = Book::new();
    book.metadata = Metadata::new("Wuthering Depths")
        .with_author("E. Example")
        .with_language("en")
        .with_identifier("urn:isbn:9780000000000");

    book.chapters.push(
        Chapter::from_xhtml(
            "ch1",
            "ch1.xhtml",
            "Chapter 1",
            chapter_source(
                "Chapter 1",
                &[
                    "\u{201c}It\u{2019}s late,\u{201d} she said\u{2014}too late.",
                    "The caf\u{e9} was empty\u{2026} almost.",
                ],
            ),
        )
        .unwrap(),
    );
    book.chapters.push(
        Chapter::from_xhtml(
            "ch2",
            "ch2.xhtml",
            "Chapter 2",
            chapter_source("Chapter 2", &["A second chapter, briefly."]),
        )
        .unwrap(),
    );
    book.add_resource("css/main.css", b"p { margin: 0; }".to_vec(), "text/css");
    book
}

#[test]
fn test_write_and_read_back() {
    let book = sample_book();

    let temp = NamedTempFile::new().expect("Failed to create temp file");
    write_epub(&book, temp.path()).expect("Failed to write EPUB");

    let book2 = read_epub(temp.path()).expect("Failed to read written EPUB");

    assert_eq!(book2.metadata.title, "Wuthering Depths");
    assert_eq!(book2.metadata.authors, vec!["E. Example"]);
    assert_eq!(book2.metadata.identifier, "urn:isbn:9780000000000");
    assert_eq!(book2.chapters.len(), 2);
    assert_eq!(book2.chapters[0].title, "Chapter 1");
    assert!(book2.resources.contains_key("css/main.css"));
}

#[test]
fn test_roundtrip_preserves_unicode_paragraphs() {
    let book = sample_book();

    // First round trip.
    let mut buffer = Cursor::new(Vec::new());
    bookwash::epub::write_epub_to_writer(&book, &mut buffer).unwrap();
    buffer.set_position(0);
    let book2 = read_epub_from_reader(&mut buffer).unwrap();

    for (a, b) in book.chapters.iter().zip(&book2.chapters) {
        assert_eq!(a.paragraphs, b.paragraphs);
    }

    // Second round trip: regenerating with zero edits is idempotent.
    let mut buffer2 = Cursor::new(Vec::new());
    bookwash::epub::write_epub_to_writer(&book2, &mut buffer2).unwrap();
    buffer2.set_position(0);
    let book3 = read_epub_from_reader(&mut buffer2).unwrap();

    for (a, b) in book2.chapters.iter().zip(&book3.chapters) {
        assert_eq!(a.paragraphs, b.paragraphs);
    }
}

#[test]
fn test_mimetype_is_first_entry_and_stored() {
    let book = sample_book();

    let mut buffer = Cursor::new(Vec::new());
    bookwash::epub::write_epub_to_writer(&book, &mut buffer).unwrap();
    buffer.set_position(0);

    let mut archive = zip::ZipArchive::new(buffer).unwrap();
    let first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
}

#[test]
fn test_assets_carried_through_unchanged() {
    let book = sample_book();

    let mut buffer = Cursor::new(Vec::new());
    bookwash::epub::write_epub_to_writer(&book, &mut buffer).unwrap();
    buffer.set_position(0);
    let book2 = read_epub_from_reader(&mut buffer).unwrap();

    assert_eq!(
        book2.resources.get("css/main.css").map(|r| r.data.as_slice()),
        Some(b"p { margin: 0; }".as_slice())
    );
}

#[test]
fn test_not_a_zip_is_archive_corrupt() {
    let data = Cursor::new(b"this is not a zip".to_vec());
    assert!(matches!(
        read_epub_from_reader(data),
        Err(Error::ArchiveCorrupt(_))
    ));
}

#[test]
fn test_zip_without_container_is_container_missing() {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        zip.start_file("mimetype", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"application/epub+zip").unwrap();
        zip.finish().unwrap();
    }
    buffer.set_position(0);

    assert!(matches!(
        read_epub_from_reader(buffer),
        Err(Error::ContainerMissing(_))
    ));
}

fn epub_with_opf(opf: &str, extra: &[(&str, &str)]) -> Cursor<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default();

        zip.start_file("mimetype", options).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        zip.start_file("META-INF/container.xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
        )
        .unwrap();

        zip.start_file("content.opf", options).unwrap();
        zip.write_all(opf.as_bytes()).unwrap();

        for (name, content) in extra {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }
    buffer.set_position(0);
    buffer
}

#[test]
fn test_spine_entry_without_manifest_item_is_inconsistent() {
    let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Bad</dc:title></metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="ghost"/></spine>
</package>"#;

    let buffer = epub_with_opf(opf, &[("ch1.xhtml", "<html><body/></html>")]);
    assert!(matches!(
        read_epub_from_reader(buffer),
        Err(Error::ManifestInconsistent(_))
    ));
}

#[test]
fn test_spine_item_missing_from_archive_is_inconsistent() {
    let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Bad</dc:title></metadata>
  <manifest>
    <item id="ch1" href="missing.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"#;

    let buffer = epub_with_opf(opf, &[]);
    assert!(matches!(
        read_epub_from_reader(buffer),
        Err(Error::ManifestInconsistent(_))
    ));
}

#[test]
fn test_latin1_chapter_decodes_without_mojibake() {
    let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Legacy</dc:title></metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"#;

    // Latin-1 encoded chapter with a declared encoding.
    let mut chapter = Vec::new();
    chapter.extend_from_slice(
        br#"<?xml version="1.0" encoding="ISO-8859-1"?><html><head><title>L</title></head><body><p>caf"#,
    );
    chapter.push(0xe9);
    chapter.extend_from_slice(b"</p></body></html>");

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default();
        zip.start_file("mimetype", options).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();
        zip.start_file("META-INF/container.xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#,
        )
        .unwrap();
        zip.start_file("content.opf", options).unwrap();
        zip.write_all(opf.as_bytes()).unwrap();
        zip.start_file("ch1.xhtml", options).unwrap();
        zip.write_all(&chapter).unwrap();
        zip.finish().unwrap();
    }
    buffer.set_position(0);

    let book = read_epub_from_reader(buffer).unwrap();
    assert_eq!(book.chapters[0].paragraphs, vec!["caf\u{e9}"]);
}
