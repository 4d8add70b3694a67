//! EPUB container reading.
//!
//! Resolves `META-INF/container.xml` to the package document, walks the
//! manifest and spine, and assembles a [`Book`] with extracted chapter
//! paragraphs and carried-through static assets. Any unresolvable spine
//! entry aborts the load; partial books are never produced.

use std::collections::HashSet;
use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::book::{Book, Chapter};
use crate::epub::parser::{parse_container_xml, parse_ncx_titles, parse_opf, strip_bom};
use crate::error::{Error, Result};
use crate::util::decode_document;

/// Read an EPUB file from disk into a [`Book`].
///
/// # Example
///
/// ```no_run
/// use bookwash::read_epub;
///
/// let book = read_epub("path/to/book.epub")?;
/// println!("{}: {} paragraphs", book.metadata.title, book.total_paragraphs());
/// # Ok::<(), bookwash::Error>(())
/// ```
pub fn read_epub<P: AsRef<Path>>(path: P) -> Result<Book> {
    let file = std::fs::File::open(path)?;
    read_epub_from_reader(file)
}

/// Read an EPUB from any [`Read`] + [`Seek`] source.
pub fn read_epub_from_reader<R: Read + Seek>(reader: R) -> Result<Book> {
    let mut archive = ZipArchive::new(reader)?;

    // 1. Locate and parse the package document.
    let container = read_archive_file(&mut archive, "META-INF/container.xml")
        .map_err(container_missing("META-INF/container.xml"))?;
    let opf_path = parse_container_xml(&container)?;
    let opf_dir = Path::new(&opf_path)
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    let opf_bytes =
        read_archive_file(&mut archive, &opf_path).map_err(container_missing(&opf_path))?;
    let opf_content = String::from_utf8(strip_bom(&opf_bytes).to_vec())?;
    let opf = parse_opf(&opf_content)?;

    // 2. Chapter titles from the NCX nav map, when present and readable.
    let mut ncx_titles: Vec<(String, String)> = Vec::new();
    if let Some(ref ncx_href) = opf.ncx_href
        && let Ok(bytes) = read_archive_file(&mut archive, &resolve_path(&opf_dir, ncx_href))
    {
        let content = String::from_utf8_lossy(strip_bom(&bytes)).into_owned();
        if let Ok(entries) = parse_ncx_titles(&content) {
            ncx_titles = entries;
        }
    }

    let mut book = Book::new();
    book.metadata = opf.metadata;

    // 3. Walk the spine in document order. Unresolvable entries are errors,
    // not skips.
    let mut spine_hrefs: HashSet<String> = HashSet::new();
    for (index, id) in opf.spine_ids.iter().enumerate() {
        let (href, _media_type) = opf.manifest.get(id).ok_or_else(|| {
            Error::ManifestInconsistent(format!("spine entry '{id}' has no manifest item"))
        })?;

        let full_path = resolve_path(&opf_dir, href);
        let bytes = match read_archive_file(&mut archive, &full_path) {
            Ok(bytes) => bytes,
            Err(Error::ArchiveCorrupt(ZipError::FileNotFound)) => {
                return Err(Error::ManifestInconsistent(format!(
                    "spine item '{id}' resolves to '{full_path}' which is not in the archive"
                )));
            }
            Err(other) => return Err(other),
        };

        // Decode once, at ingestion; everything downstream is text.
        let source = decode_document(&bytes);
        let title = chapter_title(&ncx_titles, href)
            .unwrap_or_else(|| format!("Chapter {}", index + 1));

        book.chapters
            .push(Chapter::from_xhtml(id.clone(), href.clone(), title, source)?);
        spine_hrefs.insert(href.clone());
    }

    // 4. Carry every other manifest asset through unchanged.
    for (href, media_type) in opf.manifest.values() {
        if spine_hrefs.contains(href) || opf.ncx_href.as_deref() == Some(href.as_str()) {
            continue;
        }
        if let Ok(data) = read_archive_file(&mut archive, &resolve_path(&opf_dir, href)) {
            book.add_resource(href.clone(), data, media_type.clone());
        }
    }

    Ok(book)
}

fn container_missing(what: &str) -> impl Fn(Error) -> Error + '_ {
    move |err| match err {
        Error::ArchiveCorrupt(ZipError::FileNotFound) => {
            Error::ContainerMissing(format!("'{what}' not found in archive"))
        }
        other => other,
    }
}

fn read_archive_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Vec<u8>> {
    match archive.by_name(path) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            return Ok(contents);
        }
        Err(ZipError::FileNotFound) => {}
        Err(e) => return Err(e.into()),
    }

    // Fallback: try the percent-decoded path (handles malformed EPUBs whose
    // manifest hrefs are URL-encoded).
    let decoded = percent_encoding::percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| Error::ArchiveCorrupt(ZipError::FileNotFound))?;

    let mut file = archive.by_name(&decoded)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

fn resolve_path(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{base}/{href}")
    }
}

/// Look up a chapter title in the NCX entries by href, ignoring fragments.
fn chapter_title(entries: &[(String, String)], href: &str) -> Option<String> {
    let basename = |s: &str| s.rsplit('/').next().unwrap_or(s).to_string();

    for (src, title) in entries {
        let src = src.split('#').next().unwrap_or(src);
        if src == href || basename(src) == basename(href) {
            return Some(title.clone());
        }
    }
    None
}
