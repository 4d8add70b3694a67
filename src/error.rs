//! Error types for bookwash operations.

use thiserror::Error;

/// Errors that can occur while reading, regenerating, or reviewing a book.
#[derive(Error, Debug)]
pub enum Error {
    /// The container is not a readable zip archive.
    #[error("corrupt archive: {0}")]
    ArchiveCorrupt(#[from] zip::result::ZipError),

    /// No `META-INF/container.xml`, no rootfile entry, or the package
    /// document it points at does not exist.
    #[error("missing container structure: {0}")]
    ContainerMissing(String),

    /// The spine references a manifest id with no matching item or file.
    #[error("inconsistent manifest: {0}")]
    ManifestInconsistent(String),

    /// A chapter document could not be parsed as XHTML with a body element.
    #[error("malformed chapter document {path}: {reason}")]
    DocumentMalformed { path: String, reason: String },

    /// A persisted ledger is missing required fields or is not valid JSON.
    #[error("corrupt ledger: {0}")]
    LedgerCorrupt(String),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
