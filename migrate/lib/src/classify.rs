//! Meeting-document filename classification.
//!
//! The legacy archive is laid out as `<root>/<year>/<file>.pdf`, where each
//! file is named `<prefix>[<N>]-<yy>-<suffix>.pdf`:
//!
//! ```text
//! 2021
//! ├── ht-21-kallelse.pdf
//! ├── s19-21-handlingar.pdf
//! ├── s19-21-sena handlingar.pdf
//! ├── smextra1-20-protokoll.pdf
//! └── vt-21-protokoll.pdf
//! ```
//!
//! Classification is all-or-nothing: a single name outside the taxonomy
//! fails the whole pass.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::ClassifyError;
use crate::types::{DocumentType, MeetingDocument, MeetingType};

/// `<prefix><optional number>-<yy>-<suffix>`, matched against the lowercased stem.
static FILE_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+?)(\d{1,2})?-(\d{1,2})-(.+)$").expect("valid meeting file regex")
});

/// A file the classifier saw but did not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of classifying a meeting-document archive.
#[derive(Debug, Clone, Default)]
pub struct MeetingScan {
    /// Classified documents in year-directory, then filename order.
    pub documents: Vec<MeetingDocument>,
    /// Files ignored because they are not candidate meeting documents.
    pub skipped: Vec<SkippedFile>,
}

/// Parses the meeting-type prefix and optional number.
fn parse_meeting_type(
    prefix: &str,
    number: Option<&str>,
    file: &str,
    year: &str,
) -> Result<(MeetingType, Option<u8>), ClassifyError> {
    let meeting_type = match prefix {
        "ht" => MeetingType::Htm,
        "s" => MeetingType::Sm,
        "vm" => MeetingType::Vm,
        "vt" => MeetingType::Vtm,
        "smextra" => MeetingType::Extra,
        _ => {
            return Err(ClassifyError::UnknownMeetingType {
                year: year.to_string(),
                file: file.to_string(),
            });
        }
    };

    // The regex caps the number at two digits, so it always fits.
    let number = number.and_then(|n| n.parse::<u8>().ok());

    match (meeting_type.is_numbered(), number) {
        (true, None) => Err(ClassifyError::MissingNumber {
            prefix: prefix.to_string(),
            file: file.to_string(),
        }),
        (false, Some(_)) => Err(ClassifyError::UnexpectedNumber {
            prefix: prefix.to_string(),
            file: file.to_string(),
        }),
        _ => Ok((meeting_type, number)),
    }
}

/// Parses the document-type suffix.
fn parse_document_type(
    suffix: &str,
    file: &str,
    year: &str,
) -> Result<DocumentType, ClassifyError> {
    match suffix.trim() {
        "kallelse" => Ok(DocumentType::Summons),
        "handlingar" => Ok(DocumentType::Documents),
        "sena handlingar" => Ok(DocumentType::LateDocuments),
        "protokoll" => Ok(DocumentType::Protocol),
        "bilaga" => Ok(DocumentType::Appendix),
        _ => Err(ClassifyError::UnknownDocumentType {
            year: year.to_string(),
            file: file.to_string(),
        }),
    }
}

/// Parses a year directory name such as `2021`.
pub fn parse_year(dir_name: &str) -> Result<u16, ClassifyError> {
    if dir_name.len() != 4 || !dir_name.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClassifyError::InvalidYear(dir_name.to_string()));
    }
    dir_name
        .parse()
        .map_err(|_| ClassifyError::InvalidYear(dir_name.to_string()))
}

/// Classifies a single meeting document.
///
/// `path` must point at a file whose parent directory is named after the
/// year the meeting was held.
///
/// ## Errors
///
/// Returns a [`ClassifyError`] if the year directory, the meeting-type prefix
/// or the document-type suffix is not recognized.
///
/// ## Examples
///
/// ```
/// use migrate_lib::{classify_file, DocumentType, MeetingType};
/// use std::path::Path;
///
/// let doc = classify_file(Path::new("2021/s19-21-handlingar.pdf")).unwrap();
/// assert_eq!(doc.meeting_type(), MeetingType::Sm);
/// assert_eq!(doc.number(), Some(19));
/// assert_eq!(doc.document_type(), DocumentType::Documents);
/// assert_eq!(doc.year(), 2021);
/// ```
pub fn classify_file(path: &Path) -> Result<MeetingDocument, ClassifyError> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let year_dir = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let year = parse_year(&year_dir)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let caps = FILE_STEM
        .captures(&stem)
        .ok_or_else(|| ClassifyError::Malformed(file.clone()))?;

    let (meeting_type, number) = parse_meeting_type(
        &caps[1],
        caps.get(2).map(|m| m.as_str()),
        &file,
        &year_dir,
    )?;
    let document_type = parse_document_type(&caps[4], &file, &year_dir)?;

    debug!(%file, %meeting_type, %document_type, year, "classified");

    Ok(MeetingDocument::new(
        meeting_type,
        document_type,
        number,
        path.to_path_buf(),
        year,
    ))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Classifies every meeting document under `root`.
///
/// Only files exactly one directory deep (`<root>/<year>/<file>`) are
/// considered. Hidden files, non-PDF files and files outside a year directory
/// are recorded in [`MeetingScan::skipped`].
///
/// ## Errors
///
/// Returns the first [`ClassifyError`] encountered; no partial result is
/// returned.
pub fn classify_meeting_dir(root: &Path) -> Result<MeetingScan, ClassifyError> {
    info!("Classifying meeting documents in {}", root.display());

    let mut scan = MeetingScan::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && is_hidden(e)));

    for entry in walker {
        let entry = entry.map_err(|source| ClassifyError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if entry.file_type().is_dir() {
            if entry.depth() == 1 {
                debug!("Entering year directory {}", entry.path().display());
            } else {
                skip(&mut scan, entry.path(), "nested directory");
            }
            continue;
        }

        let path = entry.path();
        if entry.depth() == 1 {
            skip(&mut scan, path, "not inside a year directory");
        } else if is_hidden(&entry) {
            skip(&mut scan, path, "hidden file");
        } else if !is_pdf(path) {
            skip(&mut scan, path, "not a PDF");
        } else {
            scan.documents.push(classify_file(path)?);
        }
    }

    info!(
        "Classified {} meeting documents ({} skipped)",
        scan.documents.len(),
        scan.skipped.len()
    );

    Ok(scan)
}

fn skip(scan: &mut MeetingScan, path: &Path, reason: &str) {
    debug!("Skipping {}: {reason}", path.display());
    scan.skipped.push(SkippedFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    });
}
