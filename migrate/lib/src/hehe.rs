//! HeHE archive scanning.
//!
//! Every issue lives in one flat directory named `<year>-<number>.pdf`:
//!
//! ```text
//! papers/
//! ├── 1996-7.pdf
//! ├── 2008-18.pdf
//! └── 2021-4.pdf
//! ```
//!
//! Unlike the meeting classifier, an unparseable name is only recorded as
//! skipped and the file is left for manual upload.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::classify::SkippedFile;
use crate::error::ClassifyError;
use crate::types::Hehe;

static PAPER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{4})-(\d+)\.pdf$").expect("valid HeHE file regex")
});

/// Result of scanning a HeHE directory.
#[derive(Debug, Clone, Default)]
pub struct HeheScan {
    /// Parsed issues, in filename order, without duplicates.
    pub papers: Vec<Hehe>,
    /// Files whose names could not be parsed.
    pub skipped: Vec<SkippedFile>,
    /// Later files claiming an issue that was already seen.
    pub duplicates: Vec<Hehe>,
}

/// Parses a HeHE filename such as `2008-18.pdf` into `(year, number)`.
///
/// ## Examples
///
/// ```
/// use migrate_lib::parse_paper_name;
///
/// assert_eq!(parse_paper_name("2008-18.pdf"), Some((2008, 18)));
/// assert_eq!(parse_paper_name("omslag.pdf"), None);
/// ```
pub fn parse_paper_name(file_name: &str) -> Option<(u16, u32)> {
    let caps = PAPER_NAME.captures(file_name)?;
    let year = caps[1].parse().ok()?;
    let number = caps[2].parse().ok()?;
    Some((year, number))
}

/// Scans `papers_dir` for HeHE issues.
///
/// Unparseable names and duplicate issues are recorded in the returned
/// [`HeheScan`] and skipped; they never fail the scan.
///
/// ## Errors
///
/// Returns an error only if the directory itself cannot be read.
pub fn scan_papers_dir(papers_dir: &Path) -> Result<HeheScan, ClassifyError> {
    info!("Scanning HeHE papers in {}", papers_dir.display());

    let mut scan = HeheScan::default();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(papers_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ClassifyError::Walk {
            path: papers_dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some((year, number)) = parse_paper_name(&file_name) else {
            debug!("Could not parse file {file_name}, consider uploading manually!");
            scan.skipped.push(SkippedFile {
                path: entry.path().to_path_buf(),
                reason: "unrecognized HeHE file name".to_string(),
            });
            continue;
        };

        let hehe = Hehe::new(year, number, entry.path().to_path_buf());
        if seen.insert(hehe.issue()) {
            scan.papers.push(hehe);
        } else {
            debug!("Duplicate file found! Check {hehe}!");
            scan.duplicates.push(hehe);
        }
    }

    info!(
        "Found {} HeHE papers ({} skipped, {} duplicates)",
        scan.papers.len(),
        scan.skipped.len(),
        scan.duplicates.len()
    );

    Ok(scan)
}
