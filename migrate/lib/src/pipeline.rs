//! End-to-end migration runs.
//!
//! Both pipelines follow the same shape: scan the source directory into an
//! immutable list of records, report anything suspicious, then (unless this
//! is a dry run) log in and upload the records one at a time.

use std::path::Path;
use std::time::Duration;

use tracing::info;
use url::Url;

use crate::classify::{MeetingScan, classify_meeting_dir};
use crate::credentials::CredentialsProvider;
use crate::duplicates::{Duplicate, find_duplicates};
use crate::ekorre::EkorreClient;
use crate::error::MigrateError;
use crate::hehe::{HeheScan, scan_papers_dir};
use crate::upload::{DEFAULT_UPLOAD_PATH, UploadSummary, upload_meeting_documents, upload_papers};

/// Settings shared by both pipelines.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Storage directory the files are uploaded into.
    pub upload_path: String,
    /// Scan and report only; never log in or upload.
    pub dry_run: bool,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            dry_run: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of a meeting-document run.
#[derive(Debug, Clone)]
pub struct MeetingReport {
    pub scan: MeetingScan,
    pub duplicates: Vec<Duplicate>,
    /// `None` for dry runs.
    pub upload: Option<UploadSummary>,
}

/// Outcome of a HeHE run.
#[derive(Debug, Clone)]
pub struct HeheReport {
    pub scan: HeheScan,
    /// `None` for dry runs.
    pub upload: Option<UploadSummary>,
}

fn ensure_dir(path: &Path) -> Result<(), MigrateError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(MigrateError::NotADirectory(path.to_path_buf()))
    }
}

async fn connect(
    api_url: &Url,
    credentials: &impl CredentialsProvider,
    options: &RunOptions,
) -> Result<EkorreClient, MigrateError> {
    let credentials = credentials.credentials()?;
    let mut client = EkorreClient::builder(api_url.clone())
        .timeout(options.timeout)
        .build()?;
    client.login(&credentials).await?;
    Ok(client)
}

/// Migrates a `<root>/<year>/<file>.pdf` meeting archive.
///
/// Classification happens before anything else; if any file fails to
/// classify the run ends with an error and ekorre is never contacted.
///
/// ## Errors
///
/// Returns an error if the source is not a directory, a file cannot be
/// classified, credentials cannot be obtained or login fails. Failures of
/// individual uploads are reported in the returned summary instead.
pub async fn migrate_meetings(
    source: &Path,
    api_url: &Url,
    credentials: &impl CredentialsProvider,
    options: &RunOptions,
) -> Result<MeetingReport, MigrateError> {
    ensure_dir(source)?;

    let scan = classify_meeting_dir(source)?;
    let duplicates = find_duplicates(&scan.documents);

    if options.dry_run {
        info!("Dry run, not uploading");
        return Ok(MeetingReport {
            scan,
            duplicates,
            upload: None,
        });
    }

    let client = connect(api_url, credentials, options).await?;
    let upload = upload_meeting_documents(&client, &scan.documents, &options.upload_path).await;

    Ok(MeetingReport {
        scan,
        duplicates,
        upload: Some(upload),
    })
}

/// Migrates a flat `<year>-<number>.pdf` HeHE archive.
///
/// ## Errors
///
/// Returns an error if the source is not a readable directory, credentials
/// cannot be obtained or login fails.
pub async fn migrate_hehe(
    source: &Path,
    api_url: &Url,
    credentials: &impl CredentialsProvider,
    options: &RunOptions,
) -> Result<HeheReport, MigrateError> {
    ensure_dir(source)?;

    let scan = scan_papers_dir(source)?;

    if options.dry_run {
        info!("Dry run, not uploading");
        return Ok(HeheReport { scan, upload: None });
    }

    let client = connect(api_url, credentials, options).await?;
    let upload = upload_papers(&client, &scan.papers, &options.upload_path).await;

    Ok(HeheReport {
        scan,
        upload: Some(upload),
    })
}
