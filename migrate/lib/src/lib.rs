//! Migration of legacy meeting documents and HeHE issues into ekorre.
//!
//! The old archive only carries its metadata in file and directory names.
//! This library turns those names into typed records and pushes each file,
//! with its metadata, into ekorre.
//!
//! ## Pipelines
//!
//! - [`migrate_meetings`] - `<root>/<year>/<prefix>-<yy>-<suffix>.pdf` meeting
//!   documents. Any unrecognized name aborts the run before uploading.
//! - [`migrate_hehe`] - `<papers>/<year>-<number>.pdf` HeHE issues.
//!   Unrecognized names are skipped and reported.
//!
//! ## Building Blocks
//!
//! - [`classify_meeting_dir`] / [`classify_file`] - meeting filename classifier
//! - [`scan_papers_dir`] - HeHE scanner
//! - [`find_duplicates`] - meeting/document-type collision report
//! - [`upload_meeting_documents`] / [`upload_papers`] - sequential uploaders
//! - [`EkorreApi`] - the API seam, implemented over HTTP by [`EkorreClient`]
//! - [`CredentialsProvider`] - where login credentials come from

mod classify;
mod credentials;
mod duplicates;
pub mod ekorre;
mod error;
mod hehe;
mod pipeline;
mod types;
mod upload;

pub use classify::{MeetingScan, SkippedFile, classify_file, classify_meeting_dir, parse_year};
pub use credentials::{
    Credentials, CredentialsProvider, EnvCredentials, PASSWORD_ENV, PromptCredentials,
    StaticCredentials, USERNAME_ENV,
};
pub use duplicates::{Duplicate, find_duplicates};
pub use ekorre::{EkorreApi, EkorreClient, EkorreClientBuilder, FileId, MeetingId};
pub use error::{ClassifyError, CredentialsError, EkorreError, MigrateError};
pub use hehe::{HeheScan, parse_paper_name, scan_papers_dir};
pub use pipeline::{HeheReport, MeetingReport, RunOptions, migrate_hehe, migrate_meetings};
pub use types::{DocumentType, Hehe, MeetingDocument, MeetingKey, MeetingType};
pub use upload::{
    DEFAULT_UPLOAD_PATH, UploadFailure, UploadStage, UploadSummary, upload_meeting_documents,
    upload_papers,
};
