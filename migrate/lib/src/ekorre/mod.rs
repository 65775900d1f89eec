//! Access to the ekorre API.
//!
//! [`EkorreApi`] is the seam the uploaders are written against.
//! [`EkorreClient`] implements it over HTTP: a GraphQL endpoint at the API
//! base URL and a multipart upload endpoint at `<base>/files/upload`.

mod client;
mod queries;

use std::fmt;
use std::future::Future;
use std::path::Path;

pub use client::{EkorreClient, EkorreClientBuilder};

use crate::error::EkorreError;
use crate::types::{DocumentType, MeetingType};

/// Opaque id of a file stored in ekorre.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(pub String);

/// Opaque id of a meeting created in ekorre.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeetingId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations the migration needs from ekorre.
///
/// Implementations are expected to already be authenticated.
pub trait EkorreApi: Send + Sync {
    /// Uploads the file at `path` into the storage directory `upload_path`.
    fn upload_file(
        &self,
        path: &Path,
        upload_path: &str,
    ) -> impl Future<Output = Result<FileId, EkorreError>> + Send;

    /// Creates a meeting. `number` is `None` for unnumbered meeting types.
    fn add_meeting(
        &self,
        meeting_type: MeetingType,
        number: Option<u8>,
        year: u16,
    ) -> impl Future<Output = Result<MeetingId, EkorreError>> + Send;

    /// Attaches an uploaded file to a meeting as the given document type.
    fn add_file_to_meeting(
        &self,
        meeting_id: &MeetingId,
        file_id: &FileId,
        document_type: DocumentType,
    ) -> impl Future<Output = Result<(), EkorreError>> + Send;

    /// Registers an uploaded file as a HeHE issue.
    fn add_hehe(
        &self,
        file_id: &FileId,
        number: u32,
        year: u16,
    ) -> impl Future<Output = Result<(), EkorreError>> + Send;
}
