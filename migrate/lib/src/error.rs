//! Error types for the migration library.
//!
//! - [`ClassifyError`] - fatal filename/directory classification errors
//! - [`EkorreError`] - failures talking to the ekorre API
//! - [`CredentialsError`] - failures obtaining login credentials
//! - [`MigrateError`] - top-level error for a whole pipeline run

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while classifying meeting documents.
///
/// Any of these aborts the run before a single upload is attempted.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The meeting-type prefix of a filename is not one of the known ones.
    #[error("unknown meeting type for year {year}: {file}")]
    UnknownMeetingType { year: String, file: String },

    /// The document-type suffix of a filename is not one of the known ones.
    #[error("unknown document type for year {year}: {file}")]
    UnknownDocumentType { year: String, file: String },

    /// A numbered meeting type (`s`, `smextra`) came without a number.
    #[error("meeting type '{prefix}' requires a number: {file}")]
    MissingNumber { prefix: String, file: String },

    /// An unnumbered meeting type (`ht`, `vm`, `vt`) came with a number.
    #[error("meeting type '{prefix}' does not take a number: {file}")]
    UnexpectedNumber { prefix: String, file: String },

    /// The filename does not have the `<prefix>-<yy>-<suffix>` shape at all.
    #[error("malformed meeting document name: {0}")]
    Malformed(String),

    /// The enclosing directory is not a four-digit year.
    #[error("directory '{0}' is not a year")]
    InvalidYear(String),

    /// The source directory could not be walked.
    #[error("failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors raised by calls against the ekorre API.
#[derive(Debug, Error)]
pub enum EkorreError {
    /// Network or protocol failure before a response was received.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("got status code {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The GraphQL response carried an `errors` array.
    #[error("GraphQL error in {operation}: {message}")]
    Graphql { operation: String, message: String },

    /// The mutation completed but reported `false`.
    #[error("{operation} was rejected by the server")]
    Rejected { operation: String },

    /// The response was missing an expected field.
    #[error("response to {operation} is missing '{field}'")]
    MissingField { operation: String, field: String },

    /// Login succeeded at the HTTP level but no session cookie was set.
    #[error("login did not return a session cookie")]
    MissingSession,

    /// The local file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The API base URL could not be joined with an endpoint path.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors raised while obtaining credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The interactive prompt failed or was cancelled.
    #[error("credential prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    /// A required environment variable was not set.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Top-level error for a pipeline run.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Ekorre(#[from] EkorreError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// The source directory does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}
