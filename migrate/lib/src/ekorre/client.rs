//! HTTP implementation of [`EkorreApi`].

use std::path::Path;
use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{Span, debug, info, instrument};
use url::Url;

use super::queries;
use super::{EkorreApi, FileId, MeetingId};
use crate::credentials::Credentials;
use crate::error::EkorreError;
use crate::types::{DocumentType, MeetingType};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring an [`EkorreClient`].
#[derive(Debug)]
pub struct EkorreClientBuilder {
    base_url: Url,
    timeout: Duration,
}

impl EkorreClientBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`EkorreClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// upload URL cannot be derived from the base URL.
    pub fn build(self) -> Result<EkorreClient, EkorreError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let upload_url = Url::parse(&format!(
            "{}/files/upload",
            self.base_url.as_str().trim_end_matches('/')
        ))?;

        Ok(EkorreClient {
            client,
            graphql_url: self.base_url,
            upload_url,
            session: None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

/// HTTP client for ekorre.
///
/// Call [`EkorreClient::login`] before any other operation; the session
/// cookies it receives are sent with every later request.
///
/// ## Examples
///
/// ```rust,no_run
/// use migrate_lib::{Credentials, EkorreClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = EkorreClient::new(Url::parse("http://localhost:5000")?)?;
/// client.login(&Credentials::new("aa0000bb-s", "test")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EkorreClient {
    client: reqwest::Client,
    graphql_url: Url,
    upload_url: Url,
    session: Option<String>,
}

impl EkorreClient {
    /// Creates a new builder for the API at `base_url`.
    pub fn builder(base_url: Url) -> EkorreClientBuilder {
        EkorreClientBuilder::new(base_url)
    }

    /// Creates a client with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, EkorreError> {
        Self::builder(base_url).build()
    }

    /// Whether [`EkorreClient::login`] has stored a session.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Logs in and keeps the returned session cookies.
    ///
    /// Every `Set-Cookie` header is reduced to its `name=value` pair. Domain,
    /// path and expiry attributes are ignored.
    ///
    /// ## Errors
    ///
    /// Returns an error if the request fails, the server reports a GraphQL
    /// error, or no cookie was set.
    #[instrument(
        skip_all,
        fields(username = %credentials.username, http.status_code = tracing::field::Empty)
    )]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), EkorreError> {
        let body = json!({
            "query": queries::LOGIN,
            "variables": {
                "username": credentials.username,
                "password": credentials.password,
            }
        });

        let response = self
            .client
            .post(self.graphql_url.clone())
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .map(str::to_string)
            .collect();

        let parsed: GraphqlResponse = response.json().await?;
        graphql_data(parsed, "login")?;

        if cookies.is_empty() {
            return Err(EkorreError::MissingSession);
        }

        info!("Logged in to ekorre");
        self.session = Some(cookies.join("; "));
        Ok(())
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.post(url);
        match &self.session {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    /// Runs a GraphQL mutation and returns the `data.<operation>` field.
    async fn mutate(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<Value, EkorreError> {
        debug!(operation, %variables, "GraphQL request");

        let response = self
            .post(self.graphql_url.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: GraphqlResponse = response.json().await?;
        graphql_data(parsed, operation)
    }
}

/// Turns a non-success status into [`EkorreError::HttpStatus`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, EkorreError> {
    let status = response.status();
    Span::current().record("http.status_code", status.as_u16());

    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());

    Err(EkorreError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

/// Extracts `data.<operation>`, failing on GraphQL errors or a null field.
fn graphql_data(response: GraphqlResponse, operation: &str) -> Result<Value, EkorreError> {
    if !response.errors.is_empty() {
        let message = response
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(EkorreError::Graphql {
            operation: operation.to_string(),
            message,
        });
    }

    response
        .data
        .and_then(|mut data| data.get_mut(operation).map(Value::take))
        .filter(|value| !value.is_null())
        .ok_or_else(|| EkorreError::MissingField {
            operation: operation.to_string(),
            field: operation.to_string(),
        })
}

/// Reads an id that the server may encode as either a string or a number.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn expect_true(value: Value, operation: &str) -> Result<(), EkorreError> {
    match value {
        Value::Bool(true) => Ok(()),
        _ => Err(EkorreError::Rejected {
            operation: operation.to_string(),
        }),
    }
}

impl EkorreApi for EkorreClient {
    #[instrument(
        name = "upload_file",
        skip(self),
        fields(http.status_code = tracing::field::Empty)
    )]
    async fn upload_file(&self, path: &Path, upload_path: &str) -> Result<FileId, EkorreError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| EkorreError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file.pdf".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("path", upload_path.to_string())
            .part("file", part);

        let response = self
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: Value = response.json().await?;
        let id = body
            .get("id")
            .and_then(id_string)
            .ok_or_else(|| EkorreError::MissingField {
                operation: "upload".to_string(),
                field: "id".to_string(),
            })?;

        debug!(file_id = %id, "uploaded");
        Ok(FileId(id))
    }

    #[instrument(
        name = "add_meeting",
        skip(self),
        fields(http.status_code = tracing::field::Empty)
    )]
    async fn add_meeting(
        &self,
        meeting_type: MeetingType,
        number: Option<u8>,
        year: u16,
    ) -> Result<MeetingId, EkorreError> {
        let value = self
            .mutate(
                "addMeeting",
                queries::ADD_MEETING,
                json!({ "type": meeting_type, "number": number, "year": year }),
            )
            .await?;

        id_string(&value)
            .map(MeetingId)
            .ok_or_else(|| EkorreError::MissingField {
                operation: "addMeeting".to_string(),
                field: "id".to_string(),
            })
    }

    #[instrument(
        name = "add_file_to_meeting",
        skip(self),
        fields(http.status_code = tracing::field::Empty)
    )]
    async fn add_file_to_meeting(
        &self,
        meeting_id: &MeetingId,
        file_id: &FileId,
        document_type: DocumentType,
    ) -> Result<(), EkorreError> {
        let value = self
            .mutate(
                "addFileToMeeting",
                queries::ADD_FILE_TO_MEETING,
                json!({
                    "meetingId": meeting_id.0,
                    "fileId": file_id.0,
                    "fileType": document_type,
                }),
            )
            .await?;
        expect_true(value, "addFileToMeeting")
    }

    #[instrument(
        name = "add_hehe",
        skip(self),
        fields(http.status_code = tracing::field::Empty)
    )]
    async fn add_hehe(&self, file_id: &FileId, number: u32, year: u16) -> Result<(), EkorreError> {
        let value = self
            .mutate(
                "addHehe",
                queries::ADD_HEHE,
                json!({ "fileId": file_id.0, "number": number, "year": year }),
            )
            .await?;
        expect_true(value, "addHehe")
    }
}
