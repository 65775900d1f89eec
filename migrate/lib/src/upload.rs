//! Sequential, best-effort upload of classified records to ekorre.
//!
//! Every record is attempted exactly once. A failure is logged, recorded in
//! the [`UploadSummary`] and the uploader moves on to the next record; there
//! is no retry and nothing already uploaded is rolled back.

use std::collections::HashMap;
use std::path::PathBuf;

use strum::Display;
use tracing::{debug, info};

use crate::ekorre::{EkorreApi, MeetingId};
use crate::types::{Hehe, MeetingDocument, MeetingKey};

/// Storage directory used when none is given.
pub const DEFAULT_UPLOAD_PATH: &str = "/";

/// Step of the upload that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UploadStage {
    #[strum(serialize = "upload file")]
    UploadFile,
    #[strum(serialize = "create meeting")]
    CreateMeeting,
    #[strum(serialize = "attach file to meeting")]
    AttachFile,
    #[strum(serialize = "register HeHE")]
    RegisterHehe,
}

/// One record that did not make it all the way into ekorre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub path: PathBuf,
    pub stage: UploadStage,
    pub message: String,
}

/// Counts of what an upload run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Files stored through the upload endpoint.
    pub files_uploaded: usize,
    /// Meetings created through `addMeeting`.
    pub meetings_created: usize,
    /// Files attached to a meeting, or registered as a HeHE issue.
    pub files_registered: usize,
    pub failures: Vec<UploadFailure>,
}

impl UploadSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: PathBuf, stage: UploadStage, message: impl Into<String>) {
        let message = message.into();
        debug!("Failed to {stage} for {}: {message}", path.display());
        self.failures.push(UploadFailure {
            path,
            stage,
            message,
        });
    }
}

/// Uploads meeting documents, creating each meeting the first time one of
/// its documents is seen.
///
/// A meeting whose creation failed is not attempted again in the same run;
/// its remaining documents are still uploaded but reported as unattached.
pub async fn upload_meeting_documents<E: EkorreApi>(
    api: &E,
    documents: &[MeetingDocument],
    upload_path: &str,
) -> UploadSummary {
    let mut summary = UploadSummary::default();
    let mut meetings: HashMap<MeetingKey, Option<MeetingId>> = HashMap::new();
    let total = documents.len();

    for (index, doc) in documents.iter().enumerate() {
        let path = doc.path().to_path_buf();
        let key = doc.meeting_key();
        info!(
            "[{}/{total}] {key} {} ({})",
            index + 1,
            doc.document_type(),
            path.display()
        );

        let file_id = match api.upload_file(&path, upload_path).await {
            Ok(id) => id,
            Err(e) => {
                summary.fail(path, UploadStage::UploadFile, e.to_string());
                continue;
            }
        };
        summary.files_uploaded += 1;

        if !meetings.contains_key(&key) {
            let created = match api
                .add_meeting(doc.meeting_type(), doc.number(), doc.year())
                .await
            {
                Ok(id) => {
                    info!("Created meeting {key} with id {id}");
                    summary.meetings_created += 1;
                    Some(id)
                }
                Err(e) => {
                    summary.fail(path.clone(), UploadStage::CreateMeeting, e.to_string());
                    None
                }
            };
            meetings.insert(key.clone(), created);
        }

        let Some(Some(meeting_id)) = meetings.get(&key) else {
            summary.fail(
                path,
                UploadStage::AttachFile,
                format!("meeting {key} could not be created, file {file_id} is unattached"),
            );
            continue;
        };

        match api
            .add_file_to_meeting(meeting_id, &file_id, doc.document_type())
            .await
        {
            Ok(()) => summary.files_registered += 1,
            Err(e) => summary.fail(path, UploadStage::AttachFile, e.to_string()),
        }
    }

    info!(
        "Uploaded {} files, created {} meetings, attached {} files ({} failures)",
        summary.files_uploaded,
        summary.meetings_created,
        summary.files_registered,
        summary.failures.len()
    );

    summary
}

/// Uploads HeHE issues and registers each one with `addHehe`.
pub async fn upload_papers<E: EkorreApi>(
    api: &E,
    papers: &[Hehe],
    upload_path: &str,
) -> UploadSummary {
    let mut summary = UploadSummary::default();
    let total = papers.len();

    for (index, paper) in papers.iter().enumerate() {
        let path = paper.path().to_path_buf();
        info!("[{}/{total}] HeHE {paper} ({})", index + 1, path.display());

        let file_id = match api.upload_file(&path, upload_path).await {
            Ok(id) => id,
            Err(e) => {
                summary.fail(path, UploadStage::UploadFile, e.to_string());
                continue;
            }
        };
        summary.files_uploaded += 1;

        match api.add_hehe(&file_id, paper.number(), paper.year()).await {
            Ok(()) => summary.files_registered += 1,
            Err(e) => summary.fail(path, UploadStage::RegisterHehe, e.to_string()),
        }
    }

    info!(
        "Uploaded {} HeHE files, registered {} ({} failures)",
        summary.files_uploaded,
        summary.files_registered,
        summary.failures.len()
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ekorre::FileId;
    use crate::error::EkorreError;
    use crate::types::{DocumentType, MeetingType};
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Upload(String),
        AddMeeting(MeetingType, Option<u8>, u16),
        Attach(String, String, DocumentType),
        AddHehe(String, u32, u16),
    }

    /// In-memory ekorre that records every call.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<Call>>,
        failing_uploads: HashSet<String>,
        failing_meetings: bool,
    }

    impl RecordingApi {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls().iter().filter(|c| pred(c)).count()
        }

        fn record(&self, call: Call) -> usize {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call);
            calls.len()
        }
    }

    fn rejected(operation: &str) -> EkorreError {
        EkorreError::HttpStatus {
            status: 500,
            message: format!("{operation} failed"),
        }
    }

    impl EkorreApi for RecordingApi {
        async fn upload_file(
            &self,
            path: &Path,
            _upload_path: &str,
        ) -> Result<FileId, EkorreError> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            let n = self.record(Call::Upload(name.clone()));
            if self.failing_uploads.contains(&name) {
                return Err(rejected("upload"));
            }
            Ok(FileId(format!("file-{n}")))
        }

        async fn add_meeting(
            &self,
            meeting_type: MeetingType,
            number: Option<u8>,
            year: u16,
        ) -> Result<MeetingId, EkorreError> {
            let n = self.record(Call::AddMeeting(meeting_type, number, year));
            if self.failing_meetings {
                return Err(rejected("addMeeting"));
            }
            Ok(MeetingId(format!("meeting-{n}")))
        }

        async fn add_file_to_meeting(
            &self,
            meeting_id: &MeetingId,
            file_id: &FileId,
            document_type: DocumentType,
        ) -> Result<(), EkorreError> {
            self.record(Call::Attach(
                meeting_id.0.clone(),
                file_id.0.clone(),
                document_type,
            ));
            Ok(())
        }

        async fn add_hehe(
            &self,
            file_id: &FileId,
            number: u32,
            year: u16,
        ) -> Result<(), EkorreError> {
            self.record(Call::AddHehe(file_id.0.clone(), number, year));
            Ok(())
        }
    }

    fn doc(
        meeting_type: MeetingType,
        number: Option<u8>,
        document_type: DocumentType,
        name: &str,
    ) -> MeetingDocument {
        MeetingDocument::new(
            meeting_type,
            document_type,
            number,
            PathBuf::from("2021").join(name),
            2021,
        )
    }

    fn sample_documents() -> Vec<MeetingDocument> {
        vec![
            doc(MeetingType::Htm, None, DocumentType::Documents, "ht-21-handlingar.pdf"),
            doc(MeetingType::Htm, None, DocumentType::Summons, "ht-21-kallelse.pdf"),
            doc(MeetingType::Sm, Some(19), DocumentType::Documents, "s19-21-handlingar.pdf"),
            doc(MeetingType::Sm, Some(19), DocumentType::Protocol, "s19-21-protokoll.pdf"),
            doc(
                MeetingType::Sm,
                Some(19),
                DocumentType::LateDocuments,
                "s19-21-sena handlingar.pdf",
            ),
        ]
    }

    #[tokio::test]
    async fn test_all_success_makes_expected_calls() {
        let api = RecordingApi::default();
        let docs = sample_documents();

        let summary = upload_meeting_documents(&api, &docs, DEFAULT_UPLOAD_PATH).await;

        assert!(summary.is_clean());
        assert_eq!(summary.files_uploaded, 5);
        assert_eq!(summary.meetings_created, 2);
        assert_eq!(summary.files_registered, 5);

        assert_eq!(api.count(|c| matches!(c, Call::Upload(_))), 5);
        assert_eq!(api.count(|c| matches!(c, Call::AddMeeting(..))), 2);
        assert_eq!(api.count(|c| matches!(c, Call::Attach(..))), 5);
    }

    #[tokio::test]
    async fn test_calls_follow_upload_create_attach_order() {
        let api = RecordingApi::default();
        let docs = vec![doc(
            MeetingType::Extra,
            Some(1),
            DocumentType::Protocol,
            "smextra1-20-protokoll.pdf",
        )];

        upload_meeting_documents(&api, &docs, "/").await;

        assert_eq!(
            api.calls(),
            vec![
                Call::Upload("smextra1-20-protokoll.pdf".to_string()),
                Call::AddMeeting(MeetingType::Extra, Some(1), 2021),
                Call::Attach(
                    "meeting-2".to_string(),
                    "file-1".to_string(),
                    DocumentType::Protocol
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_documents_of_one_meeting_share_its_id() {
        let api = RecordingApi::default();
        let docs = sample_documents();

        upload_meeting_documents(&api, &docs, "/").await;

        let meeting_ids: HashSet<String> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Attach(meeting, _, _) => Some(meeting),
                _ => None,
            })
            .collect();
        assert_eq!(meeting_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_upload_does_not_stop_later_documents() {
        let api = RecordingApi {
            failing_uploads: HashSet::from(["ht-21-handlingar.pdf".to_string()]),
            ..Default::default()
        };
        let docs = sample_documents();

        let summary = upload_meeting_documents(&api, &docs, "/").await;

        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].stage, UploadStage::UploadFile);
        assert_eq!(summary.files_uploaded, 4);
        assert_eq!(summary.files_registered, 4);
        assert_eq!(summary.meetings_created, 2);
    }

    #[tokio::test]
    async fn test_failed_meeting_is_not_retried() {
        let api = RecordingApi {
            failing_meetings: true,
            ..Default::default()
        };
        let docs = sample_documents();

        let summary = upload_meeting_documents(&api, &docs, "/").await;

        assert_eq!(api.count(|c| matches!(c, Call::AddMeeting(..))), 2);
        assert_eq!(api.count(|c| matches!(c, Call::Attach(..))), 0);
        assert_eq!(summary.files_uploaded, 5);
        assert_eq!(summary.meetings_created, 0);
        // Two creation failures plus one unattached report per document.
        assert_eq!(summary.failures.len(), 7);
        assert_eq!(
            summary
                .failures
                .iter()
                .filter(|f| f.stage == UploadStage::CreateMeeting)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let api = RecordingApi::default();
        let summary = upload_meeting_documents(&api, &[], "/").await;
        assert_eq!(summary, UploadSummary::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_papers_are_uploaded_and_registered() {
        let api = RecordingApi {
            failing_uploads: HashSet::from(["2008-18.pdf".to_string()]),
            ..Default::default()
        };
        let papers = vec![
            Hehe::new(1996, 7, PathBuf::from("papers/1996-7.pdf")),
            Hehe::new(2008, 18, PathBuf::from("papers/2008-18.pdf")),
            Hehe::new(2021, 4, PathBuf::from("papers/2021-4.pdf")),
        ];

        let summary = upload_papers(&api, &papers, "/hehe").await;

        assert_eq!(summary.files_uploaded, 2);
        assert_eq!(summary.files_registered, 2);
        assert_eq!(summary.failures.len(), 1);
        assert!(api.calls().contains(&Call::AddHehe("file-1".to_string(), 7, 1996)));
        assert!(api.calls().contains(&Call::AddHehe("file-4".to_string(), 4, 2021)));
    }
}
