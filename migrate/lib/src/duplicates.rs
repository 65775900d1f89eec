//! Duplicate detection for classified meeting documents.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::types::{DocumentType, MeetingDocument, MeetingKey};

/// Two or more files that classify to the same meeting and document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub meeting_key: MeetingKey,
    pub document_type: DocumentType,
    /// The file that claimed the slot first.
    pub first: PathBuf,
    /// The later file with the same identity.
    pub duplicate: PathBuf,
}

impl Duplicate {
    /// `{meeting key}/{document type}`, e.g. `SM19-2021/protocol`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.meeting_key, self.document_type)
    }
}

/// Reports every document whose meeting key and document type were already
/// claimed by an earlier document.
///
/// Each colliding record after the first yields exactly one [`Duplicate`].
/// Nothing is removed from `documents`; reconciling is left to whoever reads
/// the output.
pub fn find_duplicates(documents: &[MeetingDocument]) -> Vec<Duplicate> {
    let mut seen: HashMap<(MeetingKey, DocumentType), &MeetingDocument> = HashMap::new();
    let mut duplicates = Vec::new();

    for doc in documents {
        let id = (doc.meeting_key(), doc.document_type());
        match seen.get(&id) {
            Some(first) => {
                let duplicate = Duplicate {
                    meeting_key: id.0,
                    document_type: id.1,
                    first: first.path().to_path_buf(),
                    duplicate: doc.path().to_path_buf(),
                };
                debug!(
                    "Duplicate document found! Check {} ({} and {})",
                    duplicate.id(),
                    duplicate.first.display(),
                    duplicate.duplicate.display()
                );
                duplicates.push(duplicate);
            }
            None => {
                seen.insert(id, doc);
            }
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeetingType;

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

    #[test]
    fn distinct_documents_have_no_duplicates() {
        let docs = vec![
            doc(MeetingType::Sm, Some(1), DocumentType::Summons, "s1-21-kallelse.pdf"),
            doc(MeetingType::Sm, Some(1), DocumentType::Protocol, "s1-21-protokoll.pdf"),
            doc(MeetingType::Sm, Some(2), DocumentType::Protocol, "s2-21-protokoll.pdf"),
            doc(MeetingType::Htm, None, DocumentType::Protocol, "ht-21-protokoll.pdf"),
        ];
        assert!(find_duplicates(&docs).is_empty());
    }

    #[tracing_test::traced_test]
    #[test]
    fn same_meeting_and_type_is_logged_exactly_once() {
        let docs = vec![
            doc(MeetingType::Sm, Some(19), DocumentType::Protocol, "s19-21-protokoll.pdf"),
            doc(MeetingType::Sm, Some(19), DocumentType::Protocol, "S19-21-Protokoll.pdf"),
            doc(MeetingType::Vm, None, DocumentType::Summons, "vm-21-kallelse.pdf"),
        ];

        let duplicates = find_duplicates(&docs);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].id(), "SM19-2021/protocol");
        assert_eq!(duplicates[0].first, PathBuf::from("2021/s19-21-protokoll.pdf"));

        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("Duplicate document found")).count() {
                1 => Ok(()),
                n => Err(format!("expected one duplicate message, got {n}")),
            }
        });
    }

    #[test]
    fn every_extra_copy_is_reported() {
        let docs = vec![
            doc(MeetingType::Extra, Some(1), DocumentType::Appendix, "a.pdf"),
            doc(MeetingType::Extra, Some(1), DocumentType::Appendix, "b.pdf"),
            doc(MeetingType::Extra, Some(1), DocumentType::Appendix, "c.pdf"),
        ];
        let duplicates = find_duplicates(&docs);
        assert_eq!(duplicates.len(), 2);
        assert!(duplicates.iter().all(|d| d.first == PathBuf::from("2021/a.pdf")));
    }
}
