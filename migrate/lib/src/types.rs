//! Core record types produced by the classification passes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Kind of meeting a document belongs to.
///
/// The string forms match ekorre's `MeetingType` GraphQL enum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum MeetingType {
    /// Höstterminsmöte
    #[strum(serialize = "HTM")]
    #[serde(rename = "HTM")]
    Htm,
    /// Styrelsemöte
    #[strum(serialize = "SM")]
    #[serde(rename = "SM")]
    Sm,
    /// Valmöte
    #[strum(serialize = "VM")]
    #[serde(rename = "VM")]
    Vm,
    /// Vårterminsmöte
    #[strum(serialize = "VTM")]
    #[serde(rename = "VTM")]
    Vtm,
    /// Extrainsatt sektionsmöte
    Extra,
}

impl MeetingType {
    /// Whether meetings of this type are numbered within a year.
    pub fn is_numbered(self) -> bool {
        matches!(self, MeetingType::Sm | MeetingType::Extra)
    }
}

/// Kind of document attached to a meeting.
///
/// The string forms match ekorre's `MeetingDocumentType` GraphQL enum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    /// Kallelse
    Summons,
    /// Handlingar
    Documents,
    /// Sena handlingar
    LateDocuments,
    /// Protokoll
    Protocol,
    /// Bilaga
    Appendix,
}

/// A classified meeting document.
///
/// Built once during the directory pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDocument {
    meeting_type: MeetingType,
    document_type: DocumentType,
    number: Option<u8>,
    path: PathBuf,
    year: u16,
}

impl MeetingDocument {
    pub fn new(
        meeting_type: MeetingType,
        document_type: DocumentType,
        number: Option<u8>,
        path: PathBuf,
        year: u16,
    ) -> Self {
        Self {
            meeting_type,
            document_type,
            number,
            path,
            year,
        }
    }

    pub fn meeting_type(&self) -> MeetingType {
        self.meeting_type
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// The meeting's number within its year, if the type is numbered.
    pub fn number(&self) -> Option<u8> {
        self.number
    }

    /// Integer form of the number, `-1` for unnumbered meeting types.
    pub fn sequence_number(&self) -> i32 {
        self.number.map_or(-1, i32::from)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Run-local key identifying the meeting this document belongs to.
    pub fn meeting_key(&self) -> MeetingKey {
        MeetingKey(format!(
            "{}{}-{}",
            self.meeting_type,
            self.sequence_number(),
            self.year
        ))
    }
}

/// `{meetingType}{number}-{year}`, e.g. `SM19-2021` or `HTM-1-2021`.
///
/// Only used to avoid creating the same meeting twice in one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeetingKey(String);

impl MeetingKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// One issue of the HeHE periodical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hehe {
    year: u16,
    number: u32,
    path: PathBuf,
}

impl Hehe {
    pub fn new(year: u16, number: u32, path: PathBuf) -> Self {
        Self { year, number, path }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identity of the issue, ignoring which file it came from.
    pub fn issue(&self) -> (u16, u32) {
        (self.year, self.number)
    }
}

impl fmt::Display for Hehe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn doc(meeting_type: MeetingType, number: Option<u8>) -> MeetingDocument {
        MeetingDocument::new(
            meeting_type,
            DocumentType::Protocol,
            number,
            PathBuf::from("x.pdf"),
            2021,
        )
    }

    #[test]
    fn meeting_type_uses_graphql_names() {
        assert_eq!(MeetingType::Htm.to_string(), "HTM");
        assert_eq!(MeetingType::Sm.to_string(), "SM");
        assert_eq!(MeetingType::Vtm.to_string(), "VTM");
        assert_eq!(MeetingType::Extra.to_string(), "Extra");
        assert_eq!(MeetingType::from_str("VM").unwrap(), MeetingType::Vm);
    }

    #[test]
    fn document_type_uses_camel_case() {
        assert_eq!(DocumentType::LateDocuments.to_string(), "lateDocuments");
        assert_eq!(DocumentType::Summons.to_string(), "summons");
        assert_eq!(
            serde_json::to_string(&DocumentType::LateDocuments).unwrap(),
            "\"lateDocuments\""
        );
    }

    #[test]
    fn unnumbered_meeting_has_sentinel_number() {
        let d = doc(MeetingType::Htm, None);
        assert_eq!(d.sequence_number(), -1);
        assert_eq!(d.meeting_key().as_str(), "HTM-1-2021");
    }

    #[test]
    fn numbered_meeting_key_includes_number() {
        let d = doc(MeetingType::Sm, Some(19));
        assert_eq!(d.sequence_number(), 19);
        assert_eq!(d.meeting_key().to_string(), "SM19-2021");
    }

    #[test]
    fn hehe_displays_year_and_number() {
        let h = Hehe::new(2008, 18, PathBuf::from("2008-18.pdf"));
        assert_eq!(h.to_string(), "2008-18");
        assert_eq!(h.issue(), (2008, 18));
    }
}
