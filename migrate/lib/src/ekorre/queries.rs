//! GraphQL documents sent to ekorre.

pub const LOGIN: &str = r#"
mutation login($username: String!, $password: String!) {
  login(username: $username, password: $password) {
    username
  }
}
"#;

pub const ADD_MEETING: &str = r#"
mutation addMeeting($type: MeetingType!, $number: Int, $year: Int) {
  addMeeting(type: $type, number: $number, year: $year)
}
"#;

pub const ADD_FILE_TO_MEETING: &str = r#"
mutation addFileToMeeting($meetingId: ID!, $fileId: ID!, $fileType: MeetingDocumentType!) {
  addFileToMeeting(meetingId: $meetingId, fileId: $fileId, fileType: $fileType)
}
"#;

pub const ADD_HEHE: &str = r#"
mutation addHehe($fileId: ID!, $number: Int!, $year: Int!) {
  addHehe(fileId: $fileId, number: $number, year: $year)
}
"#;
