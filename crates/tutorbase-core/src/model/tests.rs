use chrono::NaiveDate;

use crate::model::session::validate_session_input;
use crate::model::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[test]
fn test_session_creation() {
    let session = Session::new(
        "T1".to_string(),
        day(),
        "09:00".to_string(),
        "10:00".to_string(),
    );

    assert_eq!(session.teacher_id, "T1");
    assert_eq!(session.date, day());
    assert_eq!(session.status, SessionStatus::Planned);
    assert_eq!(session.location, Location::Centre);
    assert_eq!(session.session_type, SessionType::OneToOne);
    assert!(session.student_ids.is_empty());
    assert!(!session.id.is_empty());
    assert_ne!(session.id, DRAFT_SESSION_ID);
}

#[test]
fn test_session_builder() {
    let session = Session::new(
        "T1".to_string(),
        day(),
        "14:00".to_string(),
        "15:30".to_string(),
    )
    .with_students(vec!["A".to_string(), "B".to_string()])
    .with_subject("Physics".to_string())
    .with_year_level("Year 11".to_string())
    .with_location(Location::Online)
    .with_session_type(SessionType::Group);

    assert_eq!(session.student_ids.len(), 2);
    assert_eq!(session.subject, "Physics");
    assert_eq!(session.year_level.as_deref(), Some("Year 11"));
    assert_eq!(session.location, Location::Online);
    assert_eq!(session.session_type, SessionType::Group);
}

#[test]
fn test_draft_from_session_keeps_id() {
    let session = Session::new(
        "T1".to_string(),
        day(),
        "09:00".to_string(),
        "10:00".to_string(),
    )
    .with_students(vec!["A".to_string()]);

    let draft = SessionDraft::from(&session);
    assert_eq!(draft.effective_id(), session.id);
    assert_eq!(draft.date, Some(day()));
    assert_eq!(draft.student_ids, vec!["A".to_string()]);
}

#[test]
fn test_empty_draft_evaluates_as_new() {
    let draft = SessionDraft::default();
    assert_eq!(draft.effective_id(), DRAFT_SESSION_ID);
}

#[test]
fn test_validate_accepts_well_formed_input() {
    assert!(validate_session_input("T1", &["A".to_string()], "09:00", "10:00").is_ok());
}

#[test]
fn test_validate_rejects_zero_duration() {
    let err = validate_session_input("T1", &["A".to_string()], "09:00", "09:00");
    assert!(err.is_err());
}

#[test]
fn test_validate_rejects_inverted_times() {
    let err = validate_session_input("T1", &["A".to_string()], "10:00", "09:00");
    assert!(err.is_err());
}

#[test]
fn test_validate_rejects_empty_teacher_and_students() {
    assert!(validate_session_input("", &["A".to_string()], "09:00", "10:00").is_err());
    assert!(validate_session_input("T1", &[], "09:00", "10:00").is_err());
}

#[test]
fn test_validate_rejects_duplicate_students() {
    let students = vec!["A".to_string(), "A".to_string()];
    assert!(validate_session_input("T1", &students, "09:00", "10:00").is_err());
}

#[test]
fn test_validate_rejects_malformed_time() {
    assert!(validate_session_input("T1", &["A".to_string()], "9am", "10:00").is_err());
}

#[test]
fn test_status_roundtrip() {
    let statuses = [
        SessionStatus::Planned,
        SessionStatus::Completed,
        SessionStatus::Cancelled,
        SessionStatus::NoShow,
        SessionStatus::Rescheduled,
    ];

    for status in statuses {
        let s = status.to_string();
        let parsed: SessionStatus = s.parse().unwrap();
        assert_eq!(status, parsed);
    }
}

#[test]
fn test_location_roundtrip() {
    for location in [Location::Online, Location::Centre, Location::Home] {
        let parsed: Location = location.to_string().parse().unwrap();
        assert_eq!(location, parsed);
    }
}

#[test]
fn test_session_type_roundtrip() {
    for kind in [SessionType::OneToOne, SessionType::Group] {
        let parsed: SessionType = kind.to_string().parse().unwrap();
        assert_eq!(kind, parsed);
    }
}

#[test]
fn test_enum_serde_matches_display() {
    let json = serde_json::to_string(&SessionStatus::NoShow).unwrap();
    assert_eq!(json, "\"no-show\"");
    let json = serde_json::to_string(&SessionType::OneToOne).unwrap();
    assert_eq!(json, "\"one-to-one\"");
    let json = serde_json::to_string(&Location::Centre).unwrap();
    assert_eq!(json, "\"centre\"");
}
