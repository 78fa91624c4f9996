//! Store + detector integration: the booking flow against a real (in-memory)
//! session store.

use chrono::{NaiveDate, Utc};
use tutorbase_core::model::{Session, SessionDraft, SessionStatus};
use tutorbase_core::schedule::{detect_session_conflicts, ConflictKind};
use tutorbase_core::storage::SessionStore;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn booked_session(teacher: &str, students: &[&str], start: &str, end: &str) -> Session {
    Session::new(
        teacher.to_string(),
        day(),
        start.to_string(),
        end.to_string(),
    )
    .with_students(students.iter().map(|s| s.to_string()).collect())
    .with_subject("Maths".to_string())
}

#[test]
fn save_and_roundtrip_session() {
    let store = SessionStore::open_in_memory().unwrap();
    let session = booked_session("T1", &["A"], "09:00", "10:00");
    store.save_session(&session).unwrap();

    let loaded = store.get_session(&session.id).unwrap();
    assert_eq!(loaded.teacher_id, "T1");
    assert_eq!(loaded.student_ids, vec!["A".to_string()]);
    assert_eq!(loaded.date, day());
    assert_eq!(loaded.status, SessionStatus::Planned);
    assert_eq!(loaded.start_time, "09:00");
}

#[test]
fn list_sessions_ordered_by_date_and_time() {
    let store = SessionStore::open_in_memory().unwrap();
    let later = booked_session("T1", &["A"], "14:00", "15:00");
    let earlier = booked_session("T2", &["B"], "09:00", "10:00");
    store.save_session(&later).unwrap();
    store.save_session(&earlier).unwrap();

    let all = store.list_sessions().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, earlier.id);
    assert_eq!(all[1].id, later.id);
}

#[test]
fn booking_against_store_snapshot_detects_teacher_conflict() {
    let store = SessionStore::open_in_memory().unwrap();
    let existing = booked_session("T1", &["A"], "09:00", "10:00");
    store.save_session(&existing).unwrap();

    let candidate = SessionDraft {
        date: Some(day()),
        start_time: Some("09:30".to_string()),
        end_time: Some("10:30".to_string()),
        teacher_id: Some("T1".to_string()),
        student_ids: vec!["B".to_string()],
        ..Default::default()
    };

    let snapshot = store.list_sessions().unwrap();
    let conflicts = detect_session_conflicts(&candidate, &snapshot).unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::TeacherDoubleBooked);
    assert_eq!(conflicts[0].conflicting_sessions[0].id, existing.id);
}

#[test]
fn rescheduling_a_session_does_not_conflict_with_itself() {
    let store = SessionStore::open_in_memory().unwrap();
    let existing = booked_session("T1", &["A"], "09:00", "10:00");
    store.save_session(&existing).unwrap();

    // Shift by 15 minutes; still overlaps the stored version of itself.
    let mut draft = SessionDraft::from(&existing);
    draft.start_time = Some("09:15".to_string());
    draft.end_time = Some("10:15".to_string());

    let snapshot = store.list_sessions().unwrap();
    let conflicts = detect_session_conflicts(&draft, &snapshot).unwrap();
    assert!(conflicts.is_empty());
}

#[test]
fn cancelled_session_frees_its_slot() {
    let store = SessionStore::open_in_memory().unwrap();
    let mut existing = booked_session("T1", &["A"], "09:00", "10:00");
    store.save_session(&existing).unwrap();

    // Cancel via full-record replacement.
    existing.status = SessionStatus::Cancelled;
    existing.updated_at = Utc::now();
    store.save_session(&existing).unwrap();

    let candidate = SessionDraft {
        date: Some(day()),
        start_time: Some("09:00".to_string()),
        end_time: Some("10:00".to_string()),
        teacher_id: Some("T1".to_string()),
        student_ids: vec!["A".to_string()],
        ..Default::default()
    };

    let snapshot = store.list_sessions().unwrap();
    let conflicts = detect_session_conflicts(&candidate, &snapshot).unwrap();
    assert!(conflicts.is_empty());
}

#[test]
fn sessions_on_filters_by_date() {
    let store = SessionStore::open_in_memory().unwrap();
    let mut other_day = booked_session("T1", &["A"], "09:00", "10:00");
    other_day.date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    let today = booked_session("T2", &["B"], "11:00", "12:00");
    store.save_session(&other_day).unwrap();
    store.save_session(&today).unwrap();

    let on_day = store.sessions_on(day()).unwrap();
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].id, today.id);
}

#[test]
fn delete_session_removes_record() {
    let store = SessionStore::open_in_memory().unwrap();
    let session = booked_session("T1", &["A"], "09:00", "10:00");
    store.save_session(&session).unwrap();

    store.delete_session(&session.id).unwrap();
    assert!(store.get_session(&session.id).is_err());
    assert!(store.delete_session(&session.id).is_err());
}
