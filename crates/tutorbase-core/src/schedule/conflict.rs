use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::model::{Session, SessionDraft, SessionStatus};
use crate::schedule::interval::TimeRange;

/// The category of a detected scheduling conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    TeacherDoubleBooked,
    StudentDoubleBooked,
    /// Reserved for a room/location-capacity check; no detection pass
    /// produces it yet.
    LocationUnavailable,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TeacherDoubleBooked => write!(f, "teacher-double-booked"),
            Self::StudentDoubleBooked => write!(f, "student-double-booked"),
            Self::LocationUnavailable => write!(f, "location-unavailable"),
        }
    }
}

/// A detection result. Produced fresh on every call, never stored.
///
/// All colliding sessions of one category are batched into a single
/// conflict; consumers expect at most one message per category.
#[derive(Debug, Clone, Serialize)]
pub struct Conflict<'a> {
    pub subject_session_id: String,
    pub kind: ConflictKind,
    pub message: String,
    pub conflicting_sessions: Vec<&'a Session>,
}

/// Detect the conflicts `candidate` would create if saved.
///
/// Pure and idempotent: borrows the session snapshot read-only and may be
/// re-run on every field change. A candidate missing its date or either
/// time endpoint is not yet evaluable and yields no conflicts. Malformed
/// time strings on the candidate or on any same-day session propagate as
/// errors rather than reading as "no conflict".
///
/// Returns at most one conflict per category: a teacher pass (same teacher,
/// same date, overlapping time) and a student pass (any shared student,
/// same date, overlapping time). Both exclude the candidate's own id, so an
/// edited session never collides with its stored version, and both ignore
/// cancelled sessions. `conflicting_sessions` follows the snapshot's
/// iteration order.
pub fn detect_session_conflicts<'a>(
    candidate: &SessionDraft,
    sessions: &'a [Session],
) -> Result<Vec<Conflict<'a>>> {
    let (Some(date), Some(start), Some(end)) = (
        candidate.date,
        candidate.start_time.as_deref(),
        candidate.end_time.as_deref(),
    ) else {
        return Ok(Vec::new());
    };

    let range = TimeRange::parse(start, end)?;
    let candidate_id = candidate.effective_id();
    let mut conflicts = Vec::new();

    if let Some(teacher_id) = candidate.teacher_id.as_deref() {
        let mut hits: Vec<&Session> = Vec::new();
        for existing in sessions {
            if existing.id == candidate_id
                || existing.status == SessionStatus::Cancelled
                || existing.date != date
                || existing.teacher_id != teacher_id
            {
                continue;
            }
            if range.overlaps(&existing.time_range()?) {
                hits.push(existing);
            }
        }
        if !hits.is_empty() {
            debug!(
                teacher_id,
                count = hits.len(),
                "teacher double-booking detected"
            );
            conflicts.push(Conflict {
                subject_session_id: candidate_id.to_string(),
                kind: ConflictKind::TeacherDoubleBooked,
                message: format!(
                    "Teacher {teacher_id} is already booked for {} overlapping session(s) on {date}",
                    hits.len()
                ),
                conflicting_sessions: hits,
            });
        }
    }

    if !candidate.student_ids.is_empty() {
        let mut hits: Vec<&Session> = Vec::new();
        for existing in sessions {
            if existing.id == candidate_id
                || existing.status == SessionStatus::Cancelled
                || existing.date != date
            {
                continue;
            }
            // Any shared student suffices; the sets need not be equal.
            let shares_student = existing
                .student_ids
                .iter()
                .any(|id| candidate.student_ids.contains(id));
            if !shares_student {
                continue;
            }
            if range.overlaps(&existing.time_range()?) {
                hits.push(existing);
            }
        }
        if !hits.is_empty() {
            debug!(count = hits.len(), "student double-booking detected");
            conflicts.push(Conflict {
                subject_session_id: candidate_id.to_string(),
                kind: ConflictKind::StudentDoubleBooked,
                message: format!(
                    "One or more students are already booked for {} overlapping session(s) on {date}",
                    hits.len()
                ),
                conflicting_sessions: hits,
            });
        }
    }

    Ok(conflicts)
}
