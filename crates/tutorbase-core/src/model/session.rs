use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TutorbaseError};
use crate::schedule::interval::TimeRange;

/// Placeholder id for a draft that has not been saved yet.
pub const DRAFT_SESSION_ID: &str = "new";

/// Validate inputs for creating or replacing a session.
///
/// Runs before conflict detection; a session that fails here never reaches
/// the detector. Time strings must be well-formed `HH:mm` and the interval
/// must have positive duration (zero-length sessions are rejected).
pub fn validate_session_input(
    teacher_id: &str,
    student_ids: &[String],
    start_time: &str,
    end_time: &str,
) -> Result<()> {
    if teacher_id.trim().is_empty() {
        return Err(TutorbaseError::InvalidInput(
            "teacher id cannot be empty".into(),
        ));
    }
    if student_ids.is_empty() {
        return Err(TutorbaseError::InvalidInput(
            "a session needs at least one student".into(),
        ));
    }
    let unique: HashSet<&String> = student_ids.iter().collect();
    if unique.len() != student_ids.len() {
        return Err(TutorbaseError::InvalidInput(
            "student ids must be unique within a session".into(),
        ));
    }
    let range = TimeRange::parse(start_time, end_time)?;
    if range.end() <= range.start() {
        return Err(TutorbaseError::InvalidInput(format!(
            "end time {end_time} must be after start time {start_time}"
        )));
    }
    Ok(())
}

/// A scheduled one-to-one or group tutoring session.
///
/// Times are wall-clock `HH:mm` strings; they are parsed when intervals are
/// compared so malformed data fails loudly at the comparison site rather
/// than silently producing "no conflict".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub teacher_id: String,
    pub student_ids: Vec<String>,
    pub subject: String,
    pub year_level: Option<String>,
    pub location: Location,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        teacher_id: String,
        date: NaiveDate,
        start_time: String,
        end_time: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            date,
            start_time,
            end_time,
            teacher_id,
            student_ids: Vec::new(),
            subject: String::new(),
            year_level: None,
            location: Location::Centre,
            session_type: SessionType::OneToOne,
            status: SessionStatus::Planned,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_students(mut self, student_ids: Vec<String>) -> Self {
        self.student_ids = student_ids;
        self
    }

    pub fn with_subject(mut self, subject: String) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_year_level(mut self, year_level: String) -> Self {
        self.year_level = Some(year_level);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_session_type(mut self, session_type: SessionType) -> Self {
        self.session_type = session_type;
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Parse this session's time slot into a comparable interval.
    pub fn time_range(&self) -> Result<TimeRange> {
        TimeRange::parse(&self.start_time, &self.end_time)
    }

    /// Validate the stored record as a whole.
    pub fn validate(&self) -> Result<()> {
        validate_session_input(
            &self.teacher_id,
            &self.student_ids,
            &self.start_time,
            &self.end_time,
        )
    }
}

/// A candidate session under evaluation in a booking form.
///
/// All trigger fields are optional: the booking UI re-runs conflict
/// detection on every field change, including states where the slot is only
/// partially specified. A missing `id` means an unsaved draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDraft {
    pub id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

impl SessionDraft {
    /// The id used for self-exclusion during an edit; drafts without an id
    /// evaluate as [`DRAFT_SESSION_ID`].
    pub fn effective_id(&self) -> &str {
        self.id.as_deref().unwrap_or(DRAFT_SESSION_ID)
    }
}

impl From<&Session> for SessionDraft {
    /// Start an edit flow from a stored session.
    fn from(session: &Session) -> Self {
        Self {
            id: Some(session.id.clone()),
            date: Some(session.date),
            start_time: Some(session.start_time.clone()),
            end_time: Some(session.end_time.clone()),
            teacher_id: Some(session.teacher_id.clone()),
            student_ids: session.student_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    Online,
    Centre,
    Home,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Centre => write!(f, "centre"),
            Self::Home => write!(f, "home"),
        }
    }
}

impl std::str::FromStr for Location {
    type Err = TutorbaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "online" => Ok(Self::Online),
            "centre" => Ok(Self::Centre),
            "home" => Ok(Self::Home),
            other => Err(TutorbaseError::InvalidInput(format!(
                "unknown location: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    OneToOne,
    Group,
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneToOne => write!(f, "one-to-one"),
            Self::Group => write!(f, "group"),
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = TutorbaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "one-to-one" => Ok(Self::OneToOne),
            "group" => Ok(Self::Group),
            other => Err(TutorbaseError::InvalidInput(format!(
                "unknown session type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Planned,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::NoShow => write!(f, "no-show"),
            Self::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = TutorbaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "planned" => Ok(Self::Planned),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            "rescheduled" => Ok(Self::Rescheduled),
            other => Err(TutorbaseError::InvalidInput(format!(
                "unknown session status: {other}"
            ))),
        }
    }
}
