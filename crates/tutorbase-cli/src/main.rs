use std::fs;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use owo_colors::OwoColorize;
use tutorbase_core::config::{self, TutorbaseConfig};
use tutorbase_core::model::{
    validate_session_input, Location, Session, SessionDraft, SessionStatus, SessionType,
};
use tutorbase_core::schedule::{detect_session_conflicts, Conflict};
use tutorbase_core::storage::SessionStore;

#[derive(Parser)]
#[command(name = "tutorbase", about = "Tutorbase: tutoring session scheduler", version)]
enum Cli {
    /// Initialize Tutorbase config in the current project
    Init,
    /// Book a new session (blocked while any scheduling conflict exists)
    Book {
        /// Teacher id
        #[arg(short, long)]
        teacher: String,
        /// Student id (repeat for group sessions)
        #[arg(short, long = "student", required = true)]
        students: Vec<String>,
        /// Session date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// Start time (HH:mm, 24-hour)
        #[arg(long)]
        start: String,
        /// End time (HH:mm, 24-hour)
        #[arg(long)]
        end: String,
        /// Subject taught
        #[arg(long, default_value = "")]
        subject: String,
        /// Year level of the student(s)
        #[arg(long)]
        year_level: Option<String>,
        /// Location (online, centre, home); default from config
        #[arg(long)]
        location: Option<Location>,
        /// Session type (one-to-one, group); default from config
        #[arg(long)]
        session_type: Option<SessionType>,
    },
    /// Dry-run conflict detection for a prospective slot
    Check {
        /// Teacher id
        #[arg(short, long)]
        teacher: Option<String>,
        /// Student id (can be repeated)
        #[arg(short, long = "student")]
        students: Vec<String>,
        /// Session date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Start time (HH:mm)
        #[arg(long)]
        start: Option<String>,
        /// End time (HH:mm)
        #[arg(long)]
        end: Option<String>,
        /// Evaluate as an edit of this existing session id
        #[arg(long)]
        id: Option<String>,
        /// Output raw JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List sessions
    List {
        /// Only sessions on this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Output raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Move an existing session to a new slot (blocked on conflict)
    Reschedule {
        /// Session id
        id: String,
        /// New date (YYYY-MM-DD); defaults to the current date of the session
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// New start time (HH:mm)
        #[arg(long)]
        start: String,
        /// New end time (HH:mm)
        #[arg(long)]
        end: String,
    },
    /// Cancel a session, freeing its slot
    Cancel {
        /// Session id
        id: String,
    },
    /// Show store status
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = TutorbaseConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_default();

    run(cli, &config)
}

fn run(cli: Cli, config: &TutorbaseConfig) -> Result<()> {
    match cli {
        Cli::Init => cmd_init(),
        Cli::Book {
            teacher,
            students,
            date,
            start,
            end,
            subject,
            year_level,
            location,
            session_type,
        } => {
            let store = open_store(config)?;
            cmd_book(
                &store,
                config,
                teacher,
                students,
                date,
                start,
                end,
                subject,
                year_level,
                location,
                session_type,
            )
        }
        Cli::Check {
            teacher,
            students,
            date,
            start,
            end,
            id,
            json,
        } => {
            let store = open_store(config)?;
            let draft = SessionDraft {
                id,
                date,
                start_time: start,
                end_time: end,
                teacher_id: teacher,
                student_ids: students,
            };
            cmd_check(&store, &draft, json)
        }
        Cli::List { date, json } => {
            let store = open_store(config)?;
            cmd_list(&store, date, json)
        }
        Cli::Reschedule {
            id,
            date,
            start,
            end,
        } => {
            let store = open_store(config)?;
            cmd_reschedule(&store, &id, date, start, end)
        }
        Cli::Cancel { id } => {
            let store = open_store(config)?;
            cmd_cancel(&store, &id)
        }
        Cli::Status => {
            let store = open_store(config)?;
            cmd_status(&store)
        }
    }
}

fn open_store(config: &TutorbaseConfig) -> Result<SessionStore> {
    let path = config.db_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    SessionStore::open(&path).context("failed to open session store")
}

fn cmd_init() -> Result<()> {
    let dir = std::env::current_dir()?.join(".tutorbase");
    let path = dir.join("config.toml");
    if path.exists() {
        println!("Tutorbase already initialized in this project.");
        return Ok(());
    }
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    fs::write(&path, config::default_config_toml()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_book(
    store: &SessionStore,
    config: &TutorbaseConfig,
    teacher: String,
    students: Vec<String>,
    date: NaiveDate,
    start: String,
    end: String,
    subject: String,
    year_level: Option<String>,
    location: Option<Location>,
    session_type: Option<SessionType>,
) -> Result<()> {
    validate_session_input(&teacher, &students, &start, &end)?;

    let draft = SessionDraft {
        id: None,
        date: Some(date),
        start_time: Some(start.clone()),
        end_time: Some(end.clone()),
        teacher_id: Some(teacher.clone()),
        student_ids: students.clone(),
    };

    let snapshot = store.list_sessions()?;
    let conflicts = detect_session_conflicts(&draft, &snapshot)?;
    if !conflicts.is_empty() {
        print_conflicts(&conflicts);
        bail!("booking blocked: {} conflict(s)", conflicts.len());
    }

    let mut session = Session::new(teacher, date, start, end)
        .with_students(students)
        .with_location(location.unwrap_or(config.booking.default_location))
        .with_session_type(session_type.unwrap_or(config.booking.default_session_type));
    session.subject = subject;
    session.year_level = year_level;

    store.save_session(&session)?;
    println!(
        "{} session {} on {} {}-{}",
        "Booked".green(),
        session.id,
        session.date,
        session.start_time,
        session.end_time
    );
    Ok(())
}

fn cmd_check(store: &SessionStore, draft: &SessionDraft, json: bool) -> Result<()> {
    let snapshot = store.list_sessions()?;
    let conflicts = detect_session_conflicts(draft, &snapshot)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("{}", "No conflicts.".green());
    } else {
        print_conflicts(&conflicts);
    }
    Ok(())
}

fn cmd_list(store: &SessionStore, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let sessions = match date {
        Some(d) => store.sessions_on(d)?,
        None => store.list_sessions()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions.");
        return Ok(());
    }
    for s in &sessions {
        println!(
            "{}  {} {}-{}  teacher {}  students [{}]  {}  {}",
            s.id,
            s.date,
            s.start_time,
            s.end_time,
            s.teacher_id,
            s.student_ids.join(", "),
            s.location,
            status_colored(s.status),
        );
    }
    Ok(())
}

fn cmd_reschedule(
    store: &SessionStore,
    id: &str,
    date: Option<NaiveDate>,
    start: String,
    end: String,
) -> Result<()> {
    let mut session = store.get_session(id)?;
    let new_date = date.unwrap_or(session.date);

    validate_session_input(&session.teacher_id, &session.student_ids, &start, &end)?;

    let draft = SessionDraft {
        id: Some(session.id.clone()),
        date: Some(new_date),
        start_time: Some(start.clone()),
        end_time: Some(end.clone()),
        teacher_id: Some(session.teacher_id.clone()),
        student_ids: session.student_ids.clone(),
    };

    let snapshot = store.list_sessions()?;
    let conflicts = detect_session_conflicts(&draft, &snapshot)?;
    if !conflicts.is_empty() {
        print_conflicts(&conflicts);
        bail!("reschedule blocked: {} conflict(s)", conflicts.len());
    }

    session.date = new_date;
    session.start_time = start;
    session.end_time = end;
    session.status = SessionStatus::Rescheduled;
    session.updated_at = Utc::now();
    store.save_session(&session)?;

    println!(
        "{} session {} to {} {}-{}",
        "Moved".green(),
        session.id,
        session.date,
        session.start_time,
        session.end_time
    );
    Ok(())
}

fn cmd_cancel(store: &SessionStore, id: &str) -> Result<()> {
    let mut session = store.get_session(id)?;
    if session.status == SessionStatus::Cancelled {
        println!("Session {id} is already cancelled.");
        return Ok(());
    }
    session.status = SessionStatus::Cancelled;
    session.updated_at = Utc::now();
    store.save_session(&session)?;
    println!("{} session {}", "Cancelled".yellow(), id);
    Ok(())
}

fn cmd_status(store: &SessionStore) -> Result<()> {
    let sessions = store.list_sessions()?;
    let cancelled = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Cancelled)
        .count();
    println!("Database: {}", store.path().display());
    println!("Sessions: {} ({} cancelled)", sessions.len(), cancelled);
    Ok(())
}

fn print_conflicts(conflicts: &[Conflict<'_>]) {
    for conflict in conflicts {
        println!("{} {}", conflict.kind.red().bold(), conflict.message);
        for s in &conflict.conflicting_sessions {
            println!(
                "    {}  {} {}-{}  teacher {}  students [{}]",
                s.id,
                s.date,
                s.start_time,
                s.end_time,
                s.teacher_id,
                s.student_ids.join(", ")
            );
        }
    }
}

fn status_colored(status: SessionStatus) -> String {
    match status {
        SessionStatus::Planned => status.to_string().green().to_string(),
        SessionStatus::Cancelled => status.to_string().red().to_string(),
        SessionStatus::Completed => status.to_string().blue().to_string(),
        _ => status.to_string(),
    }
}
