pub mod conflict;
pub mod interval;

pub use conflict::{detect_session_conflicts, Conflict, ConflictKind};
pub use interval::{parse_time, time_ranges_overlap, TimeRange};
