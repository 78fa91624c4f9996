use chrono::NaiveTime;

use crate::error::Result;

/// Parse a 24-hour `HH:mm` wall-clock time.
///
/// Malformed input propagates as [`TutorbaseError::TimeParse`]; the caller
/// (a time-picker or CLI flag parser) is expected to supply well-formed
/// strings, and the scheduler never converts a parse failure into
/// "no conflict".
///
/// [`TutorbaseError::TimeParse`]: crate::error::TutorbaseError::TimeParse
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(s, "%H:%M")?)
}

/// A half-open `[start, end)` time-of-day interval within a single day.
///
/// Comparison is date-independent: both endpoints are plain clock times, so
/// two ranges from different calendar dates compare as if on the same day.
/// Callers filter by date before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse both endpoints from `HH:mm` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_time(start)?,
            end: parse_time(end)?,
        })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether two half-open intervals overlap.
    ///
    /// Strict on both ends: ranges that merely touch at an endpoint do not
    /// overlap, so back-to-back sessions are allowed.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// String-level overlap predicate over two `HH:mm` intervals.
///
/// Semantics are those of [`TimeRange::overlaps`]; parse failures on any of
/// the four inputs propagate.
pub fn time_ranges_overlap(start1: &str, end1: &str, start2: &str, end2: &str) -> Result<bool> {
    let a = TimeRange::parse(start1, end1)?;
    let b = TimeRange::parse(start2, end2)?;
    Ok(a.overlaps(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_overlap_detected() {
        assert!(time_ranges_overlap("09:00", "10:30", "10:00", "11:00").unwrap());
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        assert!(!time_ranges_overlap("09:00", "10:00", "10:00", "11:00").unwrap());
        assert!(!time_ranges_overlap("10:00", "11:00", "09:00", "10:00").unwrap());
    }

    #[test]
    fn test_disjoint_intervals() {
        assert!(!time_ranges_overlap("08:00", "09:00", "13:00", "14:00").unwrap());
    }

    #[test]
    fn test_contained_interval() {
        assert!(time_ranges_overlap("09:00", "12:00", "10:00", "11:00").unwrap());
    }

    #[test]
    fn test_identical_intervals() {
        assert!(time_ranges_overlap("09:00", "10:00", "09:00", "10:00").unwrap());
    }

    #[test]
    fn test_overlap_symmetry() {
        let cases = [
            ("09:00", "10:30", "10:00", "11:00"),
            ("09:00", "10:00", "10:00", "11:00"),
            ("08:00", "09:00", "13:00", "14:00"),
            ("09:00", "12:00", "10:00", "11:00"),
        ];
        for (s1, e1, s2, e2) in cases {
            assert_eq!(
                time_ranges_overlap(s1, e1, s2, e2).unwrap(),
                time_ranges_overlap(s2, e2, s1, e1).unwrap(),
                "symmetry broken for [{s1},{e1}) vs [{s2},{e2})"
            );
        }
    }

    #[test]
    fn test_malformed_time_is_an_error() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("9h30").is_err());
        assert!(parse_time("").is_err());
        assert!(time_ranges_overlap("09:00", "oops", "10:00", "11:00").is_err());
    }

    #[test]
    fn test_parse_time_valid() {
        let t = parse_time("09:30").unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }
}
