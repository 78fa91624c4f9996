//! Core library for Tutorbase: the scheduling backbone of a tutoring-centre
//! LMS. Provides the session model, the double-booking conflict detector,
//! and an SQLite-backed session store.

pub mod config;
pub mod error;
pub mod model;
pub mod schedule;
pub mod storage;

pub use error::{Result, TutorbaseError};
