//! Reading activity: per-chapter timers and daily reading statistics
//!
//! Both trackers own their state explicitly and take the current time as an
//! argument, so callers decide where the clock and the persistence live.

pub mod history_tracker;
pub mod stats;

pub use history_tracker::{ChapterReading, ReadingSessionTracker};
pub use stats::{day_key, format_duration, ReadingGoal, ReadingStats};
