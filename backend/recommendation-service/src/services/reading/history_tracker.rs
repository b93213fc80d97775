use crate::models::{ChapterId, MangaId, ReadingHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One finished stretch of reading on a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterReading {
    pub chapter_id: ChapterId,
    pub manga_id: MangaId,
    pub read_at: DateTime<Utc>,
    pub duration_ms: i64,
    /// Chapter was explicitly marked as read
    pub completed: bool,
    /// External trackers should be told about this chapter
    pub should_track: bool,
}

impl ChapterReading {
    /// Fold this reading into the manga's history entry
    pub fn apply_to(&self, history: &mut ReadingHistory) {
        history.time_spent_ms += self.duration_ms;
        if self.completed {
            history.chapters_read += 1;
            if history.total_chapters > 0 {
                history.chapters_read = history.chapters_read.min(history.total_chapters);
            }
        }
        history.last_read = Some(match history.last_read {
            Some(previous) => previous.max(self.read_at),
            None => self.read_at,
        });
    }
}

/// Per-chapter reading timers
#[derive(Debug, Clone, Default)]
pub struct ReadingSessionTracker {
    start_times: HashMap<ChapterId, DateTime<Utc>>,
}

impl ReadingSessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer for a chapter
    pub fn start_reading(&mut self, chapter_id: ChapterId, now: DateTime<Utc>) {
        self.start_times.insert(chapter_id, now);
    }

    /// Stop the timer for a chapter
    ///
    /// Returns `None` when the chapter was never started. Tracking is
    /// requested only when at least one page was read.
    pub fn stop_reading(
        &mut self,
        chapter_id: ChapterId,
        manga_id: MangaId,
        pages_read: u32,
        now: DateTime<Utc>,
    ) -> Option<ChapterReading> {
        let started_at = self.start_times.remove(&chapter_id)?;
        let duration_ms = elapsed_ms(started_at, now);

        debug!(chapter_id, manga_id, duration_ms, "Chapter reading stopped");

        Some(ChapterReading {
            chapter_id,
            manga_id,
            read_at: now,
            duration_ms,
            completed: false,
            should_track: pages_read > 0,
        })
    }

    /// Mark a chapter as completely read, closing its timer if running
    pub fn mark_chapter_read(
        &mut self,
        chapter_id: ChapterId,
        manga_id: MangaId,
        now: DateTime<Utc>,
    ) -> ChapterReading {
        let duration_ms = self
            .start_times
            .remove(&chapter_id)
            .map(|started_at| elapsed_ms(started_at, now))
            .unwrap_or(0);

        ChapterReading {
            chapter_id,
            manga_id,
            read_at: now,
            duration_ms,
            completed: true,
            should_track: true,
        }
    }

    /// Time spent so far on a running chapter (0 when not running)
    pub fn current_reading_time(&self, chapter_id: ChapterId, now: DateTime<Utc>) -> i64 {
        self.start_times
            .get(&chapter_id)
            .map(|started_at| elapsed_ms(*started_at, now))
            .unwrap_or(0)
    }

    pub fn is_reading(&self, chapter_id: ChapterId) -> bool {
        self.start_times.contains_key(&chapter_id)
    }
}

fn elapsed_ms(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - started_at).num_milliseconds().max(0)
}
