//! Canonical record types and the integer codes persisted to the catalog.

use chrono::{DateTime, Utc};

/// Recording category. Stored as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Movie = 0,
    Series = 1,
}

/// Why the tuner downloaded the recording in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadReason {
    New = 0,
    DownloadInterrupted = 1,
}

/// Deletion state of the upstream recording, as classified by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReason {
    NotDeleted = 0,
    ReDownloaded = 1,
    Downloaded = 2,
    OneDayPassed = 3,
    OneWeekPassed = 4,
    Deleted = 5,
}

impl Category {
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl DownloadReason {
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl DeleteReason {
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Series-level metadata drawn from a storage sidecar.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub series_id: String,
    pub title: String,
    pub category: Category,
    pub image_url: String,
    pub poster_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub is_new: bool,
    pub url: String,
}

/// One importable recording: the episode metadata, its parent series, and the
/// bookkeeping fields the importer synthesizes.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub series: SeriesRecord,
    pub category: Category,
    pub channel_image_url: Option<String>,
    pub channel_name: String,
    pub channel_number: String,
    pub end_time: DateTime<Utc>,
    pub episode_number: Option<String>,
    pub episode_title: Option<String>,
    pub first_airing: bool,
    pub image_url: String,
    pub movie_score: Option<String>,
    pub original_airdate: DateTime<Utc>,
    pub poster_url: Option<String>,
    pub program_id: String,
    pub record_end_time: DateTime<Utc>,
    pub record_error: Option<String>,
    pub record_start_time: DateTime<Utc>,
    pub record_success: bool,
    pub series_id: String,
    pub start_time: DateTime<Utc>,
    pub synopsis: String,
    pub title: String,
    pub filename: String,
    pub play_url: String,
    pub cmd_url: String,
    pub download_interrupted: bool,
    pub download_started: DateTime<Utc>,
    pub download_reason: DownloadReason,
    pub delete_reason: DeleteReason,
    pub re_recordable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_codes_are_stable() {
        assert_eq!(Category::Movie.code(), 0);
        assert_eq!(Category::Series.code(), 1);
        assert_eq!(DownloadReason::New.code(), 0);
        assert_eq!(DownloadReason::DownloadInterrupted.code(), 1);
        assert_eq!(DeleteReason::NotDeleted.code(), 0);
        assert_eq!(DeleteReason::ReDownloaded.code(), 1);
        assert_eq!(DeleteReason::Downloaded.code(), 2);
        assert_eq!(DeleteReason::OneDayPassed.code(), 3);
        assert_eq!(DeleteReason::OneWeekPassed.code(), 4);
        assert_eq!(DeleteReason::Deleted.code(), 5);
    }
}
