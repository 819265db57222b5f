//! SQL statements that can either bind or render themselves
//!
//! Dry runs must show exactly what a real run would write, so the inserts are
//! built as data: statement text with `?` placeholders plus the positional
//! values. A real run binds the values; a dry run interleaves them into the
//! text as SQL literals.

use chrono::{DateTime, Utc};

use crate::models::{EpisodeRecord, SeriesRecord};

/// Storage rendering for timestamps: second precision, explicit UTC offset.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// A positional SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl SqlValue {
    /// Render as a SQL literal for dry-run output.
    pub fn literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }

    fn time(value: &DateTime<Utc>) -> SqlValue {
        SqlValue::Text(value.format(TIME_FORMAT).to_string())
    }

    fn opt(value: &Option<String>) -> SqlValue {
        match value {
            Some(s) => SqlValue::Text(s.clone()),
            None => SqlValue::Null,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

/// A parameterized statement and its bound values.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: &'static str,
    pub args: Vec<SqlValue>,
}

impl Statement {
    /// The statement text with every parameter interleaved as a literal.
    pub fn render(&self) -> String {
        let mut parts = self.sql.split('?');
        let mut out = String::new();
        if let Some(first) = parts.next() {
            out.push_str(first);
        }
        for arg in &self.args {
            out.push_str(&arg.literal());
            out.push_str(parts.next().unwrap_or(""));
        }
        out
    }
}

const INSERT_SERIES_SQL: &str = "INSERT INTO Series (Id, Metadata_SeriesId, Metadata_Title, \
     Metadata_Category, Metadata_ImageUrl, Metadata_PosterUrl, Metadata_StartTime, \
     Metadata_IsNew, Metadata_Url) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const INSERT_EPISODE_SQL: &str = "INSERT INTO Episodes (SeriesId, SeriesStartTime, \
     Metadata_Category, Metadata_ChannelImageUrl, Metadata_ChannelName, Metadata_ChannelNumber, \
     Metadata_EndTime, Metadata_EpisodeNumber, Metadata_EpisodeTitle, Metadata_FirstAiring, \
     Metadata_ImageUrl, Metadata_MovieScore, Metadata_OriginalAirdate, Metadata_PosterUrl, \
     Metadata_ProgramId, Metadata_RecordEndTime, Metadata_RecordError, Metadata_RecordStartTime, \
     Metadata_RecordSuccess, Metadata_SeriesId, Metadata_StartTime, Metadata_Synopsis, \
     Metadata_Title, Metadata_Filename, Metadata_PlayUrl, Metadata_CmdUrl, DownloadInterrupted, \
     DownloadStarted, DownloadReason, DeleteReason, ReRecordable) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Insert statement for a new series row with an explicit Id.
pub fn insert_series(id: i64, series: &SeriesRecord) -> Statement {
    Statement {
        sql: INSERT_SERIES_SQL,
        args: vec![
            id.into(),
            series.series_id.as_str().into(),
            series.title.as_str().into(),
            series.category.code().into(),
            series.image_url.as_str().into(),
            SqlValue::opt(&series.poster_url),
            SqlValue::time(&series.start_time),
            series.is_new.into(),
            series.url.as_str().into(),
        ],
    }
}

/// Insert statement for an episode row referencing its resolved series Id.
pub fn insert_episode(series_id: i64, episode: &EpisodeRecord) -> Statement {
    Statement {
        sql: INSERT_EPISODE_SQL,
        args: vec![
            series_id.into(),
            SqlValue::time(&episode.series.start_time),
            episode.category.code().into(),
            SqlValue::opt(&episode.channel_image_url),
            episode.channel_name.as_str().into(),
            episode.channel_number.as_str().into(),
            SqlValue::time(&episode.end_time),
            SqlValue::opt(&episode.episode_number),
            SqlValue::opt(&episode.episode_title),
            episode.first_airing.into(),
            episode.image_url.as_str().into(),
            SqlValue::opt(&episode.movie_score),
            SqlValue::time(&episode.original_airdate),
            SqlValue::opt(&episode.poster_url),
            episode.program_id.as_str().into(),
            SqlValue::time(&episode.record_end_time),
            SqlValue::opt(&episode.record_error),
            SqlValue::time(&episode.record_start_time),
            episode.record_success.into(),
            episode.series_id.as_str().into(),
            SqlValue::time(&episode.start_time),
            episode.synopsis.as_str().into(),
            episode.title.as_str().into(),
            episode.filename.as_str().into(),
            episode.play_url.as_str().into(),
            episode.cmd_url.as_str().into(),
            episode.download_interrupted.into(),
            SqlValue::time(&episode.download_started),
            episode.download_reason.code().into(),
            episode.delete_reason.code().into(),
            episode.re_recordable.into(),
        ],
    }
}
