//! Sidecar metadata normalization
//!
//! The recorder wrote sidecar JSON across several firmware generations, and
//! the field names drifted (`SeriesID` vs `SeriesId`, `EpisodesURL` vs `Url`,
//! `New` vs `IsNew`). Lookup here is first-match-wins over an ordered key
//! list, and the coercions deliberately mirror the legacy tooling: boolean-ish
//! values go through truthiness, timestamps are epoch seconds or ISO-8601
//! strings, and numeric values are accepted where old sidecars encoded string
//! fields as numbers.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Category, DeleteReason, DownloadReason, EpisodeRecord, SeriesRecord};

/// Return the first value whose key is present in the document.
fn fetch<'a>(doc: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = doc.as_object()?;
    keys.iter().find_map(|k| map.get(*k))
}

/// Legacy truthiness: null, false, 0, "", [] and {} are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Accept strings as-is and numbers by their decimal rendering.
fn stringish(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_str(doc: &Value, field: &'static str, keys: &[&str]) -> Result<String> {
    fetch(doc, keys)
        .and_then(stringish)
        .ok_or(Error::MissingField(field))
}

fn optional_str(doc: &Value, keys: &[&str]) -> Option<String> {
    fetch(doc, keys).and_then(stringish)
}

fn required_bool(doc: &Value, field: &'static str, keys: &[&str]) -> Result<bool> {
    fetch(doc, keys)
        .map(truthy)
        .ok_or(Error::MissingField(field))
}

fn bool_or(doc: &Value, keys: &[&str], default: bool) -> bool {
    fetch(doc, keys).map(truthy).unwrap_or(default)
}

fn required_time(doc: &Value, field: &'static str, keys: &[&str]) -> Result<DateTime<Utc>> {
    let value = fetch(doc, keys).ok_or(Error::MissingField(field))?;
    parse_time(field, value)
}

fn invalid_time(field: &'static str, value: &Value) -> Error {
    Error::InvalidTimestamp {
        field,
        value: value.to_string(),
    }
}

/// Parse a timestamp value: integer epoch seconds or an ISO-8601 string,
/// both taken as UTC when no offset is given.
fn parse_time(field: &'static str, value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let secs = n.as_i64().ok_or_else(|| invalid_time(field, value))?;
            Utc.timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| invalid_time(field, value))
        }
        Value::String(s) => parse_iso(s).ok_or_else(|| invalid_time(field, value)),
        _ => Err(invalid_time(field, value)),
    }
}

/// The ISO-8601 shapes the sidecars actually contain: offset-qualified with a
/// `T` or space separator, naive date-times, or bare dates.
fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

/// Map a category value: the strings "movie"/"series" or the numeric codes.
fn category(doc: &Value, field: &'static str, keys: &[&str]) -> Result<Category> {
    let value = fetch(doc, keys).ok_or(Error::MissingField(field))?;
    match value {
        Value::String(s) if s == "movie" => Ok(Category::Movie),
        Value::String(s) if s == "series" => Ok(Category::Series),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(Category::Movie),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(Category::Series),
        other => Err(Error::InvalidEnumValue {
            field,
            value: other.to_string(),
        }),
    }
}

/// Resolve the playback URL from an episode document.
///
/// Exposed separately so the caller can probe the recorder before committing
/// to a full parse.
pub fn play_url(episode: &Value) -> Result<String> {
    required_str(episode, "PlayUrl", &["PlayURL", "PlayUrl"])
}

/// The video file's filesystem creation time, which becomes the download
/// timestamp. Filesystems without creation-time support fail here.
pub fn download_started(video: &Path) -> Result<DateTime<Utc>> {
    let created = std::fs::metadata(video)?
        .created()
        .map_err(|_| Error::UnsupportedFilesystem(video.to_path_buf()))?;
    Ok(DateTime::<Utc>::from(created))
}

/// Build the canonical series record from a storage document.
pub fn series_record(storage: &Value) -> Result<SeriesRecord> {
    Ok(SeriesRecord {
        series_id: required_str(storage, "SeriesId", &["SeriesID", "SeriesId"])?,
        title: required_str(storage, "Title", &["Title"])?,
        category: category(storage, "Category", &["Category"])?,
        image_url: required_str(storage, "ImageUrl", &["ImageURL", "ImageUrl"])?,
        poster_url: optional_str(storage, &["PosterURL", "PosterUrl"]),
        start_time: required_time(storage, "StartTime", &["StartTime"])?,
        is_new: required_bool(storage, "IsNew", &["New", "IsNew"])?,
        url: required_str(storage, "Url", &["EpisodesURL", "Url"])?,
    })
}

/// Build the full canonical record for one recording: both sidecar documents,
/// the video file itself, and the deletion state the probe classified.
pub fn episode_record(
    storage: &Value,
    episode: &Value,
    video: &Path,
    delete_reason: DeleteReason,
) -> Result<EpisodeRecord> {
    Ok(EpisodeRecord {
        series: series_record(storage)?,
        category: category(episode, "Category", &["Category"])?,
        channel_image_url: optional_str(episode, &["ChannelImageURL", "ChannelImageUrl"]),
        channel_name: required_str(episode, "ChannelName", &["ChannelName"])?,
        channel_number: required_str(episode, "ChannelNumber", &["ChannelNumber"])?,
        end_time: required_time(episode, "EndTime", &["EndTime"])?,
        episode_number: optional_str(episode, &["EpisodeNumber"]),
        episode_title: optional_str(episode, &["EpisodeTitle"]),
        first_airing: bool_or(episode, &["FirstAiring"], false),
        image_url: required_str(episode, "ImageUrl", &["ImageURL", "ImageUrl"])?,
        movie_score: optional_str(episode, &["MovieScore"]),
        // An absent OriginalAirdate falls back to the StartTime key, as the
        // recorder itself did for older sidecars.
        original_airdate: required_time(
            episode,
            "OriginalAirdate",
            &["OriginalAirdate", "StartTime"],
        )?,
        poster_url: optional_str(episode, &["PosterURL", "PosterUrl"]),
        program_id: required_str(episode, "ProgramId", &["ProgramID", "ProgramId"])?,
        record_end_time: required_time(episode, "RecordEndTime", &["RecordEndTime"])?,
        record_error: optional_str(episode, &["RecordError"]),
        record_start_time: required_time(episode, "RecordStartTime", &["RecordStartTime"])?,
        record_success: bool_or(episode, &["RecordSuccess"], true),
        series_id: required_str(episode, "SeriesId", &["SeriesID", "SeriesId"])?,
        start_time: required_time(episode, "StartTime", &["StartTime"])?,
        synopsis: required_str(episode, "Synopsis", &["Synopsis"])?,
        title: required_str(episode, "Title", &["Title"])?,
        filename: required_str(episode, "Filename", &["Filename"])?,
        play_url: play_url(episode)?,
        cmd_url: required_str(episode, "CmdUrl", &["CmdURL", "CmdUrl"])?,
        download_interrupted: false,
        download_started: download_started(video)?,
        download_reason: DownloadReason::New,
        delete_reason,
        re_recordable: false,
    })
}
