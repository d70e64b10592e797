use super::error::{HistoryError, Result};
use super::PlayEvent;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// Account-data export uses "2021-03-14 22:31", extended history uses RFC 3339 in `ts`
const END_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// What to do with a record that doesn't fit the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// First bad record fails the whole load
    #[default]
    Strict,
    /// Bad records are logged and dropped
    Lenient,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedHistory {
    pub events: Vec<PlayEvent>,
    pub skipped: usize, // only ever non-zero in lenient mode
}

impl LoadedHistory {
    pub fn extend(&mut self, other: LoadedHistory) {
        self.events.extend(other.events);
        self.skipped += other.skipped;
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// Field names from the account-data export, with the extended streaming
// history names as aliases
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "endTime", alias = "ts")]
    end_time: String,
    #[serde(rename = "artistName", alias = "master_metadata_album_artist_name")]
    artist_name: String,
    #[serde(rename = "trackName", alias = "master_metadata_track_name")]
    track_name: String,
    #[serde(rename = "msPlayed", alias = "ms_played")]
    ms_played: u64,
}

/// Parse an export held in memory. Output keeps the input order.
pub fn load_str(source: &str, mode: LoadMode) -> Result<LoadedHistory> {
    let records: Vec<Value> =
        serde_json::from_str(source).map_err(|e| HistoryError::parse(e.to_string()))?;

    let mut history = LoadedHistory {
        events: Vec::with_capacity(records.len()),
        skipped: 0,
    };

    for (index, record) in records.into_iter().enumerate() {
        match parse_record(index, record) {
            Ok(event) => history.events.push(event),
            Err(err) if mode == LoadMode::Lenient => {
                warn!("Skipping record: {}", err);
                history.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        "Parsed {} play events ({} skipped)",
        history.events.len(),
        history.skipped
    );
    Ok(history)
}

pub fn load_path<P: AsRef<Path>>(path: P, mode: LoadMode) -> Result<LoadedHistory> {
    let path = path.as_ref();
    info!("Loading listening history from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_str(&content, mode).map_err(|err| err.in_path(path))
}

/// Spotify splits long histories over `StreamingHistory0.json`,
/// `StreamingHistory1.json`, ... so files are concatenated in the order given.
pub fn load_paths<P: AsRef<Path>>(paths: &[P], mode: LoadMode) -> Result<LoadedHistory> {
    let mut history = LoadedHistory::default();
    for path in paths {
        history.extend(load_path(path, mode)?);
    }
    Ok(history)
}

fn parse_record(index: usize, record: Value) -> Result<PlayEvent> {
    let raw: RawRecord =
        serde_json::from_value(record).map_err(|e| HistoryError::schema(index, e.to_string()))?;

    let end_time = parse_end_time(&raw.end_time).ok_or_else(|| {
        HistoryError::schema(index, format!("unparseable endTime '{}'", raw.end_time))
    })?;

    Ok(PlayEvent {
        end_time,
        artist_name: raw.artist_name,
        track_name: raw.track_name,
        ms_played: raw.ms_played,
    })
}

fn parse_end_time(raw: &str) -> Option<NaiveDateTime> {
    END_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"[
        {"endTime": "2021-01-03 09:15", "artistName": "Phoebe Bridgers", "trackName": "Kyoto", "msPlayed": 184000},
        {"endTime": "2021-02-11 23:59", "artistName": "Big Thief", "trackName": "Not", "msPlayed": 0}
    ]"#;

    #[test]
    fn test_loads_records_in_order() {
        let history = load_str(SAMPLE, LoadMode::Strict).unwrap();
        assert_eq!(history.skipped, 0);
        assert_eq!(history.events.len(), 2);

        let first = &history.events[0];
        assert_eq!(first.artist_name, "Phoebe Bridgers");
        assert_eq!(first.track_name, "Kyoto");
        assert_eq!(first.ms_played, 184_000);
        assert_eq!(first.end_time.month(), 1);
        assert_eq!(first.end_time.hour(), 9);
        assert_eq!(first.end_time.minute(), 15);

        assert_eq!(history.events[1].track_name, "Not");
        assert_eq!(history.events[1].ms_played, 0);
    }

    #[test]
    fn test_empty_array_is_fine() {
        let history = load_str("[]", LoadMode::Strict).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_not_json_is_parse_error() {
        let err = load_str("endTime,artistName\n", LoadMode::Strict).unwrap_err();
        assert!(matches!(err, HistoryError::Parse { .. }));
    }

    #[test]
    fn test_object_instead_of_list_is_parse_error() {
        // Lenient mode can't rescue a source that isn't a record list
        let err = load_str(r#"{"endTime": "2021-01-01 00:00"}"#, LoadMode::Lenient).unwrap_err();
        assert!(matches!(err, HistoryError::Parse { .. }));
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let source = r#"[
            {"endTime": "2021-01-03 09:15", "artistName": "A", "trackName": "T", "msPlayed": 1},
            {"endTime": "2021-01-03 09:20", "artistName": "A", "msPlayed": 1}
        ]"#;
        match load_str(source, LoadMode::Strict).unwrap_err() {
            HistoryError::Schema { index, reason, .. } => {
                assert_eq!(index, 1);
                assert!(reason.contains("trackName"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_ms_played_is_schema_error() {
        let source = r#"[{"endTime": "2021-01-03 09:15", "artistName": "A", "trackName": "T", "msPlayed": -5}]"#;
        let err = load_str(source, LoadMode::Strict).unwrap_err();
        assert!(matches!(err, HistoryError::Schema { index: 0, .. }));
    }

    #[test]
    fn test_fractional_ms_played_is_schema_error() {
        let source = r#"[{"endTime": "2021-01-03 09:15", "artistName": "A", "trackName": "T", "msPlayed": 12.5}]"#;
        let err = load_str(source, LoadMode::Strict).unwrap_err();
        assert!(matches!(err, HistoryError::Schema { index: 0, .. }));
    }

    #[test]
    fn test_bad_end_time_is_schema_error() {
        let source = r#"[{"endTime": "last tuesday", "artistName": "A", "trackName": "T", "msPlayed": 5}]"#;
        match load_str(source, LoadMode::Strict).unwrap_err() {
            HistoryError::Schema { index, reason, .. } => {
                assert_eq!(index, 0);
                assert!(reason.contains("last tuesday"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_skips_bad_records() {
        let source = r#"[
            {"endTime": "2021-01-03 09:15", "artistName": "A", "trackName": "T", "msPlayed": 1},
            {"endTime": "nope", "artistName": "A", "trackName": "T", "msPlayed": 1},
            {"artistName": "A", "trackName": "T", "msPlayed": 1},
            {"endTime": "2021-01-04 10:00", "artistName": "B", "trackName": "U", "msPlayed": 2}
        ]"#;
        let history = load_str(source, LoadMode::Lenient).unwrap();
        assert_eq!(history.skipped, 2);
        assert_eq!(history.events.len(), 2);
        assert_eq!(history.events[1].artist_name, "B");
    }

    #[test]
    fn test_end_time_with_seconds_and_rfc3339() {
        assert!(parse_end_time("2021-06-01 08:00:30").is_some());

        let parsed = parse_end_time("2021-06-01T08:00:30+02:00").unwrap();
        assert_eq!(parsed.hour(), 6); // normalized to UTC
        assert_eq!(parsed.second(), 30);
    }

    #[test]
    fn test_extended_history_field_names() {
        let source = r#"[{
            "ts": "2022-12-31T23:10:00Z",
            "master_metadata_track_name": "Motion Sickness",
            "master_metadata_album_artist_name": "Phoebe Bridgers",
            "ms_played": 229000,
            "platform": "android"
        }]"#;
        let history = load_str(source, LoadMode::Strict).unwrap();
        let event = &history.events[0];
        assert_eq!(event.track_name, "Motion Sickness");
        assert_eq!(event.month(), 12);
        assert_eq!(event.ms_played, 229_000);
    }

    #[test]
    fn test_podcast_entries_are_rejected() {
        let source = r#"[{
            "ts": "2022-12-31T23:10:00Z",
            "master_metadata_track_name": null,
            "master_metadata_album_artist_name": null,
            "ms_played": 1000
        }]"#;
        assert!(load_str(source, LoadMode::Strict).is_err());
        assert_eq!(load_str(source, LoadMode::Lenient).unwrap().skipped, 1);
    }

    #[test]
    fn test_load_paths_concatenates_in_order() {
        let mut first = NamedTempFile::new().unwrap();
        write!(
            first,
            r#"[{{"endTime": "2021-01-01 00:00", "artistName": "A", "trackName": "One", "msPlayed": 1}}]"#
        )
        .unwrap();
        let mut second = NamedTempFile::new().unwrap();
        write!(
            second,
            r#"[{{"endTime": "2021-01-02 00:00", "artistName": "B", "trackName": "Two", "msPlayed": 2}}]"#
        )
        .unwrap();

        let history = load_paths(&[first.path(), second.path()], LoadMode::Strict).unwrap();
        let names: Vec<_> = history.events.iter().map(|e| e.track_name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn test_file_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("StreamingHistory0.json");
        let bad = dir.path().join("StreamingHistory1.json");
        fs::write(
            &good,
            r#"[{"endTime": "2021-01-01 00:00", "artistName": "A", "trackName": "One", "msPlayed": 1}]"#,
        )
        .unwrap();
        fs::write(&bad, r#"[{"endTime": "2021-01-01 00:00", "artistName": "A"}]"#).unwrap();

        let err = load_paths(&[&good, &bad], LoadMode::Strict).unwrap_err();
        assert!(matches!(err, HistoryError::Schema { index: 0, .. }));
        assert_eq!(err.path(), Some(bad.as_path()));
        assert!(err.to_string().contains("StreamingHistory1.json"));

        fs::write(&bad, "not json").unwrap();
        let err = load_path(&bad, LoadMode::Lenient).unwrap_err();
        assert!(matches!(err, HistoryError::Parse { .. }));
        assert_eq!(err.path(), Some(bad.as_path()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(dir.path().join("StreamingHistory0.json"), LoadMode::Strict).unwrap_err();
        assert!(matches!(err, HistoryError::Io { .. }));
    }
}
