// Listening history - the raw play events from a Spotify export
// Loading, track identity, and the "did you actually listen to it" filter live here

pub mod error;     // what can go wrong reading an export
pub mod loader;    // JSON export -> PlayEvents
pub mod normalize; // estimated durations + qualified listens

pub use error::HistoryError;
pub use loader::{load_path, load_paths, load_str, LoadMode, LoadedHistory};
pub use normalize::{estimate_durations, qualified_listens, QualifiedListen};

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by [`TrackKey::joined`]. ASCII unit separator, which never
/// shows up in track or artist names from the export.
pub const KEY_SEPARATOR: char = '\u{1f}';

/// One historical playback, exactly as the export recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    pub end_time: NaiveDateTime,
    pub artist_name: String,
    pub track_name: String,
    pub ms_played: u64,
}

impl PlayEvent {
    pub fn new(
        end_time: NaiveDateTime,
        artist_name: impl Into<String>,
        track_name: impl Into<String>,
        ms_played: u64,
    ) -> Self {
        Self {
            end_time,
            artist_name: artist_name.into(),
            track_name: track_name.into(),
            ms_played,
        }
    }

    pub fn key(&self) -> TrackKey {
        TrackKey::of(self)
    }

    /// Calendar month (1-12) the play ended in. Year is ignored on purpose.
    pub fn month(&self) -> u32 {
        self.end_time.month()
    }
}

/// Identity of a song: same title by different artists are different songs.
///
/// Matching is exact - no case folding, no whitespace trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackKey {
    pub track_name: String,
    pub artist_name: String,
}

impl TrackKey {
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
        }
    }

    pub fn of(event: &PlayEvent) -> Self {
        Self::new(event.track_name.clone(), event.artist_name.clone())
    }

    /// Flat text form: `track` + [`KEY_SEPARATOR`] + `artist`.
    pub fn joined(&self) -> String {
        format!("{}{}{}", self.track_name, KEY_SEPARATOR, self.artist_name)
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.track_name, self.artist_name)
    }
}
