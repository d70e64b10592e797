// Aggregation - turns play events into the numbers the year-in-review shows
// Everything here is a pure function of its input; run it twice, get the same answer

pub mod monthly;  // minutes per calendar month
pub mod ranking;  // top artists / top tracks

pub use monthly::{month_label, monthly_minutes, MonthEntry, MonthlyMinutes};
pub use ranking::{top_artists, top_tracks, ArtistCount, TrackCount, DEFAULT_TOP_N};

use crate::history::{PlayEvent, QualifiedListen};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningSummary {
    pub total_plays: usize,
    pub qualified_listens: usize,
    pub distinct_tracks: usize,
    pub distinct_artists: usize,
    pub total_minutes: f64, // every play, skips included
    pub average_completion: f64, // mean share of the song heard, over qualified listens
    pub first_play: Option<NaiveDateTime>,
    pub last_play: Option<NaiveDateTime>,
}

impl ListeningSummary {
    pub fn from_history(events: &[PlayEvent], listens: &[QualifiedListen<'_>]) -> Self {
        let distinct_tracks: HashSet<_> = events.iter().map(PlayEvent::key).collect();
        let distinct_artists: HashSet<&str> =
            events.iter().map(|e| e.artist_name.as_str()).collect();
        let total_ms: u128 = events.iter().map(|e| u128::from(e.ms_played)).sum();
        let average_completion = if listens.is_empty() {
            0.0
        } else {
            listens.iter().map(QualifiedListen::completion).sum::<f64>() / listens.len() as f64
        };

        Self {
            total_plays: events.len(),
            qualified_listens: listens.len(),
            distinct_tracks: distinct_tracks.len(),
            distinct_artists: distinct_artists.len(),
            total_minutes: total_ms as f64 / monthly::MS_PER_MINUTE,
            average_completion,
            first_play: events.iter().map(|e| e.end_time).min(),
            last_play: events.iter().map(|e| e.end_time).max(),
        }
    }

    /// Fraction of plays that counted as real listens
    pub fn listen_rate(&self) -> f64 {
        if self.total_plays == 0 {
            return 0.0;
        }
        self.qualified_listens as f64 / self.total_plays as f64
    }
}
