// Listen normalization - separates real listens from skips
// We don't know how long a song is, so the longest play we've seen stands in for it

use super::{PlayEvent, TrackKey};
use std::collections::HashMap;
use tracing::debug;

/// A play that counts: at least half of the song's estimated length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedListen<'a> {
    pub event: &'a PlayEvent,
    pub estimated_duration_ms: u64,
}

impl QualifiedListen<'_> {
    /// Share of the estimated length actually played, 0.0 to 1.0
    pub fn completion(&self) -> f64 {
        if self.estimated_duration_ms == 0 {
            return 1.0;
        }
        self.event.ms_played as f64 / self.estimated_duration_ms as f64
    }
}

/// Longest observed play for every track key.
pub fn estimate_durations(events: &[PlayEvent]) -> HashMap<TrackKey, u64> {
    let mut durations: HashMap<TrackKey, u64> = HashMap::new();

    for event in events {
        let longest = durations.entry(event.key()).or_insert(0);
        *longest = (*longest).max(event.ms_played);
    }

    durations
}

/// Integer form of `ms_played >= 0.5 * estimated`, widened so it can't overflow.
pub fn meets_threshold(ms_played: u64, estimated_duration_ms: u64) -> bool {
    u128::from(ms_played) * 2 >= u128::from(estimated_duration_ms)
}

/// Filter the history down to genuine listens, keeping input order.
pub fn qualified_listens(events: &[PlayEvent]) -> Vec<QualifiedListen<'_>> {
    let durations = estimate_durations(events);

    let listens: Vec<_> = events
        .iter()
        .filter_map(|event| {
            // every event's key went into the map above
            let estimated = durations.get(&event.key()).copied().unwrap_or(event.ms_played);
            meets_threshold(event.ms_played, estimated).then_some(QualifiedListen {
                event,
                estimated_duration_ms: estimated,
            })
        })
        .collect();

    debug!(
        "{} of {} plays qualify as listens across {} tracks",
        listens.len(),
        events.len(),
        durations.len()
    );

    listens
}
