use crate::history::{QualifiedListen, TrackKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCount {
    pub artist_name: String,
    pub listens: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCount {
    pub track: TrackKey,
    pub listens: usize,
}

/// Most-listened artists, highest count first.
///
/// Ties go alphabetically by artist name (plain byte order) so the same
/// history always ranks the same way.
pub fn top_artists(listens: &[QualifiedListen<'_>], n: usize) -> Vec<ArtistCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for listen in listens {
        *counts.entry(listen.event.artist_name.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);

    ranked
        .into_iter()
        .map(|(artist_name, listens)| ArtistCount {
            artist_name: artist_name.to_string(),
            listens,
        })
        .collect()
}

/// Most-listened songs. Ties by track name, then artist name.
pub fn top_tracks(listens: &[QualifiedListen<'_>], n: usize) -> Vec<TrackCount> {
    let mut counts: HashMap<TrackKey, usize> = HashMap::new();
    for listen in listens {
        *counts.entry(listen.event.key()).or_insert(0) += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    // TrackKey orders by track name first, then artist
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);

    ranked
        .into_iter()
        .map(|(track, listens)| TrackCount { track, listens })
        .collect()
}
