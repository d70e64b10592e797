// Report assembly - runs the whole pipeline over a loaded history
// The report is the hand-off point: charts, prose, PDFs all read from this

use crate::config::{ArtistImages, ReportConfig};
use crate::history::{qualified_listens, LoadedHistory};
use crate::stats::{
    monthly_minutes, top_artists, top_tracks, ListeningSummary, MonthEntry, TrackCount,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedArtist {
    pub rank: usize,
    pub artist_name: String,
    pub listens: usize,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: ListeningSummary,
    pub skipped_records: usize,
    pub top_artists: Vec<RankedArtist>,
    pub top_tracks: Vec<TrackCount>,
    pub monthly_minutes: Vec<MonthEntry>,
}

impl Report {
    pub fn build(history: &LoadedHistory, config: &ReportConfig, images: &ArtistImages) -> Self {
        let events = &history.events;
        let listens = qualified_listens(events);

        let top_artists = top_artists(&listens, config.top_n)
            .into_iter()
            .enumerate()
            .map(|(idx, artist)| RankedArtist {
                rank: idx + 1,
                image: images.image_for(&artist.artist_name).map(str::to_string),
                artist_name: artist.artist_name,
                listens: artist.listens,
            })
            .collect();

        let monthly = monthly_minutes(events);
        let monthly = if config.zero_fill_months {
            monthly.zero_filled()
        } else {
            monthly
        };

        let report = Self {
            summary: ListeningSummary::from_history(events, &listens),
            skipped_records: history.skipped,
            top_artists,
            top_tracks: top_tracks(&listens, config.top_tracks),
            monthly_minutes: monthly.entries(),
        };

        info!(
            "Built report: {} plays, {} listens, {} ranked artists",
            report.summary.total_plays,
            report.summary.qualified_listens,
            report.top_artists.len()
        );

        report
    }

    /// Plain-text version for the terminal
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        writeln!(f, "🎧 Listening Summary")?;
        writeln!(f, "====================")?;
        if let (Some(first), Some(last)) = (s.first_play, s.last_play) {
            writeln!(
                f,
                "  Period:          {} → {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            )?;
        }
        writeln!(f, "  Plays:           {}", s.total_plays)?;
        writeln!(
            f,
            "  Real listens:    {} ({:.0}%)",
            s.qualified_listens,
            s.listen_rate() * 100.0
        )?;
        writeln!(f, "  Avg completion:  {:.0}%", s.average_completion * 100.0)?;
        writeln!(f, "  Tracks:          {}", s.distinct_tracks)?;
        writeln!(f, "  Artists:         {}", s.distinct_artists)?;
        writeln!(f, "  Minutes played:  {:.1}", s.total_minutes)?;
        if self.skipped_records > 0 {
            writeln!(f, "  ⚠️  Skipped records: {}", self.skipped_records)?;
        }

        writeln!(f)?;
        writeln!(f, "🏆 Top Artists")?;
        for artist in &self.top_artists {
            writeln!(
                f,
                "  {:>2}. {:<32} {:>5}",
                artist.rank, artist.artist_name, artist.listens
            )?;
        }

        if !self.top_tracks.is_empty() {
            writeln!(f)?;
            writeln!(f, "🎵 Top Tracks")?;
            for (idx, track) in self.top_tracks.iter().enumerate() {
                writeln!(
                    f,
                    "  {:>2}. {:<48} {:>5}",
                    idx + 1,
                    track.track.to_string(),
                    track.listens
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "📅 Minutes per Month")?;
        for entry in &self.monthly_minutes {
            writeln!(f, "  {:<10} {:>10.1}", entry.label, entry.minutes)?;
        }

        Ok(())
    }
}
