// bangstats Library - year-in-review numbers from a Spotify listening export
// Each stage is its own module so the pipeline reads top to bottom

pub mod config;  // settings and preferences
pub mod export;  // report export
pub mod history; // loading plays + deciding which ones count
pub mod report;  // the whole pipeline in one struct
pub mod stats;   // rankings and monthly totals

// Export the stuff other modules actually use
pub use config::Config;
pub use history::{HistoryError, LoadMode, LoadedHistory, PlayEvent, QualifiedListen, TrackKey};
pub use report::Report;
pub use stats::{ArtistCount, ListeningSummary, MonthlyMinutes};
