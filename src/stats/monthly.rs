use crate::history::PlayEvent;
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Minutes played per calendar month, January = 1. Years fold together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyMinutes {
    minutes: BTreeMap<u32, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthEntry {
    pub month: u32,
    pub label: String,
    pub minutes: f64,
}

impl MonthlyMinutes {
    pub fn get(&self, month: u32) -> Option<f64> {
        self.minutes.get(&month).copied()
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    pub fn total_minutes(&self) -> f64 {
        self.minutes.values().sum()
    }

    /// Same data with every month present; months nobody listened in are 0.0
    pub fn zero_filled(&self) -> Self {
        let minutes = (1..=12)
            .map(|month| (month, self.get(month).unwrap_or(0.0)))
            .collect();
        Self { minutes }
    }

    /// Entries in calendar order
    pub fn entries(&self) -> Vec<MonthEntry> {
        self.minutes
            .iter()
            .map(|(&month, &minutes)| MonthEntry {
                month,
                label: month_label(month),
                minutes,
            })
            .collect()
    }
}

pub fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("Month {}", month))
}

/// Total playback per month over every play, skips included.
pub fn monthly_minutes(events: &[PlayEvent]) -> MonthlyMinutes {
    // sum in integer ms, convert once per month; u128 so huge msPlayed values can't wrap
    let mut totals: BTreeMap<u32, u128> = BTreeMap::new();
    for event in events {
        *totals.entry(event.month()).or_insert(0) += u128::from(event.ms_played);
    }

    MonthlyMinutes {
        minutes: totals
            .into_iter()
            .map(|(month, ms)| (month, ms as f64 / MS_PER_MINUTE))
            .collect(),
    }
}
