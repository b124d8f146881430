//! Aggregate statistics for a workshop's ratings.

use crate::models::{LearnedSomething, Rating};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub count: usize,
    pub content_mean: f64,
    pub speaker_mean: f64,
    pub learned_yes: usize,
}

impl RatingSummary {
    /// Summarizes `ratings`. Empty input has no summary.
    pub fn from_ratings(ratings: &[Rating]) -> Option<Self> {
        if ratings.is_empty() {
            return None;
        }
        let count = ratings.len();
        let mean = |score: fn(&Rating) -> u8| {
            ratings.iter().map(|r| f64::from(score(r))).sum::<f64>() / count as f64
        };

        Some(Self {
            count,
            content_mean: mean(|r| r.content_satisfaction),
            speaker_mean: mean(|r| r.speaker_effectiveness),
            learned_yes: ratings
                .iter()
                .filter(|r| r.learned_something == Some(LearnedSomething::Yes))
                .count(),
        })
    }

    /// Share of "learned something" answers, rounded to a whole percent.
    pub fn learned_percentage(&self) -> u32 {
        (self.learned_yes as f64 * 100.0 / self.count as f64).round() as u32
    }
}

/// Mean formatted to one decimal place.
pub fn format_mean(mean: f64) -> String {
    format!("{mean:.1}")
}

/// Number of filled stars for a mean score.
pub fn stars_for_mean(mean: f64) -> u8 {
    mean.round().clamp(0.0, 5.0) as u8
}
