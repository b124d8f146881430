//! Rating drafts and their required-field check.

use std::fmt;

use serde::Serialize;

use crate::models::LearnedSomething;

/// Lowest and highest accepted star score.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Message shown when a draft is missing a required field.
pub const INCOMPLETE_MESSAGE: &str = "Please complete all required fields";

/// In-progress rating as edited in the entry form. A score of 0 means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingDraft {
    pub content_satisfaction: u8,
    pub speaker_effectiveness: u8,
    pub learned_something: Option<LearnedSomething>,
    pub additional_feedback: String,
}

/// A rating that passed validation and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub content_satisfaction: u8,
    pub speaker_effectiveness: u8,
    pub learned_something: LearnedSomething,
    pub additional_feedback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingValidationError {
    /// A score is unset or the learned-something choice is missing.
    Incomplete,
    /// A score is outside 1..=5.
    ScoreOutOfRange(u8),
}

impl fmt::Display for RatingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingValidationError::Incomplete => write!(f, "{INCOMPLETE_MESSAGE}"),
            RatingValidationError::ScoreOutOfRange(score) => {
                write!(f, "Scores must be between {MIN_SCORE} and {MAX_SCORE} (got {score})")
            }
        }
    }
}

impl std::error::Error for RatingValidationError {}

impl RatingDraft {
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks required fields. Feedback is optional and sent as typed.
    pub fn validate(&self) -> Result<NewRating, RatingValidationError> {
        let scores = [self.content_satisfaction, self.speaker_effectiveness];
        if scores.contains(&0) {
            return Err(RatingValidationError::Incomplete);
        }
        if let Some(score) = scores.into_iter().find(|s| *s > MAX_SCORE) {
            return Err(RatingValidationError::ScoreOutOfRange(score));
        }
        let learned_something = self
            .learned_something
            .ok_or(RatingValidationError::Incomplete)?;

        Ok(NewRating {
            content_satisfaction: self.content_satisfaction,
            speaker_effectiveness: self.speaker_effectiveness,
            learned_something,
            additional_feedback: self.additional_feedback.clone(),
        })
    }
}
