//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Song reference data (`songs` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: String,
    pub lyrics_url: Option<String>,
}

/// Song as supplied by batch ingestion, before it has an id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    pub lyrics: String,
    #[serde(default)]
    pub lyrics_url: Option<String>,
}

/// Precomputed output of one sentiment model for one song (`sentiment_analysis` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub id: i64,
    pub song_id: i64,
    pub model: String,
    /// `None` means the model produced a score but no category
    pub label: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSentimentResult {
    pub model: String,
    #[serde(default)]
    pub label: Option<String>,
    pub score: f64,
}

/// Sentiment result joined with the title of its song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub id: i64,
    pub song_id: i64,
    pub title: String,
    pub model: String,
    pub label: Option<String>,
    pub score: f64,
}

/// Human verdict on a sentiment result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    Agree,
    Disagree,
}

impl Judgment {
    pub const ALL: [Judgment; 2] = [Judgment::Agree, Judgment::Disagree];

    /// Value stored in `sentiment_qa.judgment`
    pub fn as_str(&self) -> &'static str {
        match self {
            Judgment::Agree => "agree",
            Judgment::Disagree => "disagree",
        }
    }

    /// Form label shown next to the radio button
    pub fn label(&self) -> &'static str {
        match self {
            Judgment::Agree => "Accurate",
            Judgment::Disagree => "Not accurate",
        }
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Judgment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agree" => Ok(Judgment::Agree),
            "disagree" => Ok(Judgment::Disagree),
            other => Err(Error::InvalidInput(format!(
                "judgment must be 'agree' or 'disagree', got '{}'",
                other
            ))),
        }
    }
}

/// Stored feedback row (`sentiment_qa` table). Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub result_id: i64,
    pub judgment: Judgment,
    pub comment: Option<String>,
    pub reviewer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated feedback submission.
///
/// `judgment` stays a raw string so that validation happens in one place,
/// `feedback::submit_feedback`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFeedback {
    pub result_id: i64,
    pub judgment: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
}

/// Feedback counts. `agree_count + disagree_count == total_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackSummary {
    pub agree_count: i64,
    pub disagree_count: i64,
    pub total_count: i64,
}

impl FeedbackSummary {
    pub fn new(agree_count: i64, disagree_count: i64) -> Self {
        Self {
            agree_count,
            disagree_count,
            total_count: agree_count + disagree_count,
        }
    }

    /// Share of `agree` verdicts in percent, `None` without feedback
    pub fn agree_percentage(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(self.agree_count as f64 * 100.0 / self.total_count as f64)
        }
    }
}

/// One row of the per-model comparison panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub result_count: i64,
    pub average_score: Option<f64>,
    pub feedback: FeedbackSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judgment_parse_is_case_insensitive() {
        assert_eq!("agree".parse::<Judgment>().unwrap(), Judgment::Agree);
        assert_eq!(" Disagree ".parse::<Judgment>().unwrap(), Judgment::Disagree);
        assert_eq!("AGREE".parse::<Judgment>().unwrap(), Judgment::Agree);
    }

    #[test]
    fn test_judgment_parse_rejects_other_values() {
        for bad in ["", "yes", "partially", "agreed"] {
            let err = bad.parse::<Judgment>().unwrap_err();
            assert!(err.is_validation(), "'{}' should be a validation error", bad);
        }
    }

    #[test]
    fn test_judgment_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Judgment::Disagree).unwrap(), "\"disagree\"");
        let parsed: Judgment = serde_json::from_str("\"agree\"").unwrap();
        assert_eq!(parsed, Judgment::Agree);
    }

    #[test]
    fn test_summary_totals_add_up() {
        let summary = FeedbackSummary::new(3, 1);
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.agree_percentage(), Some(75.0));
    }

    #[test]
    fn test_summary_percentage_without_feedback() {
        assert_eq!(FeedbackSummary::default().agree_percentage(), None);
    }
}
