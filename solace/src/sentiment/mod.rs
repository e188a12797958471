//! Emotion classification over prompt text.
//!
//! Deterministic lexicon scorer: each emotion label carries a static keyword
//! list; scores are matched-keyword counts normalized to [0, 1] across all
//! labels. Classification is pure and infallible — empty or unmatched input
//! falls back to a neutral distribution rather than failing the request.

use serde::{Deserialize, Serialize};

/// Only labels scoring strictly above this are ever persisted.
pub const SENTIMENT_SCORE_THRESHOLD: f64 = 0.3;

/// How many top-ranked labels the orchestrator considers per prompt.
pub const TOP_SENTIMENT_COUNT: usize = 3;

pub const NEUTRAL_LABEL: &str = "neutral";

/// One ranked classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: String,
    pub score: f64,
}

/// Static keyword lists per emotion label. Taxonomy follows the emotion
/// categories the companion app tracks on its mood dashboard.
const EMOTION_LEXICON: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "happy", "glad", "joy", "great", "wonderful", "excited", "amazing", "grateful",
            "delighted", "proud", "cheerful", "fantastic",
        ],
    ),
    (
        "sadness",
        &[
            "sad", "down", "depressed", "unhappy", "cry", "crying", "lonely", "hopeless",
            "miserable", "grief", "empty", "tired of",
        ],
    ),
    (
        "anger",
        &[
            "angry", "furious", "mad", "annoyed", "irritated", "hate", "rage", "frustrated",
            "resent", "fed up",
        ],
    ),
    (
        "fear",
        &[
            "afraid", "scared", "anxious", "anxiety", "worried", "panic", "nervous", "terrified",
            "dread", "overwhelmed", "stress", "stressed",
        ],
    ),
    (
        "love",
        &[
            "love", "loved", "caring", "affection", "cherish", "adore", "close to", "warmth",
        ],
    ),
    (
        "surprise",
        &[
            "surprised", "shocked", "unexpected", "sudden", "astonished", "can't believe",
            "didn't expect",
        ],
    ),
];

/// Stateless text-to-emotion classifier.
#[derive(Debug, Clone, Default)]
pub struct SentimentClassifier;

impl SentimentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Score `text` against the full taxonomy, sorted descending by score.
    ///
    /// Every label in the taxonomy appears exactly once in the output.
    pub fn classify(&self, text: &str) -> Vec<SentimentScore> {
        let normalized = text.to_lowercase();

        let hits: Vec<(&str, usize)> = EMOTION_LEXICON
            .iter()
            .map(|(label, keywords)| {
                let count = keywords
                    .iter()
                    .filter(|keyword| normalized.contains(**keyword))
                    .count();
                (*label, count)
            })
            .collect();

        let total: usize = hits.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return self.neutral_distribution();
        }

        let mut scores: Vec<SentimentScore> = hits
            .into_iter()
            .map(|(label, count)| SentimentScore {
                label: label.to_string(),
                score: count as f64 / total as f64,
            })
            .collect();
        scores.push(SentimentScore {
            label: NEUTRAL_LABEL.to_string(),
            score: 0.0,
        });

        sort_descending(&mut scores);
        scores
    }

    /// The top-ranked labels the orchestrator feeds into persistence.
    pub fn classify_top(&self, text: &str) -> Vec<SentimentScore> {
        let mut scores = self.classify(text);
        scores.truncate(TOP_SENTIMENT_COUNT);
        scores
    }

    fn neutral_distribution(&self) -> Vec<SentimentScore> {
        let mut scores = vec![SentimentScore {
            label: NEUTRAL_LABEL.to_string(),
            score: 1.0,
        }];
        scores.extend(EMOTION_LEXICON.iter().map(|(label, _)| SentimentScore {
            label: label.to_string(),
            score: 0.0,
        }));
        scores
    }
}

/// Drop every score at or below the persistence threshold (strictly
/// greater-than, so an exact 0.30 is discarded).
pub fn retain_above_threshold(scores: Vec<SentimentScore>) -> Vec<SentimentScore> {
    scores
        .into_iter()
        .filter(|s| s.score > SENTIMENT_SCORE_THRESHOLD)
        .collect()
}

fn sort_descending(scores: &mut [SentimentScore]) {
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classify_is_sorted_descending() {
        let classifier = SentimentClassifier::new();
        let scores = classifier.classify("I feel so anxious and worried, a bit sad too");
        for pair in scores.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(scores[0].label, "fear");
    }

    #[test]
    fn scores_are_normalized_to_unit_interval() {
        let classifier = SentimentClassifier::new();
        let scores = classifier.classify("happy but also angry and scared");
        for s in &scores {
            assert!((0.0..=1.0).contains(&s.score), "score {} out of range", s.score);
        }
        let sum: f64 = scores.iter().map(|s| s.score).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_neutral() {
        let classifier = SentimentClassifier::new();
        let scores = classifier.classify("");
        assert_eq!(scores[0].label, NEUTRAL_LABEL);
        assert_eq!(scores[0].score, 1.0);
    }

    #[test]
    fn unmatched_input_is_neutral() {
        let classifier = SentimentClassifier::new();
        let scores = classifier.classify("the quarterly report is attached");
        assert_eq!(scores[0].label, NEUTRAL_LABEL);
    }

    #[test]
    fn classify_top_returns_at_most_three() {
        let classifier = SentimentClassifier::new();
        let scores = classifier.classify_top("sad angry scared happy surprised love");
        assert_eq!(scores.len(), TOP_SENTIMENT_COUNT);
    }

    #[test]
    fn threshold_filter_is_strictly_greater_than() {
        let scores = vec![
            SentimentScore { label: "joy".into(), score: 0.42 },
            SentimentScore { label: "sadness".into(), score: 0.31 },
            SentimentScore { label: "anger".into(), score: 0.05 },
        ];
        let kept = retain_above_threshold(scores);
        let labels: Vec<&str> = kept.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["joy", "sadness"]);
    }

    #[test]
    fn exact_threshold_score_is_discarded() {
        let scores = vec![SentimentScore { label: "joy".into(), score: 0.30 }];
        assert!(retain_above_threshold(scores).is_empty());
    }
}
