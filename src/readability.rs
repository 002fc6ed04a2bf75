//! Basic readability statistics for a block of text (WCAG 3.1.5).

use serde::{Deserialize, Serialize};

/// Average words per sentence below which text can count as easy.
const EASY_MAX_WORDS_PER_SENTENCE: f64 = 12.0;
/// Average word length below which text can count as easy.
const EASY_MAX_WORD_LENGTH: f64 = 5.0;
/// Average words per sentence below which text counts as medium.
const MEDIUM_MAX_WORDS_PER_SENTENCE: f64 = 20.0;

/// Coarse reading difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingLevel {
    Easy,
    Medium,
    Hard,
}

impl ReadingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingLevel::Easy => "easy",
            ReadingLevel::Medium => "medium",
            ReadingLevel::Hard => "hard",
        }
    }
}

impl std::fmt::Display for ReadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Readability statistics for one text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub level: ReadingLevel,
    /// Rounded to two decimals.
    pub avg_words_per_sentence: f64,
    /// Rounded to two decimals.
    pub avg_word_length: f64,
    pub word_count: usize,
    pub sentence_count: usize,
}

/// Compute readability statistics.
///
/// Sentences are approximated as the number of `.` characters plus one, so
/// the sentence count is never zero and empty input is well defined.
pub fn analyze_readability(text: &str) -> Readability {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let sentence_count = text.matches('.').count() + 1;

    let avg_words_per_sentence = word_count as f64 / sentence_count as f64;
    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_length = total_chars as f64 / word_count.max(1) as f64;

    let level = if avg_words_per_sentence < EASY_MAX_WORDS_PER_SENTENCE
        && avg_word_length < EASY_MAX_WORD_LENGTH
    {
        ReadingLevel::Easy
    } else if avg_words_per_sentence < MEDIUM_MAX_WORDS_PER_SENTENCE {
        ReadingLevel::Medium
    } else {
        ReadingLevel::Hard
    };

    Readability {
        level,
        avg_words_per_sentence: round2(avg_words_per_sentence),
        avg_word_length: round2(avg_word_length),
        word_count,
        sentence_count,
    }
}

/// Round to two decimals, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
