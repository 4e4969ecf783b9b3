use crate::error::Result;
use crate::inference::{Summarizer, SummaryBounds};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does",
    "for", "from", "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "of", "on", "or",
    "our", "out", "over", "she", "so", "some", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "too", "up", "us", "was", "we", "were",
    "what", "when", "which", "while", "who", "will", "with", "would", "you", "your",
];

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[^.!?]+(?:[.!?]+["')\]]*)?"#).expect("sentence pattern is valid")
    })
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z0-9']+").expect("word pattern is valid"))
}

/// Frequency-based extractive summarizer.
///
/// Sentences are scored by the normalized frequency of their content words,
/// then the best ones are kept, in document order, within the word budget.
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSummarizer;

struct ScoredSentence<'a> {
    position: usize,
    text: &'a str,
    words: usize,
    score: f64,
}

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize_one(&self, text: &str, bounds: SummaryBounds) -> String {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return String::new();
        }

        let sentences = split_sentences(&normalized);
        let frequencies = word_frequencies(&normalized);

        let mut scored: Vec<ScoredSentence> = sentences
            .into_iter()
            .enumerate()
            .map(|(position, text)| ScoredSentence {
                position,
                text,
                words: text.split_whitespace().count(),
                score: sentence_score(text, &frequencies),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });

        let mut selected: Vec<&ScoredSentence> = Vec::new();
        let mut total_words = 0;

        for sentence in &scored {
            let fits = total_words + sentence.words <= bounds.max_length;
            if fits || total_words < bounds.min_length {
                selected.push(sentence);
                total_words += sentence.words;
            }
            if total_words >= bounds.max_length {
                break;
            }
        }

        selected.sort_by_key(|s| s.position);

        let summary = selected
            .iter()
            .map(|s| s.text)
            .collect::<Vec<_>>()
            .join(" ");

        truncate_words(&summary, bounds.max_length)
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, texts: &[String], bounds: SummaryBounds) -> Result<Vec<String>> {
        Ok(texts
            .iter()
            .map(|text| self.summarize_one(text, bounds))
            .collect())
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    sentence_pattern()
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

fn word_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for word in content_words(text) {
        *counts.entry(word).or_insert(0.0) += 1.0;
    }

    let max = counts.values().cloned().fold(0.0, f64::max);
    if max > 0.0 {
        for value in counts.values_mut() {
            *value /= max;
        }
    }

    counts
}

fn sentence_score(sentence: &str, frequencies: &HashMap<String, f64>) -> f64 {
    let (sum, count) = content_words(sentence).fold((0.0, 0usize), |(sum, count), word| {
        (sum + frequencies.get(&word).copied().unwrap_or(0.0), count + 1)
    });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.to_string()
    } else {
        words[..max_words].join(" ")
    }
}
