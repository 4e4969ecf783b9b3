use crate::error::Result;
use crate::inference::{Sentiment, SentimentClassifier, SentimentLabel};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

const STRONG_POSITIVE: &[&str] = &[
    "amazing", "awesome", "brilliant", "excellent", "exceptional", "fantastic", "flawless",
    "incredible", "love", "loved", "loves", "outstanding", "perfect", "superb", "wonderful",
];

const POSITIVE: &[&str] = &[
    "beautiful", "best", "better", "comfortable", "convenient", "delighted", "easy", "effective",
    "enjoy", "enjoyed", "fast", "fine", "friendly", "glad", "good", "great", "happy", "helpful",
    "impressed", "impressive", "like", "liked", "nice", "pleasant", "pleased", "quick",
    "recommend", "recommended", "reliable", "satisfied", "smooth", "solid", "sturdy", "useful",
    "worth", "works",
];

const STRONG_NEGATIVE: &[&str] = &[
    "abysmal", "appalling", "atrocious", "awful", "disgusting", "hate", "hated", "horrible",
    "horrendous", "terrible", "useless", "worst",
];

const NEGATIVE: &[&str] = &[
    "annoying", "bad", "boring", "broke", "broken", "cheap", "complaint", "confusing",
    "damaged", "defective", "difficult", "disappointed", "disappointing", "dislike", "expensive",
    "fail", "failed", "faulty", "flimsy", "frustrating", "junk", "late", "mediocre", "poor",
    "problem", "refund", "return", "returned", "rude", "slow", "unhappy", "waste", "worse",
    "wrong",
];

const NEGATORS: &[&str] = &["not", "no", "never", "nothing", "hardly", "without", "neither", "nor"];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "super", "so", "incredibly", "absolutely", "totally", "truly",
];

/// How many tokens a negator or intensifier reaches forward.
const MODIFIER_WINDOW: usize = 3;

/// Slope of the logistic curve mapping the net score to a confidence.
const CONFIDENCE_SLOPE: f64 = 1.5;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("token pattern is valid"))
}

/// Lexicon-based polarity classifier with negation and intensifier handling.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_one(&self, text: &str) -> Sentiment {
        let score = net_score(text);

        if score == 0.0 {
            return Sentiment::new(SentimentLabel::Neutral, 0.5);
        }

        let confidence = 1.0 / (1.0 + (-CONFIDENCE_SLOPE * score.abs()).exp());
        let label = if score > 0.0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };

        Sentiment::new(label, confidence)
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        Ok(texts.iter().map(|text| self.classify_one(text)).collect())
    }
}

fn word_polarity(word: &str) -> f64 {
    if STRONG_POSITIVE.contains(&word) {
        2.0
    } else if POSITIVE.contains(&word) {
        1.0
    } else if STRONG_NEGATIVE.contains(&word) {
        -2.0
    } else if NEGATIVE.contains(&word) {
        -1.0
    } else {
        0.0
    }
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

fn net_score(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .collect();

    let mut score = 0.0;
    let mut negate_until = 0usize;
    let mut intensify_until = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        if is_negator(token) {
            negate_until = index + MODIFIER_WINDOW + 1;
            continue;
        }
        if INTENSIFIERS.contains(token) {
            intensify_until = index + 2;
            continue;
        }

        let mut polarity = word_polarity(token);
        if polarity == 0.0 {
            continue;
        }

        if index < intensify_until {
            polarity *= 1.5;
        }
        if index < negate_until {
            polarity = -polarity;
            negate_until = 0;
        }

        score += polarity;
    }

    score
}
