//! Extractive summarization by sentence scoring.
//!
//! Sentences are scored on cue words, length and position, the best few are
//! selected, and the summary lists them in the order they appear in the text.

use crate::config::{ReorderStrategy, SummarizerConfig};
use crate::extractor::char_len;
use std::collections::HashSet;
use tracing::debug;

/// Returned for texts below the minimum length
pub const TOO_SHORT: &str = "Text too short to summarize.";

const ELLIPSIS: &str = "...";
const SHORT_TEXT_PREFIX_CHARS: usize = 200;
const EMPTY_SUMMARY_PREFIX_CHARS: usize = 300;

/// A candidate sentence with its score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Trimmed sentence text, without terminal punctuation
    pub text: String,
    /// Index of the first appearance of this text in the candidate list
    pub position: usize,
    pub score: u32,
}

/// Sentence-scoring summarizer
#[derive(Debug, Clone)]
pub struct Summarizer {
    config: SummarizerConfig,
    importance_words: HashSet<String>,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(SummarizerConfig::default())
    }
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        let importance_words = config
            .importance_words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        Self {
            config,
            importance_words,
        }
    }

    /// Split text on terminal punctuation and keep the trimmed fragments
    /// longer than the sentence threshold, in order.
    pub fn candidates(&self, text: &str) -> Vec<String> {
        text.split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| char_len(s) > self.config.min_sentence_chars)
            .map(String::from)
            .collect()
    }

    /// Score every candidate independently
    pub fn score_sentences(&self, candidates: &[String]) -> Vec<Sentence> {
        let total = candidates.len() as f64;

        candidates
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let position = candidates
                    .iter()
                    .position(|c| c == text)
                    .unwrap_or(index);

                let tokens: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();

                let mut score = 2 * tokens
                    .iter()
                    .filter(|t| self.importance_words.contains(t.as_str()))
                    .count() as u32;

                if (8..=25).contains(&tokens.len()) {
                    score += 1;
                }

                // Introduction and conclusion
                let pos = position as f64;
                if pos < total * 0.2 || pos > total * 0.8 {
                    score += 1;
                }

                Sentence {
                    text: text.clone(),
                    position,
                    score,
                }
            })
            .collect()
    }

    /// Summarize text into at most `max_sentences` sentences in source order
    pub fn summarize(&self, text: &str) -> String {
        if char_len(text) < self.config.min_text_chars {
            return TOO_SHORT.to_string();
        }

        let candidates = self.candidates(text);
        if candidates.len() < self.config.min_candidates {
            debug!(
                candidates = candidates.len(),
                "too few sentences, returning prefix"
            );
            return prefix_with_ellipsis(text, SHORT_TEXT_PREFIX_CHARS);
        }

        let mut scored = self.score_sentences(&candidates);
        // Stable: equal scores keep source order
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        let wanted = (candidates.len() as f64 * self.config.selection_ratio).ceil() as usize;
        scored.truncate(wanted.min(self.config.max_sentences));

        let ordered = match self.config.reorder {
            ReorderStrategy::Index => {
                scored.sort_by_key(|s| s.position);
                scored.into_iter().map(|s| s.text).collect::<Vec<_>>()
            }
            ReorderStrategy::Containment => reorder_by_containment(&candidates, &scored)
                .into_iter()
                .take(self.config.max_sentences)
                .collect(),
        };

        debug!(
            candidates = candidates.len(),
            selected = ordered.len(),
            "summary sentences chosen"
        );

        if ordered.is_empty() {
            return prefix_with_ellipsis(text, EMPTY_SUMMARY_PREFIX_CHARS);
        }

        let summary = format!("{}.", ordered.join(". "));
        if char_len(&summary) > self.config.max_chars {
            prefix_with_ellipsis(&summary, self.config.max_chars)
        } else {
            summary
        }
    }
}

/// Summarize with the default vocabulary and thresholds
pub fn summarize(text: &str) -> String {
    Summarizer::default().summarize(text)
}

/// Candidates that contain, or are contained in, any selected sentence.
/// A short selected sentence can pull in unrelated longer candidates.
fn reorder_by_containment(candidates: &[String], selected: &[Sentence]) -> Vec<String> {
    candidates
        .iter()
        .filter(|candidate| {
            selected
                .iter()
                .any(|s| s.text.contains(candidate.as_str()) || candidate.contains(&s.text))
        })
        .cloned()
        .collect()
}

fn prefix_with_ellipsis(text: &str, chars: usize) -> String {
    let mut prefix: String = text.chars().take(chars).collect();
    prefix.push_str(ELLIPSIS);
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(sentences: &[&str]) -> String {
        format!("{}.", sentences.join(". "))
    }

    const PLAIN: &[&str] = &[
        "The weather was quite pleasant in the small town today",
        "Birds sang loudly every morning near the open window",
        "Children walked slowly to school along the river path",
        "The baker opened his shop early for the morning crowd",
        "Several visitors arrived by train late in the afternoon",
        "A gentle breeze moved through the tall trees by the road",
        "Local musicians played songs in the square after dinner",
        "Shops along the street closed their doors before nightfall",
        "Lamps were lit one by one as evening settled over town",
    ];

    #[test]
    fn short_text_is_not_summarized() {
        assert_eq!(summarize(""), TOO_SHORT);
        assert_eq!(summarize(&"x".repeat(99)), TOO_SHORT);
    }

    #[test]
    fn few_candidates_return_prefix() {
        let text = "This is a fairly long opening sentence for the test and it keeps going. \
                    Another lengthy sentence follows, pushing us past the limit for sure. \
                    Short. Bit.";
        assert!(text.len() >= 100);
        assert_eq!(summarize(text), format!("{}...", text));

        let long = format!("An opening sentence of decent size here. {}", "word ".repeat(60));
        let expected: String = long.chars().take(200).collect();
        assert_eq!(summarize(&long), format!("{expected}..."));
        assert_eq!(summarize(&long).chars().count(), 203);
    }

    #[test]
    fn candidates_split_on_runs_of_terminal_punctuation() {
        let summarizer = Summarizer::default();
        let candidates = summarizer
            .candidates("Is this the sentence we want?! Yes it is indeed the one... ok. Another fine sentence here");
        assert_eq!(
            candidates,
            vec![
                "Is this the sentence we want",
                "Yes it is indeed the one",
                "Another fine sentence here"
            ]
        );
    }

    #[test]
    fn candidates_must_exceed_twenty_chars_after_trimming() {
        let summarizer = Summarizer::default();
        let candidates = summarizer.candidates("   abcdefghij klmnopqrs   . abcdefghij klmnopqrst! ");
        assert_eq!(candidates, vec!["abcdefghij klmnopqrst"]);
    }

    #[test]
    fn scoring_counts_cue_words_length_and_position() {
        let summarizer = Summarizer::default();
        let candidates: Vec<String> = vec![
            "However this is the key result of it all".into(),
            "Plain words in a plain sentence here".into(),
            "Plain words in a plain sentence here, again ok".into(),
            "Another plain line to fill the middle out".into(),
            "Therefore, the important conclusion".into(),
        ];
        let scored = summarizer.score_sentences(&candidates);

        // however + key + result, 9 tokens, first 20%
        assert_eq!(scored[0].score, 2 * 3 + 1 + 1);
        // 7 tokens, middle
        assert_eq!(scored[1].score, 0);
        assert_eq!(scored[2].score, 1);
        // "therefore," keeps its comma and does not match
        assert_eq!(scored[4].score, 4);
    }

    #[test]
    fn duplicate_sentences_share_first_position() {
        let summarizer = Summarizer::default();
        let candidates: Vec<String> = vec![
            "A repeated sentence appears here".into(),
            "Something else entirely in between".into(),
            "A repeated sentence appears here".into(),
        ];
        let scored = summarizer.score_sentences(&candidates);
        assert_eq!(scored[2].position, 0);
        assert_eq!(scored[2].score, scored[0].score);
    }

    #[test]
    fn output_follows_source_order_not_score_order() {
        let best = "However the key result is therefore crucial and essential for everyone";
        let mut sentences: Vec<&str> = PLAIN.to_vec();
        sentences.push(best);
        let text = paragraph(&sentences);

        let summary = summarize(&text);
        assert_eq!(
            summary,
            format!("{}. {}. {}.", PLAIN[0], PLAIN[1], best)
        );
        assert!(summary.ends_with(&format!("{best}.")));
    }

    #[test]
    fn containment_reorder_can_pull_in_a_containing_sentence() {
        let selected = "Key result was crucial";
        let container = "Nobody said (Key result was crucial) at the meeting that day, and everyone \
                         simply kept on talking about the weather and the trains and the long summer \
                         holidays ahead";
        let sentences = vec![
            PLAIN[0], PLAIN[1], PLAIN[2], PLAIN[3], container, PLAIN[4], PLAIN[5], PLAIN[6],
            PLAIN[7], selected,
        ];
        let text = paragraph(&sentences);

        let by_index = Summarizer::default().summarize(&text);
        assert_eq!(by_index, format!("{}. {}. {}.", PLAIN[0], PLAIN[1], selected));

        let containment = Summarizer::new(SummarizerConfig {
            reorder: ReorderStrategy::Containment,
            ..SummarizerConfig::default()
        });
        assert_eq!(
            containment.summarize(&text),
            format!("{}. {}. {}.", PLAIN[0], PLAIN[1], container)
        );
    }

    #[test]
    fn selection_is_capped_at_three() {
        let sentences: Vec<&str> = PLAIN.iter().chain(PLAIN.iter()).copied().collect();
        let summary = summarize(&paragraph(&sentences));
        assert_eq!(summary.matches(". ").count(), 2);
        assert!(summary.ends_with('.'));
    }

    #[test]
    fn tied_scores_keep_source_order_at_the_cut() {
        let lines: Vec<String> = (0..20)
            .map(|i| format!("Line {i} has exactly ten plain words in it today"))
            .collect();
        let text = format!("{}.", lines.join(". "));

        // Lines 0-3 and 17-19 tie on length plus position
        assert_eq!(
            summarize(&text),
            format!("{}. {}. {}.", lines[0], lines[1], lines[2])
        );
    }

    #[test]
    fn three_candidates_select_one() {
        let summary = summarize(&paragraph(&PLAIN[..3]));
        assert_eq!(summary, format!("{}.", PLAIN[0]));
    }

    #[test]
    fn long_summaries_are_truncated() {
        let long_sentence = "word ".repeat(40);
        let sentences: Vec<String> = (0..10).map(|i| format!("{i} {long_sentence}")).collect();
        let text = sentences.join(". ");
        assert!(text.len() >= 2000);

        let summary = summarize(&text);
        assert!(summary.chars().count() <= 503);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn empty_selection_falls_back_to_prefix() {
        let summarizer = Summarizer::new(SummarizerConfig {
            max_sentences: 0,
            ..SummarizerConfig::default()
        });
        let text = paragraph(PLAIN);
        let expected: String = text.chars().take(300).collect();
        assert_eq!(summarizer.summarize(&text), format!("{expected}..."));
    }

    #[test]
    fn summarize_is_idempotent() {
        let text = paragraph(PLAIN);
        assert_eq!(summarize(&text), summarize(&text));
    }

    #[test]
    fn multibyte_text_truncates_on_char_boundaries() {
        let sentence = "ہر جملہ کافی لمبا ہے تاکہ یہ امیدوار بن سکے اور خلاصہ میں شامل ہو ".repeat(4);
        let text = vec![sentence.as_str(); 6].join(". ");
        let summary = summarize(&text);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= 503);
    }
}
