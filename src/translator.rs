//! Dictionary-based translation of summaries.
//!
//! Words and short phrases are looked up in a static table; anything not in
//! the table passes through unchanged, punctuation included.

use crate::config::TranslatorConfig;
use std::collections::HashMap;

/// Anything that can translate summary text
pub trait Translator: Send + Sync {
    /// Name of the target language
    fn target(&self) -> &str;

    fn translate(&self, text: &str) -> String;
}

/// Built-in English to Urdu table. Multi-word keys are matched as phrases.
const URDU_TABLE: &[(&str, &str)] = &[
    ("in conclusion", "آخر میں"),
    ("for example", "مثال کے طور پر"),
    ("as well as", "اور ساتھ ہی"),
    ("the", ""),
    ("a", "ایک"),
    ("an", "ایک"),
    ("and", "اور"),
    ("or", "یا"),
    ("but", "لیکن"),
    ("is", "ہے"),
    ("are", "ہیں"),
    ("was", "تھا"),
    ("were", "تھے"),
    ("this", "یہ"),
    ("that", "وہ"),
    ("these", "یہ"),
    ("with", "کے ساتھ"),
    ("for", "کے لیے"),
    ("from", "سے"),
    ("in", "میں"),
    ("of", "کا"),
    ("to", "کو"),
    ("not", "نہیں"),
    ("we", "ہم"),
    ("you", "آپ"),
    ("they", "وہ"),
    ("it", "یہ"),
    ("blog", "بلاگ"),
    ("post", "تحریر"),
    ("article", "مضمون"),
    ("summary", "خلاصہ"),
    ("content", "مواد"),
    ("information", "معلومات"),
    ("data", "ڈیٹا"),
    ("technology", "ٹیکنالوجی"),
    ("world", "دنیا"),
    ("people", "لوگ"),
    ("time", "وقت"),
    ("life", "زندگی"),
    ("work", "کام"),
    ("new", "نیا"),
    ("good", "اچھا"),
    ("great", "بہترین"),
    ("important", "اہم"),
    ("key", "کلیدی"),
    ("main", "اہم"),
    ("significant", "نمایاں"),
    ("crucial", "انتہائی اہم"),
    ("essential", "ضروری"),
    ("necessary", "لازمی"),
    ("major", "بڑا"),
    ("first", "پہلا"),
    ("second", "دوسرا"),
    ("third", "تیسرا"),
    ("finally", "آخر کار"),
    ("conclusion", "نتیجہ"),
    ("result", "نتیجہ"),
    ("therefore", "لہذا"),
    ("because", "کیونکہ"),
    ("however", "تاہم"),
    ("although", "اگرچہ"),
    ("despite", "باوجود"),
    ("moreover", "مزید برآں"),
    ("furthermore", "اس کے علاوہ"),
    ("use", "استعمال"),
    ("learn", "سیکھیں"),
    ("help", "مدد"),
    ("business", "کاروبار"),
    ("health", "صحت"),
    ("future", "مستقبل"),
];

/// Table-driven translator
#[derive(Debug, Clone)]
pub struct LookupTranslator {
    target: String,
    table: HashMap<String, String>,
    /// Longest key, in words
    max_phrase_words: usize,
}

impl Default for LookupTranslator {
    fn default() -> Self {
        Self::new(&TranslatorConfig::default())
    }
}

impl LookupTranslator {
    /// Built-in table with configured entries layered on top
    pub fn new(config: &TranslatorConfig) -> Self {
        let mut table: HashMap<String, String> = URDU_TABLE
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in &config.entries {
            table.insert(k.to_lowercase(), v.clone());
        }

        let max_phrase_words = table
            .keys()
            .map(|k| k.split_whitespace().count())
            .max()
            .unwrap_or(1);

        Self {
            target: config.target.clone(),
            table,
            max_phrase_words,
        }
    }

    /// Longest table phrase starting at `start`, as (words consumed, translation)
    fn longest_match(&self, words: &[Word<'_>], start: usize) -> Option<(usize, &str)> {
        let longest = self.max_phrase_words.min(words.len() - start);
        (1..=longest).rev().find_map(|len| {
            let span = &words[start..start + len];
            // Punctuation inside a phrase breaks it
            if span[..len - 1].iter().any(|w| !w.suffix.is_empty())
                || span[1..].iter().any(|w| !w.prefix.is_empty())
            {
                return None;
            }
            let key = span
                .iter()
                .map(|w| w.core.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            self.table.get(&key).map(|t| (len, t.as_str()))
        })
    }
}

impl Translator for LookupTranslator {
    fn target(&self) -> &str {
        &self.target
    }

    fn translate(&self, text: &str) -> String {
        let words: Vec<Word<'_>> = text.split_whitespace().map(Word::split).collect();
        let mut out: Vec<String> = Vec::with_capacity(words.len());

        let mut i = 0;
        while i < words.len() {
            match self.longest_match(&words, i) {
                Some((len, translated)) => {
                    let rendered = format!(
                        "{}{}{}",
                        words[i].prefix,
                        translated,
                        words[i + len - 1].suffix
                    );
                    if !rendered.is_empty() {
                        out.push(rendered);
                    }
                    i += len;
                }
                None => {
                    out.push(words[i].raw.to_string());
                    i += 1;
                }
            }
        }

        out.join(" ")
    }
}

/// A whitespace token split into leading punctuation, word, trailing punctuation
#[derive(Debug)]
struct Word<'a> {
    raw: &'a str,
    prefix: &'a str,
    core: &'a str,
    suffix: &'a str,
}

impl<'a> Word<'a> {
    fn split(raw: &'a str) -> Self {
        let start = raw
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        let end = raw
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(start);
        Self {
            raw,
            prefix: &raw[..start],
            core: &raw[start..end],
            suffix: &raw[end..],
        }
    }
}
