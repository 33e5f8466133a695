//! Keyword FAQ bot

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::FaqConfig;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FaqAnswer {
    pub answer: String,
    /// `false` when the fallback answer was used
    pub matched: bool,
    /// Keywords of the chosen entry found in the question
    pub matched_keywords: Vec<String>,
}

/// Lowercase alphanumeric words of a text
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

#[derive(Debug, Clone)]
struct Entry {
    /// Each keyword as its token sequence
    keywords: Vec<(String, Vec<String>)>,
    answer: String,
}

#[derive(Clone)]
pub struct FaqService {
    entries: Vec<Entry>,
    fallback: String,
}

impl FaqService {
    pub fn new(config: &FaqConfig) -> Self {
        let entries = config
            .entries
            .iter()
            .map(|e| Entry {
                keywords: e
                    .keywords
                    .iter()
                    .map(|k| (k.to_lowercase(), tokenize(k)))
                    .filter(|(_, tokens)| !tokens.is_empty())
                    .collect(),
                answer: e.answer.clone(),
            })
            .collect();

        Self {
            entries,
            fallback: config.fallback.clone(),
        }
    }

    /// Pick the entry with the most keyword hits; earlier entries win ties
    pub fn ask(&self, question: &str) -> FaqAnswer {
        let tokens = tokenize(question);
        let words: HashSet<&str> = tokens.iter().map(String::as_str).collect();

        let mut best: Option<(&Entry, Vec<String>)> = None;
        for entry in &self.entries {
            let hits: Vec<String> = entry
                .keywords
                .iter()
                .filter(|(_, kw)| match kw.as_slice() {
                    [single] => words.contains(single.as_str()),
                    phrase => tokens.windows(phrase.len()).any(|w| w == phrase),
                })
                .map(|(label, _)| label.clone())
                .collect();

            let better = match &best {
                Some((_, current)) => hits.len() > current.len(),
                None => !hits.is_empty(),
            };
            if better {
                best = Some((entry, hits));
            }
        }

        match best {
            Some((entry, hits)) => FaqAnswer {
                answer: entry.answer.clone(),
                matched: true,
                matched_keywords: hits,
            },
            None => FaqAnswer {
                answer: self.fallback.clone(),
                matched: false,
                matched_keywords: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FaqEntrySettings;

    fn bot() -> FaqService {
        FaqService::new(&FaqConfig {
            fallback: "Please contact us.".to_string(),
            entries: vec![
                FaqEntrySettings {
                    keywords: vec!["price".into(), "cost".into(), "fees".into()],
                    answer: "See our pricing page.".to_string(),
                },
                FaqEntrySettings {
                    keywords: vec!["age".into(), "old".into(), "cost".into()],
                    answer: "Ages 3 to 17.".to_string(),
                },
                FaqEntrySettings {
                    keywords: vec!["pick up".into(), "drop off".into(), "transport".into()],
                    answer: "Drop-off is at 8am.".to_string(),
                },
            ],
        })
    }

    #[test]
    fn test_most_hits_wins() {
        let answer = bot().ask("How OLD must my child be, and what age groups do you take?");
        assert_eq!(answer.answer, "Ages 3 to 17.");
        assert_eq!(answer.matched_keywords, vec!["age".to_string(), "old".to_string()]);
    }

    #[test]
    fn test_ties_go_to_config_order() {
        // "cost" appears in both of the first two entries
        let answer = bot().ask("What does it cost?");
        assert_eq!(answer.answer, "See our pricing page.");
    }

    #[test]
    fn test_phrase_keywords() {
        assert_eq!(bot().ask("When is drop-off?").answer, "Drop-off is at 8am.");
        assert!(!bot().ask("Can I drop my bag off?").matched);
    }

    #[test]
    fn test_no_hits_returns_fallback() {
        let answer = bot().ask("Do you have wifi?");
        assert!(!answer.matched);
        assert_eq!(answer.answer, "Please contact us.");
        assert!(bot().ask("   ").matched_keywords.is_empty());
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Half-day, FULL day!"), vec!["half", "day", "full", "day"]);
    }
}
