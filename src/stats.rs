//! Word statistics over a set of accepted articles.

use crate::models::{ArticleRecord, Statistics};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Number of entries kept in [`Statistics::most_common_words`].
pub const MOST_COMMON_LIMIT: usize = 5;

// Lazy match so `<a><b>` strips as two fragments, not one.
static MARKUP_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<.*?>").expect("valid markup fragment regex"));

/// Word frequencies that remember the order in which words were first seen.
///
/// Ranking sorts stably, so words with equal counts keep first-seen order.
#[derive(Debug, Default)]
struct WordCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl WordCounter {
    fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(word.to_string(), self.counts.len());
                self.counts.push((word.to_string(), 1));
            }
        }
    }

    fn most_common(mut self, n: usize) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

/// Compute word statistics for `articles`.
///
/// Angle-bracket fragments are replaced with a space before splitting on
/// whitespace. `average_words` is `0.0` when there are no articles.
pub fn aggregate(articles: &[ArticleRecord]) -> Statistics {
    let mut counter = WordCounter::default();
    let mut total_words = 0usize;

    for article in articles {
        let text = MARKUP_FRAGMENT.replace_all(&article.content, " ");
        for word in text.split_whitespace() {
            counter.add(word);
            total_words += 1;
        }
    }

    let num_articles = articles.len();
    let average_words = if num_articles > 0 {
        total_words as f64 / num_articles as f64
    } else {
        0.0
    };
    tracing::debug!(num_articles, total_words, average_words, "Aggregated word statistics");

    Statistics {
        num_articles,
        total_words,
        average_words,
        most_common_words: counter.most_common(MOST_COMMON_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_content(content: &str) -> ArticleRecord {
        ArticleRecord {
            link: "https://example.com/a".to_string(),
            title: "t".to_string(),
            category: "c".to_string(),
            date_published: String::new(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_no_articles_average_is_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats.num_articles, 0);
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.average_words, 0.0);
        assert!(stats.most_common_words.is_empty());
    }

    #[test]
    fn test_average_is_fractional() {
        let stats = aggregate(&[with_content("a b c"), with_content("d b")]);
        assert_eq!(stats.total_words, 5);
        assert_eq!(stats.average_words, 2.5);
    }

    #[test]
    fn test_markup_fragments_are_stripped() {
        let stats = aggregate(&[with_content("alpha<b>beta</b> <br/>gamma")]);
        assert_eq!(stats.total_words, 3);
        let words: Vec<&str> = stats
            .most_common_words
            .iter()
            .map(|(w, _)| w.as_str())
            .collect();
        assert_eq!(words, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_most_common_limited_to_five_and_ties_keep_first_seen_order() {
        // counts: z=3, y=2, x=2, w=1, v=1, u=1
        let stats = aggregate(&[
            with_content("w y x z z v"),
            with_content("z x y u"),
        ]);

        assert_eq!(stats.most_common_words.len(), MOST_COMMON_LIMIT);
        assert_eq!(
            stats.most_common_words,
            vec![
                ("z".to_string(), 3),
                ("y".to_string(), 2),
                ("x".to_string(), 2),
                ("w".to_string(), 1),
                ("v".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_words_are_case_sensitive_and_split_on_any_whitespace() {
        let stats = aggregate(&[with_content("Gra\ngra\tGra  gra\u{00a0}")]);
        assert_eq!(stats.total_words, 4);
        assert_eq!(
            stats.most_common_words,
            vec![("Gra".to_string(), 2), ("gra".to_string(), 2)]
        );
    }
}
