use crate::corpus::LineCorpus;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Picks the corpus line sharing the most words with a message.
pub struct Matcher<R: Rng = StdRng> {
    rng: R,
}

impl Matcher<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Matcher<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Matcher<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Choose randomly among the best-scoring lines.
    pub fn select<'c>(&mut self, text: &str, corpus: &'c LineCorpus) -> &'c str {
        let (max_score, candidates) = candidates(text, corpus);
        tracing::info!(max_score, tied = candidates.len(), "MAX SCORE: {}", max_score);
        // A loaded corpus is never empty, so there is always at least one candidate.
        candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| corpus.lines()[0].as_str())
    }
}

/// Lowercase whitespace-separated words, duplicates collapsed.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of query words found anywhere inside `line_lower`.
/// This is plain substring containment, so "in" also matches "contained".
pub fn score(query_words: &HashSet<String>, line_lower: &str) -> usize {
    query_words
        .iter()
        .filter(|word| line_lower.contains(word.as_str()))
        .count()
}

/// The maximum score for `text` and every original-case line that reaches it.
pub fn candidates<'c>(text: &str, corpus: &'c LineCorpus) -> (usize, Vec<&'c str>) {
    let words = tokenize(text);
    let scores: Vec<usize> = corpus
        .lines_lower()
        .iter()
        .map(|line| score(&words, line))
        .collect();
    let max_score = scores.iter().copied().max().unwrap_or(0);

    let lines = corpus
        .lines()
        .iter()
        .zip(&scores)
        .filter(|(_, &s)| s == max_score)
        .map(|(line, _)| line.as_str())
        .collect();

    (max_score, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn corpus(lines: &str) -> LineCorpus {
        LineCorpus::load(Cursor::new(lines), "test").unwrap()
    }

    fn swift() -> LineCorpus {
        corpus("i knew you were trouble\nwe are never getting back together\nshake it off\n")
    }

    #[test]
    fn test_tokenize_collapses_duplicates() {
        let words = tokenize("Shake  shake SHAKE it\toff");
        assert_eq!(words.len(), 3);
        assert!(words.contains("shake"));
    }

    #[test]
    fn test_score_counts_substrings() {
        let words = tokenize("in out");
        assert_eq!(score(&words, "contained"), 1);
        assert_eq!(score(&words, "without in"), 2);
        // "in" sits inside "nothing"
        assert_eq!(score(&words, "nothing here"), 1);
        assert_eq!(score(&words, "zzz"), 0);
    }

    #[test]
    fn test_best_line_wins() {
        let corpus = swift();
        let (max, lines) = candidates("i knew you were trouble when you walked in", &corpus);
        assert_eq!(max, 5);
        assert_eq!(lines, vec!["i knew you were trouble"]);

        let mut matcher = Matcher::seeded(7);
        assert_eq!(
            matcher.select("i knew you were trouble when you walked in", &corpus),
            "i knew you were trouble"
        );
    }

    #[test]
    fn test_candidates_are_exactly_the_tied_lines() {
        let corpus = corpus("Blank Space\nWildest Dreams\nBad Blood\nStyle\n");
        let (max, lines) = candidates("blank blood", &corpus);
        assert_eq!(max, 1);
        assert_eq!(lines, vec!["Blank Space", "Bad Blood"]);
    }

    #[test]
    fn test_select_returns_a_max_scoring_line() {
        let corpus = corpus("Blank Space\nWildest Dreams\nBad Blood\nStyle\n");
        let mut matcher = Matcher::seeded(1);
        let words = tokenize("blank blood");
        for _ in 0..50 {
            let line = matcher.select("blank blood", &corpus);
            assert!(corpus.lines().iter().any(|l| l == line));
            assert_eq!(score(&words, &line.to_lowercase()), 1);
        }
    }

    #[test]
    fn test_zero_score_still_selects() {
        let corpus = swift();
        let (max, lines) = candidates("xyzzy", &corpus);
        assert_eq!(max, 0);
        assert_eq!(lines.len(), corpus.len());

        let mut matcher = Matcher::seeded(3);
        let line = matcher.select("xyzzy", &corpus);
        assert!(corpus.lines().iter().any(|l| l == line));
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let corpus = swift();
        let (max, lines) = candidates("   ", &corpus);
        assert_eq!(max, 0);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_matching_ignores_case() {
        let corpus = corpus("SHAKE IT OFF\nlove story\n");
        let mut matcher = Matcher::seeded(0);
        assert_eq!(matcher.select("Shake", &corpus), "SHAKE IT OFF");
    }

    #[test]
    fn test_same_seed_same_choice() {
        let corpus = swift();
        let mut a = Matcher::seeded(99);
        let mut b = Matcher::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.select("nope", &corpus), b.select("nope", &corpus));
        }
    }
}
