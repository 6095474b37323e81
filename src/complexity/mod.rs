//! Lexical query-complexity scoring.
//!
//! The score steers the retrieval strategy: cheap embedding search for short
//! factual questions, cross-encoder reranking for causal/comparative ones.

use crate::constants::COMPLEXITY_MARKER_BONUS;

/// Question forms that signal an analytical query (Vietnamese corpus).
///
/// Matched as substrings of the lower-cased query; each marker found adds
/// [`COMPLEXITY_MARKER_BONUS`] on top of the token count, and multiple
/// markers stack.
pub const COMPLEXITY_MARKERS: &[&str] = &[
    "tại sao",
    "vì sao",
    "như thế nào",
    "bằng cách nào",
    "giải thích",
    "phân tích",
    "so sánh",
    "đánh giá",
    "liên quan",
    "khác nhau",
    "giống nhau",
    "ưu điểm",
    "nhược điểm",
];

/// Scores queries by token count plus marker bonuses. Pure and deterministic.
#[derive(Debug, Clone)]
pub struct ComplexityAnalyzer {
    markers: Vec<String>,
    bonus: u32,
}

impl ComplexityAnalyzer {
    /// Creates an analyzer with the built-in marker list.
    pub fn new() -> Self {
        Self {
            markers: COMPLEXITY_MARKERS.iter().map(|m| m.to_string()).collect(),
            bonus: COMPLEXITY_MARKER_BONUS,
        }
    }

    /// Creates an analyzer with a custom marker list (markers must be
    /// lower-case; matching is done against the lower-cased query).
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            bonus: COMPLEXITY_MARKER_BONUS,
        }
    }

    /// Returns the complexity score of a query: whitespace token count, plus
    /// the bonus once per distinct marker phrase present.
    pub fn score(&self, query: &str) -> u32 {
        let mut complexity = query.split_whitespace().count() as u32;

        let lowered = query.to_lowercase();
        for marker in &self.markers {
            if lowered.contains(marker.as_str()) {
                complexity += self.bonus;
            }
        }

        complexity
    }
}

impl Default for ComplexityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_token_count_without_markers() {
        let analyzer = ComplexityAnalyzer::new();
        assert_eq!(analyzer.score("Thủ đô của Pháp"), 4);
        assert_eq!(analyzer.score("A là gì?"), 3);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let analyzer = ComplexityAnalyzer::new();
        assert_eq!(analyzer.score(""), 0);
        assert_eq!(analyzer.score("   "), 0);
    }

    #[test]
    fn test_marker_adds_fixed_bonus() {
        let analyzer = ComplexityAnalyzer::new();
        // "tại sao" -> 2 tokens + 3 bonus
        assert_eq!(analyzer.score("tại sao"), 2 + COMPLEXITY_MARKER_BONUS);
    }

    #[test]
    fn test_markers_stack() {
        let analyzer = ComplexityAnalyzer::new();
        let query = "Hãy so sánh và đánh giá hai phương án";
        // 8 tokens + two markers
        assert_eq!(analyzer.score(query), 8 + 2 * COMPLEXITY_MARKER_BONUS);
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        let analyzer = ComplexityAnalyzer::new();
        assert_eq!(
            analyzer.score("Tại sao trời xanh?"),
            4 + COMPLEXITY_MARKER_BONUS
        );
    }

    #[test]
    fn test_monotone_in_appended_tokens() {
        let analyzer = ComplexityAnalyzer::new();
        let base = analyzer.score("mô hình hoạt động");
        let longer = analyzer.score("mô hình hoạt động ra sao vậy");
        assert!(longer >= base);
    }

    #[test]
    fn test_adding_a_marker_strictly_increases() {
        let analyzer = ComplexityAnalyzer::new();
        let base = analyzer.score("hai thuật toán này");
        let with_marker = analyzer.score("hai thuật toán này khác nhau");
        assert!(with_marker > base + 1);
    }

    #[test]
    fn test_scenario_complex_question_reaches_rerank_band() {
        let analyzer = ComplexityAnalyzer::new();
        // Contains both "tại sao" and "khác nhau".
        let score = analyzer.score("Tại sao hai phương pháp này khác nhau về bản chất?");
        assert!(score >= 11, "expected >= 11, got {score}");
    }

    #[test]
    fn test_custom_markers() {
        let analyzer = ComplexityAnalyzer::with_markers(["why", "compare"]);
        assert_eq!(
            analyzer.score("why do birds sing"),
            4 + COMPLEXITY_MARKER_BONUS
        );
    }
}
