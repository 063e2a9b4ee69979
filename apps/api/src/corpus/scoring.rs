//! Keyword relevance for corpus lookups.

/// Case-insensitive count of keyword occurrences in `chunk`.
pub fn keyword_hits(chunk: &str, keywords: &[String]) -> usize {
    let haystack = chunk.to_lowercase();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .map(|k| haystack.matches(k.as_str()).count())
        .sum()
}

/// Returns up to `top_k` chunks, most keyword hits first. Ties keep document
/// order, and chunks without hits still fill the remaining slots.
pub fn rank_chunks<'a>(chunks: &'a [String], keywords: &[String], top_k: usize) -> Vec<&'a str> {
    let mut scored: Vec<(usize, &str)> = chunks
        .iter()
        .map(|c| (keyword_hits(c, keywords), c.as_str()))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(top_k).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_hits_are_case_insensitive() {
        let hits = keyword_hits(
            "Tuned MySQL indexes; mysql replication with Java services.",
            &keywords(&["MySQL", "java"]),
        );
        assert_eq!(hits, 3);
    }

    #[test]
    fn test_blank_keywords_ignored() {
        assert_eq!(keyword_hits("anything", &keywords(&["", "  "])), 0);
    }

    #[test]
    fn test_rank_orders_by_hits_then_position() {
        let chunks = vec![
            "Led a design review.".to_string(),
            "Kafka consumer groups.".to_string(),
            "Kafka and Redis caching; Redis streams.".to_string(),
            "Wrote Kafka connectors.".to_string(),
        ];
        let ranked = rank_chunks(&chunks, &keywords(&["kafka", "redis"]), 3);
        assert_eq!(
            ranked,
            vec![
                "Kafka and Redis caching; Redis streams.",
                "Kafka consumer groups.",
                "Wrote Kafka connectors.",
            ]
        );
    }

    #[test]
    fn test_rank_fills_with_unmatched_chunks() {
        let chunks = vec!["first".to_string(), "second".to_string()];
        let ranked = rank_chunks(&chunks, &keywords(&["golang"]), 3);
        assert_eq!(ranked, vec!["first", "second"]);
    }
}
