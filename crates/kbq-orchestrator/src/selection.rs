/// Fused-score floor above which KB sources are considered "sufficient",
/// below which a web search is worth invoking even if a datetime-style
/// question wasn't asked. Mirrors `kbq_search::retrieve::FUSED_SCORE_FLOOR`'s
/// order of magnitude but is a distinct, independently-tunable constant.
const SUFFICIENCY_FLOOR: f64 = 1.0 / 30.0;

const DATETIME_KEYWORDS: [&str; 5] = ["time", "date", "today", "now", "current"];
const WEB_SEARCH_KEYWORDS: [&str; 4] = ["latest", "news", "search", "web"];

fn tokenize(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deterministic keyword heuristic deciding which registered tools to
/// invoke for a question. `best_fused_score` is the top reciprocal-rank-
/// fused score the retriever returned (0.0 if no sources matched) — not an
/// individual provider's best-match score, which runs on a different scale.
#[must_use]
pub fn select_tools(question: &str, best_fused_score: f64) -> Vec<&'static str> {
    let tokens = tokenize(question);
    let mut tools = Vec::new();

    if tokens.iter().any(|t| DATETIME_KEYWORDS.contains(&t.as_str())) {
        tools.push("datetime");
    }
    let wants_web = tokens.iter().any(|t| WEB_SEARCH_KEYWORDS.contains(&t.as_str()))
        || question.to_lowercase().contains("current events");
    if wants_web && best_fused_score <= SUFFICIENCY_FLOOR {
        tools.push("web_search");
    }

    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn asking_for_the_time_selects_datetime() {
        assert_eq!(select_tools("What time is it right now?", 0.9), vec!["datetime"]);
    }

    #[test]
    fn asking_for_news_with_weak_sources_selects_web_search() {
        assert_eq!(select_tools("What's the latest news on this?", 0.01), vec!["web_search"]);
    }

    #[test]
    fn asking_for_news_with_strong_sources_skips_web_search() {
        assert!(select_tools("What's the latest news on this?", 0.9).is_empty());
    }

    #[test]
    fn unrelated_question_selects_nothing() {
        assert!(select_tools("How do I reset my password?", 0.9).is_empty());
    }

    #[test]
    fn current_events_phrase_is_recognized_even_split_across_tokens() {
        assert_eq!(select_tools("Any current events I should know?", 0.0), vec!["web_search"]);
    }
}
