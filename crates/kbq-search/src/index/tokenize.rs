const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

/// Lower-cases, splits on non-alphanumeric boundaries, and drops stop words
/// and empty tokens. Shared by the sparse (BM25) and basic (substring)
/// providers so both see the same vocabulary.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_and_lowercases() {
        assert_eq!(tokenize("What Is Rust?"), vec!["what", "rust"]);
    }

    #[test]
    fn drops_stopwords_and_punctuation() {
        assert_eq!(
            tokenize("The quick-brown fox, and the dog."),
            vec!["quick", "brown", "fox", "dog"]
        );
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(tokenize("   ").is_empty());
    }
}
