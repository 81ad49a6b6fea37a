//! Chunks extracted document text into ~1,200-character pieces.
//!
//! Splits occur on paragraph boundaries (blank lines) wherever possible, so
//! ordinary paragraphs are never split mid-sentence. A paragraph longer than
//! [`HARD_WRAP_CHARS`] is the one exception: it is split at whitespace near
//! the target size, since there is no paragraph boundary left to use.

/// Target chunk size. Chunks built from whole paragraphs land near this.
const TARGET_CHARS: usize = 1200;

/// Paragraphs are merged into a chunk as long as doing so stays within
/// `TARGET_CHARS + TOLERANCE_CHARS`.
const TOLERANCE_CHARS: usize = 200;

/// A paragraph longer than this has no choice but to be split mid-sentence,
/// at the nearest whitespace to the target size.
const HARD_WRAP_CHARS: usize = 2400;

/// Splits `text` into ordered chunks per the rules above. Returns an empty
/// vector for blank input — callers treat that as `EmptyContent`.
#[must_use]
pub fn chunk_text(text: &str) -> Vec<String> {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs {
        if paragraph.chars().count() > HARD_WRAP_CHARS {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_at_whitespace(paragraph));
            continue;
        }

        if current.is_empty() {
            current.push_str(paragraph);
        } else if current.chars().count() + 2 + paragraph.chars().count()
            <= TARGET_CHARS + TOLERANCE_CHARS
        {
            current.push_str("\n\n");
            current.push_str(paragraph);
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(paragraph);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Splits an over-long paragraph at whitespace nearest `TARGET_CHARS` into
/// the preceding text, repeating until the remainder fits in one chunk.
fn split_at_whitespace(paragraph: &str) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    let mut out = Vec::new();
    let mut start = 0usize;

    while chars.len() - start > HARD_WRAP_CHARS {
        let search_end = (start + TARGET_CHARS + TOLERANCE_CHARS).min(chars.len());
        let split_at = find_whitespace_before(&chars, start + TARGET_CHARS, search_end)
            .unwrap_or(search_end);
        out.push(chars[start..split_at].iter().collect::<String>().trim().to_string());
        start = split_at;
    }

    let tail: String = chars[start..].iter().collect();
    let tail = tail.trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }

    out
}

/// Nearest whitespace at or after `from`, scanning forward up to `limit`.
/// Falls back to scanning backward from `from` if nothing is found forward.
fn find_whitespace_before(chars: &[char], from: usize, limit: usize) -> Option<usize> {
    for idx in from..limit {
        if chars[idx].is_whitespace() {
            return Some(idx);
        }
    }
    for idx in (0..from).rev() {
        if chars[idx].is_whitespace() {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("   \n\n  ").is_empty());
    }

    #[test]
    fn single_short_paragraph_is_one_chunk() {
        let chunks = chunk_text("A short paragraph.");
        assert_eq!(chunks, vec!["A short paragraph.".to_string()]);
    }

    #[test]
    fn paragraphs_merge_until_tolerance_exceeded() {
        let p1 = "a".repeat(600);
        let p2 = "b".repeat(600);
        let p3 = "c".repeat(600);
        let text = format!("{p1}\n\n{p2}\n\n{p3}");
        let chunks = chunk_text(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].chars().count() <= 1400);
    }

    #[test]
    fn oversized_paragraph_is_split_at_whitespace_not_mid_word() {
        let words = vec!["word"; 1000];
        let long_paragraph = words.join(" ");
        let chunks = chunk_text(&long_paragraph);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.starts_with(' '));
            assert!(!chunk.ends_with(' '));
            for word in chunk.split_whitespace() {
                assert_eq!(word, "word");
            }
        }
    }
}
