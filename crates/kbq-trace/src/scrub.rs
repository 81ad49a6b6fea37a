use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

const REDACTED: &str = "[redacted]";

/// Header names never stored verbatim, regardless of case.
const SENSITIVE_HEADERS: [&str; 3] = ["authorization", "x-api-key", "cookie"];

/// Scrubs a raw header list into the form a `Trace` is allowed to persist —
/// sensitive values replaced, everything else kept as-is.
#[must_use]
pub fn scrub_headers<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    headers
        .into_iter()
        .map(|(name, value)| {
            let value = if SENSITIVE_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                REDACTED.to_string()
            } else {
                value.to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}

/// Body content is never stored, only its SHA-256 digest, computed over the
/// raw bytes — hashing a lossy UTF-8 decode would corrupt the digest for
/// binary bodies (PDF/DOCX uploads).
#[must_use]
pub fn hash_body(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn redacts_known_sensitive_headers_case_insensitively() {
        let scrubbed = scrub_headers([
            ("Authorization", "Bearer secret-token"),
            ("X-Api-Key", "k-123"),
            ("COOKIE", "session=abc"),
            ("Accept", "application/json"),
        ]);
        assert_eq!(scrubbed["Authorization"], REDACTED);
        assert_eq!(scrubbed["X-Api-Key"], REDACTED);
        assert_eq!(scrubbed["COOKIE"], REDACTED);
        assert_eq!(scrubbed["Accept"], "application/json");
    }

    #[test]
    fn scrubbed_headers_never_contain_bearer_prefix() {
        let scrubbed = scrub_headers([("Authorization", "Bearer abc.def.ghi")]);
        for value in scrubbed.values() {
            assert!(!value.contains("Bearer "));
        }
    }

    #[test]
    fn body_hash_never_retains_the_body() {
        let digest = hash_body(b"super secret request body");
        assert!(!digest.contains("secret"));
        assert_eq!(digest.len(), 64);
    }
}
