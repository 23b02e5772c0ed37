use sha2::{Digest, Sha256};

/// Cleans review text for output
///
/// Control characters become spaces, runs of whitespace collapse to a
/// single space, and the result is trimmed. Case and punctuation are kept
/// as written.
pub fn clean_text(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes text for fingerprinting
///
/// On top of cleaning, the text is lowercased and runs of the same
/// punctuation character collapse to one, so "Great!!!" and "great!"
/// dedupe to the same fingerprint.
pub fn normalize_text(text: &str) -> String {
    let cleaned = clean_text(text).to_lowercase();

    let mut out = String::with_capacity(cleaned.len());
    let mut previous: Option<char> = None;
    for c in cleaned.chars() {
        if c.is_ascii_punctuation() && previous == Some(c) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Computes the content fingerprint for a review
///
/// The fingerprint is the hex SHA-256 of the normalized text joined with
/// the target URL, so identical text on two different targets stays two
/// records while repeats within a target collapse.
pub fn fingerprint(text: &str, target_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_text(text).as_bytes());
    hasher.update(b"\n");
    hasher.update(target_url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_text("  so   much \t space \n here "), "so much space here");
    }

    #[test]
    fn test_clean_strips_control_characters() {
        assert_eq!(clean_text("odd\u{0000}byte\u{0007}s"), "odd byte s");
    }

    #[test]
    fn test_clean_keeps_case() {
        assert_eq!(clean_text("Great Food"), "Great Food");
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_text("Great Food"), "great food");
    }

    #[test]
    fn test_normalize_collapses_repeated_punctuation() {
        assert_eq!(normalize_text("Amazing!!! Really..."), "amazing! really.");
        assert_eq!(normalize_text("what??!!"), "what?!");
    }

    #[test]
    fn test_normalize_keeps_distinct_punctuation() {
        assert_eq!(normalize_text("wait, what?"), "wait, what?");
    }

    #[test]
    fn test_fingerprint_ignores_case_and_spacing() {
        let a = fingerprint("Great   Food!", "https://example.com/a");
        let b = fingerprint("great food!", "https://example.com/a");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_depends_on_target() {
        let a = fingerprint("great food", "https://example.com/a");
        let b = fingerprint("great food", "https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = fingerprint("text", "url");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
