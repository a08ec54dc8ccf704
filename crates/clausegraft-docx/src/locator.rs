//! Best-effort paragraph lookup by approximate text.
//!
//! Used only when a caller has clause text but no stable id. Matching is
//! whitespace-insensitive substring containment in either direction and the
//! first candidate in document order wins, so a short query can land on an
//! unrelated paragraph. Treat the result as a guess, never as an identity.

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First candidate whose text contains the query or is contained by it.
///
/// Whitespace-only candidates and an empty query never match.
pub fn locate_best_effort<K, T, I>(candidates: I, query: &str) -> Option<K>
where
    I: IntoIterator<Item = (K, T)>,
    T: AsRef<str>,
{
    let needle = collapse_whitespace(query);
    if needle.is_empty() {
        return None;
    }
    candidates.into_iter().find_map(|(key, text)| {
        let hay = collapse_whitespace(text.as_ref());
        let hit = !hay.is_empty() && (hay.contains(&needle) || needle.contains(&hay));
        hit.then_some(key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAGRAPHS: &[(usize, &str)] = &[
        (0, "   "),
        (1, "4.1 Termination  for\tCause."),
        (2, "Section 4.2. This agreement may be terminated by either party."),
        (3, "4.3 Survival."),
    ];

    #[test]
    fn query_inside_paragraph_matches() {
        let hit = locate_best_effort(
            PARAGRAPHS.iter().copied(),
            "This agreement may be   terminated",
        );
        assert_eq!(hit, Some(2));
    }

    #[test]
    fn paragraph_inside_query_matches() {
        let hit = locate_best_effort(
            PARAGRAPHS.iter().copied(),
            "Preamble. 4.1 Termination for Cause. Then more text.",
        );
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn first_match_in_document_order_wins() {
        assert_eq!(locate_best_effort(PARAGRAPHS.iter().copied(), "4."), Some(1));
    }

    #[test]
    fn blank_paragraphs_and_empty_queries_never_match() {
        assert_eq!(locate_best_effort(PARAGRAPHS.iter().copied(), "  \n "), None);
        assert_eq!(locate_best_effort(PARAGRAPHS.iter().copied(), "Indemnity"), None);
    }

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc "), "a b c");
    }
}
