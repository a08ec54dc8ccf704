//! Numbering patterns and keyword heuristics.
//!
//! These are cues, not legal semantics: the first matching tier wins and
//! nothing here ever fails.

use once_cell::sync::Lazy;

use regex::Regex;

use clausegraft_core::ClauseType;

static ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(ARTICLE|SECTION|SCHEDULE|EXHIBIT)\s+([IVXLCDM0-9A-Z]+)")
        .expect("invalid article regex")
});

static SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*)\.?\s+").expect("invalid section regex")
});

static POINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\([a-z0-9]+\))\s+").expect("invalid point regex")
});

/// Keyword → "ARTICLE I", "SECTION 4", "schedule A" (keyword case kept).
pub fn article_label(text: &str) -> Option<String> {
    ARTICLE
        .captures(text)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
}

/// Leading decimal numbering: "4", "1.1", "2.3.1", optionally "1.1." then whitespace.
pub fn section_label(text: &str) -> Option<String> {
    SECTION.captures(text).map(|caps| caps[1].to_string())
}

/// Leading parenthesised label: "(a)", "(12)", then whitespace.
pub fn point_label(text: &str) -> Option<String> {
    POINT.captures(text).map(|caps| caps[1].to_string())
}

/// Marker phrases per tag, in priority order.
const MARKERS: &[(ClauseType, &[&str])] = &[
    (
        ClauseType::Condition,
        &["if ", "unless", "provided that", "subject to", "condition"],
    ),
    (
        ClauseType::Obligation,
        &["shall", "must", "agree to", "agrees to", "will"],
    ),
    (
        ClauseType::Right,
        &["may", "entitled to", "right to", "option to"],
    ),
    (
        ClauseType::Representation,
        &["represents", "warrants", "representation", "warranty"],
    ),
    (ClauseType::Definition, &["means", "defined as", "meaning"]),
];

/// Heuristic tag from substring markers on the lowercased text.
pub fn clause_type(text: &str) -> ClauseType {
    let lower = text.to_lowercase();
    MARKERS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
        .map(|(tag, _)| *tag)
        .unwrap_or(ClauseType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_keywords_are_case_insensitive() {
        assert_eq!(article_label("ARTICLE I: DEFINITIONS").as_deref(), Some("ARTICLE I"));
        assert_eq!(article_label("Section 4 Termination").as_deref(), Some("Section 4"));
        assert_eq!(article_label("SCHEDULE A").as_deref(), Some("SCHEDULE A"));
        assert_eq!(article_label("Articles of association"), None);
        assert_eq!(article_label("See ARTICLE I"), None);
    }

    #[test]
    fn section_numbers() {
        assert_eq!(section_label("1.1 Definitions").as_deref(), Some("1.1"));
        assert_eq!(section_label("2.3.1. Nested").as_deref(), Some("2.3.1"));
        assert_eq!(section_label("4 Termination").as_deref(), Some("4"));
        assert_eq!(section_label("1.1Definitions"), None);
        assert_eq!(section_label("1. 2 odd"), Some("1".to_string()));
        assert_eq!(section_label(".1 stray"), None);
    }

    #[test]
    fn point_labels_are_lowercase_or_digits() {
        assert_eq!(point_label("(a) Cause").as_deref(), Some("(a)"));
        assert_eq!(point_label("(12) Twelfth").as_deref(), Some("(12)"));
        assert_eq!(point_label("(A) Upper"), None);
        assert_eq!(point_label("(a)No space"), None);
    }

    #[test]
    fn first_marker_tier_wins() {
        assert_eq!(
            clause_type("Subject to clause 3, the Buyer shall pay"),
            ClauseType::Condition
        );
        assert_eq!(clause_type("The Buyer SHALL pay"), ClauseType::Obligation);
        assert_eq!(clause_type("The Buyer may terminate"), ClauseType::Right);
        assert_eq!(clause_type("The Seller warrants title"), ClauseType::Representation);
        assert_eq!(clause_type("\"Cause\" means any breach"), ClauseType::Definition);
        assert_eq!(clause_type("Governing law"), ClauseType::General);
    }

    #[test]
    fn markers_match_inside_words() {
        // "conditional" contains "condition"; "willing" contains "will".
        assert_eq!(clause_type("a conditional offer"), ClauseType::Condition);
        assert_eq!(clause_type("a willing party"), ClauseType::Obligation);
    }
}
