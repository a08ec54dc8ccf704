use serde::{Deserialize, Serialize};

/// Style-name conventions the parser keys on.
///
/// Style names are matched after resolution through the package's style
/// sheet, so these are display names ("Heading 1"), not style ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Styles starting with this open an article.
    pub top_heading: String,
    /// Exact style name that also opens an article.
    pub title_style: String,
    /// Styles starting with this open a section.
    pub second_heading: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            top_heading: "Heading 1".to_string(),
            title_style: "Title".to_string(),
            second_heading: "Heading 2".to_string(),
        }
    }
}

impl ParserConfig {
    pub fn is_top_heading(&self, style: &str) -> bool {
        style.starts_with(&self.top_heading) || style == self.title_style
    }

    pub fn is_second_heading(&self, style: &str) -> bool {
        style.starts_with(&self.second_heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_word_builtins() {
        let config = ParserConfig::default();
        assert!(config.is_top_heading("Heading 1"));
        assert!(config.is_top_heading("Heading 1 Char"));
        assert!(config.is_top_heading("Title"));
        assert!(!config.is_top_heading("Subtitle"));
        assert!(config.is_second_heading("Heading 2"));
        assert!(!config.is_second_heading("Heading 3"));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"top_heading": "Clause Title"}"#).unwrap();
        assert_eq!(config.top_heading, "Clause Title");
        assert_eq!(config.second_heading, "Heading 2");
        assert!(config.is_top_heading("Title"));
    }
}
