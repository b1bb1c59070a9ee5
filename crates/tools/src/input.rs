//! Boundary input that accepts either a comma-separated string or a list

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A value given as `"a, b"` or `["a", "b"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ListInput {
    Text(String),
    Items(Vec<String>),
}

impl ListInput {
    /// Canonical ordered form; only the string form is split and trimmed
    pub fn into_items(self) -> Vec<String> {
        match self {
            ListInput::Text(text) => text.split(',').map(|s| s.trim().to_string()).collect(),
            ListInput::Items(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ListInput::Text(text) => text.is_empty(),
            ListInput::Items(items) => items.is_empty(),
        }
    }
}

impl From<&str> for ListInput {
    fn from(text: &str) -> Self {
        ListInput::Text(text.to_string())
    }
}

impl From<String> for ListInput {
    fn from(text: String) -> Self {
        ListInput::Text(text)
    }
}

impl From<Vec<String>> for ListInput {
    fn from(items: Vec<String>) -> Self {
        ListInput::Items(items)
    }
}

impl From<Vec<&str>> for ListInput {
    fn from(items: Vec<&str>) -> Self {
        ListInput::Items(items.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_split_and_trimmed() {
        assert_eq!(
            ListInput::from(" a,b ,  c").into_items(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_items_pass_through_untrimmed() {
        assert_eq!(
            ListInput::from(vec![" a", "b "]).into_items(),
            vec![" a", "b "]
        );
    }

    #[test]
    fn test_deserializes_both_shapes() {
        let text: ListInput = serde_json::from_str(r#""1,2""#).unwrap();
        assert_eq!(text, ListInput::Text("1,2".to_string()));

        let items: ListInput = serde_json::from_str(r#"["1","2"]"#).unwrap();
        assert_eq!(items, ListInput::Items(vec!["1".into(), "2".into()]));

        assert!(serde_json::from_str::<ListInput>("12").is_err());
    }

    #[test]
    fn test_is_empty() {
        assert!(ListInput::from("").is_empty());
        assert!(ListInput::Items(vec![]).is_empty());
        assert!(!ListInput::from(" ").is_empty());
    }
}
