//! Raw form submissions
//!
//! Browsers post either `application/x-www-form-urlencoded` bodies or JSON. Both
//! are flattened into a [`Submission`]: a map from field name to text or a list of
//! text. Nothing is validated here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    fields: BTreeMap<String, FieldValue>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded form pairs.
    ///
    /// Keys ending in `[]` always collect into a list. A plain key that appears
    /// more than once is promoted to a list as well.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut submission = Submission::new();
        for (key, value) in pairs {
            let key: String = key.into();
            let value: String = value.into();
            if let Some(base) = key.strip_suffix("[]") {
                submission.push_list(base, value);
                continue;
            }
            match submission.fields.remove(&key) {
                None => {
                    submission.fields.insert(key, FieldValue::Text(value));
                }
                Some(FieldValue::Text(previous)) => {
                    submission
                        .fields
                        .insert(key, FieldValue::List(vec![previous, value]));
                }
                Some(FieldValue::List(mut items)) => {
                    items.push(value);
                    submission.fields.insert(key, FieldValue::List(items));
                }
            }
        }
        submission
    }

    /// Build from a JSON object. Arrays become lists, scalars become text, and
    /// `null` or nested objects are dropped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut submission = Submission::new();
        let Some(object) = value.as_object() else {
            return submission;
        };
        for (key, value) in object {
            match value {
                serde_json::Value::Array(items) => {
                    let items = items.iter().filter_map(scalar_to_string).collect();
                    submission.set(key, FieldValue::List(items));
                }
                other => {
                    if let Some(text) = scalar_to_string(other) {
                        submission.set(key, FieldValue::Text(text));
                    }
                }
            }
        }
        submission
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    fn push_list(&mut self, key: &str, value: String) {
        match self.fields.get_mut(key) {
            Some(FieldValue::List(items)) => items.push(value),
            Some(FieldValue::Text(previous)) => {
                let previous = std::mem::take(previous);
                self.fields
                    .insert(key.to_string(), FieldValue::List(vec![previous, value]));
            }
            None => {
                self.fields
                    .insert(key.to_string(), FieldValue::List(vec![value]));
            }
        }
    }

    /// The value exactly as submitted. Lists yield their first entry.
    pub fn raw(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::List(items) => items.first().map(String::as_str),
        }
    }

    /// Trimmed text, or `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.raw(key).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trimmed non-blank list entries. A text value counts as a one-item list.
    pub fn list(&self, key: &str) -> Vec<String> {
        let items: Vec<&str> = match self.fields.get(key) {
            None => Vec::new(),
            Some(FieldValue::Text(text)) => vec![text.as_str()],
            Some(FieldValue::List(items)) => items.iter().map(String::as_str).collect(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Add or remove `item` from the list under `key`.
    pub fn toggle_list_item(&mut self, key: &str, item: &str) {
        let mut items = self.list(key);
        if let Some(pos) = items.iter().position(|i| i == item) {
            items.remove(pos);
        } else {
            items.push(item.to_string());
        }
        self.set(key, FieldValue::List(items));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Echo of the submitted values, used to refill a form after a failed submit.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bracket_keys_collect_into_list() {
        let submission = Submission::from_pairs(vec![
            ("first_name", "Ana"),
            ("medical_conditions[]", "Diabetes"),
            ("medical_conditions[]", "Hypertension"),
        ]);
        assert_eq!(submission.text("first_name"), Some("Ana"));
        assert_eq!(
            submission.list("medical_conditions"),
            vec!["Diabetes".to_string(), "Hypertension".to_string()]
        );
    }

    #[test]
    fn test_repeated_plain_key_becomes_list() {
        let submission = Submission::from_pairs(vec![("tag", "a"), ("tag", "b"), ("tag", "c")]);
        assert_eq!(submission.list("tag").len(), 3);
        assert_eq!(submission.raw("tag"), Some("a"));
    }

    #[test]
    fn test_blank_text_is_absent() {
        let submission = Submission::from_pairs(vec![("phone", "   ")]);
        assert_eq!(submission.text("phone"), None);
        assert_eq!(submission.raw("phone"), Some("   "));
    }

    #[test]
    fn test_from_json() {
        let submission = Submission::from_json(&json!({
            "name": "Maria Reyes",
            "rating": 5,
            "medical_conditions": ["Dementia", "", 3],
            "nested": { "ignored": true },
            "missing": null
        }));
        assert_eq!(submission.text("name"), Some("Maria Reyes"));
        assert_eq!(submission.text("rating"), Some("5"));
        assert_eq!(
            submission.list("medical_conditions"),
            vec!["Dementia".to_string(), "3".to_string()]
        );
        assert!(submission.raw("nested").is_none());
        assert!(submission.raw("missing").is_none());
    }

    #[test]
    fn test_toggle_list_item() {
        let mut submission = Submission::new();
        submission.toggle_list_item("medical_conditions", "Arthritis");
        submission.toggle_list_item("medical_conditions", "Diabetes");
        submission.toggle_list_item("medical_conditions", "Arthritis");
        assert_eq!(submission.list("medical_conditions"), vec!["Diabetes".to_string()]);
    }

    #[test]
    fn test_to_json_echoes_values() {
        let submission = Submission::from_pairs(vec![("name", "Maria"), ("c[]", "x")]);
        assert_eq!(submission.to_json(), json!({ "name": "Maria", "c": ["x"] }));
    }
}
