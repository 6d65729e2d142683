//! Stored documents

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::query::DOCUMENT_ID;

/// A document: identifier plus JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Resolves a dotted field path without copying the body.
    /// `__name__` yields the identifier, the only owned result.
    pub fn field(&self, path: &str) -> Option<Cow<'_, Value>> {
        if path == DOCUMENT_ID {
            return Some(Cow::Owned(Value::String(self.id.clone())));
        }
        path.split('.')
            .try_fold(&self.data, |current, segment| current.get(segment))
            .map(Cow::Borrowed)
    }

    /// Deserializes the body into a typed value
    pub fn data_to<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_field_lookup() {
        let doc = Document::new("u1", json!({"profile": {"bio": "hi"}, "age": 3}));
        assert_eq!(doc.field("profile.bio").as_deref(), Some(&json!("hi")));
        assert_eq!(doc.field("age").as_deref(), Some(&json!(3)));
        assert_eq!(doc.field("profile.missing"), None);
        assert_eq!(doc.field("age.deeper"), None);
    }

    #[test]
    fn test_body_fields_are_borrowed() {
        let doc = Document::new("u1", json!({"profile": {"bio": "hi"}}));
        assert!(matches!(doc.field("profile"), Some(Cow::Borrowed(_))));
        assert!(matches!(doc.field(DOCUMENT_ID), Some(Cow::Owned(_))));
    }

    #[test]
    fn test_document_id_path() {
        let doc = Document::new("u1", json!({}));
        assert_eq!(doc.field(DOCUMENT_ID).as_deref(), Some(&json!("u1")));
    }

    #[test]
    fn test_data_to() {
        #[derive(Deserialize)]
        struct User {
            age: i64,
        }
        let doc = Document::new("u1", json!({"age": 41}));
        let user: User = doc.data_to().unwrap();
        assert_eq!(user.age, 41);
    }
}
