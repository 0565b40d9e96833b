//! Snapshot of a remote template document

use crate::error::{Error, Result};
use crate::resource::CollectionLayout;
use crate::types::ResourceRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An externally owned template, as last returned by the remote side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateDocument(Value);

impl TemplateDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Top-level string field, e.g. `templateId`
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Decode the record collection of `layout`
    ///
    /// A missing collection reads as empty.
    pub fn records(&self, layout: &CollectionLayout) -> Result<Vec<ResourceRecord>> {
        self.decode(layout.collection)
    }

    /// Raw entries of the reference collection of `layout`
    pub fn references(&self, layout: &CollectionLayout) -> Result<Vec<Value>> {
        self.decode(layout.references)
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, pointer: &str) -> Result<Vec<T>> {
        match self.0.pointer(pointer) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| Error::MalformedTemplate {
                    path: pointer.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

impl From<Value> for TemplateDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::PHYSICAL_DOMAINS;
    use serde_json::json;

    #[test]
    fn test_missing_collection_is_empty() {
        let doc = TemplateDocument::new(json!({"templateId": "t-1"}));
        assert!(doc.records(&PHYSICAL_DOMAINS).unwrap().is_empty());
        assert!(doc.references(&PHYSICAL_DOMAINS).unwrap().is_empty());
        assert_eq!(doc.str_field("templateId"), Some("t-1"));
        assert_eq!(doc.str_field("schemaId"), None);
    }

    #[test]
    fn test_records_decoded_in_order() {
        let doc = TemplateDocument::new(json!({
            "fabricPolicyTemplate": {"template": {"domains": [
                {"name": "a", "uuid": "1"},
                {"name": "b", "uuid": "2", "pool": "p-1"}
            ]}}
        }));
        let records = doc.records(&PHYSICAL_DOMAINS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a");
        assert_eq!(records[1].reference.as_deref(), Some("p-1"));
    }

    #[test]
    fn test_malformed_collection() {
        let doc = TemplateDocument::new(json!({
            "fabricPolicyTemplate": {"template": {"domains": {"name": "not-a-list"}}}
        }));
        let err = doc.records(&PHYSICAL_DOMAINS).unwrap_err();
        assert!(matches!(err, Error::MalformedTemplate { .. }));
    }
}
