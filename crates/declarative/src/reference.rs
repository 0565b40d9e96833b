//! Resolving reference entities between name and identifier
//!
//! Records store the identifier of the entity they point at; users speak in
//! names. [`ReferenceResolver`] bridges the two, and [`render`] applies it to
//! a record before it is shown to anyone.

use crate::error::{Error, Result};
use crate::resource::CollectionLayout;
use crate::template::TemplateDocument;
use crate::types::{RenderedRecord, ResourceRecord};
use serde_json::Value;

/// Maps reference names to identifiers and back
pub trait ReferenceResolver {
    /// Identifier of the entity called `name`
    fn resolve_to_id(&self, name: &str) -> Result<String>;

    /// Name of the entity with identifier `id`
    fn resolve_to_name(&self, id: &str) -> Result<String>;
}

/// Resolver over the reference collection of one template snapshot
#[derive(Debug, Clone, Default)]
pub struct TemplateReferences {
    label: String,
    /// `(name, uuid)` pairs in collection order
    entries: Vec<(String, String)>,
}

impl TemplateReferences {
    pub fn new(label: impl Into<String>, entries: Vec<(String, String)>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }

    /// Index the reference collection of `layout` in `document`
    ///
    /// Entries without both a name and a uuid cannot be referenced and are
    /// skipped.
    pub fn from_document(document: &TemplateDocument, layout: &CollectionLayout) -> Result<Self> {
        let entries = document
            .references(layout)?
            .iter()
            .filter_map(|entry| {
                let name = entry.get("name").and_then(Value::as_str)?;
                let uuid = entry.get("uuid").and_then(Value::as_str)?;
                Some((name.to_string(), uuid.to_string()))
            })
            .collect();
        Ok(Self::new(layout.reference_label, entries))
    }

    fn find(&self, key: &'static str, value: &str) -> Result<&(String, String)> {
        let by_name = key == "name";
        let select = |entry: &&(String, String)| {
            if by_name {
                entry.0 == value
            } else {
                entry.1 == value
            }
        };

        let matches: Vec<&(String, String)> = self.entries.iter().filter(select).collect();
        match matches.as_slice() {
            [entry] => Ok(*entry),
            [] => Err(Error::ReferenceNotFound {
                label: self.label.clone(),
                key,
                value: value.to_string(),
                existing: self
                    .entries
                    .iter()
                    .map(|(name, uuid)| if by_name { name.as_str() } else { uuid.as_str() })
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
            many => Err(Error::AmbiguousMatch {
                label: self.label.clone(),
                key,
                value: value.to_string(),
                count: many.len(),
            }),
        }
    }
}

impl ReferenceResolver for TemplateReferences {
    fn resolve_to_id(&self, name: &str) -> Result<String> {
        self.find("name", name).map(|(_, uuid)| uuid.clone())
    }

    fn resolve_to_name(&self, id: &str) -> Result<String> {
        self.find("uuid", id).map(|(name, _)| name.clone())
    }
}

/// Render a record for display, turning its reference identifier into a name
pub fn render(record: &ResourceRecord, resolver: &dyn ReferenceResolver) -> Result<RenderedRecord> {
    let (pool, pool_ref) = match record.reference.as_deref() {
        Some(id) if !id.is_empty() => (Some(resolver.resolve_to_name(id)?), Some(id.to_string())),
        _ => (None, None),
    };

    Ok(RenderedRecord {
        uuid: record.uuid.clone(),
        name: record.name.clone(),
        description: record.description.clone(),
        pool,
        pool_ref,
        extra: record.extra.clone(),
    })
}

/// Render every record of a collection
pub fn render_all(
    records: &[ResourceRecord],
    resolver: &dyn ReferenceResolver,
) -> Result<Vec<RenderedRecord>> {
    records.iter().map(|r| render(r, resolver)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::PHYSICAL_DOMAINS;
    use serde_json::json;

    fn pools() -> TemplateReferences {
        TemplateReferences::new(
            "VLAN Pool",
            vec![
                ("poolA".to_string(), "p-a".to_string()),
                ("poolB".to_string(), "p-b".to_string()),
            ],
        )
    }

    #[test]
    fn test_resolve_both_directions() {
        let pools = pools();
        assert_eq!(pools.resolve_to_id("poolB").unwrap(), "p-b");
        assert_eq!(pools.resolve_to_name("p-a").unwrap(), "poolA");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let err = pools().resolve_to_id("poolZ").unwrap_err();
        match err {
            Error::ReferenceNotFound {
                key,
                value,
                existing,
                ..
            } => {
                assert_eq!(key, "name");
                assert_eq!(value, "poolZ");
                assert_eq!(existing, "poolA, poolB");
            }
            _ => panic!("Expected Error::ReferenceNotFound"),
        }
    }

    #[test]
    fn test_resolve_duplicate_name() {
        let pools = TemplateReferences::new(
            "VLAN Pool",
            vec![
                ("poolA".to_string(), "p-1".to_string()),
                ("poolA".to_string(), "p-2".to_string()),
            ],
        );
        assert!(matches!(
            pools.resolve_to_id("poolA"),
            Err(Error::AmbiguousMatch { count: 2, .. })
        ));
    }

    #[test]
    fn test_from_document_skips_incomplete_entries() {
        let doc = TemplateDocument::new(json!({
            "fabricPolicyTemplate": {"template": {"vlanPools": [
                {"name": "poolA", "uuid": "p-a"},
                {"name": "orphan"}
            ]}}
        }));
        let pools = TemplateReferences::from_document(&doc, &PHYSICAL_DOMAINS).unwrap();
        assert_eq!(pools.resolve_to_id("poolA").unwrap(), "p-a");
        assert!(matches!(
            pools.resolve_to_id("orphan"),
            Err(Error::ReferenceNotFound { .. })
        ));
    }

    #[test]
    fn test_render_with_and_without_reference() {
        let pools = pools();

        let plain = ResourceRecord::named("dom1");
        let rendered = render(&plain, &pools).unwrap();
        assert_eq!(rendered.pool, None);
        assert_eq!(rendered.pool_ref, None);

        let linked = ResourceRecord {
            reference: Some("p-b".to_string()),
            ..ResourceRecord::named("dom2")
        };
        let rendered = render(&linked, &pools).unwrap();
        assert_eq!(rendered.pool.as_deref(), Some("poolB"));
        assert_eq!(rendered.pool_ref.as_deref(), Some("p-b"));
    }

    #[test]
    fn test_render_dangling_reference_fails() {
        let record = ResourceRecord {
            reference: Some("p-gone".to_string()),
            ..ResourceRecord::named("dom1")
        };
        assert!(matches!(
            render(&record, &pools()),
            Err(Error::ReferenceNotFound { .. })
        ));
    }
}
