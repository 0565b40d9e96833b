//! Where a managed resource lives inside a template
//!
//! A layout names the collection holding the records and the sibling
//! collection holding the entities they reference. Patch paths are built
//! from it, so the rest of the crate never hard-codes a pointer.

/// Location of a resource collection and its reference collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLayout {
    /// Human-readable kind, used in errors and logs
    pub label: &'static str,
    /// JSON pointer of the record collection
    pub collection: &'static str,
    /// Human-readable kind of the referenced entities
    pub reference_label: &'static str,
    /// JSON pointer of the reference collection
    pub references: &'static str,
}

/// Physical domains of a fabric policy template, referencing VLAN pools
pub const PHYSICAL_DOMAINS: CollectionLayout = CollectionLayout {
    label: "Physical Domain",
    collection: "/fabricPolicyTemplate/template/domains",
    reference_label: "VLAN Pool",
    references: "/fabricPolicyTemplate/template/vlanPools",
};

impl CollectionLayout {
    /// Path that appends to the collection
    pub fn append_path(&self) -> String {
        format!("{}/-", self.collection)
    }

    /// Path of the record at `index`
    pub fn record_path(&self, index: usize) -> String {
        format!("{}/{}", self.collection, index)
    }

    /// Path of `field` in the record at `index`
    pub fn field_path(&self, index: usize, field: &str) -> String {
        format!("{}/{}/{}", self.collection, index, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            PHYSICAL_DOMAINS.append_path(),
            "/fabricPolicyTemplate/template/domains/-"
        );
        assert_eq!(
            PHYSICAL_DOMAINS.record_path(3),
            "/fabricPolicyTemplate/template/domains/3"
        );
        assert_eq!(
            PHYSICAL_DOMAINS.field_path(0, "description"),
            "/fabricPolicyTemplate/template/domains/0/description"
        );
    }
}
