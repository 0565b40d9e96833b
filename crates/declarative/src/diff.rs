//! Diff computation between desired fields and a matched record
//!
//! Produces the patch operations that converge one record, together with a
//! prediction of what the record looks like once they are applied.

use crate::error::{Error, Result};
use crate::reference::ReferenceResolver;
use crate::resource::CollectionLayout;
use crate::template::TemplateDocument;
use crate::types::{
    FieldChange, FieldIntent, MatchResult, PatchOp, PatchOperation, REFERENCE_FIELD,
    ResourceRecord,
};
use serde_json::Value;

/// Desired field values for a `present` reconciliation
#[derive(Debug, Clone, Copy)]
pub struct Desired<'a> {
    pub name: &'a str,
    pub description: &'a FieldIntent,
    /// Reference by name
    pub reference: &'a FieldIntent,
}

/// Operations for one record plus the predicted post-apply record
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub operations: Vec<PatchOperation>,
    pub predicted: ResourceRecord,
}

impl ChangeSet {
    /// Whether the record is already converged
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Compute the change set for `desired`, creating the record when nothing matched
pub fn compute(
    desired: Desired<'_>,
    existing: Option<&MatchResult>,
    layout: &CollectionLayout,
    document: &TemplateDocument,
    resolver: &dyn ReferenceResolver,
) -> Result<ChangeSet> {
    match existing {
        Some(found) => diff_existing(desired, found, layout, resolver),
        None => creation(desired, layout, document, resolver),
    }
}

/// Field-level operations against an existing record
///
/// Fields are evaluated, and operations emitted, in the order name,
/// description, reference.
pub fn diff_existing(
    desired: Desired<'_>,
    existing: &MatchResult,
    layout: &CollectionLayout,
    resolver: &dyn ReferenceResolver,
) -> Result<ChangeSet> {
    let index = existing.index;
    let current = &existing.details;
    let mut predicted = current.clone();
    let mut operations = Vec::new();

    if current.name != desired.name {
        operations.push(PatchOperation::replace(
            layout.field_path(index, "name"),
            Value::from(desired.name),
        ));
        predicted = predicted.apply(&FieldChange::Name(desired.name.to_string()));
    }

    let description = match desired.description {
        FieldIntent::Unspecified => None,
        FieldIntent::Empty => Some(""),
        FieldIntent::Value(v) => Some(v.as_str()),
    };
    if let Some(description) = description {
        if current.description.as_deref() != Some(description) {
            operations.push(PatchOperation::replace(
                layout.field_path(index, "description"),
                Value::from(description),
            ));
            predicted = predicted.apply(&FieldChange::Description(description.to_string()));
        }
    }

    match desired.reference {
        FieldIntent::Value(name) => {
            let id = resolver.resolve_to_id(name)?;
            if current.reference.as_deref() != Some(id.as_str()) {
                operations.push(PatchOperation::replace(
                    layout.field_path(index, REFERENCE_FIELD),
                    Value::from(id.as_str()),
                ));
                predicted = predicted.apply(&FieldChange::Reference(Some(id)));
            }
        }
        FieldIntent::Empty => {
            if current.reference.as_deref().is_some_and(|r| !r.is_empty()) {
                operations.push(PatchOperation::remove(
                    layout.field_path(index, REFERENCE_FIELD),
                ));
                predicted = predicted.apply(&FieldChange::Reference(None));
            }
        }
        FieldIntent::Unspecified => {}
    }

    for op in &operations {
        log::debug!("{}: {}", layout.label, op);
    }

    Ok(ChangeSet {
        operations,
        predicted,
    })
}

/// A single `add` appending a new record
///
/// Only supplied, non-empty fields are part of the payload. The owning
/// template's `templateId` and `schemaId` are copied in when present.
pub fn creation(
    desired: Desired<'_>,
    layout: &CollectionLayout,
    document: &TemplateDocument,
    resolver: &dyn ReferenceResolver,
) -> Result<ChangeSet> {
    let mut predicted = ResourceRecord::named(desired.name);

    for key in ["templateId", "schemaId"] {
        if let Some(value) = document.str_field(key) {
            predicted.extra.insert(key.to_string(), Value::from(value));
        }
    }

    if let Some(description) = desired.description.value() {
        predicted = predicted.apply(&FieldChange::Description(description.to_string()));
    }

    if let Some(name) = desired.reference.value() {
        let id = resolver.resolve_to_id(name)?;
        predicted = predicted.apply(&FieldChange::Reference(Some(id)));
    }

    let payload = serde_json::to_value(&predicted).map_err(|e| Error::MalformedTemplate {
        path: layout.collection.to_string(),
        message: e.to_string(),
    })?;

    let operation = PatchOperation::add(layout.append_path(), payload);
    log::debug!("{}: {}", layout.label, operation);

    Ok(ChangeSet {
        operations: vec![operation],
        predicted,
    })
}

/// Counts of operations by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub additions: usize,
    pub replacements: usize,
    pub removals: usize,
}

impl DiffSummary {
    pub fn from_operations(operations: &[PatchOperation]) -> Self {
        let mut summary = Self::default();
        for op in operations {
            match op.op {
                PatchOp::Add => summary.additions += 1,
                PatchOp::Replace => summary.replacements += 1,
                PatchOp::Remove => summary.removals += 1,
            }
        }
        summary
    }

    /// Total number of operations
    pub fn total(&self) -> usize {
        self.additions + self.replacements + self.removals
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
