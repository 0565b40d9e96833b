//! Collaborator traits
//!
//! The reconciler never talks HTTP itself. It is handed a [`TemplateBackend`]
//! bound to one template and asks it for snapshots and submissions.

use crate::error::{Error, Result};
use crate::template::TemplateDocument;
use crate::types::{PatchOp, PatchOperation};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Access to one remote template
pub trait TemplateBackend {
    /// Fetch the current template document
    fn fetch_template(&self) -> Result<TemplateDocument>;

    /// Apply `operations` atomically and return the updated document
    fn submit(&self, operations: &[PatchOperation]) -> Result<TemplateDocument>;
}

impl<T: TemplateBackend + ?Sized> TemplateBackend for &T {
    fn fetch_template(&self) -> Result<TemplateDocument> {
        (**self).fetch_template()
    }

    fn submit(&self, operations: &[PatchOperation]) -> Result<TemplateDocument> {
        (**self).submit(operations)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    document: Value,
    submissions: Vec<Vec<PatchOperation>>,
    next_uuid: usize,
    fail_with: Option<String>,
}

/// In-memory backend for testing without a remote
///
/// Applies submitted operations to a JSON document the way the remote
/// does, assigning a uuid to appended records that lack one.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new(document: Value) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                document,
                ..Default::default()
            }),
        }
    }

    /// Make every later call fail with a transport error
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().fail_with = Some(message.into());
    }

    /// Current document
    pub fn document(&self) -> Value {
        self.lock().document.clone()
    }

    /// Every batch submitted so far
    pub fn submissions(&self) -> Vec<Vec<PatchOperation>> {
        self.lock().submissions.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TemplateBackend for MemoryBackend {
    fn fetch_template(&self) -> Result<TemplateDocument> {
        let state = self.lock();
        if let Some(message) = &state.fail_with {
            return Err(Error::transport(message.clone()));
        }
        Ok(TemplateDocument::new(state.document.clone()))
    }

    fn submit(&self, operations: &[PatchOperation]) -> Result<TemplateDocument> {
        let mut state = self.lock();
        if let Some(message) = &state.fail_with {
            return Err(Error::transport(message.clone()));
        }

        let mut document = state.document.clone();
        for op in operations {
            let mut op = lenient(&mut document, op);
            if op.op == PatchOp::Add {
                if let Some(Value::Object(record)) = op.value.as_mut() {
                    if !record.contains_key("uuid") {
                        state.next_uuid += 1;
                        record.insert(
                            "uuid".to_string(),
                            Value::from(format!("uuid-{}", state.next_uuid)),
                        );
                    }
                }
            }
            let strict: json_patch::PatchOperation =
                serde_json::to_value(&op)
                    .and_then(serde_json::from_value)
                    .map_err(Error::transport)?;
            json_patch::patch(&mut document, &[strict]).map_err(Error::transport)?;
        }

        state.document = document.clone();
        state.submissions.push(operations.to_vec());
        Ok(TemplateDocument::new(document))
    }
}

/// Relax `op` to what the remote accepts before strict JSON Patch runs
///
/// Missing containers on the way to the target are created (an appended
/// record starts an array) and `replace` of a missing member becomes `add`.
fn lenient(document: &mut Value, op: &PatchOperation) -> PatchOperation {
    let mut op = op.clone();
    if op.op == PatchOp::Remove {
        return op;
    }
    if let Some((parent, last)) = op.path.rsplit_once('/') {
        ensure_container(document, parent, last == "-");
    }
    if op.op == PatchOp::Replace && document.pointer(&op.path).is_none() {
        op.op = PatchOp::Add;
    }
    op
}

fn ensure_container(document: &mut Value, parent: &str, append: bool) {
    let mut node = document;
    for token in parent.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(map) => map.entry(token).or_insert(Value::Null),
            Value::Array(items) => match token.parse::<usize>() {
                Ok(index) if index < items.len() => &mut items[index],
                _ => return,
            },
            _ => return,
        };
    }

    if append && (node.is_null() || node.as_object().is_some_and(Map::is_empty)) {
        *node = Value::Array(Vec::new());
    } else if node.is_null() {
        *node = Value::Object(Map::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOMAINS: &str = "/fabricPolicyTemplate/template/domains";

    #[test]
    fn test_append_creates_collection_and_uuid() {
        let backend = MemoryBackend::new(json!({}));
        let doc = backend
            .submit(&[PatchOperation::add(
                format!("{DOMAINS}/-"),
                json!({"name": "dom1"}),
            )])
            .unwrap();

        assert_eq!(
            doc.as_value().pointer(DOMAINS),
            Some(&json!([{"name": "dom1", "uuid": "uuid-1"}]))
        );
        assert_eq!(backend.submissions().len(), 1);
    }

    #[test]
    fn test_replace_and_remove() {
        let backend = MemoryBackend::new(json!({
            "fabricPolicyTemplate": {"template": {"domains": [
                {"name": "a", "uuid": "1", "pool": "p"},
                {"name": "b", "uuid": "2"}
            ]}}
        }));

        backend
            .submit(&[
                PatchOperation::replace(format!("{DOMAINS}/0/description"), json!("x")),
                PatchOperation::remove(format!("{DOMAINS}/0/pool")),
                PatchOperation::remove(format!("{DOMAINS}/1")),
            ])
            .unwrap();

        assert_eq!(
            backend.document().pointer(DOMAINS),
            Some(&json!([{"name": "a", "uuid": "1", "description": "x"}]))
        );
    }

    #[test]
    fn test_replace_missing_member_adds_it() {
        let backend = MemoryBackend::new(json!({"item": {"name": "a"}}));
        backend
            .submit(&[PatchOperation::replace("/item/description", json!("d"))])
            .unwrap();
        assert_eq!(backend.document(), json!({"item": {"name": "a", "description": "d"}}));
    }

    #[test]
    fn test_failed_batch_leaves_document_untouched() {
        let backend = MemoryBackend::new(json!({"list": [{"name": "a"}]}));
        let result = backend.submit(&[
            PatchOperation::replace("/list/0/name", json!("b")),
            PatchOperation::remove("/list/5"),
        ]);
        assert!(result.is_err());
        assert_eq!(backend.document(), json!({"list": [{"name": "a"}]}));
    }

    #[test]
    fn test_remove_out_of_range_fails() {
        let backend = MemoryBackend::new(json!({"list": []}));
        let result = backend.submit(&[PatchOperation::remove("/list/0")]);
        assert!(matches!(result, Err(Error::Transport(_))));
        assert!(backend.submissions().is_empty());
    }

    #[test]
    fn test_fail_with() {
        let backend = MemoryBackend::new(json!({}));
        backend.fail_with("HTTP 500");
        assert!(matches!(backend.fetch_template(), Err(Error::Transport(_))));
    }
}
