//! # Declarative
//!
//! Reconciliation of a resource embedded in a remote template document.
//!
//! Given a desired state for one record and a snapshot of the template that
//! holds it, this crate works out the minimal patch operations that converge
//! the remote side, submits them through a caller-provided backend, and
//! reports what the record looks like afterwards.
//!
//! ## Core Concepts
//!
//! - **Matcher**: finds zero or one record by uuid or name, or lists them all
//! - **ReferenceResolver**: turns reference names into identifiers and back
//! - **Diff**: field-level `replace`/`remove` operations, or one `add` to create
//! - **Reconciler**: runs the `absent` / `present` / `query` state machine,
//!   honouring check mode
//!
//! ## Example
//!
//! ```
//! use declarative::{
//!     DesiredState, MemoryBackend, PHYSICAL_DOMAINS, ReconcileRequest, Reconciler,
//! };
//! use serde_json::json;
//!
//! let backend = MemoryBackend::new(json!({
//!     "fabricPolicyTemplate": {"template": {
//!         "vlanPools": [{"name": "poolA", "uuid": "p-a"}],
//!         "domains": []
//!     }}
//! }));
//! let reconciler = Reconciler::new(&backend, PHYSICAL_DOMAINS);
//!
//! let request = ReconcileRequest::new(DesiredState::Present)
//!     .name("dom1")
//!     .reference("poolA")
//!     .check_mode(true);
//! let outcome = reconciler.reconcile(&request).unwrap();
//!
//! assert!(outcome.changed);
//! assert!(backend.submissions().is_empty());
//! assert_eq!(outcome.current.record().unwrap().pool.as_deref(), Some("poolA"));
//! ```
//!
//! ## Collaborators
//!
//! - [`TemplateBackend`]: fetches the template and applies patch operations
//! - [`ReferenceResolver`]: name/identifier mapping for referenced entities
//!
//! Neither is a global; both are handed to the code that needs them.

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod matcher;
pub mod reference;
pub mod resource;
pub mod template;
pub mod types;

// Re-export main types at crate root
pub use context::{MemoryBackend, TemplateBackend};
pub use diff::{ChangeSet, Desired, DiffSummary};
pub use error::{Error, ErrorCategory, Result};
pub use executor::Reconciler;
pub use matcher::{Lookup, LookupKey};
pub use reference::{ReferenceResolver, TemplateReferences, render};
pub use resource::{CollectionLayout, PHYSICAL_DOMAINS};
pub use template::TemplateDocument;
pub use types::{
    DesiredState, FieldChange, FieldIntent, MatchResult, Observed, PatchOp, PatchOperation,
    ReconcileOutcome, ReconcileRequest, RenderedRecord, ResourceRecord,
};
