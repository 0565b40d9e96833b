//! Reconciliation controller - drives one resource to its declared state

use crate::context::TemplateBackend;
use crate::diff::{self, Desired};
use crate::error::{Error, Result};
use crate::matcher::{self, Lookup, LookupKey};
use crate::reference::{self, TemplateReferences};
use crate::resource::CollectionLayout;
use crate::template::TemplateDocument;
use crate::types::{
    DesiredState, MatchResult, Observed, PatchOperation, ReconcileOutcome, ReconcileRequest,
};

/// Reconciles records of one collection against a template backend
///
/// Holds no state between calls: every [`Reconciler::reconcile`] reads a
/// fresh snapshot, so running it twice with the same request converges
/// and the second run submits nothing.
///
/// # Example
///
/// ```
/// use declarative::{
///     DesiredState, MemoryBackend, PHYSICAL_DOMAINS, ReconcileRequest, Reconciler,
/// };
/// use serde_json::json;
///
/// let backend = MemoryBackend::new(json!({}));
/// let reconciler = Reconciler::new(&backend, PHYSICAL_DOMAINS);
///
/// let outcome = reconciler
///     .reconcile(&ReconcileRequest::new(DesiredState::Present).name("dom1"))
///     .unwrap();
/// assert!(outcome.changed);
///
/// let again = reconciler
///     .reconcile(&ReconcileRequest::new(DesiredState::Present).name("dom1"))
///     .unwrap();
/// assert!(!again.changed);
/// ```
pub struct Reconciler<B> {
    backend: B,
    layout: CollectionLayout,
}

impl<B: TemplateBackend> Reconciler<B> {
    pub fn new(backend: B, layout: CollectionLayout) -> Self {
        Self { backend, layout }
    }

    /// Run one reconciliation
    pub fn reconcile(&self, request: &ReconcileRequest) -> Result<ReconcileOutcome> {
        let name = required_name(request)?;

        let document = self.backend.fetch_template()?;
        let references = TemplateReferences::from_document(&document, &self.layout)?;
        let lookup = matcher::lookup(
            document.records(&self.layout)?,
            request.uuid.as_deref(),
            request.name.as_deref(),
            self.layout.label,
        )?;

        let previous = match &lookup {
            Lookup::All(records) => {
                Observed::Collection(reference::render_all(records, &references)?)
            }
            Lookup::One(Some(found)) => {
                Observed::Record(reference::render(&found.details, &references)?)
            }
            Lookup::One(None) => Observed::Empty,
        };

        match (request.state, name) {
            (DesiredState::Query, _) => Ok(ReconcileOutcome {
                changed: false,
                current: previous.clone(),
                previous,
                proposed: None,
                sent: Vec::new(),
            }),
            (DesiredState::Present, Some(name)) => {
                self.present(request, name, &document, &references, lookup.matched(), previous)
            }
            (DesiredState::Absent, Some(_)) => self.absent(request, lookup.matched(), previous),
            // required_name rejects these before any remote call
            (state, None) => Err(Error::MissingRequiredField {
                state: state.as_str(),
                field: "name",
            }),
        }
    }

    fn present(
        &self,
        request: &ReconcileRequest,
        name: &str,
        document: &TemplateDocument,
        references: &TemplateReferences,
        existing: Option<&MatchResult>,
        previous: Observed,
    ) -> Result<ReconcileOutcome> {
        let desired = Desired {
            name,
            description: &request.description,
            reference: &request.reference,
        };
        let changes = diff::compute(desired, existing, &self.layout, document, references)?;
        let proposed = reference::render(&changes.predicted, references)?;

        if changes.is_empty() {
            log::info!("{} '{}' already converged", self.layout.label, name);
            return Ok(ReconcileOutcome {
                changed: false,
                current: previous.clone(),
                previous,
                proposed: Some(proposed),
                sent: Vec::new(),
            });
        }

        let current = if request.check_mode {
            log::info!(
                "check mode: skipping {} operation(s) on {} '{}'",
                changes.operations.len(),
                self.layout.label,
                name
            );
            Observed::Record(proposed.clone())
        } else {
            // A created record only carries the name; any uuid given matched nothing
            let key = match existing {
                Some(_) => LookupKey::select(request.uuid.as_deref(), Some(name)),
                None => Some(LookupKey::Name(name)),
            };
            self.submit_and_observe(key, &changes.operations)?
        };

        Ok(ReconcileOutcome {
            changed: true,
            previous,
            current,
            proposed: Some(proposed),
            sent: changes.operations,
        })
    }

    fn absent(
        &self,
        request: &ReconcileRequest,
        existing: Option<&MatchResult>,
        previous: Observed,
    ) -> Result<ReconcileOutcome> {
        let Some(found) = existing else {
            log::info!("{} already absent", self.layout.label);
            return Ok(ReconcileOutcome {
                previous,
                ..Default::default()
            });
        };

        let operations = vec![PatchOperation::remove(self.layout.record_path(found.index))];
        let current = if request.check_mode {
            log::info!("check mode: skipping removal of {}", self.layout.label);
            Observed::Empty
        } else {
            let key = LookupKey::select(request.uuid.as_deref(), request.name.as_deref());
            self.submit_and_observe(key, &operations)?
        };

        Ok(ReconcileOutcome {
            changed: true,
            previous,
            current,
            proposed: None,
            sent: operations,
        })
    }

    /// Submit `operations` and look `key` up in the returned document
    fn submit_and_observe(
        &self,
        key: Option<LookupKey<'_>>,
        operations: &[PatchOperation],
    ) -> Result<Observed> {
        log::info!(
            "submitting {} operation(s) for {}",
            operations.len(),
            self.layout.label
        );
        let document = self.backend.submit(operations)?;

        let Some(key) = key else {
            return Ok(Observed::Empty);
        };
        let records = document.records(&self.layout)?;
        match matcher::find_unique(&records, key, self.layout.label)? {
            Some(found) => {
                let references = TemplateReferences::from_document(&document, &self.layout)?;
                Ok(Observed::Record(reference::render(&found.details, &references)?))
            }
            None => Ok(Observed::Empty),
        }
    }
}

impl ReconcileRequest {
    /// Reject a request that cannot be reconciled, without touching any backend
    pub fn validate(&self) -> Result<()> {
        required_name(self).map(|_| ())
    }
}

/// The name a mutating state cannot do without
fn required_name(request: &ReconcileRequest) -> Result<Option<&str>> {
    let name = request.name.as_deref().filter(|n| !n.is_empty());
    match (request.state, name) {
        (DesiredState::Present | DesiredState::Absent, None) => Err(Error::MissingRequiredField {
            state: request.state.as_str(),
            field: "name",
        }),
        (_, name) => Ok(name),
    }
}
