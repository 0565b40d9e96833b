//! Core types for template resource reconciliation

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Record key holding the reference identifier.
pub const REFERENCE_FIELD: &str = "pool";

/// Desired value of an optional field
///
/// Omitting a field and setting it to the empty string mean different things:
/// the first leaves the remote value alone, the second clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldIntent {
    /// Not supplied, keep whatever is there
    #[default]
    Unspecified,
    /// Supplied as the empty string
    Empty,
    /// Supplied with a value
    Value(String),
}

impl FieldIntent {
    /// Build from an optional user input, mapping `""` to [`FieldIntent::Empty`]
    pub fn from_input(input: Option<String>) -> Self {
        match input {
            None => Self::Unspecified,
            Some(s) if s.is_empty() => Self::Empty,
            Some(s) => Self::Value(s),
        }
    }

    /// The non-empty value, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the field was supplied at all
    pub fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

impl From<Option<String>> for FieldIntent {
    fn from(input: Option<String>) -> Self {
        Self::from_input(input)
    }
}

impl From<&str> for FieldIntent {
    fn from(input: &str) -> Self {
        Self::from_input(Some(input.to_string()))
    }
}

/// A single change to a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Description(String),
    /// New reference identifier, `None` removes it
    Reference(Option<String>),
}

/// A resource as stored in the template collection
///
/// Keys this crate does not manage are kept in `extra` so a record
/// survives a decode/encode cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Identifier of the referenced entity
    #[serde(rename = "pool", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceRecord {
    /// Create a record with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Return a copy of this record with `change` applied
    pub fn apply(&self, change: &FieldChange) -> Self {
        let mut next = self.clone();
        match change {
            FieldChange::Name(name) => next.name = name.clone(),
            FieldChange::Description(description) => next.description = Some(description.clone()),
            FieldChange::Reference(reference) => next.reference = reference.clone(),
        }
        next
    }
}

/// Kind of JSON patch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
        };
        write!(f, "{s}")
    }
}

/// One patch instruction against the template document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} {}", self.op, self.path, value),
            None => write!(f, "{} {}", self.op, self.path),
        }
    }
}

/// A record located in a collection, with its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub index: usize,
    pub details: ResourceRecord,
}

/// Declared state of the resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    Absent,
    Present,
    #[default]
    Query,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present => "present",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input to a single reconciliation
#[derive(Debug, Clone, Default)]
pub struct ReconcileRequest {
    pub state: DesiredState,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: FieldIntent,
    pub reference: FieldIntent,
    /// Predict the result without submitting anything
    pub check_mode: bool,
}

impl ReconcileRequest {
    pub fn new(state: DesiredState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn description(mut self, description: impl Into<FieldIntent>) -> Self {
        self.description = description.into();
        self
    }

    pub fn reference(mut self, reference: impl Into<FieldIntent>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }
}

/// A record with its reference identifier rendered to a name
///
/// `pool` carries the reference name and `poolRef` the identifier it was
/// resolved from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(rename = "poolRef", skip_serializing_if = "Option::is_none")]
    pub pool_ref: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the caller gets to see of the remote state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Observed {
    /// Nothing matched, or the record was removed
    #[default]
    Empty,
    Record(RenderedRecord),
    /// Every record in the collection ("list all" mode)
    Collection(Vec<RenderedRecord>),
}

impl Observed {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn record(&self) -> Option<&RenderedRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl Serialize for Observed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
            Self::Record(record) => record.serialize(serializer),
            Self::Collection(records) => records.serialize(serializer),
        }
    }
}

/// Result of one reconciliation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileOutcome {
    pub changed: bool,
    /// State before any operation
    pub previous: Observed,
    /// State after submission, or the prediction in check mode
    pub current: Observed,
    /// Predicted record for `present`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed: Option<RenderedRecord>,
    /// Operations submitted (or that would be, in check mode)
    pub sent: Vec<PatchOperation>,
}
