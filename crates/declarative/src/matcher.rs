//! Locating a record inside a collection by uuid or name

use crate::error::{Error, Result};
use crate::types::{MatchResult, ResourceRecord};

/// Which unique key a lookup uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    Uuid(&'a str),
    Name(&'a str),
}

impl<'a> LookupKey<'a> {
    /// Pick the key for an optional uuid and name; the uuid wins when both
    /// are given, and empty strings count as not given
    pub fn select(uuid: Option<&'a str>, name: Option<&'a str>) -> Option<Self> {
        let uuid = uuid.filter(|s| !s.is_empty());
        let name = name.filter(|s| !s.is_empty());
        match (uuid, name) {
            (Some(uuid), _) => Some(Self::Uuid(uuid)),
            (None, Some(name)) => Some(Self::Name(name)),
            (None, None) => None,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            Self::Uuid(_) => "uuid",
            Self::Name(_) => "name",
        }
    }

    fn value(&self) -> &'a str {
        match self {
            Self::Uuid(v) | Self::Name(v) => v,
        }
    }

    fn matches(&self, record: &ResourceRecord) -> bool {
        match self {
            Self::Uuid(uuid) => record.uuid.as_deref() == Some(*uuid),
            Self::Name(name) => record.name == *name,
        }
    }
}

/// Outcome of a collection lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// No key was given: the whole collection
    All(Vec<ResourceRecord>),
    /// A key was given: zero or one record
    One(Option<MatchResult>),
}

impl Lookup {
    /// The single match, if this was a keyed lookup that found one
    pub fn matched(&self) -> Option<&MatchResult> {
        match self {
            Self::One(found) => found.as_ref(),
            Self::All(_) => None,
        }
    }
}

/// Look up a record by uuid or name, or list the collection when neither is given
pub fn lookup(
    records: Vec<ResourceRecord>,
    uuid: Option<&str>,
    name: Option<&str>,
    label: &str,
) -> Result<Lookup> {
    match LookupKey::select(uuid, name) {
        Some(key) => find_unique(&records, key, label).map(Lookup::One),
        None => Ok(Lookup::All(records)),
    }
}

/// Find the one record matching `key`
///
/// More than one match breaks the uniqueness the remote store is supposed
/// to guarantee and is reported as [`Error::AmbiguousMatch`].
pub fn find_unique(
    records: &[ResourceRecord],
    key: LookupKey<'_>,
    label: &str,
) -> Result<Option<MatchResult>> {
    let mut found = records
        .iter()
        .enumerate()
        .filter(|(_, record)| key.matches(record));

    let Some((index, record)) = found.next() else {
        log::debug!("no {} with {} '{}'", label, key.field(), key.value());
        return Ok(None);
    };

    let extra = found.count();
    if extra > 0 {
        return Err(Error::AmbiguousMatch {
            label: label.to_string(),
            key: key.field(),
            value: key.value().to_string(),
            count: extra + 1,
        });
    }

    log::debug!(
        "matched {} with {} '{}' at index {}",
        label,
        key.field(),
        key.value(),
        index
    );
    Ok(Some(MatchResult {
        index,
        details: record.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, uuid: &str) -> ResourceRecord {
        ResourceRecord {
            uuid: Some(uuid.to_string()),
            ..ResourceRecord::named(name)
        }
    }

    fn collection() -> Vec<ResourceRecord> {
        vec![record("a", "u-a"), record("b", "u-b"), record("c", "u-c")]
    }

    #[test]
    fn test_select_key() {
        assert_eq!(
            LookupKey::select(Some("u"), Some("n")),
            Some(LookupKey::Uuid("u"))
        );
        assert_eq!(LookupKey::select(None, Some("n")), Some(LookupKey::Name("n")));
        assert_eq!(LookupKey::select(Some(""), Some("n")), Some(LookupKey::Name("n")));
        assert_eq!(LookupKey::select(None, None), None);
        assert_eq!(LookupKey::select(Some(""), Some("")), None);
    }

    #[test]
    fn test_lookup_by_name() {
        let result = lookup(collection(), None, Some("b"), "Physical Domain").unwrap();
        let found = result.matched().unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.details.uuid.as_deref(), Some("u-b"));
    }

    #[test]
    fn test_lookup_by_uuid_wins_over_name() {
        let result = lookup(collection(), Some("u-c"), Some("a"), "Physical Domain").unwrap();
        let found = result.matched().unwrap();
        assert_eq!(found.index, 2);
        assert_eq!(found.details.name, "c");
    }

    #[test]
    fn test_lookup_not_found() {
        let result = lookup(collection(), None, Some("zzz"), "Physical Domain").unwrap();
        assert_eq!(result, Lookup::One(None));
    }

    #[test]
    fn test_lookup_all() {
        let result = lookup(collection(), None, None, "Physical Domain").unwrap();
        match result {
            Lookup::All(records) => assert_eq!(records.len(), 3),
            Lookup::One(_) => panic!("Expected Lookup::All"),
        }
    }

    #[test]
    fn test_lookup_ambiguous() {
        let mut records = collection();
        records.push(record("b", "u-b2"));

        let err = lookup(records, None, Some("b"), "Physical Domain").unwrap_err();
        match err {
            Error::AmbiguousMatch { key, value, count, .. } => {
                assert_eq!(key, "name");
                assert_eq!(value, "b");
                assert_eq!(count, 2);
            }
            _ => panic!("Expected Error::AmbiguousMatch"),
        }
    }
}
