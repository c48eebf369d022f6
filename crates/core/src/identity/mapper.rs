//! Core identity mapping logic.
//!
//! [`IdentityMapping`] keeps the difference between a key that is absent and
//! a key explicitly mapped to `null`. Both are dropped by
//! [`resolve_addresses`] today, but [`IdentityMapping::resolve`] reports them
//! separately.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::mapping_file::MappingFile;
use crate::errors::IdentityError;

/// GitHub identity -> Chatwork address, where `None` is an explicit
/// "do not notify" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityMapping {
    entries: HashMap<String, Option<String>>,
}

/// Outcome of looking up one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(&'a str),
    /// The key is present with a `null` value.
    ExplicitlyUnmapped,
    /// The key is absent.
    Unknown,
}

impl IdentityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of string -> string|null.
    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        serde_json::from_str(json).map_err(|e| IdentityError::ParseError(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, key: &str) -> Resolution<'_> {
        match self.entries.get(key) {
            Some(Some(address)) => Resolution::Resolved(address),
            Some(None) => Resolution::ExplicitlyUnmapped,
            None => Resolution::Unknown,
        }
    }

    /// Write every entry of `self` over `base`. Entries of `self` win.
    pub fn overlay(self, mut base: IdentityMapping) -> IdentityMapping {
        base.entries.extend(self.entries);
        base
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for IdentityMapping {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Merge the inline mapping over the mapping file, if one is configured.
pub fn merge_mapping(
    inline: IdentityMapping,
    mapping_file: Option<&Path>,
) -> Result<IdentityMapping, IdentityError> {
    let Some(path) = mapping_file else {
        debug!(count = inline.len(), "no mapping file configured, using inline mapping");
        return Ok(inline);
    };

    let base = MappingFile::load(path)?;
    let merged = inline.overlay(base);
    info!(count = merged.len(), "merged inline mapping over mapping file");
    Ok(merged)
}

/// Map identities to Chatwork addresses, dropping unknown and explicitly
/// unmapped ones. Order follows `identities`.
pub fn resolve_addresses<S: AsRef<str>>(
    identities: &[S],
    mapping: &IdentityMapping,
) -> Vec<String> {
    identities
        .iter()
        .filter_map(|id| match mapping.resolve(id.as_ref()) {
            Resolution::Resolved(address) => Some(address.to_string()),
            Resolution::ExplicitlyUnmapped => {
                debug!(identity = id.as_ref(), "identity explicitly unmapped");
                None
            }
            Resolution::Unknown => {
                debug!(identity = id.as_ref(), "no mapping for identity");
                None
            }
        })
        .collect()
}
