//! Candidate key enumeration.
//!
//! The search is exponential in the number of attributes that take part in at
//! least one dependency. Relations handed to this module must stay within
//! [`MAX_SEARCH_ATTRIBUTES`] such attributes; larger inputs are rejected with
//! [`SchemaError::SearchSpaceTooLarge`] instead of being searched.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::closure::is_superkey;
use crate::error::SchemaError;
use crate::types::{AttributeSet, Key, Relation};

/// Upper bound on attributes enumerated by subset searches.
pub const MAX_SEARCH_ATTRIBUTES: usize = 20;

pub(crate) fn ensure_searchable(attributes: usize) -> Result<(), SchemaError> {
    if attributes > MAX_SEARCH_ATTRIBUTES {
        return Err(SchemaError::SearchSpaceTooLarge {
            attributes,
            limit: MAX_SEARCH_ATTRIBUTES,
        });
    }
    Ok(())
}

/// Attributes that appear in no dependency. They belong to every key.
pub fn constant_attributes(relation: &Relation) -> AttributeSet {
    let referenced: AttributeSet = relation
        .functional_dependencies
        .iter()
        .flat_map(|d| d.attributes())
        .collect();

    relation
        .attributes
        .difference(&referenced)
        .cloned()
        .collect()
}

/// Every minimal candidate key of `relation` under its dependencies.
pub fn minimal_keys(relation: &Relation) -> Result<BTreeSet<Key>, SchemaError> {
    let constants = constant_attributes(relation);
    let candidates: Vec<_> = relation.attributes.difference(&constants).collect();

    let mut keys = BTreeSet::new();
    if candidates.is_empty() {
        keys.insert(Key::new(relation.attributes.clone()));
        return Ok(keys);
    }
    ensure_searchable(candidates.len())?;

    let deps = &relation.functional_dependencies;
    for size in 1..=candidates.len() {
        for combination in candidates.iter().combinations(size) {
            let mut attributes = constants.clone();
            attributes.extend(combination.into_iter().map(|a| (*a).clone()));

            // Supersets of a found key cannot be minimal.
            if keys.iter().any(|k: &Key| k.attributes().is_subset(&attributes)) {
                continue;
            }
            if !is_superkey(&attributes, &relation.attributes, deps) {
                continue;
            }

            let minimal = attributes.iter().all(|a| {
                let mut reduced = attributes.clone();
                reduced.remove(a);
                !is_superkey(&reduced, &relation.attributes, deps)
            });
            if minimal {
                keys.insert(Key::new(attributes));
            }
        }
    }

    debug!(keys = keys.len(), constants = constants.len(), "determined minimal keys");
    Ok(keys)
}

/// Every non-empty proper subset of every key.
pub fn partial_keys<'a, K>(keys: K) -> BTreeSet<Key>
where
    K: IntoIterator<Item = &'a Key>,
{
    let mut partial = BTreeSet::new();
    for key in keys {
        for size in 1..key.len() {
            for combination in key.attributes().iter().combinations(size) {
                partial.insert(Key::new(combination.into_iter().cloned().collect()));
            }
        }
    }
    partial
}

/// Union of all key attributes.
pub fn prime_attributes<'a, K>(keys: K) -> AttributeSet
where
    K: IntoIterator<Item = &'a Key>,
{
    keys.into_iter()
        .flat_map(|k| k.attributes().iter().cloned())
        .collect()
}

/// Keys of a relation together with the sets derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAnalysis {
    pub minimal_keys: BTreeSet<Key>,
    pub partial_keys: BTreeSet<Key>,
    pub prime_attributes: AttributeSet,
}

pub fn analyze_keys(relation: &Relation) -> Result<KeyAnalysis, SchemaError> {
    let minimal_keys = minimal_keys(relation)?;
    Ok(KeyAnalysis {
        partial_keys: partial_keys(&minimal_keys),
        prime_attributes: prime_attributes(&minimal_keys),
        minimal_keys,
    })
}
