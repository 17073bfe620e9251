//! Address-keyed deduplication of identity sequences.

use std::collections::HashSet;

use crate::model::{Address, Identity};

/// Concatenates `existing` then `incoming`, keeping only the first occurrence
/// of each address.
#[must_use]
pub fn merge(existing: &[Identity], incoming: &[Identity]) -> Vec<Identity> {
    let mut seen: HashSet<&Address> = HashSet::with_capacity(existing.len() + incoming.len());
    existing
        .iter()
        .chain(incoming)
        .filter(|identity| seen.insert(&identity.address))
        .cloned()
        .collect()
}

/// Single-sequence form of [`merge`].
#[must_use]
pub fn dedup(items: &[Identity]) -> Vec<Identity> {
    merge(items, &[])
}
