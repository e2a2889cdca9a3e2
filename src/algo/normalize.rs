//! Relationship normalization: `{path: json}` → followers / following sets.
//!
//! Pass 1 routes each payload by its file name through the [`Classifier`]
//! and walks it for handles. If either set is still empty afterwards,
//! pass 2 looks for explicit top-level `followers` / `following` arrays in
//! every payload, whatever its name.

use std::collections::BTreeSet;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use super::classify::{Classifier, SourceKind};
use super::extract::EntryMap;
use super::handle::Handle;
use super::walk::HandleExtractor;

pub type FollowSet = BTreeSet<Handle>;

/// The two primary relationship sets of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowSets {
    pub followers: FollowSet,
    pub following: FollowSet,
}

impl FollowSets {
    /// Both sets empty: no relationship data was located.
    pub fn is_empty(&self) -> bool {
        self.followers.is_empty() && self.following.is_empty()
    }

    fn set_mut(&mut self, kind: SourceKind) -> Option<&mut FollowSet> {
        match kind {
            SourceKind::Followers => Some(&mut self.followers),
            SourceKind::Following => Some(&mut self.following),
            SourceKind::Ignore => None,
        }
    }
}

/// Run both passes. Pure: the same map always yields the same sets.
pub fn normalize(entries: &EntryMap, classifier: &Classifier) -> FollowSets {
    let mut sets = by_name(entries, classifier);
    debug!(
        "Name pass: {} followers, {} following",
        sets.followers.len(),
        sets.following.len()
    );

    if sets.followers.is_empty() || sets.following.is_empty() {
        by_structure(entries, &mut sets);
        debug!(
            "Structural pass: {} followers, {} following",
            sets.followers.len(),
            sets.following.len()
        );
    }

    sets
}

/// Pass 1: classify by file name, extract handles from the whole payload.
pub fn by_name(entries: &EntryMap, classifier: &Classifier) -> FollowSets {
    let extractor = HandleExtractor::default();

    let routed: Vec<(SourceKind, Vec<Handle>)> = entries
        .par_iter()
        .filter_map(|(path, payload)| {
            let kind = classifier.classify(path)?;
            debug!("{path} classified as {kind:?}");
            match kind {
                SourceKind::Ignore => None,
                _ => Some((kind, extractor.extract(payload))),
            }
        })
        .collect();

    let mut sets = FollowSets::default();
    for (kind, handles) in routed {
        if let Some(set) = sets.set_mut(kind) {
            set.extend(handles);
        }
    }
    sets
}

/// Pass 2: explicit `followers` / `following` arrays at the top level of
/// any payload. Adds to both sets.
pub fn by_structure(entries: &EntryMap, sets: &mut FollowSets) {
    for payload in entries.values() {
        let Value::Object(map) = payload else {
            continue;
        };
        for (key, kind) in [
            ("followers", SourceKind::Followers),
            ("following", SourceKind::Following),
        ] {
            if let (Some(Value::Array(items)), Some(set)) = (map.get(key), sets.set_mut(kind)) {
                set.extend(items.iter().filter_map(entry_handle));
            }
        }
    }
}

/// Handle of a single relationship record in a structural array: the first
/// of `string_list_data[0].value`, `string_list_data[0].href`, `value`,
/// `username`, `href`. A bare string is a handle itself.
pub fn entry_handle(entry: &Value) -> Option<Handle> {
    let map = match entry {
        Value::String(raw) => return Handle::parse(raw),
        Value::Object(map) => map,
        _ => return None,
    };

    let first_record = map
        .get("string_list_data")
        .and_then(Value::as_array)
        .and_then(|records| records.first());

    let candidates = [
        first_record.and_then(|r| r.get("value")),
        first_record.and_then(|r| r.get("href")),
        map.get("value"),
        map.get("username"),
        map.get("href"),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find_map(Handle::parse)
}
