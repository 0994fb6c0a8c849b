//! Resume diff — enumerates every added, removed and modified leaf between two
//! versions of a resume tree.
//!
//! Paths use dots for object keys (`personalInfo.email`), `[i]` for list
//! positions and `[id=<id>]` for list entries matched by id.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::identity::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEntry {
    Added {
        path: String,
        value: Value,
    },
    Removed {
        path: String,
        value: Value,
    },
    Modified {
        path: String,
        old_value: Value,
        new_value: Value,
    },
}

impl ChangeEntry {
    pub fn path(&self) -> &str {
        match self {
            ChangeEntry::Added { path, .. }
            | ChangeEntry::Removed { path, .. }
            | ChangeEntry::Modified { path, .. } => path,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEntry::Added { .. } => ChangeKind::Added,
            ChangeEntry::Removed { .. } => ChangeKind::Removed,
            ChangeEntry::Modified { .. } => ChangeKind::Modified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: Vec<ChangeEntry>,
    pub removed: Vec<ChangeEntry>,
    pub modified: Vec<ChangeEntry>,
}

impl ChangeSet {
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.added
            .iter()
            .chain(self.removed.iter())
            .chain(self.modified.iter())
    }
}

/// Diffs `old` against `new`. Neither input is modified.
///
/// Missing values and `null` are treated alike. Lists whose items are all
/// objects with distinct ids are matched by id, so reordering them is not a
/// change; any other list is compared position by position.
pub fn diff(old: &Value, new: &Value) -> ChangeSet {
    let mut changes = ChangeSet::default();
    diff_at(String::new(), Some(old), Some(new), &mut changes);
    debug!(
        added = changes.added.len(),
        removed = changes.removed.len(),
        modified = changes.modified.len(),
        "Computed resume diff"
    );
    changes
}

fn diff_at(path: String, old: Option<&Value>, new: Option<&Value>, out: &mut ChangeSet) {
    let old = old.filter(|v| !v.is_null());
    let new = new.filter(|v| !v.is_null());

    match (old, new) {
        (None, None) => {}
        (None, Some(value)) => out.added.push(ChangeEntry::Added {
            path,
            value: value.clone(),
        }),
        (Some(value), None) => out.removed.push(ChangeEntry::Removed {
            path,
            value: value.clone(),
        }),
        (Some(Value::Array(old_items)), Some(Value::Array(new_items))) => {
            diff_lists(&path, old_items, new_items, out)
        }
        (Some(Value::Object(old_map)), Some(Value::Object(new_map))) => {
            diff_objects(&path, old_map, new_map, out)
        }
        (Some(old_value), Some(new_value)) => {
            if old_value != new_value {
                out.modified.push(ChangeEntry::Modified {
                    path,
                    old_value: old_value.clone(),
                    new_value: new_value.clone(),
                });
            }
        }
    }
}

fn diff_objects(path: &str, old: &Map<String, Value>, new: &Map<String, Value>, out: &mut ChangeSet) {
    for (key, old_value) in old {
        diff_at(key_path(path, key), Some(old_value), new.get(key), out);
    }
    for (key, new_value) in new.iter().filter(|(k, _)| !old.contains_key(*k)) {
        diff_at(key_path(path, key), None, Some(new_value), out);
    }
}

fn diff_lists(path: &str, old: &[Value], new: &[Value], out: &mut ChangeSet) {
    if let (Some(old_ids), Some(new_ids)) = (list_ids(old), list_ids(new)) {
        let new_positions: HashMap<&EntryId, usize> =
            new_ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
        for (old_item, id) in old.iter().zip(&old_ids) {
            let matched = new_positions.get(id).map(|&i| &new[i]);
            diff_at(id_path(path, id), Some(old_item), matched, out);
        }
        let known: HashSet<&EntryId> = old_ids.iter().collect();
        for (new_item, id) in new.iter().zip(&new_ids) {
            if !known.contains(id) {
                diff_at(id_path(path, id), None, Some(new_item), out);
            }
        }
        return;
    }

    for i in 0..old.len().max(new.len()) {
        diff_at(format!("{path}[{i}]"), old.get(i), new.get(i), out);
    }
}

/// Ids of every item when each one is an object carrying a distinct id.
fn list_ids(items: &[Value]) -> Option<Vec<EntryId>> {
    let ids: Vec<EntryId> = items.iter().map(EntryId::of_item).collect::<Option<_>>()?;
    let unique = ids.iter().collect::<HashSet<_>>().len() == ids.len();
    unique.then_some(ids)
}

fn key_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn id_path(path: &str, id: &EntryId) -> String {
    format!("{path}[id={id}]")
}
