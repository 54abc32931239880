//! # Store
//!
//! The authoritative catalog snapshot: an ordered list of menu items plus
//! the recycle ledger. Every operation here is pure. It borrows the current
//! snapshot and returns a new one, so a rejected or no-op edit leaves the
//! caller's snapshot untouched.
//!
//! ```text
//! Store
//! ├── items: Vec<MenuItem>     // flat, order = display order per parent
//! └── ledger: RecycleLedger    // soft-deleted leaves by bucket
//! ```
//!
//! Invariants held by every snapshot these functions return:
//! - ids are unique
//! - a non-root `parent_id` names an existing folder of the same group
//! - no item is its own ancestor

use std::collections::HashSet;
use std::fmt;

use chrono::Utc;
use log::{debug, warn};

use crate::core::ids::IdGenerator;
use crate::core::menu::{MenuItem, MenuPatch, is_pseudo_root};
use crate::core::recycle::{Creator, RecycleCategory, RecycleEntry, RecycleLedger};

// ============================================================================
// Errors
// ============================================================================

/// Why an `add` was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DuplicateId(String),
    /// Id collides with a pseudo-root.
    ReservedId(String),
    UnknownParent(String),
    ParentNotFolder(String),
    /// Parent folder belongs to a different catalog group.
    GroupMismatch { id: String, parent_id: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateId(id) => write!(f, "menu item {id} already exists"),
            StoreError::ReservedId(id) => write!(f, "menu id {id} is reserved"),
            StoreError::UnknownParent(id) => write!(f, "parent {id} does not exist"),
            StoreError::ParentNotFolder(id) => write!(f, "parent {id} is not a folder"),
            StoreError::GroupMismatch { id, parent_id } => {
                write!(f, "{id} cannot live under {parent_id}: different catalog")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Why a `move_item` was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Stale key: one side of the drag is no longer in the store.
    NotFound(String),
    PseudoRoot(String),
    OntoSelf(String),
    OntoDescendant { drag: String, drop: String },
    /// `Inside` on a leaf.
    NotAFolder(String),
    GroupMismatch { drag: String, drop: String },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::NotFound(id) => write!(f, "menu item {id} not found"),
            MoveError::PseudoRoot(id) => write!(f, "{id} cannot be moved or dropped onto"),
            MoveError::OntoSelf(id) => write!(f, "{id} cannot be dropped onto itself"),
            MoveError::OntoDescendant { drag, drop } => {
                write!(f, "{drag} cannot be dropped into its descendant {drop}")
            }
            MoveError::NotAFolder(id) => write!(f, "{id} is not a folder"),
            MoveError::GroupMismatch { drag, drop } => {
                write!(f, "{drag} and {drop} belong to different catalogs")
            }
        }
    }
}

impl std::error::Error for MoveError {}

// ============================================================================
// Drop positions
// ============================================================================

/// Where a dragged item lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    Inside,
    After,
}

impl DropPosition {
    /// Maps the tree widget's `-1 / 0 / 1` convention.
    pub fn from_offset(offset: i8) -> Option<Self> {
        match offset {
            -1 => Some(DropPosition::Before),
            0 => Some(DropPosition::Inside),
            1 => Some(DropPosition::After),
            _ => None,
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Result of a `remove`.
#[derive(Debug, Clone)]
pub struct Removal {
    pub store: Store,
    /// Every item taken out of the list, in list order.
    pub removed: Vec<MenuItem>,
    /// Removed items that got a recycle entry.
    pub archived: usize,
}

/// Result of a `restore`.
#[derive(Debug, Clone)]
pub struct Restoration {
    pub store: Store,
    /// The item put back into the list, if it was not already live.
    pub restored: Option<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    items: Vec<MenuItem>,
    ledger: RecycleLedger,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(mut self, ledger: RecycleLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Builds a store from an untrusted listing.
    ///
    /// Duplicate ids keep their first occurrence. Items whose parent is
    /// missing, a leaf, in another group, or part of a cycle are reattached
    /// at the top level.
    pub fn from_remote(listing: Vec<MenuItem>) -> Self {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(listing.len());
        for item in listing {
            if is_pseudo_root(&item.id) || !seen.insert(item.id.clone()) {
                warn!("Dropping duplicate or reserved menu id from listing: {}", item.id);
                continue;
            }
            items.push(item);
        }

        let mut store = Store {
            items,
            ledger: RecycleLedger::default(),
        };
        for idx in 0..store.items.len() {
            let item = &store.items[idx];
            let Some(parent_id) = item.parent_id.as_deref() else {
                continue;
            };
            let valid_parent = store
                .get(parent_id)
                .is_some_and(|parent| parent.is_folder() && parent.kind.group() == item.kind.group());
            if !valid_parent || store.is_ancestor(&item.id, parent_id) {
                warn!(
                    "Reattaching {} at top level: parent {} is not a valid folder",
                    item.id, parent_id
                );
                store.items[idx].parent_id = None;
            }
        }
        store
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn ledger(&self) -> &RecycleLedger {
        &self.ledger
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Children of `parent_id` (`None` = top level) in display order.
    pub fn children<'a>(&'a self, parent_id: Option<&'a str>) -> impl Iterator<Item = &'a MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.parent_id.as_deref() == parent_id)
    }

    /// Ids of every item whose parent chain reaches `id`, excluding `id`.
    pub fn descendant_ids(&self, id: &str) -> HashSet<String> {
        let mut found: HashSet<String> = HashSet::new();
        let mut frontier = vec![id.to_string()];
        while let Some(current) = frontier.pop() {
            for child in self.children(Some(current.as_str())) {
                if found.insert(child.id.clone()) {
                    frontier.push(child.id.clone());
                }
            }
        }
        found.remove(id);
        found
    }

    /// True if `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = self.get(id).and_then(|item| item.parent_id.as_deref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            if !visited.insert(parent) {
                return false;
            }
            current = self.get(parent).and_then(|item| item.parent_id.as_deref());
        }
        false
    }

    /// Lists every broken invariant. Empty for a consistent store.
    pub fn violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                problems.push(format!("duplicate id {}", item.id));
            }
            if let Some(parent_id) = item.parent_id.as_deref() {
                match self.get(parent_id) {
                    None => problems.push(format!("{} has missing parent {}", item.id, parent_id)),
                    Some(parent) if !parent.is_folder() => {
                        problems.push(format!("{} is parented to leaf {}", item.id, parent_id))
                    }
                    Some(parent) if parent.kind.group() != item.kind.group() => problems.push(
                        format!("{} is parented to {} of another group", item.id, parent_id),
                    ),
                    Some(_) => {}
                }
                if self.is_ancestor(&item.id, &item.id) {
                    problems.push(format!("{} is its own ancestor", item.id));
                }
            }
        }
        problems
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Appends `item` at the end of the list.
    pub fn add(&self, item: MenuItem) -> Result<Store, StoreError> {
        if is_pseudo_root(&item.id) {
            return Err(StoreError::ReservedId(item.id));
        }
        if self.contains(&item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        if let Some(parent_id) = item.parent_id.as_deref() {
            let parent = self
                .get(parent_id)
                .ok_or_else(|| StoreError::UnknownParent(parent_id.to_string()))?;
            if !parent.is_folder() {
                return Err(StoreError::ParentNotFolder(parent_id.to_string()));
            }
            if parent.kind.group() != item.kind.group() {
                return Err(StoreError::GroupMismatch {
                    id: item.id.clone(),
                    parent_id: parent_id.to_string(),
                });
            }
        }

        let mut next = self.clone();
        next.items.push(item);
        Ok(next)
    }

    /// Applies `patch` to the matching item. `None` if the id is unknown.
    ///
    /// A missing or empty name keeps the old one. The payload is
    /// shallow-merged, and the resolved name is mirrored into `data.name`.
    pub fn update(&self, patch: &MenuPatch) -> Option<Store> {
        let idx = self.position(&patch.id)?;
        let mut next = self.clone();
        let item = &mut next.items[idx];

        if let Some(name) = patch.name.as_deref().filter(|name| !name.is_empty()) {
            item.name = name.to_string();
        }
        if let Some(data) = &patch.data {
            merge_payload(&mut item.data, data);
        }
        if let serde_json::Value::Object(map) = &mut item.data {
            map.insert("name".to_string(), serde_json::Value::String(item.name.clone()));
        }
        Some(next)
    }

    /// Removes `id` and its whole subtree, archiving each removed leaf
    /// under its recycle bucket. Folders are discarded. `None` if the id
    /// is unknown.
    pub fn remove(
        &self,
        id: &str,
        ids: &dyn IdGenerator,
        creator: &Creator,
        retention_label: &str,
    ) -> Option<Removal> {
        if !self.contains(id) {
            return None;
        }
        let mut doomed = self.descendant_ids(id);
        doomed.insert(id.to_string());

        let mut next = Store {
            items: Vec::with_capacity(self.items.len()),
            ledger: self.ledger.clone(),
        };
        let mut removed = Vec::new();
        let mut archived = 0;
        let deleted_at = Utc::now();

        for item in &self.items {
            if !doomed.contains(&item.id) {
                next.items.push(item.clone());
                continue;
            }
            if let Some(category) = item.kind.recycle_category() {
                let entry = RecycleEntry {
                    id: ids.next_id(),
                    deleted_item: item.clone(),
                    creator: creator.clone(),
                    expired_at: retention_label.to_string(),
                    deleted_at,
                };
                if next.ledger.archive(category, entry) {
                    archived += 1;
                } else {
                    debug!("{} already archived under {:?}", item.id, category);
                }
            }
            removed.push(item.clone());
        }

        Some(Removal {
            store: next,
            removed,
            archived,
        })
    }

    /// Takes entry `entry_id` out of `category` and re-appends its item.
    ///
    /// Only the entry's own item comes back; archived children need their
    /// own restore. If the item is already live the entry is still
    /// consumed. If its old parent is gone it returns at the top level.
    /// `None` if the entry is unknown.
    pub fn restore(&self, entry_id: &str, category: RecycleCategory) -> Option<Restoration> {
        let mut next = self.clone();
        let entry = next.ledger.take(category, entry_id)?;
        let mut item = entry.deleted_item;

        if next.contains(&item.id) {
            debug!("Restore skipped: {} is already in the catalog", item.id);
            return Some(Restoration {
                store: next,
                restored: None,
            });
        }

        let parent_ok = item.parent_id.as_deref().is_none_or(|parent_id| {
            next.get(parent_id)
                .is_some_and(|p| p.is_folder() && p.kind.group() == item.kind.group())
        });
        if !parent_ok {
            debug!("Restoring {} at top level: former parent is gone", item.id);
            item.parent_id = None;
        }

        next.items.push(item.clone());
        Some(Restoration {
            store: next,
            restored: Some(item),
        })
    }

    /// Moves `drag_id` relative to `drop_id`.
    ///
    /// `Inside` reparents into the drop folder; `Before`/`After` adopt the
    /// drop target's parent. In every case the dragged item ends up adjacent
    /// to the drop target in the flat list, and nobody else changes order.
    pub fn move_item(
        &self,
        drag_id: &str,
        drop_id: &str,
        position: DropPosition,
    ) -> Result<Store, MoveError> {
        for id in [drag_id, drop_id] {
            if is_pseudo_root(id) {
                return Err(MoveError::PseudoRoot(id.to_string()));
            }
        }
        let drag_idx = self
            .position(drag_id)
            .ok_or_else(|| MoveError::NotFound(drag_id.to_string()))?;
        let drop_idx = self
            .position(drop_id)
            .ok_or_else(|| MoveError::NotFound(drop_id.to_string()))?;
        if drag_idx == drop_idx {
            return Err(MoveError::OntoSelf(drag_id.to_string()));
        }
        let drag = &self.items[drag_idx];
        let drop = &self.items[drop_idx];

        if drag.kind.group() != drop.kind.group() {
            return Err(MoveError::GroupMismatch {
                drag: drag_id.to_string(),
                drop: drop_id.to_string(),
            });
        }
        if self.is_ancestor(drag_id, drop_id) {
            return Err(MoveError::OntoDescendant {
                drag: drag_id.to_string(),
                drop: drop_id.to_string(),
            });
        }

        let new_parent = match position {
            DropPosition::Inside => {
                if !drop.is_folder() {
                    return Err(MoveError::NotAFolder(drop_id.to_string()));
                }
                Some(drop.id.clone())
            }
            DropPosition::Before | DropPosition::After => drop.parent_id.clone(),
        };

        let mut next = self.clone();
        let mut moved = next.items.remove(drag_idx);
        moved.parent_id = new_parent;

        // Indices after the removal point shifted left by one
        let anchor = if drag_idx < drop_idx { drop_idx - 1 } else { drop_idx };
        let target = match position {
            DropPosition::Before => anchor,
            DropPosition::Inside | DropPosition::After => anchor + 1,
        };
        next.items.insert(target, moved);
        Ok(next)
    }
}

/// Shallow merge: keys of `patch` overwrite keys of `target`. A non-object
/// on either side replaces the target.
fn merge_payload(target: &mut serde_json::Value, patch: &serde_json::Value) {
    match (target, patch) {
        (serde_json::Value::Object(existing), serde_json::Value::Object(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key.clone(), value.clone());
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialIds;
    use crate::core::menu::MenuItemType;
    use serde_json::json;

    fn folder(id: &str) -> MenuItem {
        MenuItem::new(id, id.to_uppercase(), MenuItemType::ApiDetailFolder)
    }

    fn endpoint(id: &str) -> MenuItem {
        MenuItem::new(id, id.to_uppercase(), MenuItemType::ApiDetail)
    }

    fn store_of(items: Vec<MenuItem>) -> Store {
        items
            .into_iter()
            .fold(Store::new(), |store, item| store.add(item).unwrap())
    }

    fn order(store: &Store) -> Vec<&str> {
        store.items().iter().map(|item| item.id.as_str()).collect()
    }

    fn remove(store: &Store, id: &str) -> Option<Removal> {
        store.remove(id, &SequentialIds::new("r"), &Creator::default(), "30 days")
    }

    // ------------------------------------------------------------------------
    // add
    // ------------------------------------------------------------------------

    #[test]
    fn test_add_appends_and_leaves_input_untouched() {
        let before = store_of(vec![folder("f1")]);
        let after = before.add(endpoint("l1").with_parent("f1")).unwrap();
        assert_eq!(order(&before), vec!["f1"]);
        assert_eq!(order(&after), vec!["f1", "l1"]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let store = store_of(vec![endpoint("a")]);
        assert_eq!(
            store.add(endpoint("a")).unwrap_err(),
            StoreError::DuplicateId("a".into())
        );
    }

    #[test]
    fn test_add_rejects_bad_parents() {
        let store = store_of(vec![
            endpoint("leaf"),
            MenuItem::new("sf", "Schemas", MenuItemType::ApiSchemaFolder),
        ]);
        assert_eq!(
            store.add(endpoint("x").with_parent("nope")).unwrap_err(),
            StoreError::UnknownParent("nope".into())
        );
        assert_eq!(
            store.add(endpoint("x").with_parent("leaf")).unwrap_err(),
            StoreError::ParentNotFolder("leaf".into())
        );
        assert!(matches!(
            store.add(endpoint("x").with_parent("sf")),
            Err(StoreError::GroupMismatch { .. })
        ));
        assert_eq!(
            store.add(folder("recycle")).unwrap_err(),
            StoreError::ReservedId("recycle".into())
        );
    }

    // ------------------------------------------------------------------------
    // update
    // ------------------------------------------------------------------------

    #[test]
    fn test_update_merges_payload_and_keeps_name_on_empty() {
        let store = store_of(vec![
            endpoint("a").with_data(json!({ "method": "GET", "path": "/users" })),
        ]);
        let patch = MenuPatch::new("a").name("").data(json!({ "path": "/people" }));
        let next = store.update(&patch).unwrap();
        let item = next.get("a").unwrap();
        assert_eq!(item.name, "A");
        assert_eq!(
            item.data,
            json!({ "method": "GET", "path": "/people", "name": "A" })
        );
    }

    #[test]
    fn test_update_renames() {
        let store = store_of(vec![endpoint("a")]);
        let next = store.update(&MenuPatch::new("a").name("List users")).unwrap();
        assert_eq!(next.get("a").unwrap().name, "List users");
        // Null payload stays null; there is no object to mirror the name into
        assert_eq!(next.get("a").unwrap().data, serde_json::Value::Null);
    }

    #[test]
    fn test_update_unknown_id_is_none() {
        let store = store_of(vec![endpoint("a")]);
        assert!(store.update(&MenuPatch::new("zzz").name("x")).is_none());
    }

    // ------------------------------------------------------------------------
    // remove / restore
    // ------------------------------------------------------------------------

    #[test]
    fn test_remove_folder_archives_only_leaf() {
        let store = store_of(vec![folder("f1"), endpoint("l1").with_parent("f1")]);
        let removal = remove(&store, "f1").unwrap();

        assert!(removal.store.is_empty());
        assert_eq!(removal.removed.len(), 2);
        assert_eq!(removal.archived, 1);
        let http = removal.store.ledger().entries(RecycleCategory::Http);
        assert_eq!(http.len(), 1);
        assert_eq!(http[0].deleted_item.id, "l1");
        assert!(removal.store.ledger().entries(RecycleCategory::Schema).is_empty());
    }

    #[test]
    fn test_remove_cascades_through_nested_folders() {
        let store = store_of(vec![
            folder("f1"),
            folder("f2").with_parent("f1"),
            endpoint("deep").with_parent("f2"),
            MenuItem::new("doc", "Readme", MenuItemType::Doc).with_parent("f1"),
            endpoint("keep"),
        ]);
        let removal = remove(&store, "f1").unwrap();
        assert_eq!(order(&removal.store), vec!["keep"]);
        assert_eq!(removal.archived, 2);
        let archived: Vec<_> = removal
            .store
            .ledger()
            .entries(RecycleCategory::Http)
            .iter()
            .map(|e| e.deleted_item.id.as_str())
            .collect();
        assert_eq!(archived, vec!["deep", "doc"]);
    }

    #[test]
    fn test_remove_sorts_leaves_into_buckets() {
        let store = store_of(vec![
            MenuItem::new("s", "User", MenuItemType::ApiSchema),
            MenuItem::new("q", "Ping", MenuItemType::HttpRequest),
        ]);
        let store = remove(&store, "s").unwrap().store;
        let store = remove(&store, "q").unwrap().store;
        assert_eq!(store.ledger().entries(RecycleCategory::Schema)[0].deleted_item.id, "s");
        assert_eq!(store.ledger().entries(RecycleCategory::Request)[0].deleted_item.id, "q");
    }

    #[test]
    fn test_remove_unknown_id_is_none() {
        assert!(remove(&Store::new(), "ghost").is_none());
    }

    #[test]
    fn test_restore_round_trip() {
        let data = json!({ "method": "POST" });
        let store = store_of(vec![endpoint("l1").with_data(data.clone())]);
        let store = remove(&store, "l1").unwrap().store;
        let entry_id = store.ledger().entries(RecycleCategory::Http)[0].id.clone();

        let restoration = store.restore(&entry_id, RecycleCategory::Http).unwrap();
        let item = restoration.store.get("l1").unwrap();
        assert_eq!(item.data, data);
        assert!(restoration.store.ledger().is_empty());
        assert!(restoration.restored.is_some());

        // Second restore of the same entry finds nothing
        assert!(restoration.store.restore(&entry_id, RecycleCategory::Http).is_none());
    }

    #[test]
    fn test_restore_does_not_duplicate_live_item() {
        let store = store_of(vec![endpoint("l1")]);
        let store = remove(&store, "l1").unwrap().store;
        let entry_id = store.ledger().entries(RecycleCategory::Http)[0].id.clone();
        let store = store.add(endpoint("l1")).unwrap();

        let restoration = store.restore(&entry_id, RecycleCategory::Http).unwrap();
        assert!(restoration.restored.is_none());
        assert_eq!(restoration.store.len(), 1);
        assert!(restoration.store.ledger().is_empty());
    }

    #[test]
    fn test_restore_child_of_deleted_folder_lands_at_top_level() {
        let store = store_of(vec![folder("f1"), endpoint("l1").with_parent("f1")]);
        let store = remove(&store, "f1").unwrap().store;
        let entry_id = store.ledger().entries(RecycleCategory::Http)[0].id.clone();

        let restored = store.restore(&entry_id, RecycleCategory::Http).unwrap().store;
        assert!(restored.get("l1").unwrap().is_top_level());
        assert!(restored.violations().is_empty());
    }

    // ------------------------------------------------------------------------
    // move
    // ------------------------------------------------------------------------

    #[test]
    fn test_move_inside_folder() {
        let store = store_of(vec![endpoint("a"), folder("b")]);
        let next = store.move_item("a", "b", DropPosition::Inside).unwrap();
        assert_eq!(next.get("a").unwrap().parent_id.as_deref(), Some("b"));
        assert_eq!(order(&next), vec!["b", "a"]);
    }

    #[test]
    fn test_move_after_sibling_keeps_others_in_order() {
        let store = store_of(vec![endpoint("a"), endpoint("b"), endpoint("c"), endpoint("d")]);
        let next = store.move_item("a", "c", DropPosition::After).unwrap();
        assert_eq!(order(&next), vec!["b", "c", "a", "d"]);

        let next = store.move_item("d", "a", DropPosition::After).unwrap();
        assert_eq!(order(&next), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_move_before_sibling() {
        let store = store_of(vec![endpoint("a"), endpoint("b"), endpoint("c")]);
        let next = store.move_item("c", "a", DropPosition::Before).unwrap();
        assert_eq!(order(&next), vec!["c", "a", "b"]);

        let next = store.move_item("a", "c", DropPosition::Before).unwrap();
        assert_eq!(order(&next), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_after_adopts_drop_parent() {
        let store = store_of(vec![folder("f1"), endpoint("in").with_parent("f1"), endpoint("out")]);
        let next = store.move_item("out", "in", DropPosition::After).unwrap();
        assert_eq!(next.get("out").unwrap().parent_id.as_deref(), Some("f1"));

        let back = next.move_item("in", "f1", DropPosition::Before).unwrap();
        assert!(back.get("in").unwrap().is_top_level());
        assert_eq!(order(&back), vec!["in", "f1", "out"]);
    }

    #[test]
    fn test_move_rejects_descendant_target() {
        let store = store_of(vec![
            folder("f1"),
            folder("f2").with_parent("f1"),
            endpoint("l").with_parent("f2"),
        ]);
        assert!(matches!(
            store.move_item("f1", "f2", DropPosition::Inside),
            Err(MoveError::OntoDescendant { .. })
        ));
        assert!(matches!(
            store.move_item("f1", "l", DropPosition::After),
            Err(MoveError::OntoDescendant { .. })
        ));
        assert_eq!(
            store.move_item("f1", "f1", DropPosition::Inside),
            Err(MoveError::OntoSelf("f1".into()))
        );
    }

    #[test]
    fn test_move_rejects_invalid_targets() {
        let store = store_of(vec![
            endpoint("a"),
            endpoint("b"),
            MenuItem::new("s", "Schema", MenuItemType::ApiSchema),
        ]);
        assert_eq!(
            store.move_item("a", "b", DropPosition::Inside),
            Err(MoveError::NotAFolder("b".into()))
        );
        assert!(matches!(
            store.move_item("a", "s", DropPosition::After),
            Err(MoveError::GroupMismatch { .. })
        ));
        assert_eq!(
            store.move_item("a", "overview", DropPosition::After),
            Err(MoveError::PseudoRoot("overview".into()))
        );
        assert_eq!(
            store.move_item("gone", "a", DropPosition::After),
            Err(MoveError::NotFound("gone".into()))
        );
    }

    #[test]
    fn test_random_moves_never_break_invariants() {
        let mut store = store_of(vec![
            folder("f1"),
            folder("f2"),
            folder("f3").with_parent("f1"),
            endpoint("a").with_parent("f1"),
            endpoint("b").with_parent("f3"),
            endpoint("c"),
            MenuItem::new("sf", "Models", MenuItemType::ApiSchemaFolder),
            MenuItem::new("s", "User", MenuItemType::ApiSchema).with_parent("sf"),
        ]);
        let ids = ["f1", "f2", "f3", "a", "b", "c", "sf", "s"];
        let positions = [DropPosition::Before, DropPosition::Inside, DropPosition::After];
        for (n, drag) in ids.iter().enumerate() {
            for (m, drop) in ids.iter().enumerate() {
                let position = positions[(n + m) % 3];
                if let Ok(next) = store.move_item(drag, drop, position) {
                    store = next;
                }
                assert!(store.violations().is_empty(), "{:?}", store.violations());
                assert_eq!(store.len(), ids.len());
            }
        }
    }

    #[test]
    fn test_violations_flag_cross_group_parent() {
        let store = Store {
            items: vec![
                folder("f1"),
                MenuItem::new("s", "User", MenuItemType::ApiSchema).with_parent("f1"),
            ],
            ledger: RecycleLedger::default(),
        };
        let problems = store.violations();
        assert_eq!(problems, vec!["s is parented to f1 of another group".to_string()]);
    }

    // ------------------------------------------------------------------------
    // from_remote
    // ------------------------------------------------------------------------

    #[test]
    fn test_from_remote_repairs_listing() {
        let store = Store::from_remote(vec![
            folder("f1"),
            endpoint("a").with_parent("f1"),
            endpoint("a"),
            endpoint("orphan").with_parent("missing"),
            endpoint("under-leaf").with_parent("orphan"),
            folder("loop1").with_parent("loop2"),
            folder("loop2").with_parent("loop1"),
            folder("overview"),
        ]);
        assert_eq!(
            order(&store),
            vec!["f1", "a", "orphan", "under-leaf", "loop1", "loop2"]
        );
        assert_eq!(store.get("a").unwrap().parent_id.as_deref(), Some("f1"));
        assert!(store.get("orphan").unwrap().is_top_level());
        assert!(store.get("under-leaf").unwrap().is_top_level());
        assert!(store.violations().is_empty(), "{:?}", store.violations());
    }
}
