use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;

/// The flat table of page name to content blob captured by one
/// revision. The wiki namespace is flat, so unlike a general
/// version-control tree there is no nesting.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageTree {
    pages: BTreeMap<String, ObjectId>,
}

impl PageTree {
    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.pages.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Replaces or adds an entry, returning the previous blob id if
    /// the page already existed.
    pub fn insert(&mut self, name: &str, content: ObjectId) -> Option<ObjectId> {
        self.pages.insert(name.to_owned(), content)
    }

    pub fn remove(&mut self, name: &str) -> Option<ObjectId> {
        self.pages.remove(name)
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.pages.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[test]
fn test_insert_remove_names() {
    let blob = ObjectId::from(b"content".as_slice());
    let mut tree = PageTree::default();
    assert!(tree.is_empty());
    assert_eq!(tree.insert("Home", blob), None);
    assert_eq!(tree.insert("Home", blob), Some(blob));
    tree.insert("About", blob);
    assert_eq!(
        tree.names().into_iter().collect::<Vec<_>>(),
        vec!["About".to_owned(), "Home".to_owned()]
    );
    assert_eq!(tree.remove("Home"), Some(blob));
    assert!(!tree.contains("Home"));
    assert_eq!(tree.remove("Home"), None);
}

#[test]
fn test_json_round_trip_through_store() {
    use crate::object_store::{in_memory::InMemoryObjectStore, ObjectStore};

    let mut tree = PageTree::default();
    tree.insert("Home", ObjectId::from(b"welcome".as_slice()));

    let mut store = InMemoryObjectStore::new();
    let id = store.insert(&serde_json::to_vec_pretty(&tree).unwrap()).unwrap();
    let bytes = store.read(id).unwrap().unwrap();
    let tree_: PageTree = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(tree, tree_);
}
