use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;

/// One immutable, attributed snapshot of the whole page set.
///
/// Wiki history is a single line of edits, so each revision has at
/// most one parent; the first revision has none.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// The message recorded with this revision, e.g. `"Created Home"`.
    pub message: String,
    /// The [`ObjectId`] of the [`PageTree`](crate::page_tree::PageTree) snapshot.
    pub tree: ObjectId,
    /// The previous revision's id, if there was one.
    pub parent: Option<ObjectId>,
}

#[test]
fn test_revision_encoding_is_stable() {
    use crate::object_store::{in_memory::InMemoryObjectStore, ObjectStore};

    let rev = Revision {
        message: String::from("Created Home"),
        tree: ObjectId::from(b"tree bytes".as_slice()),
        parent: None,
    };
    let mut store = InMemoryObjectStore::new();
    let id = store.insert(&serde_json::to_vec_pretty(&rev).unwrap()).unwrap();
    let rev_: Revision = serde_json::from_slice(&store.read(id).unwrap().unwrap()).unwrap();
    assert_eq!(rev, rev_);
}
