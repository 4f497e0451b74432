use std::{
    collections::BTreeSet,
    fs::{create_dir_all, read_dir, remove_file, File},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::StoreError,
    object_id::ObjectId,
    object_store::{directory::DirectoryObjectStore, ObjectStore},
    page_tree::PageTree,
    revision::Revision,
};

const VAULT_DIR: &str = ".vault";
const OBJECTS_DIR: &str = "objects";
const HEAD_FILE: &str = "HEAD";

/// A handle on one wiki repository: a directory holding one working
/// file per page plus a `.vault` metadata subdirectory with the
/// content-addressed object store and the HEAD revision pointer.
///
/// Every mutation appends exactly one [`Revision`]; HEAD only moves
/// after the new tree and revision objects are fully stored, so a
/// failed mutation leaves the prior snapshot current.
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Creates the repository at `root` if it does not exist yet and
    /// returns a handle to it. Calling this again on the same path is
    /// a no-op: an existing vault is opened as-is.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let objects = root.join(VAULT_DIR).join(OBJECTS_DIR);
        if !objects.try_exists()? {
            log::info!("initializing wiki repository in {:?}", root);
            create_dir_all(&objects)?;
        }
        Ok(Repository { root })
    }

    /// Opens an existing repository, failing if `root` has no vault.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        read_dir(root.join(VAULT_DIR))?;
        Ok(Repository { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn vault(&self) -> PathBuf {
        self.root.join(VAULT_DIR)
    }

    fn object_store(&self) -> Result<DirectoryObjectStore, StoreError> {
        Ok(DirectoryObjectStore::new(self.vault().join(OBJECTS_DIR))?)
    }

    /// The latest revision's id, or `None` before the first commit.
    pub fn head(&self) -> Result<Option<ObjectId>, StoreError> {
        let path = self.vault().join(HEAD_FILE);
        if !path.try_exists()? {
            return Ok(None);
        }
        Ok(Some(read_json_file(&path)?))
    }

    fn set_head(&self, id: ObjectId) -> Result<(), StoreError> {
        write_json_file(&id, &self.vault().join(HEAD_FILE))
    }

    fn current_tree(&self, store: &DirectoryObjectStore) -> Result<PageTree, StoreError> {
        match self.head()? {
            None => Ok(PageTree::default()),
            Some(head) => {
                let revision: Revision = store.read_json(head)?;
                store.read_json(revision.tree)
            }
        }
    }

    /// The page names present in the current snapshot. Empty history
    /// reads as the empty set, not an error.
    pub fn current_entries(&self) -> Result<BTreeSet<String>, StoreError> {
        let store = self.object_store()?;
        Ok(self.current_tree(&store)?.names())
    }

    /// The current content of `name`, or `None` if it is not in the
    /// current snapshot.
    pub fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let store = self.object_store()?;
        let tree = self.current_tree(&store)?;
        let Some(blob) = tree.get(name) else {
            return Ok(None);
        };
        let bytes = store
            .read(blob)?
            .ok_or(StoreError::MissingObject(blob))?;
        Ok(Some(String::from_utf8(bytes)?))
    }

    /// Commits one new revision whose snapshot replaces (or adds)
    /// `name` with `content`, attributed with `message`. Last write
    /// wins; see [`Repository::write_based_on`] for the checked form.
    pub fn write(&self, name: &str, content: &str, message: &str) -> Result<ObjectId, StoreError> {
        validate_name(name)?;
        // Working-copy mirror first, like a checkout; the snapshot
        // itself only changes when the commit below lands.
        std::fs::write(self.root.join(name), content)?;

        let mut store = self.object_store()?;
        let blob = store.insert(content.as_bytes())?;
        let mut tree = self.current_tree(&store)?;
        tree.insert(name, blob);
        self.commit(&mut store, &tree, message)
    }

    /// Optimistic-concurrency variant of [`Repository::write`]: the
    /// caller passes the head it based its edit on, and the write is
    /// rejected with [`StoreError::Conflict`] if another revision has
    /// landed since.
    pub fn write_based_on(
        &self,
        name: &str,
        content: &str,
        message: &str,
        base: Option<ObjectId>,
    ) -> Result<ObjectId, StoreError> {
        let head = self.head()?;
        if head != base {
            return Err(StoreError::Conflict {
                expected: base,
                actual: head,
            });
        }
        self.write(name, content, message)
    }

    /// Commits one new revision whose snapshot drops `name`. Fails
    /// with [`StoreError::NotFound`] if `name` is not currently
    /// tracked, leaving the snapshot unchanged.
    pub fn remove(&self, name: &str, message: &str) -> Result<ObjectId, StoreError> {
        validate_name(name)?;
        let mut store = self.object_store()?;
        let mut tree = self.current_tree(&store)?;
        if tree.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_owned()));
        }
        match remove_file(self.root.join(name)) {
            Ok(()) => {}
            // A missing working file is fine, the snapshot is authoritative.
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        self.commit(&mut store, &tree, message)
    }

    fn commit(
        &self,
        store: &mut DirectoryObjectStore,
        tree: &PageTree,
        message: &str,
    ) -> Result<ObjectId, StoreError> {
        let tree_id = store.insert_json(tree)?;
        let revision = Revision {
            message: message.to_owned(),
            tree: tree_id,
            parent: self.head()?,
        };
        let revision_id = store.insert_json(&revision)?;
        self.set_head(revision_id)?;
        log::info!("committed revision {}: {}", revision_id, message);
        Ok(revision_id)
    }

    /// Revision ids and messages, newest first.
    pub fn history(&self) -> Result<Vec<(ObjectId, String)>, StoreError> {
        let store = self.object_store()?;
        let mut entries = Vec::new();
        let mut cursor = self.head()?;
        while let Some(id) = cursor {
            let revision: Revision = store.read_json(id)?;
            cursor = revision.parent;
            entries.push((id, revision.message));
        }
        Ok(entries)
    }

    pub fn revision_count(&self) -> Result<usize, StoreError> {
        Ok(self.history()?.len())
    }
}

/// Page names double as file names inside the repository root, so raw
/// spaces, path separators and the like are rejected outright. Titles
/// stay a display-only projection (`_` shown as a space).
fn validate_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_owned()))
    }
}

/// A convenience trait for storing and fetching JSON-encoded revision
/// metadata through the [`DirectoryObjectStore`].
pub trait JsonObjects {
    /// Inserts a pretty JSON encoding of the thing into the store.
    fn insert_json<A: Serialize>(&mut self, thing: &A) -> Result<ObjectId, StoreError>;

    /// Reads a JSON-encoded thing of the given type from the store.
    fn read_json<A: DeserializeOwned>(&self, id: ObjectId) -> Result<A, StoreError>;
}

impl JsonObjects for DirectoryObjectStore {
    fn insert_json<A: Serialize>(&mut self, thing: &A) -> Result<ObjectId, StoreError> {
        Ok(self.insert(&serde_json::to_vec_pretty(thing)?)?)
    }

    fn read_json<A: DeserializeOwned>(&self, id: ObjectId) -> Result<A, StoreError> {
        match self.read(id)? {
            None => Err(StoreError::MissingObject(id)),
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }
}

fn read_json_file<A: for<'de> Deserialize<'de>>(path: &Path) -> Result<A, StoreError> {
    Ok(serde_json::from_reader(
        File::options().read(true).open(path)?,
    )?)
}

fn write_json_file<A: Serialize>(thing: &A, path: &Path) -> Result<(), StoreError> {
    Ok(serde_json::to_writer_pretty(
        File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?,
        thing,
    )?)
}

#[cfg(test)]
fn temp_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    (dir, repo)
}

#[test]
fn test_empty_repository_lists_nothing() {
    let (_dir, repo) = temp_repo();
    assert_eq!(repo.head().unwrap(), None);
    assert!(repo.current_entries().unwrap().is_empty());
    assert_eq!(repo.revision_count().unwrap(), 0);
}

#[test]
fn test_write_read_round_trip() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "welcome to the wiki", "Created Home").unwrap();
    assert_eq!(
        repo.read("Home").unwrap(),
        Some(String::from("welcome to the wiki"))
    );
    repo.write("Home", "welcome back", "Edited Home").unwrap();
    assert_eq!(repo.read("Home").unwrap(), Some(String::from("welcome back")));
}

#[test]
fn test_tracked_transitions() {
    let (_dir, repo) = temp_repo();
    assert!(!repo.current_entries().unwrap().contains("Home"));
    repo.write("Home", "hi", "Created Home").unwrap();
    assert!(repo.current_entries().unwrap().contains("Home"));
    repo.remove("Home", "Destroyed Home").unwrap();
    assert!(!repo.current_entries().unwrap().contains("Home"));
    assert_eq!(repo.read("Home").unwrap(), None);
}

#[test]
fn test_each_mutation_appends_one_revision() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "a", "Created Home").unwrap();
    assert_eq!(repo.revision_count().unwrap(), 1);
    repo.write("Home", "b", "Edited Home").unwrap();
    assert_eq!(repo.revision_count().unwrap(), 2);
    repo.remove("Home", "Destroyed Home").unwrap();
    assert_eq!(repo.revision_count().unwrap(), 3);
    let messages: Vec<String> = repo.history().unwrap().into_iter().map(|(_, m)| m).collect();
    assert_eq!(messages, vec!["Destroyed Home", "Edited Home", "Created Home"]);
}

#[test]
fn test_init_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    repo.write("Home", "hi", "Created Home").unwrap();
    let reopened = Repository::init(dir.path()).unwrap();
    assert_eq!(
        reopened.current_entries().unwrap(),
        repo.current_entries().unwrap()
    );
    assert_eq!(reopened.revision_count().unwrap(), 1);
}

#[test]
fn test_remove_untracked_is_not_found() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "hi", "Created Home").unwrap();
    let err = repo.remove("Ghost", "Destroyed Ghost").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.current_entries().unwrap().len(), 1);
    assert_eq!(repo.revision_count().unwrap(), 1);
}

#[test]
fn test_failed_mutation_leaves_snapshot_current() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "hi", "Created Home").unwrap();
    assert!(repo.remove("Ghost", "Destroyed Ghost").is_err());
    assert_eq!(repo.read("Home").unwrap(), Some(String::from("hi")));
    assert_eq!(repo.revision_count().unwrap(), 1);
}

#[test]
fn test_stale_base_write_is_rejected() {
    let (_dir, repo) = temp_repo();
    let base = repo.write("Home", "first", "Created Home").unwrap();
    repo.write("Home", "second", "Edited Home").unwrap();
    let err = repo
        .write_based_on("Home", "third", "Edited Home", Some(base))
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(repo.read("Home").unwrap(), Some(String::from("second")));

    let head = repo.head().unwrap();
    repo.write_based_on("Home", "third", "Edited Home", head).unwrap();
    assert_eq!(repo.read("Home").unwrap(), Some(String::from("third")));
}

#[test]
fn test_invalid_names_are_rejected() {
    let (_dir, repo) = temp_repo();
    for bad in ["", "has space", "../escape", "a/b", ".vault"] {
        assert!(matches!(
            repo.write(bad, "x", "Created"),
            Err(StoreError::InvalidName(_))
        ));
    }
    assert_eq!(repo.revision_count().unwrap(), 0);
}

#[test]
fn test_writes_to_distinct_pages_accumulate() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "h", "Created Home").unwrap();
    repo.write("About", "a", "Created About").unwrap();
    let names = repo.current_entries().unwrap();
    assert_eq!(
        names.into_iter().collect::<Vec<_>>(),
        vec!["About".to_owned(), "Home".to_owned()]
    );
}

#[test]
fn test_working_copy_mirrors_snapshot() {
    let (dir, repo) = temp_repo();
    repo.write("Home", "hi", "Created Home").unwrap();
    assert_eq!(std::fs::read_to_string(dir.path().join("Home")).unwrap(), "hi");
    repo.remove("Home", "Destroyed Home").unwrap();
    assert!(!dir.path().join("Home").try_exists().unwrap());
}
