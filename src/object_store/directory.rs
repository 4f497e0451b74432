use std::{
    fs::{create_dir_all, File},
    io::{ErrorKind, Read},
    path::PathBuf,
};

use crate::object_id::ObjectId;

use super::ObjectStore;

/// A persistent [`ObjectStore`] kept in a directory, fanned out by the
/// first two hexadecimal characters of the [`ObjectId`]; the remaining
/// characters name the object file inside that subdirectory.
#[derive(Debug, Clone)]
pub struct DirectoryObjectStore {
    root: PathBuf,
}

impl DirectoryObjectStore {
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        if !root.try_exists()? {
            log::info!("creating object store root: {:?}", root);
            create_dir_all(&root)?;
        }
        Ok(Self { root })
    }

    fn object_path(&self, id: ObjectId) -> PathBuf {
        let hex = format!("{}", id);
        self.root.join(&hex[0..2]).join(&hex[2..])
    }
}

impl ObjectStore for DirectoryObjectStore {
    type Error = std::io::Error;

    fn has(&self, id: ObjectId) -> Result<bool, Self::Error> {
        self.object_path(id).try_exists()
    }

    fn read(&self, id: ObjectId) -> Result<Option<Vec<u8>>, Self::Error> {
        log::debug!("reading object {} from {:?}", id, self.root);
        match File::options().read(true).open(self.object_path(id)) {
            Ok(mut f) => {
                let mut v = Vec::new();
                f.read_to_end(&mut v)?;
                Ok(Some(v))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn insert(&mut self, object: &[u8]) -> Result<ObjectId, Self::Error> {
        let id: ObjectId = object.into();
        let path = self.object_path(id);
        if path.try_exists()? {
            // Content-addressed, so an existing file already holds these bytes.
            return Ok(id);
        }
        log::debug!("inserting object {} into {:?}", id, self.root);
        if let Some(subdir) = path.parent() {
            create_dir_all(subdir)?;
        }
        std::fs::write(path, object)?;
        Ok(id)
    }
}

#[test]
fn test_directory_object_store() {
    let tempdir = tempfile::tempdir().unwrap();
    let mut store = DirectoryObjectStore::new(tempdir.path().into()).unwrap();
    let b: &[u8] = b"A home page";
    let id = store.insert(b).unwrap();
    assert!(store.has(id).unwrap());
    assert_eq!(store.read(id).unwrap(), Some(Vec::from(b)));
    // Re-inserting the same bytes is a no-op yielding the same id.
    assert_eq!(store.insert(b).unwrap(), id);
}

#[test]
fn test_missing_object_reads_as_none() {
    let tempdir = tempfile::tempdir().unwrap();
    let store = DirectoryObjectStore::new(tempdir.path().into()).unwrap();
    let absent = ObjectId::from(b"never inserted".as_slice());
    assert!(!store.has(absent).unwrap());
    assert_eq!(store.read(absent).unwrap(), None);
}
