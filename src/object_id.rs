use blake3::Hash;
use serde::{Deserialize, Serialize};

use std::fmt::Display;

/// An identifier for a particular piece of binary content.
/// Under the hood, this is a [`blake3`] hash.
///
/// It is displayed and serialized in hexadecimal format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(Hash);

impl Ord for ObjectId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.as_bytes().cmp(other.0.as_bytes())
    }
}

impl PartialOrd for ObjectId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl From<&[u8]> for ObjectId {
    fn from(bytes: &[u8]) -> Self {
        ObjectId(blake3::hash(bytes))
    }
}

impl From<&Vec<u8>> for ObjectId {
    fn from(vec: &Vec<u8>) -> Self {
        ObjectId(blake3::hash(vec))
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.to_hex().as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let hash = Hash::from_hex(&s).map_err(serde::de::Error::custom)?;
        Ok(ObjectId(hash))
    }
}

#[test]
fn test_display_is_hex() {
    let id = ObjectId::from(b"hello, world".as_slice());
    let s = format!("{}", id);
    assert_eq!(s.len(), 64);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_serde_round_trip() {
    let id = ObjectId::from(b"hello, world".as_slice());
    let json = serde_json::to_vec(&id).unwrap();
    let id_: ObjectId = serde_json::from_slice(&json).unwrap();
    assert_eq!(id, id_);
}
