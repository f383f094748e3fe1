/// Canonical hashing of labeled trees.
///
/// Two digests are defined over a [`LabeledTree`]:
///
/// - [`full_hash`]: covers the tag, the condensed attribute map of the whole
///   subtree (see [`crate::condense::condense_attributes`]) and, recursively,
///   the full hashes of the children in order.
/// - [`structural_hash`]: the same recursive scheme with attributes excluded
///   at every level; only tags and child arrangement matter.
///
/// # Canonical serialization
///
/// Each node is fed to SHA-256 as a domain byte (`F` or `S`), the
/// length-prefixed tag, then (full mode only) the attribute count followed by
/// every key and value length-prefixed in sorted key order, then the child
/// count followed by each child's 32-byte digest. Length prefixes are 8-byte
/// little-endian. Sorting comes for free from the `BTreeMap`, so attribute
/// insertion order never reaches the hasher.
///
/// The exported digest is the 64-character lowercase hex encoding.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use sha2::{Digest, Sha256};

use crate::condense::condense_attributes;
use crate::tree::LabeledTree;

/// A 64-character lowercase hex SHA-256 digest of a tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeDigest(String);

impl TreeDigest {
    /// Returns the hex digest as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex_encode(bytes))
    }
}

impl fmt::Display for TreeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TreeDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TreeDigest {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TreeDigest {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        let valid = s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(Self(s))
        } else {
            Err(de::Error::custom(format!(
                "invalid tree digest: expected 64 lowercase hex characters, got {s:?}"
            )))
        }
    }
}

/// Encodes a byte slice as a lowercase hexadecimal string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Feeds a length-prefixed string to the hasher.
fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

#[derive(Clone, Copy)]
enum Mode {
    Full,
    Structural,
}

fn digest_node(tree: &LabeledTree, mode: Mode) -> [u8; 32] {
    let mut hasher = Sha256::new();
    match mode {
        Mode::Full => hasher.update(b"F"),
        Mode::Structural => hasher.update(b"S"),
    }
    update_str(&mut hasher, &tree.tag);

    if let Mode::Full = mode {
        let condensed = condense_attributes(tree);
        hasher.update((condensed.len() as u64).to_le_bytes());
        for (key, value) in &condensed {
            update_str(&mut hasher, key);
            update_str(&mut hasher, value);
        }
    }

    hasher.update((tree.children.len() as u64).to_le_bytes());
    for child in &tree.children {
        hasher.update(digest_node(child, mode));
    }

    hasher.finalize().into()
}

/// Computes the full digest of `tree`: tag, condensed attributes and
/// children, recursively.
///
/// Any attribute added, removed or changed anywhere in the subtree changes
/// the digest. Attribute insertion order does not.
pub fn full_hash(tree: &LabeledTree) -> TreeDigest {
    TreeDigest::from_bytes(&digest_node(tree, Mode::Full))
}

/// Computes the structural digest of `tree`: tags and child arrangement
/// only, attributes ignored at every level.
pub fn structural_hash(tree: &LabeledTree) -> TreeDigest {
    TreeDigest::from_bytes(&digest_node(tree, Mode::Structural))
}
