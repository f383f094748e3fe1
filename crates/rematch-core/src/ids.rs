/// External leaf identifiers: `{root_id}_{sequence_index}_{index_within_group}`.
///
/// This is the identifier scheme the host application uses to key submitted
/// answers, e.g. `i4x-MITx-999-problem-Problem_4_2_1` for the first input of
/// the first response group of problem `i4x-MITx-999-problem-Problem_4`.
///
/// [`encode`] builds an [`ExternalId`] from its parts; [`decode`] and
/// [`ExternalId::try_from`] parse one back. Parsing takes the *last* two
/// `_`-separated segments as the indices, so root ids may themselves contain
/// underscores. Indices are canonical decimal (no leading zeros), which makes
/// `decode` a left inverse of `encode` and keeps distinct index pairs from
/// ever sharing an id under one root.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when parsing an external identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The string did not match `{root}_{seq}_{idx}`.
    InvalidFormat {
        /// The input that was rejected.
        got: String,
    },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat { got } => write!(
                f,
                "invalid external id: expected {{root}}_{{sequence}}_{{index}}, got {got:?}"
            ),
        }
    }
}

impl std::error::Error for IdError {}

// ---------------------------------------------------------------------------
// Regex statics
//
// The pattern is a compile-time literal; Regex::new never returns Err for it.
// "a^" never matches and is always valid, so it stands in as the fallback
// without reaching for unwrap().
// ---------------------------------------------------------------------------

/// Matches `{root}_{seq}_{idx}` with canonical decimal indices.
static EXTERNAL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)_(0|[1-9][0-9]*)_(0|[1-9][0-9]*)$").unwrap_or_else(|_| {
        // Never reached: the pattern above is always valid.
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

// ---------------------------------------------------------------------------
// ExternalId
// ---------------------------------------------------------------------------

/// The host-facing identifier of one input leaf.
///
/// Ordering compares root, then sequence index, then index within group
/// numerically, so `_2_1 < _2_2 < _10_1`.
#[derive(Debug, Clone)]
pub struct ExternalId {
    raw: String,
    root_len: usize,
    sequence_index: u32,
    index_within_group: u32,
}

impl ExternalId {
    /// Returns the root id part (everything before the two index segments).
    pub fn root(&self) -> &str {
        &self.raw[..self.root_len]
    }

    /// Returns the 1-based sequence index of the response group.
    pub fn sequence_index(&self) -> u32 {
        self.sequence_index
    }

    /// Returns the 1-based position of the input within its group.
    pub fn index_within_group(&self) -> u32 {
        self.index_within_group
    }

    /// Returns the id as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the id with `root` substituted for the current root.
    #[must_use]
    pub fn with_root(&self, root: &str) -> Self {
        encode(root, self.sequence_index, self.index_within_group)
    }
}

impl TryFrom<&str> for ExternalId {
    type Error = IdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let invalid = || IdError::InvalidFormat { got: s.to_owned() };
        let caps = EXTERNAL_ID_RE.captures(s).ok_or_else(invalid)?;
        let root_len = caps.get(1).map_or(0, |m| m.end());
        let sequence_index = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let index_within_group = caps
            .get(3)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(invalid)?;
        Ok(Self {
            raw: s.to_owned(),
            root_len,
            sequence_index,
            index_within_group,
        })
    }
}

impl PartialEq for ExternalId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ExternalId {}

impl Hash for ExternalId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Ord for ExternalId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.root()
            .cmp(other.root())
            .then(self.sequence_index.cmp(&other.sequence_index))
            .then(self.index_within_group.cmp(&other.index_within_group))
    }
}

impl PartialOrd for ExternalId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Deref for ExternalId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.raw
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ExternalId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ExternalId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Builds the external id for input `index_within_group` of group
/// `sequence_index` under `root_id`.
///
/// Callers own their root id: it is used verbatim, without escaping.
///
/// # Example
///
/// ```
/// use rematch_core::ids::{decode, encode};
///
/// let id = encode("i4x-MITx-999-problem-Problem_4", 2, 1);
/// assert_eq!(id.as_str(), "i4x-MITx-999-problem-Problem_4_2_1");
/// assert_eq!(decode(id.as_str()), Ok((2, 1)));
/// assert_eq!(id.root(), "i4x-MITx-999-problem-Problem_4");
/// ```
pub fn encode(root_id: &str, sequence_index: u32, index_within_group: u32) -> ExternalId {
    ExternalId {
        raw: format!("{root_id}_{sequence_index}_{index_within_group}"),
        root_len: root_id.len(),
        sequence_index,
        index_within_group,
    }
}

/// Parses `external_id` back into `(sequence_index, index_within_group)`.
///
/// # Errors
///
/// Returns [`IdError::InvalidFormat`] when the string does not end in two
/// canonical decimal segments.
pub fn decode(external_id: &str) -> Result<(u32, u32), IdError> {
    let id = ExternalId::try_from(external_id)?;
    Ok((id.sequence_index, id.index_within_group))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn encode_uses_underscore_format() {
        assert_eq!(encode("root", 2, 1).as_str(), "root_2_1");
        assert_eq!(encode("", 2, 3).as_str(), "_2_3");
    }

    #[test]
    fn decode_inverts_encode() {
        for (seq, idx) in [(1, 1), (2, 1), (10, 12), (u32::MAX, 0)] {
            let id = encode("i4x-MITx-999-problem-Problem_4", seq, idx);
            assert_eq!(decode(id.as_str()), Ok((seq, idx)));
        }
    }

    #[test]
    fn root_may_contain_separator() {
        let id = ExternalId::try_from("a_b_7_2_1").expect("parse");
        assert_eq!(id.root(), "a_b_7");
        assert_eq!(id.sequence_index(), 2);
        assert_eq!(id.index_within_group(), 1);
    }

    #[test]
    fn leading_zeros_are_rejected() {
        assert!(decode("root_02_1").is_err());
        assert!(decode("root_2_01").is_err());
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for bad in ["", "root", "root_2", "root_x_1", "root_2_", "root_99999999999_1"] {
            assert!(decode(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parsed_and_encoded_ids_are_equal() {
        let parsed = ExternalId::try_from("p_2_1").expect("parse");
        assert_eq!(parsed, encode("p", 2, 1));
    }

    #[test]
    fn distinct_positions_never_collide() {
        let mut seen = BTreeSet::new();
        for seq in 1..=12 {
            for idx in 1..=12 {
                assert!(seen.insert(encode("p_1", seq, idx).as_str().to_owned()));
            }
        }
    }

    #[test]
    fn ordering_is_numeric() {
        let mut ids = vec![encode("p", 10, 1), encode("p", 2, 2), encode("p", 2, 1)];
        ids.sort();
        let raw: Vec<&str> = ids.iter().map(ExternalId::as_str).collect();
        assert_eq!(raw, ["p_2_1", "p_2_2", "p_10_1"]);
    }

    #[test]
    fn with_root_replaces_only_the_root() {
        let id = encode("old", 3, 2);
        assert_eq!(id.with_root("new").as_str(), "new_3_2");
    }

    #[test]
    fn serde_round_trip_validates() {
        let id = encode("p", 2, 1);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, r#""p_2_1""#);
        let back: ExternalId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
        let bad: Result<ExternalId, _> = serde_json::from_str(r#""nope""#);
        assert!(bad.is_err());
    }
}
