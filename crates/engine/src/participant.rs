//! Participants of a trip's split group.
//!
//! A participant is identified by an opaque string. Identifiers are compared
//! after trimming and Unicode NFC normalization, so `"Nguyễn"` typed with
//! combining marks and its precomposed form name the same person.

use std::{borrow::Borrow, collections::BTreeSet, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Identifier of a person in the split group.
///
/// `Ord` is the deterministic secondary sort key of the settlement matcher.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Builds a normalized identifier, rejecting blank input.
    pub fn new(raw: &str) -> ResultEngine<Self> {
        let normalized: String = raw.trim().nfc().collect();
        if normalized.is_empty() {
            return Err(EngineError::InvalidParticipant(
                "participant id must not be empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ParticipantId {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// The working set of participants, ordered by identifier.
pub type Participants = BTreeSet<ParticipantId>;

/// Builds a participant set from raw identifiers, failing on the first blank one.
pub fn participants<I, S>(ids: I) -> ResultEngine<Participants>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| ParticipantId::new(id.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_normalizes() {
        let decomposed = ParticipantId::new(" Nguye\u{302}\u{303}n ").unwrap();
        let precomposed = ParticipantId::new("Nguy\u{1ec5}n").unwrap();
        assert_eq!(decomposed, precomposed);
        assert_eq!(precomposed.as_str(), "Nguy\u{1ec5}n");
    }

    #[test]
    fn rejects_blank_ids() {
        assert_eq!(
            ParticipantId::new("   "),
            Err(EngineError::InvalidParticipant(
                "participant id must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn set_is_sorted_and_deduplicated() {
        let set = participants(["C", "A", "B", "A "]).unwrap();
        let ids: Vec<&str> = set.iter().map(ParticipantId::as_str).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn deserializes_through_validation() {
        let id: ParticipantId = serde_json::from_str("\" bob \"").unwrap();
        assert_eq!(id.as_str(), "bob");
        assert!(serde_json::from_str::<ParticipantId>("\"\"").is_err());
    }
}
