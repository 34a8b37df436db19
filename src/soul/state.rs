//! Consumption State
//!
//! Per-item record of consumed creatures and its persisted layout.
//!
//! The persisted form is a map keyed by the stringified creature code, each
//! value holding `{count, name}`. Keys keep the order creatures were first fed.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::creature::CreatureKind;

/// Progress recorded for a single creature kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedEntry {
    pub count: u32,
    /// Display name of the last creature of this kind consumed
    pub name: String,
}

/// Consumed creatures recorded on one item instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumptionState {
    entries: Vec<(CreatureKind, ConsumedEntry)>,
}

impl ConsumptionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, creature: CreatureKind) -> Option<&ConsumedEntry> {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == creature)
            .map(|(_, entry)| entry)
    }

    /// Consumed count of a creature, 0 when none was recorded
    pub fn count(&self, creature: CreatureKind) -> u32 {
        self.get(creature).map_or(0, |e| e.count)
    }

    /// Recorded kinds in the order they were first fed
    pub fn kinds(&self) -> impl Iterator<Item = CreatureKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CreatureKind, &ConsumedEntry)> {
        self.entries.iter().map(|(kind, entry)| (*kind, entry))
    }

    /// Record one more consumed creature, overwriting the stored display name
    pub fn record(&mut self, creature: CreatureKind, name: &str) -> u32 {
        if let Some((_, entry)) = self.entries.iter_mut().find(|(kind, _)| *kind == creature) {
            entry.count += 1;
            entry.name = name.to_string();
            return entry.count;
        }
        self.entries.push((
            creature,
            ConsumedEntry {
                count: 1,
                name: name.to_string(),
            },
        ));
        1
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Convert to the generic structured tag value stored on the item
    pub fn to_tag(&self) -> Result<serde_json::Value, String> {
        serde_json::to_value(self).map_err(|e| format!("Failed to encode consumption state: {}", e))
    }

    pub fn from_tag(tag: &serde_json::Value) -> Result<Self, String> {
        if tag.is_null() {
            return Ok(Self::new());
        }
        Self::deserialize(tag).map_err(|e| format!("Failed to decode consumption state: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to encode consumption state: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to decode consumption state: {}", e))
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, String> {
        rmp_serde::to_vec_named(self)
            .map_err(|e| format!("Failed to encode consumption state: {}", e))
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, String> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| format!("Failed to decode consumption state: {}", e))
    }
}

impl Serialize for ConsumptionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, entry) in &self.entries {
            map.serialize_entry(&kind.state_key(), entry)?;
        }
        map.end()
    }
}

struct ConsumptionStateVisitor;

impl<'de> Visitor<'de> for ConsumptionStateVisitor {
    type Value = ConsumptionState;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of creature codes to consumed entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(CreatureKind, ConsumedEntry)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, entry)) = access.next_entry::<String, ConsumedEntry>()? {
            let kind = CreatureKind::from_state_key(&key)
                .ok_or_else(|| de::Error::custom(format!("unknown creature code '{}'", key)))?;
            if entries.iter().any(|(k, _)| *k == kind) {
                return Err(de::Error::custom(format!("duplicate creature code '{}'", key)));
            }
            entries.push((kind, entry));
        }

        Ok(ConsumptionState { entries })
    }
}

impl<'de> Deserialize<'de> for ConsumptionState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConsumptionStateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConsumptionState {
        let mut state = ConsumptionState::new();
        state.record(CreatureKind::Sheep, "Sheep");
        state.record(CreatureKind::Cow, "Bessie");
        state.record(CreatureKind::Cow, "Daisy");
        state
    }

    #[test]
    fn test_record_increments_and_renames() {
        let state = sample();
        assert_eq!(state.len(), 2);
        assert_eq!(state.count(CreatureKind::Cow), 2);
        assert_eq!(state.get(CreatureKind::Cow).unwrap().name, "Daisy");
        assert_eq!(state.count(CreatureKind::Horse), 0);
        assert_eq!(
            state.kinds().collect::<Vec<_>>(),
            vec![CreatureKind::Sheep, CreatureKind::Cow]
        );
    }

    #[test]
    fn test_tag_layout() {
        let tag = sample().to_tag().unwrap();
        assert_eq!(
            tag,
            json!({
                "3": { "count": 1, "name": "Sheep" },
                "2": { "count": 2, "name": "Daisy" },
            })
        );
    }

    #[test]
    fn test_persistence_keeps_insertion_order() {
        let state = sample();

        let from_tag = ConsumptionState::from_tag(&state.to_tag().unwrap()).unwrap();
        assert_eq!(from_tag, state);

        let json = state.to_json().unwrap();
        assert!(json.find("\"3\"").unwrap() < json.find("\"2\"").unwrap());
        assert_eq!(ConsumptionState::from_json(&json).unwrap(), state);

        let bytes = state.to_msgpack().unwrap();
        assert_eq!(ConsumptionState::from_msgpack(&bytes).unwrap(), state);
    }

    #[test]
    fn test_missing_tag_is_empty() {
        let state = ConsumptionState::from_tag(&serde_json::Value::Null).unwrap();
        assert!(state.is_empty());
        assert!(ConsumptionState::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_state_rejected() {
        assert!(ConsumptionState::from_json(r#"{"9": {"count": 1, "name": "x"}}"#).is_err());
        assert!(ConsumptionState::from_json(r#"{"cow": {"count": 1, "name": "x"}}"#).is_err());
        assert!(ConsumptionState::from_json(r#"{"2": {"count": -1, "name": "x"}}"#).is_err());
        assert!(
            ConsumptionState::from_json(
                r#"{"2": {"count": 1, "name": "a"}, "2": {"count": 2, "name": "b"}}"#
            )
            .is_err()
        );
    }
}
