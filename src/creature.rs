use serde::{Deserialize, Serialize};

// ============================================================================
// Creature Kinds
// ============================================================================

/// Creature categories a soul can consume.
///
/// The numeric codes are written into persisted item state, so a code must
/// never be reassigned once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CreatureKind {
    Enderman = 1,
    Cow = 2,
    Sheep = 3,
    Chicken = 4,
    Horse = 5,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 5] = [
        CreatureKind::Enderman,
        CreatureKind::Cow,
        CreatureKind::Sheep,
        CreatureKind::Chicken,
        CreatureKind::Horse,
    ];

    /// Persistence code of this kind
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(CreatureKind::Enderman),
            2 => Some(CreatureKind::Cow),
            3 => Some(CreatureKind::Sheep),
            4 => Some(CreatureKind::Chicken),
            5 => Some(CreatureKind::Horse),
            _ => None,
        }
    }

    /// Identifier used in data files
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatureKind::Enderman => "enderman",
            CreatureKind::Cow => "cow",
            CreatureKind::Sheep => "sheep",
            CreatureKind::Chicken => "chicken",
            CreatureKind::Horse => "horse",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "enderman" => Some(CreatureKind::Enderman),
            "cow" => Some(CreatureKind::Cow),
            "sheep" => Some(CreatureKind::Sheep),
            "chicken" => Some(CreatureKind::Chicken),
            "horse" => Some(CreatureKind::Horse),
            _ => None,
        }
    }

    /// Name shown for a creature that carries no custom name
    pub fn default_name(&self) -> &'static str {
        match self {
            CreatureKind::Enderman => "Enderman",
            CreatureKind::Cow => "Cow",
            CreatureKind::Sheep => "Sheep",
            CreatureKind::Chicken => "Chicken",
            CreatureKind::Horse => "Horse",
        }
    }

    /// Key under which this kind is stored in a persisted state blob
    pub fn state_key(&self) -> String {
        self.code().to_string()
    }

    pub fn from_state_key(key: &str) -> Option<Self> {
        key.parse::<u8>().ok().and_then(Self::from_code)
    }
}

impl std::fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
