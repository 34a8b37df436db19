//! Soul Recipe Definitions
//!
//! Defines the data structures for soul recipes, including TOML
//! deserialization (Raw*) and resolved versions with defaults applied.

use serde::Deserialize;

use super::state::ConsumptionState;
use crate::creature::CreatureKind;

// ============================================================================
// Raw TOML Structures
// ============================================================================

fn default_count() -> i32 {
    1
}

/// Raw ingredient entry from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawIngredient {
    pub creature: CreatureKind,
    #[serde(default = "default_count")]
    pub count: i32,
}

/// Raw soul recipe definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawSoulRecipe {
    pub display_name: Option<String>,
    /// Product item id, defaults to the recipe id
    pub result: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RawIngredient>,
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// Creature requirement of a resolved recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    pub creature: CreatureKind,
    pub count: u32,
}

/// A fully resolved soul recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoulRecipe {
    pub id: String,
    pub display_name: String,
    /// Item id the weak soul turns into once every ingredient is consumed
    pub result: String,
    /// Ingredients in declaration order
    pub ingredients: Vec<Ingredient>,
}

impl SoulRecipe {
    pub fn new(id: &str, result: &str, ingredients: &[(CreatureKind, u32)]) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.replace('_', " "),
            result: result.to_string(),
            ingredients: ingredients
                .iter()
                .map(|&(creature, count)| Ingredient { creature, count })
                .collect(),
        }
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    /// Create a resolved SoulRecipe from raw TOML data
    pub fn from_raw(id: &str, raw: &RawSoulRecipe) -> Result<Self, String> {
        if raw.ingredients.is_empty() {
            return Err(format!("Soul recipe '{}' has no ingredients", id));
        }

        let mut ingredients: Vec<Ingredient> = Vec::with_capacity(raw.ingredients.len());
        for ingredient in &raw.ingredients {
            if ingredient.count <= 0 {
                return Err(format!(
                    "Soul recipe '{}' requires a non-positive count ({}) of {}",
                    id, ingredient.count, ingredient.creature
                ));
            }
            if ingredients.iter().any(|i| i.creature == ingredient.creature) {
                return Err(format!(
                    "Soul recipe '{}' lists {} more than once",
                    id, ingredient.creature
                ));
            }
            ingredients.push(Ingredient {
                creature: ingredient.creature,
                count: ingredient.count as u32,
            });
        }

        Ok(Self {
            id: id.to_string(),
            display_name: raw
                .display_name
                .clone()
                .unwrap_or_else(|| id.replace('_', " ")),
            result: raw.result.clone().unwrap_or_else(|| id.to_string()),
            ingredients,
        })
    }

    /// Required count of a creature, 0 when it is not an ingredient
    pub fn required_count(&self, creature: CreatureKind) -> u32 {
        self.ingredients
            .iter()
            .find(|i| i.creature == creature)
            .map_or(0, |i| i.count)
    }

    pub fn contains(&self, creature: CreatureKind) -> bool {
        self.ingredients.iter().any(|i| i.creature == creature)
    }

    /// Whether one more creature of this kind may still be consumed
    pub fn is_suitable(&self, creature: CreatureKind, state: &ConsumptionState) -> bool {
        if !self.contains(creature) {
            return false;
        }
        state.count(creature) < self.required_count(creature)
    }

    /// Every ingredient has been consumed exactly the required number of times
    pub fn is_finished(&self, state: &ConsumptionState) -> bool {
        self.ingredients
            .iter()
            .all(|i| state.count(i.creature) == i.count)
    }
}
