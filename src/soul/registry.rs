//! Soul Recipe Registry
//!
//! Holds the soul recipes and the creature -> recipe index used by the ledger.
//! The table is built once at startup and only read afterwards.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use super::definition::{RawSoulRecipe, SoulRecipe};
use crate::creature::CreatureKind;

pub const END_MECHANIC_SOUL: &str = "end_mechanic_soul";
pub const HUSBANDRY_MECHANIC_SOUL: &str = "husbandry_mechanic_soul";

/// Registry for all soul recipes
#[derive(Debug, Default)]
pub struct SoulRegistry {
    recipes: Vec<SoulRecipe>,
    by_creature: HashMap<CreatureKind, usize>,
}

impl SoulRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the recipes shipped with the game
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            SoulRecipe::new(END_MECHANIC_SOUL, END_MECHANIC_SOUL, &[(CreatureKind::Enderman, 10)])
                .with_display_name("End Mechanic Soul"),
        );
        registry.register(
            SoulRecipe::new(
                HUSBANDRY_MECHANIC_SOUL,
                HUSBANDRY_MECHANIC_SOUL,
                &[
                    (CreatureKind::Cow, 3),
                    (CreatureKind::Sheep, 3),
                    (CreatureKind::Chicken, 3),
                    (CreatureKind::Horse, 1),
                ],
            )
            .with_display_name("Husbandry Mechanic Soul"),
        );
        registry
    }

    /// Process-wide built-in registry
    pub fn global() -> &'static SoulRegistry {
        static GLOBAL: OnceLock<SoulRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Add a recipe and index its creatures.
    ///
    /// A creature already claimed by an earlier recipe keeps that recipe.
    pub fn register(&mut self, recipe: SoulRecipe) {
        if let Some(existing) = self.recipes.iter().find(|r| r.id == recipe.id) {
            warn!("Duplicate soul recipe ID '{}', keeping the first definition", existing.id);
            return;
        }

        let index = self.recipes.len();
        for ingredient in &recipe.ingredients {
            match self.by_creature.get(&ingredient.creature) {
                Some(&owner) => warn!(
                    "Creature {} of soul recipe '{}' is already used by '{}', ignoring",
                    ingredient.creature, recipe.id, self.recipes[owner].id
                ),
                None => {
                    self.by_creature.insert(ingredient.creature, index);
                }
            }
        }

        debug!(
            "Registered soul recipe: {} ({}) - {} ingredients -> {}",
            recipe.display_name,
            recipe.id,
            recipe.ingredients.len(),
            recipe.result
        );
        self.recipes.push(recipe);
    }

    /// Load all soul recipes from `<data_dir>/souls/*.toml`.
    ///
    /// Files are read in path order and recipes within a file in id order, so
    /// creature collisions resolve the same way on every start.
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), String> {
        let souls_dir = data_dir.join("souls");

        if !souls_dir.exists() {
            warn!("Souls directory does not exist: {:?}", souls_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&souls_dir)
            .map_err(|e| format!("Failed to read souls directory: {}", e))?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

            // Parse as table of recipes
            let table: BTreeMap<String, RawSoulRecipe> = toml::from_str(&content)
                .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

            for (id, raw) in table {
                let recipe = SoulRecipe::from_raw(&id, &raw)
                    .map_err(|e| format!("Invalid recipe in {:?}: {}", path, e))?;
                self.register(recipe);
            }
        }

        info!(
            "Loaded {} soul recipes covering {} creatures",
            self.recipes.len(),
            self.by_creature.len()
        );

        Ok(())
    }

    /// Recipe that consumes the given creature
    pub fn recipe_for(&self, creature: CreatureKind) -> Option<&SoulRecipe> {
        self.by_creature.get(&creature).map(|&i| &self.recipes[i])
    }

    /// Get a recipe by ID
    pub fn get(&self, id: &str) -> Option<&SoulRecipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Recipes in registration order
    pub fn all(&self) -> impl Iterator<Item = &SoulRecipe> {
        self.recipes.iter()
    }

    pub fn contains_creature(&self, creature: CreatureKind) -> bool {
        self.by_creature.contains_key(&creature)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
