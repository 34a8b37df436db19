//! Consumption Ledger
//!
//! Evaluates "feed this creature to the soul" events against the recipe table
//! and the item's recorded consumption state.

use std::fmt;
use tracing::{debug, warn};

use super::definition::SoulRecipe;
use super::registry::SoulRegistry;
use super::state::ConsumptionState;
use crate::creature::CreatureKind;

/// Classification of a single offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The actor may not use the soul; a message should be shown to it
    RejectedUnauthorized,
    /// No recipe consumes this creature
    NotRecognized,
    /// The active recipe does not take this creature, or has enough of it
    Ineligible,
    /// The creature was consumed; the new state belongs on the item
    Progressed(ConsumptionState),
    /// The creature was consumed and the recipe is complete; the item becomes `product`
    Completed {
        product: String,
        state: ConsumptionState,
    },
}

impl Outcome {
    /// Whether the creature should be removed from the world
    pub fn consumed(&self) -> bool {
        matches!(self, Outcome::Progressed(_) | Outcome::Completed { .. })
    }
}

/// One tooltip line describing recorded progress for a creature kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub creature: CreatureKind,
    pub count: u32,
    pub required: u32,
    pub name: String,
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Consumed: {}/{} {}", self.count, self.required, self.name)
    }
}

/// Applies offers against a recipe table
#[derive(Debug, Clone, Copy)]
pub struct Ledger<'a> {
    registry: &'a SoulRegistry,
}

impl<'a> Ledger<'a> {
    pub fn new(registry: &'a SoulRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a SoulRegistry {
        self.registry
    }

    /// Offer a creature of a known kind to the item
    pub fn offer(
        &self,
        state: &ConsumptionState,
        candidate: CreatureKind,
        display_name: &str,
        authorized: bool,
    ) -> Outcome {
        self.offer_creature(state, Some(candidate), display_name, authorized)
    }

    /// Offer a creature the host may not be able to classify
    pub fn offer_creature(
        &self,
        state: &ConsumptionState,
        candidate: Option<CreatureKind>,
        display_name: &str,
        authorized: bool,
    ) -> Outcome {
        if !authorized {
            return Outcome::RejectedUnauthorized;
        }

        let Some(candidate) = candidate.filter(|&c| self.registry.contains_creature(c)) else {
            return Outcome::NotRecognized;
        };

        let Some(recipe) = self.active_recipe(state, candidate) else {
            return Outcome::Ineligible;
        };

        if !recipe.is_suitable(candidate, state) {
            return Outcome::Ineligible;
        }

        let mut next = state.clone();
        let count = next.record(candidate, display_name);
        debug!(
            "Soul consumed {} '{}' ({}/{}) for {}",
            candidate,
            display_name,
            count,
            recipe.required_count(candidate),
            recipe.id
        );

        if recipe.is_finished(&next) {
            Outcome::Completed {
                product: recipe.result.clone(),
                state: next,
            }
        } else {
            Outcome::Progressed(next)
        }
    }

    /// Recipe the state is working towards.
    ///
    /// An empty state takes the candidate's recipe. Otherwise the first
    /// recorded creature decides.
    fn active_recipe(&self, state: &ConsumptionState, candidate: CreatureKind) -> Option<&'a SoulRecipe> {
        let Some(first) = state.kinds().next() else {
            return self.registry.recipe_for(candidate);
        };

        let recipe = self.registry.recipe_for(first)?;
        if state.kinds().any(|k| !recipe.contains(k)) {
            warn!(
                "Consumption state mixes creatures outside recipe '{}', using it anyway",
                recipe.id
            );
        }
        Some(recipe)
    }

    /// Progress lines for each recorded creature, in the order first fed
    pub fn describe(&self, state: &ConsumptionState) -> Vec<DisplayLine> {
        state
            .iter()
            .map(|(creature, entry)| DisplayLine {
                creature,
                count: entry.count,
                required: self
                    .registry
                    .recipe_for(creature)
                    .map_or(0, |r| r.required_count(creature)),
                name: entry.name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soul::registry::{END_MECHANIC_SOUL, HUSBANDRY_MECHANIC_SOUL};

    fn state_with(entries: &[(CreatureKind, u32, &str)]) -> ConsumptionState {
        let mut state = ConsumptionState::new();
        for &(kind, count, name) in entries {
            for _ in 0..count {
                state.record(kind, name);
            }
        }
        state
    }

    #[test]
    fn test_first_enderman_progresses() {
        let ledger = Ledger::new(SoulRegistry::global());
        let outcome = ledger.offer(&ConsumptionState::new(), CreatureKind::Enderman, "Enderman", true);

        assert_eq!(outcome, Outcome::Progressed(state_with(&[(CreatureKind::Enderman, 1, "Enderman")])));
    }

    #[test]
    fn test_tenth_enderman_completes() {
        let ledger = Ledger::new(SoulRegistry::global());
        let state = state_with(&[(CreatureKind::Enderman, 9, "Steve")]);

        let outcome = ledger.offer(&state, CreatureKind::Enderman, "Steve", true);
        assert_eq!(
            outcome,
            Outcome::Completed {
                product: END_MECHANIC_SOUL.to_string(),
                state: state_with(&[(CreatureKind::Enderman, 10, "Steve")]),
            }
        );
        assert_eq!(state.count(CreatureKind::Enderman), 9);
    }

    #[test]
    fn test_capped_ingredient_is_ineligible() {
        let ledger = Ledger::new(SoulRegistry::global());
        let state = state_with(&[(CreatureKind::Cow, 3, "Cow")]);

        for _ in 0..3 {
            assert_eq!(ledger.offer(&state, CreatureKind::Cow, "Cow", true), Outcome::Ineligible);
        }
        assert_eq!(state.count(CreatureKind::Cow), 3);
    }

    #[test]
    fn test_foreign_recipe_is_ineligible() {
        let ledger = Ledger::new(SoulRegistry::global());
        let state = state_with(&[(CreatureKind::Cow, 1, "Cow")]);

        assert_eq!(
            ledger.offer(&state, CreatureKind::Enderman, "Enderman", true),
            Outcome::Ineligible
        );
    }

    #[test]
    fn test_unauthorized_actor_rejected() {
        let ledger = Ledger::new(SoulRegistry::global());
        let state = state_with(&[(CreatureKind::Sheep, 1, "Sheep")]);

        for kind in CreatureKind::ALL {
            let outcome = ledger.offer(&state, kind, "Someone", false);
            assert_eq!(outcome, Outcome::RejectedUnauthorized);
            assert!(!outcome.consumed());
        }
        assert_eq!(
            ledger.offer_creature(&state, None, "Zombie", false),
            Outcome::RejectedUnauthorized
        );
        assert_eq!(state, state_with(&[(CreatureKind::Sheep, 1, "Sheep")]));
    }

    #[test]
    fn test_unregistered_creature_not_recognized() {
        let mut registry = SoulRegistry::new();
        registry.register(SoulRecipe::new("cows", "cow_soul", &[(CreatureKind::Cow, 2)]));
        let ledger = Ledger::new(&registry);

        let state = ConsumptionState::new();
        assert_eq!(ledger.offer(&state, CreatureKind::Horse, "Horse", true), Outcome::NotRecognized);
        assert_eq!(ledger.offer_creature(&state, None, "Zombie", true), Outcome::NotRecognized);
        assert!(state.is_empty());
    }

    #[test]
    fn test_progress_increments_one_counter() {
        let ledger = Ledger::new(SoulRegistry::global());
        let state = state_with(&[(CreatureKind::Cow, 2, "Cow"), (CreatureKind::Sheep, 1, "Sheep")]);

        let Outcome::Progressed(next) = ledger.offer(&state, CreatureKind::Sheep, "Dolly", true) else {
            panic!("expected progress");
        };
        assert_eq!(next.count(CreatureKind::Cow), 2);
        assert_eq!(next.count(CreatureKind::Sheep), 2);
        assert_eq!(next.get(CreatureKind::Sheep).unwrap().name, "Dolly");
        assert_eq!(next.kinds().collect::<Vec<_>>(), vec![CreatureKind::Cow, CreatureKind::Sheep]);
    }

    #[test]
    fn test_husbandry_completes_only_when_every_ingredient_met() {
        let ledger = Ledger::new(SoulRegistry::global());
        let mut state = ConsumptionState::new();
        let feed = [
            CreatureKind::Horse,
            CreatureKind::Cow,
            CreatureKind::Cow,
            CreatureKind::Cow,
            CreatureKind::Sheep,
            CreatureKind::Sheep,
            CreatureKind::Sheep,
            CreatureKind::Chicken,
            CreatureKind::Chicken,
        ];
        for kind in feed {
            match ledger.offer(&state, kind, kind.default_name(), true) {
                Outcome::Progressed(next) => state = next,
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert_eq!(ledger.offer(&state, CreatureKind::Horse, "Horse", true), Outcome::Ineligible);
        match ledger.offer(&state, CreatureKind::Chicken, "Chicken", true) {
            Outcome::Completed { product, state } => {
                assert_eq!(product, HUSBANDRY_MECHANIC_SOUL);
                assert_eq!(state.count(CreatureKind::Chicken), 3);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_recorded_creature_without_recipe_is_ineligible() {
        let mut registry = SoulRegistry::new();
        registry.register(SoulRecipe::new("cows", "cow_soul", &[(CreatureKind::Cow, 2)]));
        let ledger = Ledger::new(&registry);
        let state = state_with(&[(CreatureKind::Enderman, 1, "Enderman")]);

        assert_eq!(ledger.offer(&state, CreatureKind::Cow, "Cow", true), Outcome::Ineligible);
    }

    #[test]
    fn test_mixed_state_uses_first_recorded_recipe() {
        let ledger = Ledger::new(SoulRegistry::global());
        let mut state = state_with(&[(CreatureKind::Cow, 1, "Cow")]);
        // Only reachable through hand-edited or foreign data
        state.record(CreatureKind::Enderman, "Enderman");

        assert_eq!(
            ledger.offer(&state, CreatureKind::Enderman, "Enderman", true),
            Outcome::Ineligible
        );
        match ledger.offer(&state, CreatureKind::Cow, "Daisy", true) {
            Outcome::Progressed(next) => {
                assert_eq!(next.count(CreatureKind::Cow), 2);
                assert_eq!(next.count(CreatureKind::Enderman), 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_describe_unregistered_kind_shows_zero_required() {
        let mut registry = SoulRegistry::new();
        registry.register(SoulRecipe::new("cows", "cow_soul", &[(CreatureKind::Cow, 2)]));
        let ledger = Ledger::new(&registry);
        let state = state_with(&[(CreatureKind::Enderman, 4, "Ender"), (CreatureKind::Cow, 1, "Bessie")]);

        let lines: Vec<String> = ledger.describe(&state).iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["Consumed: 4/0 Ender", "Consumed: 1/2 Bessie"]);
    }

    #[test]
    fn test_describe_lines() {
        let ledger = Ledger::new(SoulRegistry::global());
        let state = state_with(&[(CreatureKind::Sheep, 2, "Dolly"), (CreatureKind::Cow, 1, "Bessie")]);

        let lines: Vec<String> = ledger.describe(&state).iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["Consumed: 2/3 Dolly", "Consumed: 1/3 Bessie"]);
        assert!(ledger.describe(&ConsumptionState::new()).is_empty());
    }
}
