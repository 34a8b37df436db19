//! Soul Item Interaction
//!
//! Bridges host "use item on creature" events to the ledger and turns the
//! resulting outcome into host side effects.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::creature::CreatureKind;
use crate::soul::{ConsumptionState, Ledger, Outcome};

pub const WEAK_MECHANIC_SOUL: &str = "weak_mechanic_soul";
pub const DEFAULT_UNAUTHORIZED_MESSAGE: &str = "text.mechanic_souls.weak_mechanical_soul_used_by_player";

// ============================================================================
// Host Types
// ============================================================================

/// Who is using the item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    /// The host's automation proxy (turtles, deployers and the like)
    Automation,
    Player { name: String },
}

impl Actor {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Actor::Automation)
    }
}

/// The creature the item was used on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCreature {
    /// Host handle used to remove the creature
    pub handle: u64,
    /// `None` for creatures no soul recognizes
    pub kind: Option<CreatureKind>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub actor: Actor,
    pub target: TargetCreature,
    /// Instance id of the held soul item
    pub item: Uuid,
}

/// Host action result, mirrors the engine's success/pass/fail triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionResult {
    Success,
    Pass,
    Fail,
}

/// Side effects the host performs on behalf of the soul item
pub trait SoulHost {
    /// Show a translated status message to the actor
    fn display_message(&mut self, actor: &Actor, key: &str);

    /// Remove a consumed creature from the world
    fn remove_creature(&mut self, handle: u64);

    /// Replace the item in the actor's hand with a fresh instance of `product`
    fn replace_held_item(&mut self, item: Uuid, product: &str);

    /// Write the updated consumption state back onto the item
    fn persist_state(&mut self, item: Uuid, state: &ConsumptionState);
}

// ============================================================================
// Soul Item
// ============================================================================

/// The weak mechanic soul item
#[derive(Debug, Clone)]
pub struct SoulItem {
    pub id: String,
    pub description: String,
    pub unauthorized_message_key: String,
}

impl Default for SoulItem {
    fn default() -> Self {
        Self {
            id: WEAK_MECHANIC_SOUL.to_string(),
            description: "Feed it creatures with an automated player to forge a mechanic soul".to_string(),
            unauthorized_message_key: DEFAULT_UNAUTHORIZED_MESSAGE.to_string(),
        }
    }
}

impl SoulItem {
    pub fn new(unauthorized_message_key: &str) -> Self {
        Self {
            unauthorized_message_key: unauthorized_message_key.to_string(),
            ..Self::default()
        }
    }

    /// Handle the item being used on a creature.
    ///
    /// Returns the ledger outcome so callers owning the state can apply it.
    pub fn interact(
        &self,
        ledger: &Ledger<'_>,
        event: &InteractionEvent,
        state: &ConsumptionState,
        host: &mut impl SoulHost,
    ) -> (InteractionResult, Outcome) {
        let outcome = ledger.offer_creature(
            state,
            event.target.kind,
            &event.target.display_name,
            event.actor.is_authorized(),
        );
        let result = apply_outcome(&self.unauthorized_message_key, event, &outcome, host);
        (result, outcome)
    }

    /// Tooltip lines: the static description followed by consumption progress
    pub fn tooltip(&self, ledger: &Ledger<'_>, state: &ConsumptionState) -> Vec<String> {
        std::iter::once(self.description.clone())
            .chain(ledger.describe(state).iter().map(|line| line.to_string()))
            .collect()
    }
}

/// Perform the host side effects of an outcome
pub fn apply_outcome(
    unauthorized_message_key: &str,
    event: &InteractionEvent,
    outcome: &Outcome,
    host: &mut impl SoulHost,
) -> InteractionResult {
    match outcome {
        Outcome::RejectedUnauthorized => {
            if let Actor::Player { name } = &event.actor {
                debug!("Soul item {} used by hand by player {}", event.item, name);
            }
            host.display_message(&event.actor, unauthorized_message_key);
            InteractionResult::Fail
        }
        Outcome::NotRecognized | Outcome::Ineligible => InteractionResult::Pass,
        Outcome::Progressed(state) => {
            host.remove_creature(event.target.handle);
            host.persist_state(event.item, state);
            InteractionResult::Success
        }
        Outcome::Completed { product, .. } => {
            host.remove_creature(event.target.handle);
            info!("Soul item {} completed into {}", event.item, product);
            host.replace_held_item(event.item, product);
            InteractionResult::Success
        }
    }
}
