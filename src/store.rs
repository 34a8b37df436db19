//! Item State Store
//!
//! Consumption state keyed by item instance. Offers on the same item are
//! serialized by the entry lock; different items proceed independently.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::creature::CreatureKind;
use crate::interaction::{apply_outcome, InteractionEvent, InteractionResult, SoulHost, SoulItem};
use crate::soul::{ConsumptionState, DisplayLine, Ledger, Outcome};

/// What the store knows about one item instance
#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemSlot {
    Consuming(ConsumptionState),
    /// The weak soul was replaced by `product`; it never consumes again
    Completed { product: String },
}

/// Per-item consumption state.
///
/// Entries live until the host calls [`ItemStateStore::remove`], which it
/// must do when an item instance is destroyed or leaves the world.
#[derive(Debug, Default)]
pub struct ItemStateStore {
    items: DashMap<Uuid, ItemSlot>,
}

impl ItemStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a persisted state to an item, replacing any cached one
    pub fn insert(&self, item: Uuid, state: ConsumptionState) {
        if state.is_empty() {
            self.items.remove(&item);
        } else {
            self.items.insert(item, ItemSlot::Consuming(state));
        }
    }

    /// Attach the state stored in an item's structured tag
    pub fn load_tag(&self, item: Uuid, tag: &serde_json::Value) -> Result<(), String> {
        let state = ConsumptionState::from_tag(tag).map_err(|e| format!("Item {}: {}", item, e))?;
        self.insert(item, state);
        Ok(())
    }

    /// Read-increment-write under the item's lock.
    ///
    /// A completed item keeps only a marker, so later offers against the same
    /// instance are ineligible and consume nothing.
    pub fn offer(
        &self,
        ledger: &Ledger<'_>,
        item: Uuid,
        candidate: Option<CreatureKind>,
        display_name: &str,
        authorized: bool,
    ) -> Outcome {
        match self.items.entry(item) {
            Entry::Occupied(mut entry) => {
                let ItemSlot::Consuming(state) = entry.get() else {
                    debug!("Item {} already completed, ignoring offer", item);
                    return Outcome::Ineligible;
                };
                let outcome = ledger.offer_creature(state, candidate, display_name, authorized);
                match &outcome {
                    Outcome::Progressed(state) => {
                        *entry.get_mut() = ItemSlot::Consuming(state.clone());
                    }
                    Outcome::Completed { product, .. } => {
                        *entry.get_mut() = ItemSlot::Completed {
                            product: product.clone(),
                        };
                    }
                    _ => {}
                }
                outcome
            }
            Entry::Vacant(entry) => {
                let outcome =
                    ledger.offer_creature(&ConsumptionState::new(), candidate, display_name, authorized);
                match &outcome {
                    Outcome::Progressed(state) => {
                        entry.insert(ItemSlot::Consuming(state.clone()));
                    }
                    Outcome::Completed { product, .. } => {
                        entry.insert(ItemSlot::Completed {
                            product: product.clone(),
                        });
                    }
                    _ => {}
                }
                outcome
            }
        }
    }

    /// Handle an interaction event against the stored state.
    ///
    /// Host side effects run after the item's lock is released.
    pub fn interact(
        &self,
        soul: &SoulItem,
        ledger: &Ledger<'_>,
        event: &InteractionEvent,
        host: &mut impl SoulHost,
    ) -> InteractionResult {
        let outcome = self.offer(
            ledger,
            event.item,
            event.target.kind,
            &event.target.display_name,
            event.actor.is_authorized(),
        );
        debug!("Item {} offer outcome: {:?}", event.item, outcome);
        apply_outcome(&soul.unauthorized_message_key, event, &outcome, host)
    }

    /// Current state of an item that is still consuming
    pub fn snapshot(&self, item: Uuid) -> Option<ConsumptionState> {
        match self.items.get(&item)?.value() {
            ItemSlot::Consuming(state) => Some(state.clone()),
            ItemSlot::Completed { .. } => None,
        }
    }

    /// Product an item was turned into, if it completed
    pub fn completed_product(&self, item: Uuid) -> Option<String> {
        match self.items.get(&item)?.value() {
            ItemSlot::Completed { product } => Some(product.clone()),
            ItemSlot::Consuming(_) => None,
        }
    }

    pub fn describe(&self, ledger: &Ledger<'_>, item: Uuid) -> Vec<DisplayLine> {
        self.snapshot(item)
            .map(|state| ledger.describe(&state))
            .unwrap_or_default()
    }

    /// Forget an item instance, returning its state if it was still consuming
    pub fn remove(&self, item: Uuid) -> Option<ConsumptionState> {
        match self.items.remove(&item)? {
            (_, ItemSlot::Consuming(state)) => Some(state),
            (_, ItemSlot::Completed { .. }) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
