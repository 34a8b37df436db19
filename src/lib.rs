//! Mechanic Souls
//!
//! Creature consumption ledger for the weak mechanic soul item: a recipe
//! table, per-item consumption state, and the host-facing interaction glue.

pub mod config;
pub mod creature;
pub mod interaction;
pub mod soul;
pub mod store;

pub use config::LedgerConfig;
pub use creature::CreatureKind;
pub use interaction::{Actor, InteractionEvent, InteractionResult, SoulHost, SoulItem, TargetCreature};
pub use soul::{ConsumptionState, DisplayLine, Ledger, Outcome, SoulRecipe, SoulRegistry};
pub use store::ItemStateStore;
