//! Mechanic Souls
//!
//! A weak mechanic soul consumes creatures until its recipe is satisfied and
//! then turns into the finished soul item.

pub mod definition;
pub mod ledger;
pub mod registry;
pub mod state;

pub use definition::{Ingredient, SoulRecipe};
pub use ledger::{DisplayLine, Ledger, Outcome};
pub use registry::{SoulRegistry, END_MECHANIC_SOUL, HUSBANDRY_MECHANIC_SOUL};
pub use state::{ConsumedEntry, ConsumptionState};
