use std::path::Path;
use tracing::{error, info};

use mechanic_souls::{ConsumptionState, Ledger, LedgerConfig, SoulRegistry};

// ============================================================================
// Main
// ============================================================================

/// Loads the configured recipe table and prints the progress recorded in any
/// item state files given on the command line.
fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mechanic_souls=info".parse().unwrap()),
        )
        .init();

    let config_path = LedgerConfig::path_from_env();
    let config = LedgerConfig::load(&config_path).unwrap_or_else(|e| {
        error!("Failed to load config: {}", e);
        LedgerConfig::default()
    });

    let registry = config.build_registry().unwrap_or_else(|e| {
        error!("Failed to load soul recipes: {}", e);
        SoulRegistry::builtin()
    });

    for recipe in registry.all() {
        let ingredients: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|i| format!("{} x{}", i.creature, i.count))
            .collect();
        info!(
            "Soul recipe {} ({}): {} -> {}",
            recipe.display_name,
            recipe.id,
            ingredients.join(", "),
            recipe.result
        );
    }

    let ledger = Ledger::new(&registry);
    let soul = config.soul_item();
    for arg in std::env::args().skip(1) {
        match load_state(Path::new(&arg)) {
            Ok(state) => {
                println!("{}:", arg);
                for line in soul.tooltip(&ledger, &state) {
                    println!("  {}", line);
                }
            }
            Err(e) => error!("{}", e),
        }
    }
}

fn load_state(path: &Path) -> Result<ConsumptionState, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
    ConsumptionState::from_json(&content).map_err(|e| format!("{:?}: {}", path, e))
}
