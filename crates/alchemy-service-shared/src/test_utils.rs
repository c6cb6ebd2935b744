//! Fixtures for handler tests.
//!
//! Backed by the shared `docs/fixtures/elements.json` catalog.

use std::path::PathBuf;
use std::sync::OnceLock;

use alchemy_lib::{CatalogRecord, EngineConfig};

use crate::state::AppState;

/// Path to the catalog fixture.
pub const TEST_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/elements.json"
);

static FIXTURE_STATE: OnceLock<AppState> = OnceLock::new();

/// Shared state loaded from the catalog fixture, built on first use.
///
/// # Panics
///
/// Panics if the fixture cannot be loaded.
pub fn fixture_state() -> AppState {
    FIXTURE_STATE
        .get_or_init(|| {
            let path = fixture_catalog_path();
            AppState::load_catalog(&path, EngineConfig::default())
                .unwrap_or_else(|e| panic!("failed to load fixture from {:?}: {}", path, e))
        })
        .clone()
}

/// State over the two-terminal Mud catalog, which has exactly one result.
pub fn mud_state() -> AppState {
    AppState::from_records(
        &[
            CatalogRecord::with_recipes("Mud", [("Water", "Earth")]),
            CatalogRecord::terminal("Water"),
            CatalogRecord::terminal("Earth"),
        ],
        EngineConfig::default(),
    )
}

pub fn fixture_catalog_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// Element names known to be in the fixture.
pub mod fixture_elements {
    pub const MUD: &str = "Mud";
    /// Two alternative recipes.
    pub const STEAM: &str = "Steam";
    /// Deepest chain in the fixture.
    pub const STEEL: &str = "Steel";
    pub const WATER: &str = "Water";
    /// Listed with a `null` recipe.
    pub const TIME: &str = "Time";
}
