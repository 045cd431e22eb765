use anyhow::{bail, Context};
use farmgrid_core::{Catalog, GameState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub seed: u64,
    /// Fingerprint of the catalog the game was played with.
    #[serde(default)]
    pub catalog_signature: String,
    pub state: GameState,
}

pub fn default_save_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("FARMGRID_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".farmgrid_save.json"))
}

pub fn save_game(
    path: &Path,
    seed: u64,
    catalog: &Catalog,
    state: &GameState,
) -> anyhow::Result<()> {
    let payload = SavedGame {
        version: SAVE_SCHEMA_VERSION,
        seed,
        catalog_signature: catalog_signature(catalog),
        state: state.clone(),
    };
    let body = serde_json::to_string_pretty(&payload).context("encode save")?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), score = state.score, "game saved");
    Ok(())
}

/// Reads a save and checks it against `catalog` before handing it back.
pub fn load_game(path: &Path, catalog: &Catalog) -> anyhow::Result<SavedGame> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let saved: SavedGame =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if saved.version != SAVE_SCHEMA_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            saved.version,
            SAVE_SCHEMA_VERSION
        );
    }
    if !saved.catalog_signature.is_empty()
        && saved.catalog_signature != catalog_signature(catalog)
    {
        bail!("save was made with a different card catalog");
    }
    saved
        .state
        .validate(catalog)
        .with_context(|| format!("validate {}", path.display()))?;
    info!(path = %path.display(), score = saved.state.score, "game loaded");
    Ok(saved)
}

#[derive(Clone, Copy)]
struct Fnv64(u64);

impl Fnv64 {
    fn new() -> Self {
        Self(0xcbf29ce484222325)
    }

    fn update(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }

    fn finish(self) -> u64 {
        self.0
    }
}

/// Hashes the rule-relevant fields of every card, in catalog order.
pub fn catalog_signature(catalog: &Catalog) -> String {
    let mut hasher = Fnv64::new();
    hasher.update(b"farmgrid-catalog-v1");
    for def in catalog.iter() {
        hasher.update(def.key.as_bytes());
        hasher.update(&[0]);
        hasher.update(def.name.as_bytes());
        hasher.update(&[0]);
        hasher.update(&def.base_points.to_le_bytes());
        hasher.update(def.category.id().as_bytes());
        hasher.update(def.ability.map_or("", |ability| ability.id()).as_bytes());
        hasher.update(&[u8::from(def.rarity == farmgrid_core::Rarity::Shiny)]);
    }
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_catalog;
    use farmgrid_core::{CardDef, Category, Game, GameConfig, Pos};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn save_load_roundtrip() {
        let file = unique_temp_file();
        let catalog = builtin_catalog().expect("catalog");
        let mut game = Game::seeded(catalog.clone(), GameConfig::default(), 7);
        let mut events = farmgrid_core::EventBus::default();
        let card = game.state().hand.cards[0].id;
        game.place_card(Pos::new(0, 0), card, &mut events).expect("place");

        save_game(&file, 7, &catalog, game.state()).expect("save");
        let loaded = load_game(&file, &catalog).expect("load");
        assert_eq!(loaded.version, SAVE_SCHEMA_VERSION);
        assert_eq!(loaded.seed, 7);
        assert_eq!(&loaded.state, game.state());
        let _ = fs::remove_file(file);
    }

    #[test]
    fn rejects_other_versions() {
        let file = unique_temp_file();
        let catalog = builtin_catalog().expect("catalog");
        let game = Game::seeded(catalog.clone(), GameConfig::default(), 1);
        let mut saved = SavedGame {
            version: SAVE_SCHEMA_VERSION + 1,
            seed: 1,
            catalog_signature: String::new(),
            state: game.state().clone(),
        };
        fs::write(&file, serde_json::to_string(&saved).expect("encode")).expect("write");
        let err = load_game(&file, &catalog).expect_err("version");
        assert!(err.to_string().contains("unsupported save version"));

        saved.version = SAVE_SCHEMA_VERSION;
        saved.state.score += 1;
        fs::write(&file, serde_json::to_string(&saved).expect("encode")).expect("write");
        assert!(load_game(&file, &catalog).is_err());
        let _ = fs::remove_file(file);
    }

    #[test]
    fn rejects_saves_from_another_catalog() {
        let file = unique_temp_file();
        let catalog = builtin_catalog().expect("catalog");
        let game = Game::seeded(catalog.clone(), GameConfig::default(), 3);
        save_game(&file, 3, &catalog, game.state()).expect("save");

        let mut defs: Vec<CardDef> = catalog.iter().cloned().collect();
        defs.push(CardDef::new("KALE", "Kale", 2, Category::Crop));
        let other = Catalog::new(defs).expect("other");
        let err = load_game(&file, &other).expect_err("signature");
        assert!(err.to_string().contains("different card catalog"));
        let _ = fs::remove_file(file);
    }

    #[test]
    fn signature_ignores_display_text() {
        let catalog = builtin_catalog().expect("catalog");
        let reworded: Vec<CardDef> = catalog
            .iter()
            .cloned()
            .map(|mut def| {
                def.description = "changed".to_string();
                def
            })
            .collect();
        let reworded = Catalog::new(reworded).expect("reworded");
        assert_eq!(catalog_signature(&catalog), catalog_signature(&reworded));
    }

    fn unique_temp_file() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "farmgrid_persistence_test_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }
}
