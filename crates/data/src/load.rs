use anyhow::{bail, Context};
use farmgrid_core::{CardDef, Catalog, GameConfig};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const CARDS_FILE: &str = "cards.json";
pub const RULES_FILE: &str = "rules.json";

const BUILTIN_CARDS: &str = include_str!("../../../assets/cards.json");

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let defs: Vec<CardDef> = load_json(path)?;
    let catalog = Catalog::new(defs).with_context(|| format!("validate {}", path.display()))?;
    info!(cards = catalog.len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

pub fn catalog_from_str(raw: &str) -> anyhow::Result<Catalog> {
    let defs: Vec<CardDef> = serde_json::from_str(raw).context("parse card list")?;
    Ok(Catalog::new(defs)?)
}

/// The catalog shipped with the game, compiled into the binary.
pub fn builtin_catalog() -> anyhow::Result<Catalog> {
    catalog_from_str(BUILTIN_CARDS).context("builtin catalog")
}

/// Reads rule overrides. A missing file means the reference rules.
pub fn load_game_config(path: &Path) -> anyhow::Result<GameConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no rules file, using defaults");
        return Ok(GameConfig::default());
    }
    let config: GameConfig = load_json(path)?;
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Catalog and rules from an assets directory. Falls back to the builtin
/// catalog when the directory has no card list.
pub fn load_assets(dir: &Path) -> anyhow::Result<(Catalog, GameConfig)> {
    let cards = dir.join(CARDS_FILE);
    let catalog = if cards.exists() {
        load_catalog(&cards)?
    } else {
        debug!(dir = %dir.display(), "no card list, using builtin catalog");
        builtin_catalog()?
    };
    let config = load_game_config(&dir.join(RULES_FILE))?;
    Ok((catalog, config))
}

fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    if config.grid_size == 0 {
        bail!("grid_size must be positive");
    }
    if config.hand_capacity == 0 {
        bail!("hand_capacity must be positive");
    }
    if config.copies.shiny == 0 {
        bail!("shiny cards need at least one copy");
    }
    let mut last = i64::MIN;
    for tier in &config.copies.tiers {
        if tier.max_base <= last {
            bail!("copy tiers must be sorted by max_base");
        }
        last = tier.max_base;
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
