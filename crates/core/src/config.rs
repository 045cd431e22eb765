use crate::{CardDef, Rarity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyTier {
    pub max_base: i64,
    pub copies: usize,
}

/// How many copies of each catalog entry go into a fresh deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyRules {
    pub shiny: usize,
    /// Checked in order; the first tier whose `max_base` covers the card wins.
    pub tiers: Vec<CopyTier>,
    pub fallback: usize,
}

impl Default for CopyRules {
    fn default() -> Self {
        Self {
            shiny: 1,
            tiers: vec![
                CopyTier {
                    max_base: 2,
                    copies: 5,
                },
                CopyTier {
                    max_base: 4,
                    copies: 4,
                },
                CopyTier {
                    max_base: 5,
                    copies: 3,
                },
            ],
            fallback: 2,
        }
    }
}

impl CopyRules {
    pub fn copies_for(&self, card: &CardDef) -> usize {
        if card.rarity == Rarity::Shiny {
            return self.shiny;
        }
        self.tiers
            .iter()
            .find(|tier| card.base_points <= tier.max_base)
            .map(|tier| tier.copies)
            .unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_hand_capacity")]
    pub hand_capacity: usize,
    #[serde(default)]
    pub copies: CopyRules,
    /// Points added per cell by the board-wide boost abilities.
    #[serde(default = "default_global_boost")]
    pub global_boost: i64,
    /// Advisory lifetime of synergy highlights for presentation layers.
    #[serde(default = "default_highlight_ttl_ms")]
    pub highlight_ttl_ms: u64,
}

fn default_grid_size() -> usize {
    5
}

fn default_hand_capacity() -> usize {
    5
}

fn default_global_boost() -> i64 {
    2
}

fn default_highlight_ttl_ms() -> u64 {
    2000
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            hand_capacity: default_hand_capacity(),
            copies: CopyRules::default(),
            global_boost: default_global_boost(),
            highlight_ttl_ms: default_highlight_ttl_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn copy_table_matches_reference_tiers() {
        let rules = CopyRules::default();
        let card = |base| CardDef::new("X", "X", base, Category::Crop);
        assert_eq!(rules.copies_for(&card(1)), 5);
        assert_eq!(rules.copies_for(&card(2)), 5);
        assert_eq!(rules.copies_for(&card(3)), 4);
        assert_eq!(rules.copies_for(&card(4)), 4);
        assert_eq!(rules.copies_for(&card(5)), 3);
        assert_eq!(rules.copies_for(&card(6)), 2);
        assert_eq!(rules.copies_for(&card(8)), 2);
        assert_eq!(rules.copies_for(&card(1).shiny()), 1);
        assert_eq!(rules.copies_for(&card(8).shiny()), 1);
    }
}
