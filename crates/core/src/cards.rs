use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Crop,
    Animal,
    Building,
    Special,
}

impl Category {
    pub fn id(self) -> &'static str {
        match self {
            Category::Crop => "crop",
            Category::Animal => "animal",
            Category::Building => "building",
            Category::Special => "special",
        }
    }
}

/// One-shot effect fired when a card is placed. Never fires on relocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    ClearRandomTile,
    DoubleAdjacentCrops,
    DoubleSelf,
    DoubleSelfClearRandom,
    GlobalCropBoost,
    GlobalBoostAll,
    SwapMove,
}

impl Ability {
    pub fn id(self) -> &'static str {
        match self {
            Ability::ClearRandomTile => "clear_random_tile",
            Ability::DoubleAdjacentCrops => "double_adjacent_crops",
            Ability::DoubleSelf => "double_self",
            Ability::DoubleSelfClearRandom => "double_self_clear_random",
            Ability::GlobalCropBoost => "global_crop_boost",
            Ability::GlobalBoostAll => "global_boost_all",
            Ability::SwapMove => "swap_move",
        }
    }

    pub fn clears_tile(self) -> bool {
        matches!(self, Ability::ClearRandomTile | Ability::DoubleSelfClearRandom)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Shiny,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDef {
    pub key: String,
    pub name: String,
    pub base_points: i64,
    pub category: Category,
    #[serde(default)]
    pub ability: Option<Ability>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub strategy: String,
}

impl CardDef {
    pub fn new(key: &str, name: &str, base_points: i64, category: Category) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            base_points,
            category,
            ability: None,
            rarity: Rarity::Common,
            emoji: String::new(),
            color: String::new(),
            description: String::new(),
            strategy: String::new(),
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn shiny(mut self) -> Self {
        self.rarity = Rarity::Shiny;
        self
    }

    pub fn is_crop(&self) -> bool {
        self.category == Category::Crop
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn is_relocation(&self) -> bool {
        self.ability == Some(Ability::SwapMove)
    }
}

pub type CardId = u32;

/// One physical copy of a card definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CardInstance {
    pub id: CardId,
    pub key: String,
}

impl CardInstance {
    pub fn new(id: CardId, key: &str) -> Self {
        Self {
            id,
            key: key.to_string(),
        }
    }
}
