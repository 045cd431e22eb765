use crate::{CardDef, Catalog, CatalogError, Category, Grid, Pos};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynergyKind {
    CropMill,
    AnimalBarn,
    AnimalFence,
    CropWell,
    SameType,
    Tractor,
    RainCrop,
    SunCrop,
    BeePollination,
}

impl SynergyKind {
    pub const ALL: [SynergyKind; 9] = [
        SynergyKind::CropMill,
        SynergyKind::AnimalBarn,
        SynergyKind::AnimalFence,
        SynergyKind::CropWell,
        SynergyKind::SameType,
        SynergyKind::Tractor,
        SynergyKind::RainCrop,
        SynergyKind::SunCrop,
        SynergyKind::BeePollination,
    ];

    pub fn description(self) -> &'static str {
        match self {
            SynergyKind::CropMill => "Crops near Mill",
            SynergyKind::AnimalBarn => "Animals near Barn",
            SynergyKind::AnimalFence => "Animals near Fence",
            SynergyKind::CropWell => "Crops near Well",
            SynergyKind::SameType => "Same type adjacent",
            SynergyKind::Tractor => "Tractor nearby",
            SynergyKind::RainCrop => "Rain near Crops",
            SynergyKind::SunCrop => "Sun near Crops",
            SynergyKind::BeePollination => "Bee pollination bonus",
        }
    }

    /// Whether this rule fires for `candidate` sitting next to `neighbor`.
    pub fn matches(self, candidate: &CardDef, neighbor: &CardDef) -> bool {
        let building = |name: &str| {
            neighbor.category == Category::Building && neighbor.is_named(name)
        };
        match self {
            SynergyKind::CropMill => candidate.is_crop() && building("Mill"),
            SynergyKind::AnimalBarn => candidate.category == Category::Animal && building("Barn"),
            SynergyKind::AnimalFence => {
                candidate.category == Category::Animal && building("Fence")
            }
            SynergyKind::CropWell => candidate.is_crop() && building("Well"),
            SynergyKind::SameType => {
                candidate.category == neighbor.category && candidate.name != neighbor.name
            }
            SynergyKind::Tractor => neighbor.is_named("Tractor"),
            SynergyKind::RainCrop => candidate.is_crop() && neighbor.is_named("Rain"),
            SynergyKind::SunCrop => candidate.is_crop() && neighbor.is_named("Sun"),
            SynergyKind::BeePollination => candidate.is_crop() && neighbor.is_named("Bee"),
        }
    }

    pub fn bonus(self, candidate: &CardDef) -> i64 {
        match self {
            SynergyKind::CropMill => 3,
            SynergyKind::AnimalBarn => 4,
            SynergyKind::AnimalFence => 2,
            SynergyKind::CropWell => 2,
            SynergyKind::SameType => 1,
            SynergyKind::Tractor => 2,
            SynergyKind::RainCrop => 2,
            SynergyKind::SunCrop => 2,
            SynergyKind::BeePollination => candidate.base_points,
        }
    }

    pub fn is_special(self) -> bool {
        matches!(self, SynergyKind::BeePollination)
    }
}

/// Points at the neighbor that contributed a bonus. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub pos: Pos,
    pub bonus: i64,
    #[serde(default)]
    pub special: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyReport {
    pub bonus: i64,
    pub descriptors: Vec<String>,
    pub highlights: Vec<Highlight>,
}

impl SynergyReport {
    fn push(&mut self, kind: SynergyKind, pos: Pos, bonus: i64) {
        self.bonus += bonus;
        self.descriptors.push(kind.description().to_string());
        self.highlights.push(Highlight {
            pos,
            bonus,
            special: kind.is_special(),
        });
    }
}

/// Adjacency bonus `candidate` would earn at `pos` on `grid`.
pub fn resolve(
    catalog: &Catalog,
    grid: &Grid,
    pos: Pos,
    candidate: &CardDef,
) -> Result<SynergyReport, CatalogError> {
    resolve_from(catalog, grid, pos, candidate, &grid.neighbors(pos))
}

/// As [`resolve`], visiting neighbors in the given order.
pub fn resolve_from(
    catalog: &Catalog,
    grid: &Grid,
    pos: Pos,
    candidate: &CardDef,
    neighbors: &[Pos],
) -> Result<SynergyReport, CatalogError> {
    let mut report = SynergyReport::default();
    for &at in neighbors {
        if at == pos {
            continue;
        }
        let Some(cell) = grid.get(at) else {
            continue;
        };
        let neighbor = catalog.get(&cell.card.key)?;
        for kind in SynergyKind::ALL {
            if kind.matches(candidate, neighbor) {
                let bonus = kind.bonus(candidate);
                trace!(
                    candidate = %candidate.key,
                    neighbor = %neighbor.key,
                    %at,
                    ?kind,
                    bonus,
                    "synergy"
                );
                report.push(kind, at, bonus);
            }
        }
    }
    Ok(report)
}
