//! Plant catalog, the immutable table of per-kind parameters.
//!
//! Every plant instance refers to its kind by value and looks the shared
//! record up here; records are never copied into plants or mutated after
//! construction. The engine holds the catalog behind an `Arc` and hands out
//! `&PlantTypeInfo` borrows.
//!
//! ```
//! use templanter_logic::catalog::{Catalog, PlantKind};
//!
//! let catalog = Catalog::builtin();
//! let tomato = catalog.info(PlantKind::Tomato);
//! assert_eq!(tomato.seed_cost, 8);
//! assert_eq!(catalog.kind_by_name("Rare Cactus"), Some(PlantKind::Cactus));
//! ```

use serde::{Deserialize, Serialize};

/// Every plant kind the greenhouse can grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    Basil,
    Lettuce,
    Tomato,
    Carrot,
    Rose,
    Sunflower,
    Tulip,
    Orchid,
    Bonsai,
    Cactus,
}

impl PlantKind {
    /// All kinds in catalog order.
    pub const ALL: [PlantKind; 10] = [
        PlantKind::Basil,
        PlantKind::Lettuce,
        PlantKind::Tomato,
        PlantKind::Carrot,
        PlantKind::Rose,
        PlantKind::Sunflower,
        PlantKind::Tulip,
        PlantKind::Orchid,
        PlantKind::Bonsai,
        PlantKind::Cactus,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Difficulty/value class. Only used for selection weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantTier {
    Beginner,
    Intermediate,
    Advanced,
}

/// Shared, immutable parameters for one plant kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantTypeInfo {
    pub kind: PlantKind,
    pub name: String,
    pub tier: PlantTier,
    /// Hours from seed to ripe at the normal rate.
    pub growth_time_hours: u32,
    /// Hours for a full tank to drain.
    pub water_interval_hours: u32,
    pub seed_cost: i64,
    pub sell_price: i64,
    pub grace_period_minutes: u32,
    pub decay_rate: f32,
    /// Relative customer demand (percent weight).
    pub demand_weight: f32,
}

impl PlantTypeInfo {
    /// Growth progress points per in-world minute at modifier 1.0.
    pub fn growth_per_minute(&self) -> f32 {
        100.0 / (self.growth_time_hours as f32 * 60.0)
    }

    /// Water points lost per in-world minute.
    pub fn depletion_per_minute(&self) -> f32 {
        100.0 / self.water_interval_hours as f32 / 60.0
    }

    /// Water interval expressed in in-world minutes.
    pub fn water_interval_minutes(&self) -> u64 {
        u64::from(self.water_interval_hours) * 60
    }
}

/// Errors raised while building a catalog from external data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no entry for {0:?}")]
    MissingKind(PlantKind),

    #[error("catalog has more than one entry for {0:?}")]
    DuplicateKind(PlantKind),

    #[error("{kind:?}: {field} must be positive")]
    NonPositive { kind: PlantKind, field: &'static str },

    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Lookup table with exactly one record per [`PlantKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Indexed by `PlantKind as usize`.
    entries: Vec<PlantTypeInfo>,
}

impl Catalog {
    /// The greenhouse's standard ten plants.
    pub fn builtin() -> Self {
        use PlantKind::*;
        use PlantTier::*;

        let row = |kind, name: &str, tier, grow, water, seed, sell, grace, decay, demand| {
            PlantTypeInfo {
                kind,
                name: name.to_string(),
                tier,
                growth_time_hours: grow,
                water_interval_hours: water,
                seed_cost: seed,
                sell_price: sell,
                grace_period_minutes: grace,
                decay_rate: decay,
                demand_weight: demand,
            }
        };

        Self {
            entries: vec![
                row(Basil, "Basil", Beginner, 48, 6, 5, 20, 120, 0.1, 20.0),
                row(Lettuce, "Lettuce", Beginner, 60, 5, 7, 25, 120, 0.12, 18.0),
                row(Tomato, "Tomato", Beginner, 72, 8, 8, 30, 120, 0.15, 17.0),
                row(Carrot, "Carrot", Intermediate, 96, 7, 12, 45, 60, 0.2, 15.0),
                row(Rose, "Rose", Intermediate, 120, 10, 18, 70, 60, 0.25, 12.0),
                row(Sunflower, "Sunflower", Intermediate, 132, 9, 20, 75, 60, 0.22, 8.0),
                row(Tulip, "Tulip", Advanced, 144, 6, 30, 110, 30, 0.4, 5.0),
                row(Orchid, "Orchid", Advanced, 168, 5, 40, 150, 15, 0.5, 3.0),
                row(Bonsai, "Bonsai", Advanced, 192, 8, 55, 200, 30, 0.45, 1.5),
                row(Cactus, "Rare Cactus", Advanced, 240, 20, 75, 300, 10, 0.6, 0.5),
            ],
        }
    }

    /// Build a catalog from arbitrary records, checking that every kind
    /// appears exactly once and that time parameters are usable.
    pub fn from_entries(entries: Vec<PlantTypeInfo>) -> Result<Self, CatalogError> {
        let mut slots: Vec<Option<PlantTypeInfo>> = vec![None; PlantKind::ALL.len()];

        for info in entries {
            if info.growth_time_hours == 0 {
                return Err(CatalogError::NonPositive {
                    kind: info.kind,
                    field: "growth_time_hours",
                });
            }
            if info.water_interval_hours == 0 {
                return Err(CatalogError::NonPositive {
                    kind: info.kind,
                    field: "water_interval_hours",
                });
            }
            let slot = &mut slots[info.kind.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateKind(info.kind));
            }
            *slot = Some(info);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (kind, slot) in PlantKind::ALL.iter().zip(slots) {
            ordered.push(slot.ok_or(CatalogError::MissingKind(*kind))?);
        }

        Ok(Self { entries: ordered })
    }

    /// Parse a JSON array of [`PlantTypeInfo`] records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<PlantTypeInfo> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Look up a kind. Total: construction guarantees one entry per kind.
    pub fn info(&self, kind: PlantKind) -> &PlantTypeInfo {
        &self.entries[kind.index()]
    }

    /// Reverse lookup by display name.
    pub fn kind_by_name(&self, name: &str) -> Option<PlantKind> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantTypeInfo> {
        self.entries.iter()
    }

    pub fn by_tier(&self, tier: PlantTier) -> Vec<PlantKind> {
        self.entries
            .iter()
            .filter(|e| e.tier == tier)
            .map(|e| e.kind)
            .collect()
    }

    /// Demand-weighted selection. `roll` is a uniform sample in `[0, 1)`;
    /// values outside the range are clamped.
    pub fn pick_by_demand(&self, roll: f32) -> PlantKind {
        let total: f32 = self.entries.iter().map(|e| e.demand_weight.max(0.0)).sum();
        let mut remaining = roll.clamp(0.0, 1.0) * total;

        for entry in &self.entries {
            let weight = entry.demand_weight.max(0.0);
            if remaining < weight {
                return entry.kind;
            }
            remaining -= weight;
        }

        // Rounding at roll ≈ 1.0 falls through to the last weighted kind.
        self.entries
            .iter()
            .rev()
            .find(|e| e.demand_weight > 0.0)
            .map_or(PlantKind::Basil, |e| e.kind)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
