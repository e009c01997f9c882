//! Growth stages and the legal transition table.
//!
//! The graph is forward-only: `Seed → Growing → Ripe → Decaying → Dead`,
//! plus the neglect shortcut `Growing → Decaying` when growth underflows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthStage {
    Seed,
    Growing,
    Ripe,
    Decaying,
    Dead,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 5] = [
        GrowthStage::Seed,
        GrowthStage::Growing,
        GrowthStage::Ripe,
        GrowthStage::Decaying,
        GrowthStage::Dead,
    ];

    /// Display and save-file name.
    pub fn name(self) -> &'static str {
        match self {
            GrowthStage::Seed => "Seed",
            GrowthStage::Growing => "Growing",
            GrowthStage::Ripe => "Ripe",
            GrowthStage::Decaying => "Decaying",
            GrowthStage::Dead => "Dead",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn can_harvest(self) -> bool {
        matches!(self, GrowthStage::Ripe | GrowthStage::Decaying)
    }

    pub fn is_terminal(self) -> bool {
        self == GrowthStage::Dead
    }

    pub fn accepts_water(self) -> bool {
        !self.is_terminal()
    }

    /// Whether `self → next` is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: GrowthStage) -> bool {
        use GrowthStage::*;
        matches!(
            (self, next),
            (Seed, Growing)
                | (Growing, Ripe)
                | (Growing, Decaying)
                | (Ripe, Decaying)
                | (Decaying, Dead)
        )
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_is_forward_only() {
        for from in GrowthStage::ALL {
            for to in GrowthStage::ALL {
                if from.can_transition_to(to) {
                    let from_rank = GrowthStage::ALL.iter().position(|s| *s == from);
                    let to_rank = GrowthStage::ALL.iter().position(|s| *s == to);
                    assert!(to_rank > from_rank, "{from} -> {to} goes backwards");
                }
            }
        }
        assert!(GrowthStage::Growing.can_transition_to(GrowthStage::Decaying));
        assert!(!GrowthStage::Seed.can_transition_to(GrowthStage::Ripe));
        assert!(!GrowthStage::Dead.can_transition_to(GrowthStage::Seed));
    }

    #[test]
    fn harvest_and_water_rules() {
        assert!(GrowthStage::Ripe.can_harvest());
        assert!(GrowthStage::Decaying.can_harvest());
        assert!(!GrowthStage::Growing.can_harvest());
        assert!(!GrowthStage::Dead.can_harvest());
        assert!(!GrowthStage::Dead.accepts_water());
        assert!(GrowthStage::Decaying.accepts_water());
    }

    #[test]
    fn names_roundtrip() {
        for stage in GrowthStage::ALL {
            assert_eq!(GrowthStage::from_name(stage.name()), Some(stage));
        }
        assert_eq!(GrowthStage::from_name("Wilted"), None);
    }
}
