//! Notice channel - carries plant notices from the growth pass to the dispatcher

use hecs::Entity;
use templanter_logic::catalog::PlantKind;
use templanter_logic::plant::Notice;

use crate::components::GridPos;

/// A notice tagged with the plant that raised it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantNotice {
    pub plant: Entity,
    pub plant_id: u32,
    pub kind: PlantKind,
    pub pos: GridPos,
    pub notice: Notice,
}

/// Pending notices for the current tick, in publication order.
#[derive(Debug, Default)]
pub struct NoticeChannel {
    pending: Vec<PlantNotice>,
}

impl NoticeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, notice: PlantNotice) {
        log::debug!(
            "notice {} from plant {} ({:?}) at ({}, {})",
            notice.notice.name(),
            notice.plant_id,
            notice.kind,
            notice.pos.x,
            notice.pos.y
        );
        self.pending.push(notice);
    }

    /// Take everything published so far, oldest first.
    pub fn drain(&mut self) -> Vec<PlantNotice> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let mut channel = NoticeChannel::new();
        for (plant, notice) in [(a, Notice::NeedsWater), (b, Notice::Ripe), (a, Notice::Decaying)] {
            channel.publish(PlantNotice {
                plant,
                plant_id: 0,
                kind: PlantKind::Basil,
                pos: GridPos::default(),
                notice,
            });
        }
        assert_eq!(channel.len(), 3);

        let drained: Vec<Notice> = channel.drain().into_iter().map(|n| n.notice).collect();
        assert_eq!(drained, vec![Notice::NeedsWater, Notice::Ripe, Notice::Decaying]);
        assert!(channel.is_empty());
    }
}
