//! Growth system - ticks every plant on the grid and publishes its notices

use hecs::World;
use templanter_logic::catalog::Catalog;

use super::notices::{NoticeChannel, PlantNotice};
use crate::components::{Grid, Plant};

/// Update every planted tile in row-major order. `now` is the clock
/// reading after this tick. Returns the number of notices published.
pub fn growth_system(
    world: &mut World,
    grid: &Grid,
    catalog: &Catalog,
    minutes: f32,
    now: u64,
    channel: &mut NoticeChannel,
) -> usize {
    let mut published = 0;

    for (pos, entity) in grid.occupied() {
        let Ok(mut plant) = world.get::<&mut Plant>(entity) else {
            continue;
        };
        let info = catalog.info(plant.kind);

        for notice in plant.update(info, minutes, now) {
            channel.publish(PlantNotice {
                plant: entity,
                plant_id: plant.id,
                kind: plant.kind,
                pos,
                notice,
            });
            published += 1;
        }
    }

    published
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GridPos;
    use templanter_logic::catalog::PlantKind;
    use templanter_logic::lifecycle::GrowthStage;
    use templanter_logic::plant::Notice;

    #[test]
    fn test_growth_publishes_in_grid_order() {
        let catalog = Catalog::builtin();
        let mut world = World::new();
        let mut grid = Grid::new(2, 2);

        // Spawned first but sits later in row-major order.
        let ready = |id, x, y| {
            Plant::restore(id, PlantKind::Basil, x, y, GrowthStage::Growing, 99.999, 100.0, 0)
        };
        let second = world.spawn((ready(1, 1, 1),));
        let first = world.spawn((ready(2, 0, 0),));
        grid.place(GridPos::new(1, 1), second);
        grid.place(GridPos::new(0, 0), first);

        let mut channel = NoticeChannel::new();
        let count = growth_system(&mut world, &grid, &catalog, 1.0, 1, &mut channel);
        assert_eq!(count, 2);

        let notices = channel.drain();
        assert_eq!(notices[0].plant, first);
        assert_eq!(notices[1].plant, second);
        assert!(notices.iter().all(|n| n.notice == Notice::Ripe));
    }

    #[test]
    fn test_growth_skips_stale_cells() {
        let catalog = Catalog::builtin();
        let mut world = World::new();
        let mut grid = Grid::new(1, 1);
        let ghost = world.spawn(());
        grid.place(GridPos::new(0, 0), ghost);

        let mut channel = NoticeChannel::new();
        assert_eq!(growth_system(&mut world, &grid, &catalog, 1.0, 1, &mut channel), 0);
    }
}
