//! Common components: grid positions and the planting grid itself.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// A tile coordinate on the planting grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size planting grid. Each cell holds at most one plant entity.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    /// Row-major: index = y × width + x.
    cells: Vec<Option<Entity>>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn get(&self, pos: GridPos) -> Option<Entity> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.get(pos).is_some()
    }

    /// Put `entity` in an empty in-bounds cell. Returns `false` otherwise.
    pub fn place(&mut self, pos: GridPos, entity: Entity) -> bool {
        match self.index(pos) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(entity);
                true
            }
            _ => false,
        }
    }

    /// Empty a cell, returning what was there.
    pub fn clear(&mut self, pos: GridPos) -> Option<Entity> {
        self.index(pos).and_then(|i| self.cells[i].take())
    }

    /// Empty every cell.
    pub fn clear_all(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, Entity)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|e| (GridPos::new(i as u32 % width, i as u32 / width), e))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
