use std::collections::{BTreeMap, HashMap};

use super::block::Block;
use crate::error::WorldError;
use crate::utils::{PackedKey, WorldCoord};

/// Sparse block storage. A missing key is air.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
    blocks: HashMap<PackedKey, Block>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: WorldCoord) -> Option<Block> {
        // anything outside the packable range is air
        let key = PackedKey::pack(coord).ok()?;
        self.blocks.get(&key).copied()
    }

    pub fn contains(&self, coord: WorldCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Place a block, returning whatever was there before.
    pub fn set(&mut self, coord: WorldCoord, block: Block) -> Result<Option<Block>, WorldError> {
        let key = PackedKey::pack(coord)?;
        Ok(self.blocks.insert(key, block))
    }

    /// Place a block only into air. Returns true if it was placed.
    pub fn set_if_empty(&mut self, coord: WorldCoord, block: Block) -> Result<bool, WorldError> {
        let key = PackedKey::pack(coord)?;
        match self.blocks.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => Ok(false),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(block);
                Ok(true)
            }
        }
    }

    pub fn remove(&mut self, coord: WorldCoord) -> Option<Block> {
        let key = PackedKey::pack(coord).ok()?;
        self.blocks.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorldCoord, Block)> + '_ {
        self.blocks.iter().map(|(key, block)| (key.unpack(), *block))
    }

    /// Histogram of block types
    pub fn counts(&self) -> BTreeMap<Block, usize> {
        let mut counts = BTreeMap::new();
        for block in self.blocks.values() {
            *counts.entry(*block).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<(WorldCoord, Block)> for World {
    /// Coordinates outside the packable range are dropped.
    fn from_iter<I: IntoIterator<Item = (WorldCoord, Block)>>(iter: I) -> Self {
        let mut world = World::new();
        for (coord, block) in iter {
            let _ = world.set(coord, block);
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::AXIS_MAX;

    #[test]
    fn set_replaces_and_reports_previous() {
        let mut world = World::new();
        let at = WorldCoord(3, -4, 5);
        assert_eq!(world.set(at, Block::Dirt).unwrap(), None);
        assert_eq!(world.set(at, Block::Grass).unwrap(), Some(Block::Dirt));
        assert_eq!(world.get(at), Some(Block::Grass));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn set_if_empty_keeps_existing_block() {
        let mut world = World::new();
        let at = WorldCoord(0, 0, 0);
        assert!(world.set_if_empty(at, Block::Stone).unwrap());
        assert!(!world.set_if_empty(at, Block::Leaf).unwrap());
        assert_eq!(world.get(at), Some(Block::Stone));
    }

    #[test]
    fn out_of_range_reads_as_air_and_rejects_writes() {
        let mut world = World::new();
        let far = WorldCoord(AXIS_MAX + 1, 0, 0);
        assert_eq!(world.get(far), None);
        assert!(world.set(far, Block::Sand).is_err());
        assert!(world.is_empty());
    }

    #[test]
    fn counts_and_iter_cover_all_blocks() {
        let world: World = [
            (WorldCoord(0, 0, 0), Block::Water),
            (WorldCoord(1, 0, 0), Block::Water),
            (WorldCoord(-1, 2, 9), Block::Wood),
        ]
        .into_iter()
        .collect();

        let counts = world.counts();
        assert_eq!(counts.get(&Block::Water), Some(&2));
        assert_eq!(counts.get(&Block::Wood), Some(&1));

        let mut coords: Vec<_> = world.iter().map(|(c, _)| c).collect();
        coords.sort();
        assert_eq!(coords, vec![WorldCoord(-1, 2, 9), WorldCoord(0, 0, 0), WorldCoord(1, 0, 0)]);
    }

    #[test]
    fn remove_and_clear() {
        let mut world = World::new();
        world.set(WorldCoord(1, 1, 1), Block::Cloud).unwrap();
        assert_eq!(world.remove(WorldCoord(1, 1, 1)), Some(Block::Cloud));
        assert_eq!(world.remove(WorldCoord(1, 1, 1)), None);
        world.set(WorldCoord(2, 2, 2), Block::Cloud).unwrap();
        world.clear();
        assert!(world.is_empty());
    }
}
