use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::model::Block;

pub const TILE_SIZE: u32 = 16;
const SPECKLES: usize = 50;
const SHADE: i16 = 20;

/// One small tile per block type plus a cache of scaled copies.
pub struct TextureSet {
    tiles: HashMap<Block, RgbaImage>,
    scaled: HashMap<(Block, u32), RgbaImage>,
}

impl TextureSet {
    /// Flat color tiles with a few randomly shaded pixels for texture
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut tiles = HashMap::new();
        for block in Block::ALL {
            let [r, g, b] = block.color();
            let mut tile = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba([r, g, b, 255]));
            for _ in 0..SPECKLES {
                let x = rng.gen_range(0..TILE_SIZE);
                let y = rng.gen_range(0..TILE_SIZE);
                let shade = rng.gen_range(-SHADE..=SHADE);
                let tint = |c: u8| (c as i16 + shade).clamp(0, 255) as u8;
                tile.put_pixel(x, y, Rgba([tint(r), tint(g), tint(b), 255]));
            }
            tiles.insert(block, tile);
        }
        Self { tiles, scaled: HashMap::new() }
    }

    pub fn tile(&self, block: Block) -> Option<&RgbaImage> {
        self.tiles.get(&block)
    }

    /// Nearest-neighbor copy of a tile at `size` x `size`, cached
    pub fn scaled(&mut self, block: Block, size: u32) -> Option<&RgbaImage> {
        let size = size.max(1);
        if !self.scaled.contains_key(&(block, size)) {
            let tile = self.tile(block)?;
            let resized = imageops::resize(tile, size, size, FilterType::Nearest);
            self.scaled.insert((block, size), resized);
        }
        self.scaled.get(&(block, size))
    }

    pub fn cached(&self) -> usize {
        self.scaled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn tiles_stay_near_base_color() {
        let textures = TextureSet::generate(&mut StdRng::seed_from_u64(1));
        for block in Block::ALL {
            let tile = textures.tile(block).unwrap();
            assert_eq!(tile.dimensions(), (TILE_SIZE, TILE_SIZE));
            let [r, g, b] = block.color();
            for px in tile.pixels() {
                assert!((px[0] as i16 - r as i16).abs() <= SHADE);
                assert!((px[1] as i16 - g as i16).abs() <= SHADE);
                assert!((px[2] as i16 - b as i16).abs() <= SHADE);
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn scaled_tiles_are_cached() {
        let mut textures = TextureSet::generate(&mut StdRng::seed_from_u64(2));
        assert_eq!(textures.scaled(Block::Stone, 8).unwrap().dimensions(), (8, 8));
        assert_eq!(textures.scaled(Block::Stone, 8).unwrap().dimensions(), (8, 8));
        assert_eq!(textures.scaled(Block::Stone, 32).unwrap().dimensions(), (32, 32));
        assert_eq!(textures.cached(), 2);
    }
}
