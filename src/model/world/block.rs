use serde::{Deserialize, Serialize};

/// Block types the world can hold. Air is the absence of a block.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    Grass = 0,
    Dirt = 1,
    Stone = 2,
    Sand = 3,
    Wood = 4,
    Leaf = 5,
    Water = 6,
    Cloud = 7,
}

impl Block {
    pub const ALL: [Block; 8] = [
        Block::Grass,
        Block::Dirt,
        Block::Stone,
        Block::Sand,
        Block::Wood,
        Block::Leaf,
        Block::Water,
        Block::Cloud,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(v as usize).copied()
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Label used in saved worlds
    pub fn label(self) -> &'static str {
        match self {
            Block::Grass => "grass",
            Block::Dirt => "dirt",
            Block::Stone => "stone",
            Block::Sand => "sand",
            Block::Wood => "wood",
            Block::Leaf => "leaf",
            Block::Water => "water",
            Block::Cloud => "cloud",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label() == label)
    }

    pub fn is_solid(self) -> bool {
        !matches!(self, Block::Water | Block::Cloud)
    }

    /// Base texture color (RGB)
    pub fn color(self) -> [u8; 3] {
        match self {
            Block::Grass => [34, 139, 34],
            Block::Dirt => [101, 67, 33],
            Block::Stone => [128, 128, 128],
            Block::Sand => [194, 178, 128],
            Block::Wood => [101, 67, 33],
            Block::Leaf => [34, 139, 34],
            Block::Water => [30, 144, 255],
            Block::Cloud => [255, 255, 255],
        }
    }
}
