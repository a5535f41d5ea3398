use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::WorldError;

/// coordinates of a block in world space
#[derive(Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Clone, Copy)]
pub struct WorldCoord(pub i32, pub i32, pub i32);

impl WorldCoord {
    /// Block holding a world-space point. Each axis is clamped to the
    /// packable range, NaN lands on 0.
    pub fn containing(point: glam::Vec3) -> WorldCoord {
        let axis = |v: f32| v.floor().clamp(AXIS_MIN as f32, AXIS_MAX as f32) as i32;
        WorldCoord(axis(point.x), axis(point.y), axis(point.z))
    }

    /// Horizontal chunk index (x, z) containing this block. `chunk_size`
    /// must be positive.
    pub fn to_chunk_column(&self, chunk_size: i32) -> ChunkColumn {
        ChunkColumn(self.0.div_euclid(chunk_size), self.2.div_euclid(chunk_size))
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> WorldCoord {
        WorldCoord(self.0 + dx, self.1 + dy, self.2 + dz)
    }

    pub fn as_vec3(&self) -> glam::Vec3 {
        glam::Vec3::new(self.0 as f32, self.1 as f32, self.2 as f32)
    }
}

/// Same text form as a printed tuple: `(x, y, z)`
impl fmt::Display for WorldCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

static COORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\(\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*\)\s*$")
        .expect("coordinate pattern is valid")
});

impl FromStr for WorldCoord {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || WorldError::BadCoordinate(s.to_string());
        let caps = COORD_RE.captures(s).ok_or_else(bad)?;
        let axis = |i: usize| caps[i].parse::<i32>().map_err(|_| bad());
        Ok(WorldCoord(axis(1)?, axis(2)?, axis(3)?))
    }
}

/// horizontal chunk tile, only used to pick iteration bounds
#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub struct ChunkColumn(pub i32, pub i32);

impl ChunkColumn {
    /// Neighbor `dx`, `dz` columns away, `None` past the i32 range
    pub fn offset(&self, dx: i32, dz: i32) -> Option<ChunkColumn> {
        Some(ChunkColumn(self.0.checked_add(dx)?, self.1.checked_add(dz)?))
    }

    /// Block x and z ranges covered by this column, clipped to the packable
    /// range. `None` when the column lies wholly outside it.
    pub fn block_span(&self, chunk_size: i32) -> Option<(RangeInclusive<i32>, RangeInclusive<i32>)> {
        let size = chunk_size as i64;
        let axis = |index: i32| {
            let start = (index as i64 * size).max(AXIS_MIN as i64);
            let end = ((index as i64 + 1) * size - 1).min(AXIS_MAX as i64);
            (start <= end).then(|| start as i32..=end as i32)
        };
        Some((axis(self.0)?, axis(self.1)?))
    }
}

const AXIS_BITS: u32 = 21;
const AXIS_MASK: u64 = (1 << AXIS_BITS) - 1;
pub const AXIS_MIN: i32 = -(1 << (AXIS_BITS - 1));
pub const AXIS_MAX: i32 = (1 << (AXIS_BITS - 1)) - 1;

/// A world coordinate packed into one integer, 21 bits per axis.
#[derive(Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Clone, Copy)]
pub struct PackedKey(u64);

impl PackedKey {
    pub fn pack(coord: WorldCoord) -> Result<Self, WorldError> {
        let in_range = |v: i32| (AXIS_MIN..=AXIS_MAX).contains(&v);
        if !(in_range(coord.0) && in_range(coord.1) && in_range(coord.2)) {
            return Err(WorldError::OutOfRange(coord));
        }
        let bits = |v: i32| (v as u32 as u64) & AXIS_MASK;
        Ok(PackedKey(
            (bits(coord.0) << (2 * AXIS_BITS)) | (bits(coord.1) << AXIS_BITS) | bits(coord.2),
        ))
    }

    pub fn unpack(self) -> WorldCoord {
        // shift into the top of an i64 and back to sign-extend each axis
        let axis = |shift: u32| {
            let raw = (self.0 >> shift) & AXIS_MASK;
            (((raw << (64 - AXIS_BITS)) as i64) >> (64 - AXIS_BITS)) as i32
        };
        WorldCoord(axis(2 * AXIS_BITS), axis(AXIS_BITS), axis(0))
    }
}
