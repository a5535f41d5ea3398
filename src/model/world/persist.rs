//! Whole-world JSON snapshots.
//!
//! The file is a single object mapping the tuple text of a coordinate,
//! `"(x, y, z)"`, to a block label:
//!
//! ```json
//! {"(0, 0, 0)": "dirt", "(0, 1, 0)": "grass"}
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::ser::{Serialize, Serializer};

use super::block::Block;
use super::map::World;
use crate::error::PersistError;
use crate::utils::WorldCoord;

/// Entries ordered by coordinate so saves are stable across runs
struct Snapshot(Vec<(WorldCoord, Block)>);

impl Snapshot {
    fn of(world: &World) -> Self {
        let mut entries: Vec<_> = world.iter().collect();
        entries.sort_unstable_by_key(|(coord, _)| *coord);
        Snapshot(entries)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(coord, block)| (coord.to_string(), block)))
    }
}

pub fn to_json(world: &World) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&Snapshot::of(world))?)
}

pub fn from_json(text: &str) -> Result<World, PersistError> {
    let raw: HashMap<String, Block> = serde_json::from_str(text)?;
    let mut world = World::new();
    for (key, block) in raw {
        let coord: WorldCoord = key.parse()?;
        // differently spaced keys can name the same cell
        if world.set(coord, block)?.is_some() {
            return Err(PersistError::Duplicate(coord));
        }
    }
    Ok(world)
}

/// Write the world to `path`. Returns the number of saved blocks.
pub fn save(world: &World, path: &Path) -> Result<usize, PersistError> {
    let io_err = |source: io::Error| PersistError::Io { path: path.to_path_buf(), source };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let snapshot = Snapshot::of(world);
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &snapshot)?;
    writer.flush().map_err(io_err)?;
    Ok(snapshot.0.len())
}

/// Read a world from `path`. Nothing is returned unless the whole file parses.
pub fn load(path: &Path) -> Result<World, PersistError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            PersistError::NotFound { path: path.to_path_buf() }
        } else {
            PersistError::Io { path: path.to_path_buf(), source }
        }
    })?;
    from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_world_round_trips() {
        let json = to_json(&World::new()).unwrap();
        assert_eq!(json, "{}");
        assert!(from_json(&json).unwrap().is_empty());
    }

    #[test]
    fn keys_use_tuple_text_in_coordinate_order() {
        let world: World = [
            (WorldCoord(1, 0, 0), Block::Grass),
            (WorldCoord(-2, 5, 3), Block::Leaf),
        ]
        .into_iter()
        .collect();
        assert_eq!(to_json(&world).unwrap(), r#"{"(-2, 5, 3)":"leaf","(1, 0, 0)":"grass"}"#);
    }

    #[test]
    fn rejects_bad_keys_and_labels() {
        assert!(matches!(from_json(r#"{"1,2,3": "dirt"}"#), Err(PersistError::Entry(_))));
        assert!(matches!(from_json(r#"{"(1, 2, 3)": "lava"}"#), Err(PersistError::Json(_))));
        assert!(matches!(from_json("[1, 2"), Err(PersistError::Json(_))));
    }

    #[test]
    fn rejects_two_spellings_of_one_coordinate() {
        let text = r#"{"(1,2,3)": "dirt", "(1, 2, 3)": "stone"}"#;
        assert!(matches!(from_json(text), Err(PersistError::Duplicate(WorldCoord(1, 2, 3)))));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("deskbench-persist-missing").join("nope.json");
        assert!(matches!(load(&path), Err(PersistError::NotFound { .. })));
    }
}
