//! Procedural map generation
//!
//! Free-function primitives that carve a [`Map`], the [`MapGenerator`] hook
//! that sequences them, and the level templates built on top.

pub mod carve;
pub mod caves;
pub mod cellular;
pub mod chambers;
pub mod dungeon;
pub mod erosion;
pub mod lakes;
pub mod maze;
pub mod points;
pub mod regions;
pub mod rooms;

pub use carve::{carve_circle, carve_corridor, carve_passage, carve_path, carve_winding_road, extend_line, Passage};
pub use caves::{CaveGenerator, CaveParams};
pub use cellular::{count_adjacent, fill, fill_noise, smooth, smooth_with_ring};
pub use chambers::{ChamberGenerator, ChamberParams};
pub use dungeon::{DungeonGenerator, DungeonParams};
pub use erosion::{erode, erode_tiles, remove_unused_walls};
pub use lakes::{LakeGenerator, LakeParams};
pub use maze::{grow_maze, remove_dead_ends};
pub use points::{connect_points, relaxation};
pub use regions::{connect_regions, construct_bridges, find_regions, remove_regions, Regions};
pub use rooms::{can_place_room, fill_random_rooms, place_room, Room};

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dijkstra::DijkstraMap;
use super::{Map, Position, Tile};
use crate::config::LevelConfig;
use crate::rng::Rng;

/// A level template: carve the layout, then decorate it.
///
/// `on_decorate` runs after passable/transparent flags have been derived from
/// the layout, so it can run cost fields over it. It should only place tiles
/// that keep those flags (stairs on floor, for instance) or re-derive them.
pub trait MapGenerator {
    fn on_generate(&mut self, map: &mut Map, rng: &mut Rng);
    fn on_decorate(&mut self, map: &mut Map, rng: &mut Rng);
}

/// Run a template over `map`: generate, derive flags, decorate.
pub fn generate<G: MapGenerator + ?Sized>(map: &mut Map, rng: &mut Rng, generator: &mut G) {
    let (width, height) = map.size();
    assert!(width >= 3 && height >= 3, "map {width}x{height} has no interior");

    log::debug!("generating {}x{} map (seed {})", width, height, rng.seed());
    generator.on_generate(map, rng);

    map.derive_flags();

    log::debug!("decorating");
    generator.on_decorate(map, rng);
}

/// Which template builds a level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStyle {
    /// Smoothed noise joined by winding tunnels
    #[default]
    Caves,
    /// Rooms and pruned mazes
    Dungeon,
    /// Islands joined by bridges
    Lakes,
    /// Round chambers on relaxed points
    Chambers,
}

impl LevelStyle {
    pub const ALL: [LevelStyle; 4] = [
        LevelStyle::Caves,
        LevelStyle::Dungeon,
        LevelStyle::Lakes,
        LevelStyle::Chambers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LevelStyle::Caves => "caves",
            LevelStyle::Dungeon => "dungeon",
            LevelStyle::Lakes => "lakes",
            LevelStyle::Chambers => "chambers",
        }
    }
}

impl fmt::Display for LevelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generate a level of the configured style and size
pub fn build_level(config: &LevelConfig, rng: &mut Rng) -> Map {
    let mut map = Map::new(config.width, config.height);

    match config.style {
        LevelStyle::Caves => generate(&mut map, rng, &mut CaveGenerator::new(config.caves.clone())),
        LevelStyle::Dungeon => generate(&mut map, rng, &mut DungeonGenerator::new(config.dungeon.clone())),
        LevelStyle::Lakes => generate(&mut map, rng, &mut LakeGenerator::new(config.lakes.clone())),
        LevelStyle::Chambers => generate(&mut map, rng, &mut ChamberGenerator::new(config.chambers.clone())),
    }

    log::info!(
        "built {} level {}x{}: {} floor, {} corridor",
        config.style,
        map.width(),
        map.height(),
        map.count_tiles(Tile::Floor),
        map.count_tiles(Tile::Corridor)
    );
    map
}

/// Reset the interior to `rock` and cut a run of `open` through its middle
/// when fewer than two cells are passable. The run follows the longer axis.
/// Returns whether the run was cut.
pub fn ensure_open_run(map: &mut Map, open: Tile, rock: Tile) -> bool {
    let passable = map.tiles().iter().filter(|tile| tile.is_passable()).count();
    if passable >= 2 {
        return false;
    }

    log::debug!("{} open cells left, cutting a run through the middle", passable);
    let (width, height) = map.size();
    fill(map, Tile::Wall);

    let mut tiles = map.tiles_mut();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            tiles.set(x, y, rock);
        }
    }
    if width >= height {
        for x in 1..width - 1 {
            tiles.set(x, height / 2, open);
        }
    } else {
        for y in 1..height - 1 {
            tiles.set(width / 2, y, open);
        }
    }
    true
}

/// Put up stairs and down stairs at the two ends of the longest walk.
///
/// Walks from the first passable cell to the farthest reachable one, then from
/// there to the farthest again; the two ends of the second walk get the stairs.
/// Needs derived flags. Returns the stair positions, or `None` and places
/// nothing when no two distinct cells are reachable from each other.
pub fn place_stairs(map: &mut Map) -> Option<(Position, Position)> {
    let Some(start) = map.positions_where(|tile| tile.is_passable()).first().copied() else {
        log::warn!("no passable cell for stairs");
        return None;
    };

    let mut dijkstra = DijkstraMap::new(map);
    let farthest_from = |dijkstra: &mut DijkstraMap, from: Position| {
        dijkstra.clear();
        dijkstra.add_cost(from, 0);
        dijkstra.compute(map);
        dijkstra.farthest().unwrap_or((from, 0))
    };

    let (up, _) = farthest_from(&mut dijkstra, start);
    let (down, length) = farthest_from(&mut dijkstra, up);
    if up == down {
        log::warn!("single open cell at {:?}, no room for two stairs", up);
        return None;
    }

    map.set_tile(up, Tile::UpStairs);
    map.set_tile(down, Tile::DownStairs);
    log::debug!("stairs {:?} -> {:?}, {} steps apart", up, down, length);

    Some((up, down))
}
