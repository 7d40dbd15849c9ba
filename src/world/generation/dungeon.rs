//! Room and corridor dungeon generator
//!
//! Rooms scattered through rock, mazes grown in the rock between them, every
//! region joined up, then the maze pruned back to the corridors that matter.

use serde::{Deserialize, Serialize};

use super::carve::Passage;
use super::cellular::fill;
use super::maze::{grow_maze, remove_dead_ends};
use super::regions::connect_regions;
use super::rooms::{fill_random_rooms, Room};
use super::{ensure_open_run, place_stairs, MapGenerator};
use crate::rng::Rng;
use crate::world::position::Direction;
use crate::world::{Map, Position, Tile};

/// Tuning for [`DungeonGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    /// Percent chance a maze turns when it could go straight
    pub winding: i32,
    pub passage: Passage,
    /// Percent of doorways that get a door
    pub door_chance: i32,
    /// Percent of doors that start closed
    pub closed_door_chance: i32,
    /// Skip dead-end pruning and keep the full mazes
    pub keep_dead_ends: bool,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            winding: 30,
            passage: Passage::Zigzag,
            door_chance: 80,
            closed_door_chance: 50,
            keep_dead_ends: false,
        }
    }
}

/// Classic rooms-and-mazes dungeon
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    params: DungeonParams,
    rooms: Vec<Room>,
}

impl DungeonGenerator {
    pub fn new(params: DungeonParams) -> Self {
        Self {
            params,
            rooms: Vec::new(),
        }
    }

    /// Rooms placed by the last run
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }
}

impl MapGenerator for DungeonGenerator {
    fn on_generate(&mut self, map: &mut Map, rng: &mut Rng) {
        let p = &self.params;

        fill(map, Tile::Wall);
        self.rooms = fill_random_rooms(map, rng);

        let mut maze = Vec::new();
        for y in (1..map.height() - 1).step_by(2) {
            for x in (1..map.width() - 1).step_by(2) {
                grow_maze(map, rng, &mut maze, x, y, p.winding);
            }
        }
        log::debug!("{} rooms, {} maze cells", self.rooms.len(), maze.len());

        if map.count_tiles(Tile::Wall) == map.len() {
            log::debug!("nothing carved, opening the centre");
            map.set_tile_xy(map.width() / 2, map.height() / 2, Tile::Floor);
        }

        connect_regions(map, rng, 0, p.passage, false);

        if !p.keep_dead_ends {
            remove_dead_ends(map, &mut maze);
        }

        // A roomless maze prunes away to nothing
        ensure_open_run(map, Tile::Corridor, Tile::Wall);
    }

    fn on_decorate(&mut self, map: &mut Map, rng: &mut Rng) {
        // Stairs first, while every door is still an open corridor
        place_stairs(map);
        place_doors(map, rng, self.params.door_chance, self.params.closed_door_chance);
        map.derive_flags();
    }
}

fn is_open(map: &Map, pos: Position) -> bool {
    map.contains(pos) && matches!(map.tile(pos), Tile::Floor | Tile::Corridor)
}

fn is_wall(map: &Map, pos: Position) -> bool {
    !map.contains(pos) || map.tile(pos) == Tile::Wall
}

/// A corridor cell squeezed between two walls, opening onto a room on one side
fn is_doorway(map: &Map, pos: Position) -> bool {
    if map.tile(pos) != Tile::Corridor {
        return false;
    }

    [(Direction::N, Direction::E), (Direction::E, Direction::N)]
        .into_iter()
        .any(|(side, through)| {
            let a = pos + through;
            let b = pos + -through;
            is_wall(map, pos + side)
                && is_wall(map, pos + -side)
                && is_open(map, a)
                && is_open(map, b)
                && (map.tile(a) == Tile::Floor || map.tile(b) == Tile::Floor)
        })
}

/// Hang doors in doorways, row by row. A fresh door keeps its neighbours from
/// becoming doorways.
fn place_doors(map: &mut Map, rng: &mut Rng, door_chance: i32, closed_chance: i32) {
    let mut doors = 0;

    for y in 1..map.height() - 1 {
        for x in 1..map.width() - 1 {
            let pos = Position::new(x, y);
            if !is_doorway(map, pos) || rng.get_int(100) >= door_chance {
                continue;
            }

            let door = if rng.get_int(100) < closed_chance {
                Tile::ClosedDoor
            } else {
                Tile::OpenDoor
            };
            map.set_tile(pos, door);
            doors += 1;
        }
    }

    log::debug!("hung {} doors", doors);
}
