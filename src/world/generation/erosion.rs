//! Erosion and cleanup
//!
//! Roughens wall faces and strips rock that no open cell can see.

use crate::rng::Rng;
use crate::world::generation::cellular::count_adjacent;
use crate::world::position::Direction;
use crate::world::{Map, Position, Tile};

/// Randomly wear down walls next to floor.
///
/// Picks `iterations` random interior cells. A wall with `n >= 2` floor
/// neighbours turns to floor with probability `1 / (9 - n)`.
pub fn erode(map: &mut Map, rng: &mut Rng, iterations: usize) {
    let (width, height) = map.size();
    if width < 3 || height < 3 {
        return;
    }

    for _ in 0..iterations {
        let pos = Position::new(rng.get_int_range(1, width - 2), rng.get_int_range(1, height - 2));

        if map.tile(pos) != Tile::Wall {
            continue;
        }

        let floors = Direction::ALL
            .iter()
            .filter(|&&dir| map.tile(pos + dir) == Tile::Floor)
            .count() as i32;

        if floors >= 2 && rng.get_int(9 - floors) == 0 {
            map.set_tile(pos, Tile::Floor);
        }
    }
}

/// Convert interior `from` cells with at least `r1cutoff` `to` cells in their
/// 3x3 window into `to`. All cells are judged before any changes.
pub fn erode_tiles(map: &mut Map, from: Tile, to: Tile, r1cutoff: i32) {
    let (width, height) = map.size();
    let mut marked = Vec::new();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if map.tile_xy(x, y) == from && count_adjacent(map, x, y, to) >= r1cutoff {
                marked.push(Position::new(x, y));
            }
        }
    }

    log::trace!("eroding {} {:?} cells into {:?}", marked.len(), from, to);
    for pos in marked {
        map.set_tile(pos, to);
    }
}

/// Turn walls that border nothing but rock or void into `Unused`.
///
/// Scans row by row and updates in place, so a wall already cleared counts as
/// void for the cells after it.
pub fn remove_unused_walls(map: &mut Map) {
    for y in 0..map.height() {
        for x in 0..map.width() {
            let pos = Position::new(x, y);
            if map.tile(pos) != Tile::Wall {
                continue;
            }

            let buried = Direction::ALL.iter().all(|&dir| {
                let next = pos + dir;
                !map.contains(next) || matches!(map.tile(next), Tile::Wall | Tile::Unused)
            });

            if buried {
                map.set_tile(pos, Tile::Unused);
            }
        }
    }
}
