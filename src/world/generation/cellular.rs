//! Noise fill and cellular automata
//!
//! The classic cave recipe: random walls, then a few smoothing passes.

use crate::rng::Rng;
use crate::world::{Map, Position, Tile};

/// Fill every cell with one tile
pub fn fill(map: &mut Map, tile: Tile) {
    map.tiles_mut().fill(tile);
}

/// Random walls: the border is always wall, interior cells are wall with
/// probability `wall_prob` percent and floor otherwise.
pub fn fill_noise(map: &mut Map, rng: &mut Rng, wall_prob: i32) {
    let (width, height) = map.size();
    let mut tiles = map.tiles_mut();

    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let tile = if border || rng.get_int(100) < wall_prob {
                Tile::Wall
            } else {
                Tile::Floor
            };
            tiles.set(x, y, tile);
        }
    }
}

/// Count tiles of a kind in the 3x3 window centred on (x, y), centre included.
/// The window is clipped at the map edges.
pub fn count_adjacent(map: &Map, x: i32, y: i32, tile: Tile) -> i32 {
    let left = (x - 1).max(0);
    let top = (y - 1).max(0);
    let right = (x + 1).min(map.width() - 1);
    let bottom = (y + 1).min(map.height() - 1);

    let mut count = 0;
    for j in top..=bottom {
        for i in left..=right {
            if map.tile_xy(i, j) == tile {
                count += 1;
            }
        }
    }
    count
}

/// One smoothing pass: an interior cell becomes wall when at least `r1cutoff`
/// cells of its 3x3 window are wall, floor otherwise. The border becomes wall.
pub fn smooth(map: &mut Map, r1cutoff: i32) {
    let (width, height) = map.size();
    let mut tiles = vec![Tile::Wall; map.len()];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let r1 = count_adjacent(map, x, y, Tile::Wall);
            tiles[(y * width + x) as usize] = if r1 >= r1cutoff { Tile::Wall } else { Tile::Floor };
        }
    }

    map.tiles_mut().replace(tiles);
}

/// Smoothing with a second ring: also counts walls in the 5x5 window without its
/// four corners. A cell becomes wall when `r1 >= r1cutoff` or `r2 <= r2cutoff`,
/// which seeds pillars in open areas.
pub fn smooth_with_ring(map: &mut Map, r1cutoff: i32, r2cutoff: i32) {
    let (width, height) = map.size();
    let mut tiles = vec![Tile::Wall; map.len()];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut r1 = 0;
            let mut r2 = 0;

            for dy in -2..=2i32 {
                for dx in -2..=2i32 {
                    if dx.abs() == 2 && dy.abs() == 2 {
                        continue;
                    }

                    let pos = Position::new(x + dx, y + dy);
                    if map.contains(pos) && map.tile(pos) == Tile::Wall {
                        if dx.abs() <= 1 && dy.abs() <= 1 {
                            r1 += 1;
                        }
                        r2 += 1;
                    }
                }
            }

            tiles[(y * width + x) as usize] = if r1 >= r1cutoff || r2 <= r2cutoff {
                Tile::Wall
            } else {
                Tile::Floor
            };
        }
    }

    map.tiles_mut().replace(tiles);
}
