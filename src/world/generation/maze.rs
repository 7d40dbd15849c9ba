//! Maze corridors
//!
//! Growing-tree maze carving through solid rock and dead-end pruning.

use crate::rng::Rng;
use crate::world::generation::cellular::count_adjacent;
use crate::world::position::Direction;
use crate::world::{Map, Position, Tile};

fn is_wall(map: &Map, pos: Position) -> bool {
    map.contains(pos) && map.tile(pos) == Tile::Wall
}

/// A two-cell step from `pos` toward `dir` stays surrounded by rock
fn can_carve(map: &Map, pos: Position, dir: Direction) -> bool {
    if !map.contains(pos + dir * 3) {
        return false;
    }

    let mut left = pos + dir + dir.left45();
    let mut right = pos + dir + dir.right45();
    if !is_wall(map, left) || !is_wall(map, right) {
        return false;
    }

    left += dir;
    right += dir;
    if !is_wall(map, left) || !is_wall(map, right) {
        return false;
    }

    is_wall(map, pos + dir * 2)
}

/// Grow a maze from (x, y) in two-cell steps.
///
/// Does nothing unless the whole 3x3 block around the seed is wall. Every carved
/// cell is appended to `maze`. `winding` is the percent chance of turning when
/// going straight is still possible.
pub fn grow_maze(map: &mut Map, rng: &mut Rng, maze: &mut Vec<Position>, x: i32, y: i32, winding: i32) {
    if count_adjacent(map, x, y, Tile::Wall) < 9 {
        return;
    }

    let start = Position::new(x, y);
    map.set_tile(start, Tile::Corridor);
    maze.push(start);

    let mut cells = vec![start];
    let mut last_dir = Direction::NONE;

    while let Some(&cell) = cells.last() {
        let unmade: Vec<Direction> = Direction::CARDINAL
            .into_iter()
            .filter(|&dir| can_carve(map, cell, dir))
            .collect();

        if unmade.is_empty() {
            cells.pop();
            last_dir = Direction::NONE;
            continue;
        }

        if !unmade.contains(&last_dir) || rng.get_int(100) < winding {
            last_dir = *rng.get_one(&unmade);
        }

        let near = cell + last_dir;
        let far = cell + last_dir * 2;
        map.set_tile(near, Tile::Corridor);
        map.set_tile(far, Tile::Corridor);
        maze.push(near);
        maze.push(far);
        cells.push(far);
    }
}

/// Fill dead ends back in, starting from the end of `maze`.
///
/// A non-wall cell with at most one non-wall cardinal neighbour becomes wall,
/// and its neighbours are queued for another look. Drains `maze`.
pub fn remove_dead_ends(map: &mut Map, maze: &mut Vec<Position>) {
    let mut removed = 0;

    while let Some(pos) = maze.pop() {
        if !map.contains(pos) || map.tile(pos) == Tile::Wall {
            continue;
        }

        let exits = Direction::CARDINAL
            .iter()
            .filter(|&&dir| {
                let next = pos + dir;
                map.contains(next) && map.tile(next) != Tile::Wall
            })
            .count();

        if exits <= 1 {
            map.set_tile(pos, Tile::Wall);
            removed += 1;
            maze.extend(Direction::CARDINAL.iter().map(|&dir| pos + dir));
        }
    }

    log::trace!("filled {} dead-end cells", removed);
}
