//! A* pathfinding
//!
//! Point-to-point search over passable cells with unit step cost.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::map::Map;
use super::position::{Direction, Position};

/// Which neighbours a single step may reach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Neighborhood {
    /// North, east, south, west
    Four,
    /// All eight neighbours, diagonals included
    #[default]
    Eight,
}

impl Neighborhood {
    fn directions(&self) -> &'static [Direction] {
        match self {
            Neighborhood::Four => &Direction::CARDINAL,
            Neighborhood::Eight => &Direction::ALL,
        }
    }

    /// Exact step count on an empty grid, so never an overestimate
    fn heuristic(&self, from: Position, to: Position) -> i32 {
        match self {
            Neighborhood::Four => from.distance(&to),
            Neighborhood::Eight => from.chebyshev_distance(&to),
        }
    }
}

/// Shortest 8-connected path from `start` to `goal`, both included.
/// Empty when the goal cannot be reached.
pub fn search(map: &Map, start: Position, goal: Position) -> Vec<Position> {
    search_with(map, start, goal, Neighborhood::Eight)
}

/// Shortest path using the given neighbourhood
pub fn search_with(map: &Map, start: Position, goal: Position, neighborhood: Neighborhood) -> Vec<Position> {
    if !map.contains(start) || !map.contains(goal) {
        return Vec::new();
    }

    let width = map.width();
    let index = |pos: Position| (pos.y * width + pos.x) as usize;

    // Ordered by f, then row, then column
    let mut frontier = BinaryHeap::new();
    let mut came_from: Vec<Option<Position>> = vec![None; map.len()];
    let mut cost_so_far: Vec<Option<i32>> = vec![None; map.len()];

    frontier.push(Reverse((0, start.y, start.x)));
    came_from[index(start)] = Some(start);
    cost_so_far[index(start)] = Some(0);

    while let Some(Reverse((_, y, x))) = frontier.pop() {
        let current = Position::new(x, y);

        if current == goal {
            return reconstruct(&came_from, index, start, goal);
        }

        let current_cost = cost_so_far[index(current)].unwrap_or(0);

        for &dir in neighborhood.directions() {
            let next = current + dir;
            if !map.is_passable(next) {
                continue;
            }

            let new_cost = current_cost + 1;
            let slot = &mut cost_so_far[index(next)];
            if slot.map_or(true, |known| new_cost < known) {
                *slot = Some(new_cost);
                came_from[index(next)] = Some(current);
                let priority = new_cost + neighborhood.heuristic(next, goal);
                frontier.push(Reverse((priority, next.y, next.x)));
            }
        }
    }

    log::trace!("no path from {:?} to {:?}", start, goal);
    Vec::new()
}

fn reconstruct(
    came_from: &[Option<Position>],
    index: impl Fn(Position) -> usize,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = goal;

    while current != start {
        path.push(current);
        match came_from[index(current)] {
            Some(prev) => current = prev,
            None => return Vec::new(),
        }
    }

    path.push(start);
    path.reverse();
    path
}
