//! Dijkstra maps
//!
//! Cost fields spread outward from seed cells. Seeds are injected with
//! [`DijkstraMap::add_cost`], then [`DijkstraMap::compute`] relaxes the whole
//! field at once, so several sources can be superposed before one pass. AI code
//! rolls downhill to approach and uphill (or over a safety map) to flee.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use super::map::Map;
use super::position::{Direction, Position};

/// Cost of a cell no seed reaches. One below `i32::MAX` so `cost + 1` cannot overflow.
pub const UNREACHED: i32 = i32::MAX - 1;

/// Multi-source cost field over a map
#[derive(Debug, Clone)]
pub struct DijkstraMap {
    width: i32,
    height: i32,
    costs: Vec<i32>,
    frontier: BinaryHeap<Reverse<(i32, i32, i32)>>,
}

impl DijkstraMap {
    /// An empty field sized to the map
    pub fn new(map: &Map) -> Self {
        Self {
            width: map.width(),
            height: map.height(),
            costs: vec![UNREACHED; map.len()],
            frontier: BinaryHeap::new(),
        }
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> usize {
        assert!(self.in_bounds(pos), "({}, {}) outside cost field", pos.x, pos.y);
        (pos.y * self.width + pos.x) as usize
    }

    /// Forget every seed and computed cost
    pub fn clear(&mut self) {
        self.costs.fill(UNREACHED);
        self.frontier.clear();
    }

    pub fn cost(&self, pos: Position) -> i32 {
        self.costs[self.index(pos)]
    }

    pub fn is_reached(&self, pos: Position) -> bool {
        self.cost(pos) != UNREACHED
    }

    /// Seed a cell, or add to a seed already there
    pub fn add_cost(&mut self, pos: Position, cost: i32) {
        let idx = self.index(pos);
        let current = &mut self.costs[idx];
        if *current == UNREACHED {
            *current = cost;
        } else {
            *current += cost;
        }
    }

    /// Relax the field from every seeded cell across passable cardinal neighbours
    pub fn compute(&mut self, map: &Map) {
        self.relax(map, |_| true);
    }

    /// Like [`DijkstraMap::compute`] but only spreads through currently visible cells
    pub fn compute_visible(&mut self, map: &Map) {
        self.relax(map, |pos| map.at(pos).visible);
    }

    /// Like [`DijkstraMap::compute`] but only spreads through explored cells
    pub fn compute_explored(&mut self, map: &Map) {
        self.relax(map, |pos| map.at(pos).explored);
    }

    /// Turn a threat field into a flee field.
    ///
    /// Every cell the threat field reaches is seeded with its cost scaled by
    /// -1.2 (added to any seed already present), then the field is recomputed.
    /// Rolling downhill on the result moves away from the threat without getting
    /// cornered in dead ends.
    pub fn compute_safety_map(&mut self, map: &Map, threat: &DijkstraMap) {
        assert_eq!(self.costs.len(), threat.costs.len(), "cost fields of different maps");

        for idx in 0..self.costs.len() {
            let cost = threat.costs[idx];
            if cost == UNREACHED {
                continue;
            }
            let pos = Position::new(idx as i32 % self.width, idx as i32 / self.width);
            self.add_cost(pos, cost * -6 / 5);
        }

        self.compute(map);
    }

    fn relax(&mut self, map: &Map, allowed: impl Fn(Position) -> bool) {
        assert_eq!(map.size(), (self.width, self.height), "cost field sized for another map");

        self.frontier.clear();
        for (idx, &cost) in self.costs.iter().enumerate() {
            if cost != UNREACHED {
                let idx = idx as i32;
                self.frontier.push(Reverse((cost, idx / self.width, idx % self.width)));
            }
        }

        while let Some(Reverse((cost, y, x))) = self.frontier.pop() {
            let pos = Position::new(x, y);
            if cost > self.cost(pos) {
                continue;
            }

            for dir in Direction::CARDINAL {
                let next = pos + dir;
                if !map.is_passable(next) || !allowed(next) {
                    continue;
                }

                let idx = self.index(next);
                if self.costs[idx] > cost + 1 {
                    self.costs[idx] = cost + 1;
                    self.frontier.push(Reverse((cost + 1, next.y, next.x)));
                }
            }
        }
    }

    /// Step toward the strictly cheapest neighbour, or `NONE` at a local minimum
    pub fn next_direction(&self, pos: Position) -> Direction {
        let mut lowest = self.cost(pos);
        let mut next_dir = Direction::NONE;

        for dir in Direction::ALL {
            let next = pos + dir;
            if !self.in_bounds(next) {
                continue;
            }

            let cost = self.cost(next);
            if cost < lowest {
                lowest = cost;
                next_dir = dir;
            }
        }

        next_dir
    }

    /// Step toward the strictly most expensive reached neighbour, or `NONE` at a
    /// local maximum
    pub fn highest_next_direction(&self, pos: Position) -> Direction {
        let mut highest = self.cost(pos);
        let mut next_dir = Direction::NONE;

        for dir in Direction::ALL {
            let next = pos + dir;
            if !self.in_bounds(next) {
                continue;
            }

            let cost = self.cost(next);
            if cost != UNREACHED && cost > highest {
                highest = cost;
                next_dir = dir;
            }
        }

        next_dir
    }

    /// Greedy walk downhill from `goal` until `start` or a local minimum, returned
    /// start-first.
    ///
    /// This is not a verified shortest path: if `start` was not a seed the walk
    /// simply ends wherever the descent stops.
    pub fn path(&self, start: Position, goal: Position) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = goal;

        loop {
            path.push(current);

            if current == start {
                break;
            }

            let next_dir = self.next_direction(current);
            if next_dir.is_none() {
                break;
            }

            current += next_dir;
        }

        path.reverse();
        path
    }

    /// Reached cell with the highest cost, first in row-major order on ties
    pub fn farthest(&self) -> Option<(Position, i32)> {
        let mut best: Option<(Position, i32)> = None;
        for (idx, &cost) in self.costs.iter().enumerate() {
            if cost == UNREACHED {
                continue;
            }
            if best.map_or(true, |(_, c)| cost > c) {
                let idx = idx as i32;
                best = Some((Position::new(idx % self.width, idx / self.width), cost));
            }
        }
        best
    }
}

/// Base-62 dump of the costs, blank where unreached
impl fmt::Display for DijkstraMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

        for row in self.costs.chunks(self.width.max(1) as usize) {
            let line: String = row
                .iter()
                .map(|&cost| {
                    if cost == UNREACHED {
                        ' '
                    } else {
                        DIGITS[cost.rem_euclid(62) as usize] as char
                    }
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
