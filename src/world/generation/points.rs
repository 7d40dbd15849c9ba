//! Point sets
//!
//! Lloyd relaxation of scattered points and a greedy spanning tree of passages.

use super::carve::{carve_passage, Passage};
use crate::rng::Rng;
use crate::world::{Map, Position};

/// One step of Lloyd relaxation over the map cells.
///
/// Every cell is assigned to the nearest point (first one on ties) and each
/// point moves to the mean of its cell, seeded with the point itself.
pub fn relaxation(map: &Map, points: &mut [Position]) {
    if points.is_empty() {
        return;
    }

    let mut sums: Vec<(Position, i32)> = points.iter().map(|&p| (p, 1)).collect();

    for y in 0..map.height() {
        for x in 0..map.width() {
            let pos = Position::new(x, y);
            let mut nearest = 0;
            let mut nearest_distance = i32::MAX;

            for (i, point) in points.iter().enumerate() {
                let distance = point.distance_squared(&pos);
                if distance < nearest_distance {
                    nearest = i;
                    nearest_distance = distance;
                }
            }

            let (sum, count) = &mut sums[nearest];
            *sum += pos;
            *count += 1;
        }
    }

    for (point, (sum, count)) in points.iter_mut().zip(sums) {
        *point = sum / count;
    }
}

/// Join all points with passages, greedily.
///
/// Starts from the last point and repeatedly links the closest remaining point
/// (squared distance, first found on ties) to any already linked one. On return
/// `points` holds the points in the order they were linked.
pub fn connect_points(map: &mut Map, rng: &mut Rng, points: &mut Vec<Position>, passage: Passage, wide: bool) {
    let Some(first) = points.pop() else {
        return;
    };
    let mut connected = vec![first];

    while !points.is_empty() {
        let mut best_from = first;
        let mut best_to = 0;
        let mut best_distance = i32::MAX;

        for &from in &connected {
            for (i, to) in points.iter().enumerate() {
                let distance = to.distance_squared(&from);
                if distance < best_distance {
                    best_from = from;
                    best_to = i;
                    best_distance = distance;
                }
            }
        }

        let to = points.remove(best_to);
        carve_passage(map, rng, best_from, to, passage, wide);
        connected.push(to);
    }

    *points = connected;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::cellular::fill;
    use crate::world::Tile;

    #[test]
    fn test_relaxation_centres_single_point() {
        let map = Map::new(9, 9);
        let mut points = vec![Position::new(0, 0)];
        relaxation(&map, &mut points);
        // (sum of all cells + the point) / 82
        assert_eq!(points, vec![Position::new(3, 3)]);

        relaxation(&map, &mut points);
        assert_eq!(points, vec![Position::new(3, 3)]);
    }

    #[test]
    fn test_relaxation_spreads_points() {
        let map = Map::new(20, 10);
        let mut points = vec![Position::new(9, 5), Position::new(10, 5)];
        for _ in 0..5 {
            relaxation(&map, &mut points);
        }
        assert!(points[0].x < 7, "{points:?}");
        assert!(points[1].x > 12, "{points:?}");
    }

    #[test]
    fn test_connect_points_links_everything() {
        let mut map = Map::new(30, 20);
        fill(&mut map, Tile::Wall);
        let mut rng = Rng::new(5);
        let originals = vec![
            Position::new(3, 3),
            Position::new(25, 4),
            Position::new(14, 16),
            Position::new(5, 15),
        ];
        let mut points = originals.clone();
        connect_points(&mut map, &mut rng, &mut points, Passage::Straight, false);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Position::new(5, 15));
        assert_eq!(
            &points[1..],
            &[Position::new(14, 16), Position::new(3, 3), Position::new(25, 4)]
        );

        map.derive_flags();
        let mut dijkstra = crate::world::DijkstraMap::new(&map);
        dijkstra.add_cost(points[0], 0);
        dijkstra.compute(&map);
        assert!(originals.iter().all(|&p| dijkstra.is_reached(p)));
    }
}
