//! Connected regions
//!
//! Flood-fill labelling of open areas, plus the passes built on it: culling
//! small regions, joining the survivors with passages, and bridging water.

use std::collections::VecDeque;

use super::carve::{carve_passage, Passage};
use crate::rng::Rng;
use crate::world::position::Direction;
use crate::world::{Map, Position, Tile};

/// 4-connected regions of the map interior, labelled in scan order
#[derive(Debug, Clone)]
pub struct Regions {
    width: i32,
    labels: Vec<Option<usize>>,
    /// Cells of each region in flood-fill order
    cells: Vec<Vec<Position>>,
}

impl Regions {
    /// Label every region whose cells satisfy `member`. Seeds are taken from the
    /// interior only, but a fill may spill onto border cells.
    pub fn find(map: &Map, member: impl Fn(Tile) -> bool) -> Self {
        let (width, height) = map.size();
        let mut labels = vec![None; map.len()];
        let mut cells: Vec<Vec<Position>> = Vec::new();
        let index = |pos: Position| (pos.y * width + pos.x) as usize;

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let seed = Position::new(x, y);
                if !member(map.tile(seed)) || labels[index(seed)].is_some() {
                    continue;
                }

                let region = cells.len();
                let mut members = Vec::new();
                let mut queue = VecDeque::from([seed]);

                while let Some(pos) = queue.pop_front() {
                    if !member(map.tile(pos)) || labels[index(pos)].is_some() {
                        continue;
                    }

                    labels[index(pos)] = Some(region);
                    members.push(pos);

                    for dir in Direction::CARDINAL {
                        let next = pos + dir;
                        if map.contains(next) {
                            queue.push_back(next);
                        }
                    }
                }

                cells.push(members);
            }
        }

        Self { width, labels, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Region containing `pos`, if any
    pub fn label(&self, pos: Position) -> Option<usize> {
        self.labels[(pos.y * self.width + pos.x) as usize]
    }

    pub fn size(&self, region: usize) -> usize {
        self.cells[region].len()
    }

    pub fn cells(&self, region: usize) -> &[Position] {
        &self.cells[region]
    }

    /// The largest region. Ties go to the lowest label.
    pub fn biggest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for region in 0..self.len() {
            if best.map_or(true, |b| self.size(region) > self.size(b)) {
                best = Some(region);
            }
        }
        best
    }
}

/// Labels regions of everything that is not wall
pub fn find_regions(map: &Map) -> Regions {
    Regions::find(map, |tile| tile != Tile::Wall)
}

/// Refill interior cells of marked regions with `tile`
fn fill_regions(map: &mut Map, regions: &Regions, marked: &[bool], tile: Tile) {
    for (region, cells) in regions.cells.iter().enumerate() {
        if !marked[region] {
            continue;
        }
        for &pos in cells {
            if pos.x > 0 && pos.y > 0 && pos.x < map.width() - 1 && pos.y < map.height() - 1 {
                map.set_tile(pos, tile);
            }
        }
    }
}

/// Wall in regions at random.
///
/// Every region rolls once, in label order: it is removed when the roll is
/// below `remove_prob` percent or it is smaller than `min_size`. The biggest
/// region always survives.
pub fn remove_regions(map: &mut Map, rng: &mut Rng, remove_prob: i32, min_size: usize) {
    let regions = find_regions(map);
    let Some(biggest) = regions.biggest() else {
        return;
    };

    let mut marked: Vec<bool> = (0..regions.len())
        .map(|region| rng.get_int(100) < remove_prob || regions.size(region) < min_size)
        .collect();
    marked[biggest] = false;

    log::debug!(
        "removing {} of {} regions",
        marked.iter().filter(|&&m| m).count(),
        regions.len()
    );
    fill_regions(map, &regions, &marked, Tile::Wall);
}

/// Remove regions smaller than `min_size` (never the biggest), then join every
/// remaining region to the biggest one. Panics if nothing is open.
///
/// Each round picks, over all pairs of connector cells between the connected
/// set and an unconnected region, the pairs at minimum Chebyshev distance, and
/// carves a passage between one of them chosen at random.
pub fn connect_regions(map: &mut Map, rng: &mut Rng, min_size: usize, passage: Passage, wide: bool) {
    let regions = find_regions(map);
    assert!(!regions.is_empty(), "no open region to connect");
    let biggest = regions.biggest().unwrap_or(0);

    // Cells with at least one wall next to them
    let connectors: Vec<Vec<Position>> = (0..regions.len())
        .map(|region| {
            regions
                .cells(region)
                .iter()
                .copied()
                .filter(|&pos| {
                    Direction::CARDINAL.iter().any(|&dir| {
                        let next = pos + dir;
                        map.contains(next) && map.tile(next) == Tile::Wall
                    })
                })
                .collect()
        })
        .collect();

    let mut marked: Vec<bool> = (0..regions.len()).map(|r| regions.size(r) < min_size).collect();
    marked[biggest] = false;
    fill_regions(map, &regions, &marked, Tile::Wall);

    let mut connected = vec![biggest];
    let mut unconnected: Vec<usize> = (0..regions.len()).filter(|&r| !marked[r] && r != biggest).collect();

    log::debug!("connecting {} regions with {:?} passages", unconnected.len() + 1, passage);

    while !unconnected.is_empty() {
        let mut best: Vec<(Position, Position)> = Vec::new();
        let mut best_distance = i32::MAX;

        for &i in &connected {
            for &from in &connectors[i] {
                for &j in &unconnected {
                    for &to in &connectors[j] {
                        let distance = from.chebyshev_distance(&to);
                        if distance < best_distance {
                            best.clear();
                            best.push((from, to));
                            best_distance = distance;
                        } else if distance == best_distance {
                            best.push((from, to));
                        }
                    }
                }
            }
        }

        assert!(!best.is_empty(), "{} regions have no connectors", unconnected.len());

        let (from, to) = *rng.get_one(&best);
        let Some(target) = regions.label(to) else {
            break;
        };

        carve_passage(map, rng, from, to, passage, wide);

        connected.push(target);
        unconnected.retain(|&r| r != target);
    }
}

#[derive(Debug, Clone, Copy)]
struct Connector {
    pos: Position,
    dir: Direction,
    /// Cells to the nearest labelled cell, or negative once disabled
    length: i32,
}

impl Connector {
    fn new(pos: Position, dir: Direction) -> Self {
        Self { pos, dir, length: 0 }
    }
}

fn is_land(tile: Tile) -> bool {
    matches!(tile, Tile::Floor | Tile::Corridor)
}

/// Join land regions with straight bridges. Panics if there is no land.
///
/// Regions smaller than `min_size` are flooded. Then, starting from the biggest
/// region, each round casts a ray from every shore cell of the connected set
/// and picks one of the shortest rays that lands on an unconnected region. Water
/// under the ray becomes bridge, anything else corridor. Regions no straight ray
/// can reach are flooded as well.
pub fn construct_bridges(map: &mut Map, rng: &mut Rng, min_size: usize) {
    let regions = Regions::find(map, is_land);
    assert!(!regions.is_empty(), "no land to bridge");
    let biggest = regions.biggest().unwrap_or(0);

    let mut connectors: Vec<Vec<Connector>> = (0..regions.len())
        .map(|region| {
            let mut shore = Vec::new();
            for &pos in regions.cells(region) {
                for dir in Direction::CARDINAL {
                    let next = pos + dir;
                    if map.contains(next) && !is_land(map.tile(next)) {
                        shore.push(Connector::new(pos, dir));
                    }
                }
            }
            shore
        })
        .collect();

    let mut marked: Vec<bool> = (0..regions.len()).map(|r| regions.size(r) < min_size).collect();
    marked[biggest] = false;
    fill_regions(map, &regions, &marked, Tile::Water);

    let mut connected = vec![biggest];
    let mut unconnected: Vec<usize> = (0..regions.len()).filter(|&r| !marked[r] && r != biggest).collect();

    while !unconnected.is_empty() {
        // (region, connector index)
        let mut best: Vec<(usize, usize)> = Vec::new();
        let mut best_distance = i32::MAX;

        for &from in &connected {
            for (index, connector) in connectors[from].iter_mut().enumerate() {
                if connector.length < 0 {
                    continue;
                }

                let mut pos = connector.pos;
                connector.length = 0;

                loop {
                    pos += connector.dir;
                    connector.length += 1;

                    if !map.contains(pos) {
                        connector.length = -1;
                        break;
                    }

                    let Some(to) = regions.label(pos) else {
                        continue;
                    };

                    if unconnected.contains(&to) {
                        if connector.length < best_distance {
                            best.clear();
                            best.push((from, index));
                            best_distance = connector.length;
                        } else if connector.length == best_distance {
                            best.push((from, index));
                        }
                    } else {
                        connector.length = -1;
                    }
                    break;
                }
            }
        }

        if best.is_empty() {
            log::debug!("flooding {} regions no bridge can reach", unconnected.len());
            let unreachable: Vec<bool> = (0..regions.len()).map(|r| unconnected.contains(&r)).collect();
            fill_regions(map, &regions, &unreachable, Tile::Water);
            break;
        }

        let (from_region, index) = *rng.get_one(&best);
        let connector = connectors[from_region][index];
        let landing = connector.pos + connector.dir * connector.length;
        let Some(target) = regions.label(landing) else {
            break;
        };

        for i in 1..connector.length {
            let pos = connector.pos + connector.dir * i;
            let tile = if map.tile(pos) == Tile::Water {
                Tile::Bridge
            } else {
                Tile::Corridor
            };
            map.set_tile(pos, tile);

            // The new span can be bridged from too
            for dir in Direction::CARDINAL {
                let next = pos + dir;
                if map.contains(next) && !is_land(map.tile(next)) {
                    connectors[target].push(Connector::new(pos, dir));
                }
            }
        }

        connected.push(target);
        unconnected.retain(|&r| r != target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::cellular::{fill, fill_noise, smooth};
    use crate::world::DijkstraMap;

    fn map_from(rows: &[&str]) -> Map {
        let mut map = Map::new(rows[0].len() as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '~' => Tile::Water,
                    _ => Tile::Floor,
                };
                map.set_tile_xy(x as i32, y as i32, tile);
            }
        }
        map
    }

    /// True when every passable cell is reachable from every other one
    fn fully_connected(map: &mut Map) -> bool {
        map.derive_flags();
        let Some(start) = map.positions_where(|t| t.is_passable()).first().copied() else {
            return true;
        };
        let mut dijkstra = DijkstraMap::new(map);
        dijkstra.add_cost(start, 0);
        dijkstra.compute(map);
        map.positions_where(|t| t.is_passable())
            .into_iter()
            .all(|pos| dijkstra.is_reached(pos))
    }

    #[test]
    fn test_find_regions() {
        let map = map_from(&[
            "#######",
            "#..#..#",
            "#..#..#",
            "####.##",
            "#.#####",
            "#######",
        ]);
        let regions = find_regions(&map);
        assert_eq!(regions.len(), 3);
        assert_eq!(regions.label(Position::new(1, 1)), Some(0));
        assert_eq!(regions.label(Position::new(4, 3)), Some(1));
        assert_eq!(regions.label(Position::new(1, 4)), Some(2));
        assert_eq!(regions.label(Position::new(0, 0)), None);
        assert_eq!(regions.size(1), 5);
        assert_eq!(regions.biggest(), Some(1));
    }

    #[test]
    fn test_biggest_region_survives_removal() {
        let mut rng = Rng::new(3);
        let mut map = map_from(&[
            "##########",
            "#....#..##",
            "#....#..##",
            "#....###.#",
            "##########",
        ]);
        remove_regions(&mut map, &mut rng, 100, 0);

        assert_eq!(map.count_tiles(Tile::Floor), 12);
        assert_eq!(map.tile_xy(1, 1), Tile::Floor);
        assert_eq!(map.tile_xy(6, 1), Tile::Wall);
        assert_eq!(map.tile_xy(8, 3), Tile::Wall);
    }

    #[test]
    fn test_biggest_region_survives_both_rules() {
        let mut rng = Rng::new(11);
        let mut map = map_from(&[
            "##########",
            "#....#..##",
            "#....#..##",
            "#....###.#",
            "##########",
        ]);
        // Every region is both drawn for removal and under the size floor
        remove_regions(&mut map, &mut rng, 100, 1000);

        assert_eq!(map.count_tiles(Tile::Floor), 12);
        for y in 1..=3 {
            for x in 1..=4 {
                assert_eq!(map.tile_xy(x, y), Tile::Floor, "({x}, {y})");
            }
        }
        assert_eq!(map.tile_xy(6, 1), Tile::Wall);
        assert_eq!(map.tile_xy(8, 3), Tile::Wall);
    }

    #[test]
    fn test_min_size_removal_without_chance() {
        let mut rng = Rng::new(3);
        let mut map = map_from(&[
            "##########",
            "#....#..##",
            "#....#..##",
            "#....###.#",
            "##########",
        ]);
        remove_regions(&mut map, &mut rng, 0, 2);

        assert_eq!(map.count_tiles(Tile::Floor), 16);
        assert_eq!(map.tile_xy(8, 3), Tile::Wall);
    }

    #[test]
    fn test_connect_two_blobs() {
        let mut rng = Rng::new(4);
        let mut map = map_from(&[
            "############",
            "#...####...#",
            "#...####...#",
            "#...####...#",
            "############",
        ]);
        connect_regions(&mut map, &mut rng, 0, Passage::Straight, false);

        assert!(map.count_tiles(Tile::Corridor) > 0);
        assert!(fully_connected(&mut map));
    }

    #[test]
    fn test_connect_every_passage_style() {
        for passage in [Passage::Straight, Passage::Zigzag, Passage::Winding] {
            for seed in 0..5 {
                let mut rng = Rng::new(seed);
                let mut map = Map::new(60, 30);
                fill_noise(&mut map, &mut rng, 55);
                smooth(&mut map, 5);
                connect_regions(&mut map, &mut rng, 4, passage, true);
                assert!(fully_connected(&mut map), "{passage:?} seed {seed}\n{map}");
            }
        }
    }

    #[test]
    fn test_bridge_over_water() {
        let mut rng = Rng::new(6);
        let mut map = map_from(&[
            "##########",
            "#...~~...#",
            "#...~~...#",
            "#...~~...#",
            "##########",
        ]);
        construct_bridges(&mut map, &mut rng, 0);

        assert_eq!(map.count_tiles(Tile::Bridge), 2);
        assert!(fully_connected(&mut map));
    }

    #[test]
    fn test_unbridgeable_regions_are_flooded() {
        let mut rng = Rng::new(6);
        let mut map = map_from(&[
            "#######",
            "#..~~~#",
            "#..~~~#",
            "#~~~..#",
            "#~~~..#",
            "#######",
        ]);
        construct_bridges(&mut map, &mut rng, 0);

        assert_eq!(map.count_tiles(Tile::Floor), 4);
        assert_eq!(map.count_tiles(Tile::Bridge), 0);
        assert_eq!(map.tile_xy(4, 3), Tile::Water);
    }

    #[test]
    fn test_corridor_between_nearest_blobs() {
        let mut rng = Rng::new(10);
        let mut map = Map::new(10, 10);
        fill(&mut map, Tile::Wall);
        for y in 1..4 {
            for x in 1..4 {
                map.set_tile_xy(x, y, Tile::Floor);
                map.set_tile_xy(x + 5, y + 5, Tile::Floor);
            }
        }
        connect_regions(&mut map, &mut rng, 0, Passage::Straight, false);

        let corridors = Regions::find(&map, |t| t == Tile::Corridor);
        assert_eq!(corridors.len(), 1);
        assert!(fully_connected(&mut map));
    }

    #[test]
    fn test_remove_without_regions_is_a_no_op() {
        let mut rng = Rng::new(1);
        let mut map = Map::new(6, 6);
        fill(&mut map, Tile::Wall);
        remove_regions(&mut map, &mut rng, 50, 3);
        assert_eq!(map.count_tiles(Tile::Wall), 36);
    }

    #[test]
    #[should_panic(expected = "no open region")]
    fn test_connect_without_regions_panics() {
        let mut rng = Rng::new(1);
        let mut map = Map::new(6, 6);
        fill(&mut map, Tile::Wall);
        connect_regions(&mut map, &mut rng, 0, Passage::Zigzag, false);
    }
}
