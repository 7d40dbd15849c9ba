//! Cave generator using cellular automata
//!
//! Creates organic, natural-looking cave systems.

use serde::{Deserialize, Serialize};

use super::carve::Passage;
use super::cellular::{fill_noise, smooth, smooth_with_ring};
use super::erosion::{erode_tiles, remove_unused_walls};
use super::regions::connect_regions;
use super::{ensure_open_run, place_stairs, MapGenerator};
use crate::rng::Rng;
use crate::world::{Map, Tile};

/// Tuning for [`CaveGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Percent of interior cells that start as wall
    pub wall_prob: i32,
    /// Passes of two-ring smoothing, which also breaks up wide open areas
    pub ring_passes: u32,
    /// Passes of plain smoothing afterwards
    pub smooth_passes: u32,
    pub r1_cutoff: i32,
    pub r2_cutoff: i32,
    /// Caves smaller than this are filled in
    pub min_region_size: usize,
    pub passage: Passage,
    pub wide_passage: bool,
    /// Walls with at least this many floors in their 3x3 window are knocked out
    pub erode_cutoff: i32,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            wall_prob: 45,
            ring_passes: 4,
            smooth_passes: 3,
            r1_cutoff: 5,
            r2_cutoff: 2,
            min_region_size: 16,
            passage: Passage::Winding,
            wide_passage: false,
            erode_cutoff: 7,
        }
    }
}

/// Cellular-automata caves joined by tunnels
#[derive(Debug, Clone, Default)]
pub struct CaveGenerator {
    params: CaveParams,
}

impl CaveGenerator {
    pub fn new(params: CaveParams) -> Self {
        Self { params }
    }
}

impl MapGenerator for CaveGenerator {
    fn on_generate(&mut self, map: &mut Map, rng: &mut Rng) {
        let p = &self.params;

        fill_noise(map, rng, p.wall_prob);

        for _ in 0..p.ring_passes {
            smooth_with_ring(map, p.r1_cutoff, p.r2_cutoff);
        }
        for _ in 0..p.smooth_passes {
            smooth(map, p.r1_cutoff);
        }

        // Smoothing can close everything up on tiny maps
        if map.count_tiles(Tile::Floor) == 0 {
            log::debug!("no cave survived smoothing, opening the centre");
            map.set_tile_xy(map.width() / 2, map.height() / 2, Tile::Floor);
        }

        connect_regions(map, rng, p.min_region_size, p.passage, p.wide_passage);
        ensure_open_run(map, Tile::Floor, Tile::Wall);
        erode_tiles(map, Tile::Wall, Tile::Floor, p.erode_cutoff);
        remove_unused_walls(map);
    }

    fn on_decorate(&mut self, map: &mut Map, _rng: &mut Rng) {
        place_stairs(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::generate;
    use crate::world::{DijkstraMap, Position};

    fn all_reachable(map: &Map, from: Position) -> bool {
        let mut dijkstra = DijkstraMap::new(map);
        dijkstra.add_cost(from, 0);
        dijkstra.compute(map);
        map.positions_where(|t| t.is_passable())
            .into_iter()
            .all(|pos| dijkstra.is_reached(pos))
    }

    #[test]
    fn test_caves_are_connected() {
        for seed in 0..4 {
            let mut map = Map::new(64, 36);
            let mut rng = Rng::new(seed);
            generate(&mut map, &mut rng, &mut CaveGenerator::default());

            let up = map.find_tile(Tile::UpStairs).expect("up stairs");
            assert!(map.find_tile(Tile::DownStairs).is_some());
            assert!(all_reachable(&map, up), "seed {seed}\n{map}");
        }
    }

    #[test]
    fn test_border_is_never_open() {
        let mut map = Map::new(40, 25);
        let mut rng = Rng::new(17);
        generate(&mut map, &mut rng, &mut CaveGenerator::default());

        for x in 0..40 {
            for y in [0, 24] {
                assert!(matches!(map.tile_xy(x, y), Tile::Wall | Tile::Unused));
            }
        }
    }
}
