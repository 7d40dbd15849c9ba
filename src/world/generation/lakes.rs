//! Lake generator
//!
//! Cave-shaped islands in open water, bridged together.

use serde::{Deserialize, Serialize};

use super::cellular::{fill_noise, smooth, smooth_with_ring};
use super::erosion::erode;
use super::regions::construct_bridges;
use super::{ensure_open_run, place_stairs, MapGenerator};
use crate::rng::Rng;
use crate::world::{Map, Tile};

/// Tuning for [`LakeGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeParams {
    /// Percent of interior cells that start as water
    pub water_prob: i32,
    pub ring_passes: u32,
    pub smooth_passes: u32,
    pub r1_cutoff: i32,
    pub r2_cutoff: i32,
    /// Random erosion attempts on the shorelines before flooding
    pub erosion: usize,
    /// Islands smaller than this sink
    pub min_island_size: usize,
}

impl Default for LakeParams {
    fn default() -> Self {
        Self {
            water_prob: 48,
            ring_passes: 3,
            smooth_passes: 2,
            r1_cutoff: 5,
            r2_cutoff: 1,
            erosion: 200,
            min_island_size: 12,
        }
    }
}

/// Islands joined by straight bridges
#[derive(Debug, Clone, Default)]
pub struct LakeGenerator {
    params: LakeParams,
}

impl LakeGenerator {
    pub fn new(params: LakeParams) -> Self {
        Self { params }
    }
}

impl MapGenerator for LakeGenerator {
    fn on_generate(&mut self, map: &mut Map, rng: &mut Rng) {
        let p = &self.params;

        fill_noise(map, rng, p.water_prob);
        for _ in 0..p.ring_passes {
            smooth_with_ring(map, p.r1_cutoff, p.r2_cutoff);
        }
        for _ in 0..p.smooth_passes {
            smooth(map, p.r1_cutoff);
        }
        erode(map, rng, p.erosion);

        if map.count_tiles(Tile::Floor) == 0 {
            log::debug!("no island survived smoothing, raising the centre");
            map.set_tile_xy(map.width() / 2, map.height() / 2, Tile::Floor);
        }

        // Inner rock becomes water; the border stays wall
        let (width, height) = map.size();
        let mut tiles = map.tiles_mut();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if tiles.get(x, y) == Tile::Wall {
                    tiles.set(x, y, Tile::Water);
                }
            }
        }

        construct_bridges(map, rng, p.min_island_size);
        ensure_open_run(map, Tile::Floor, Tile::Water);
    }

    fn on_decorate(&mut self, map: &mut Map, _rng: &mut Rng) {
        place_stairs(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::generate;
    use crate::world::DijkstraMap;

    #[test]
    fn test_islands_are_bridged() {
        for seed in 0..4 {
            let mut map = Map::new(64, 36);
            let mut rng = Rng::new(seed);
            generate(&mut map, &mut rng, &mut LakeGenerator::default());

            assert!(map.count_tiles(Tile::Water) > 0);
            let up = map.find_tile(Tile::UpStairs).expect("up stairs");
            let mut dijkstra = DijkstraMap::new(&map);
            dijkstra.add_cost(up, 0);
            dijkstra.compute(&map);
            for pos in map.positions_where(|t| t.is_passable()) {
                assert!(dijkstra.is_reached(pos), "seed {seed}: {pos:?}\n{map}");
            }
        }
    }

    #[test]
    fn test_water_is_transparent_but_blocks() {
        let mut map = Map::new(40, 24);
        let mut rng = Rng::new(2);
        generate(&mut map, &mut rng, &mut LakeGenerator::default());

        let water = map.find_tile(Tile::Water).expect("some water");
        assert!(!map.at(water).passable);
        assert!(map.at(water).transparent);
    }
}
