//! Chamber generator
//!
//! Round halls spread out by Lloyd relaxation and chained together.

use serde::{Deserialize, Serialize};

use super::carve::{carve_circle, Passage};
use super::cellular::fill;
use super::points::{connect_points, relaxation};
use super::{ensure_open_run, place_stairs, MapGenerator};
use crate::rng::Rng;
use crate::world::{Map, Position, Tile};

/// Tuning for [`ChamberGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamberParams {
    pub chambers: usize,
    /// Lloyd steps applied to the random seed points
    pub relax_steps: u32,
    pub min_radius: i32,
    pub max_radius: i32,
    pub passage: Passage,
    pub wide_passage: bool,
}

impl Default for ChamberParams {
    fn default() -> Self {
        Self {
            chambers: 12,
            relax_steps: 3,
            min_radius: 2,
            max_radius: 4,
            passage: Passage::Straight,
            wide_passage: true,
        }
    }
}

/// Circular chambers on relaxed points
#[derive(Debug, Clone, Default)]
pub struct ChamberGenerator {
    params: ChamberParams,
    centres: Vec<Position>,
}

impl ChamberGenerator {
    pub fn new(params: ChamberParams) -> Self {
        Self {
            params,
            centres: Vec::new(),
        }
    }

    /// Chamber centres of the last run, in the order they were linked
    pub fn centres(&self) -> &[Position] {
        &self.centres
    }
}

impl MapGenerator for ChamberGenerator {
    fn on_generate(&mut self, map: &mut Map, rng: &mut Rng) {
        let p = &self.params;
        assert!(
            0 <= p.min_radius && p.min_radius <= p.max_radius,
            "bad chamber radii {}..={}",
            p.min_radius,
            p.max_radius
        );

        fill(map, Tile::Wall);

        let (width, height) = map.size();
        let mut points: Vec<Position> = (0..p.chambers.max(1))
            .map(|_| Position::new(rng.get_int_range(1, width - 2), rng.get_int_range(1, height - 2)))
            .collect();

        for _ in 0..p.relax_steps {
            relaxation(map, &mut points);
        }

        // Centroids of edge cells can land on the border
        for point in &mut points {
            point.x = point.x.clamp(1, width - 2);
            point.y = point.y.clamp(1, height - 2);
        }

        for &point in &points {
            let radius = rng.get_int_range(p.min_radius, p.max_radius);
            carve_circle(map, point, radius);
        }

        connect_points(map, rng, &mut points, p.passage, p.wide_passage);
        ensure_open_run(map, Tile::Corridor, Tile::Wall);
        log::debug!("carved {} chambers", points.len());
        self.centres = points;
    }

    fn on_decorate(&mut self, map: &mut Map, _rng: &mut Rng) {
        place_stairs(map);
    }
}
