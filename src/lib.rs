//! Gloomgrid - spatial reasoning for tile-grid roguelikes
//!
//! Level generation, shadowcast field of view, Dijkstra cost fields
//! and A* over a shared tile map.

pub mod config;
pub mod rng;
pub mod world;

// Re-export commonly used types
pub use config::LevelConfig;
pub use rng::Rng;
pub use world::generation::{build_level, LevelStyle};
pub use world::{DijkstraMap, Direction, Fov, Map, Position, Tile};
