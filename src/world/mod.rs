//! World module
//!
//! The tile grid and everything that reasons over it: generation, field of
//! view, cost fields and pathfinding.

pub mod astar;
pub mod dijkstra;
pub mod fov;
pub mod generation;
pub mod line;
pub mod map;
pub mod position;
pub mod tile;

pub use astar::Neighborhood;
pub use dijkstra::{DijkstraMap, UNREACHED};
pub use fov::Fov;
pub use line::plot_line;
pub use map::{Map, TilesMut};
pub use position::{Direction, Position};
pub use tile::{Flags, Tile};
