//! Map data structure
//!
//! The 2D grid of tiles and flags that every other system reads.

use std::fmt;

use super::position::Position;
use super::tile::{Flags, Tile};

/// A level grid: parallel tile and flag arrays in row-major order
#[derive(Debug, Clone, Default)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    flags: Vec<Flags>,
}

impl Map {
    /// Create a new map of `Unused` tiles with all flags cleared
    pub fn new(width: i32, height: i32) -> Self {
        let mut map = Self::default();
        map.resize(width, height);
        map
    }

    /// Reallocate both arrays. Existing contents are lost.
    pub fn resize(&mut self, width: i32, height: i32) {
        assert!(width >= 0 && height >= 0, "negative map size {width}x{height}");
        let len = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.tiles = vec![Tile::default(); len];
        self.flags = vec![Flags::default(); len];
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        (y * self.width + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_pos(&self, idx: usize) -> Position {
        let idx = idx as i32;
        Position::new(idx % self.width, idx / self.width)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.in_bounds(pos.x, pos.y)
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "({}, {}) outside {}x{} map",
            pos.x,
            pos.y,
            self.width,
            self.height
        );
        (pos.y * self.width + pos.x) as usize
    }

    /// Tile at position. Panics when out of bounds.
    pub fn tile(&self, pos: Position) -> Tile {
        self.tiles[self.index(pos)]
    }

    pub fn tile_xy(&self, x: i32, y: i32) -> Tile {
        self.tile(Position::new(x, y))
    }

    /// Set tile at position. Panics when out of bounds.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn set_tile_xy(&mut self, x: i32, y: i32, tile: Tile) {
        self.set_tile(Position::new(x, y), tile);
    }

    pub fn at(&self, pos: Position) -> &Flags {
        &self.flags[self.index(pos)]
    }

    pub fn at_mut(&mut self, pos: Position) -> &mut Flags {
        let idx = self.index(pos);
        &mut self.flags[idx]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Bulk write access to the tile buffer
    pub fn tiles_mut(&mut self) -> TilesMut<'_> {
        TilesMut {
            width: self.width,
            tiles: &mut self.tiles,
        }
    }

    /// Recompute passable/transparent from the tiles. Visibility state is kept.
    pub fn derive_flags(&mut self) {
        for (flags, tile) in self.flags.iter_mut().zip(&self.tiles) {
            flags.passable = tile.is_passable();
            flags.transparent = tile.is_transparent();
        }
    }

    pub fn is_passable(&self, pos: Position) -> bool {
        self.contains(pos) && self.at(pos).passable
    }

    /// Out-of-bounds cells block sight
    pub fn is_opaque(&self, pos: Position) -> bool {
        !self.contains(pos) || !self.at(pos).transparent
    }

    /// Clear all visibility (before recalculating FOV)
    pub fn clear_visibility(&mut self) {
        for flags in &mut self.flags {
            flags.visible = false;
        }
    }

    /// Forget everything that was explored
    pub fn clear_exploration(&mut self) {
        for flags in &mut self.flags {
            flags.explored = false;
        }
    }

    pub fn count_tiles(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Every position whose tile matches the predicate, row-major
    pub fn positions_where(&self, mut predicate: impl FnMut(Tile) -> bool) -> Vec<Position> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| predicate(tile))
            .map(|(idx, _)| self.idx_to_pos(idx))
            .collect()
    }

    /// First position holding the given tile, row-major
    pub fn find_tile(&self, tile: Tile) -> Option<Position> {
        self.tiles.iter().position(|&t| t == tile).map(|idx| self.idx_to_pos(idx))
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            let line: String = row.iter().map(Tile::glyph).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Mutable view over a map's tile buffer
#[derive(Debug)]
pub struct TilesMut<'a> {
    width: i32,
    tiles: &'a mut Vec<Tile>,
}

impl TilesMut<'_> {
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Swap in a complete new buffer of the same size
    pub fn replace(&mut self, tiles: Vec<Tile>) {
        assert_eq!(tiles.len(), self.tiles.len(), "tile buffer size mismatch");
        *self.tiles = tiles;
    }

    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.tiles[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        self.tiles[(y * self.width + x) as usize] = tile;
    }

    pub fn as_slice(&self) -> &[Tile] {
        self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_unused() {
        let map = Map::new(4, 3);
        assert_eq!(map.size(), (4, 3));
        assert_eq!(map.count_tiles(Tile::Unused), 12);
        assert_eq!(*map.at(Position::new(3, 2)), Flags::default());
    }

    #[test]
    fn test_resize_wipes() {
        let mut map = Map::new(3, 3);
        map.set_tile_xy(1, 1, Tile::Floor);
        map.resize(5, 2);
        assert_eq!(map.len(), 10);
        assert_eq!(map.count_tiles(Tile::Floor), 0);
    }

    #[test]
    fn test_derive_flags_keeps_visibility() {
        let mut map = Map::new(2, 1);
        map.set_tile_xy(0, 0, Tile::Floor);
        map.set_tile_xy(1, 0, Tile::Water);
        map.at_mut(Position::new(0, 0)).explored = true;
        map.derive_flags();

        let floor = *map.at(Position::new(0, 0));
        assert!(floor.passable && floor.transparent && floor.explored);
        let water = *map.at(Position::new(1, 0));
        assert!(!water.passable && water.transparent);
    }

    #[test]
    fn test_tiles_mut_view() {
        let mut map = Map::new(3, 2);
        let mut view = map.tiles_mut();
        view.fill(Tile::Wall);
        view.set(2, 1, Tile::Floor);
        assert_eq!(view.get(2, 1), Tile::Floor);
        assert_eq!(map.tile_xy(2, 1), Tile::Floor);
        assert_eq!(map.find_tile(Tile::Floor), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_display() {
        let mut map = Map::new(3, 2);
        map.tiles_mut().fill(Tile::Wall);
        map.set_tile_xy(1, 1, Tile::Floor);
        assert_eq!(map.to_string(), "###\n#.#\n");
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        Map::new(2, 2).tile_xy(2, 0);
    }
}
