//! Tile definitions
//!
//! Terrain kinds and the per-cell flags derived from them.

use serde::{Deserialize, Serialize};

/// Terrain occupying one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Solid rock nobody can ever see; also the state of a fresh map
    #[default]
    Unused,
    Floor,
    Corridor,
    Wall,
    ClosedDoor,
    OpenDoor,
    UpStairs,
    DownStairs,
    Water,
    Bridge,
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        matches!(
            self,
            Tile::Floor
                | Tile::Corridor
                | Tile::OpenDoor
                | Tile::UpStairs
                | Tile::DownStairs
                | Tile::Bridge
        )
    }

    pub fn is_transparent(&self) -> bool {
        self.is_passable() || *self == Tile::Water
    }

    /// Flags for a freshly generated cell of this tile
    pub fn flags(&self) -> Flags {
        Flags {
            passable: self.is_passable(),
            transparent: self.is_transparent(),
            visible: false,
            explored: false,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Unused => ' ',
            Tile::Floor => '.',
            Tile::Corridor => ',',
            Tile::Wall => '#',
            Tile::ClosedDoor => '+',
            Tile::OpenDoor => '/',
            Tile::UpStairs => '<',
            Tile::DownStairs => '>',
            Tile::Water => '~',
            Tile::Bridge => '=',
        }
    }
}

/// Per-cell flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub passable: bool,
    pub transparent: bool,
    /// In view this turn
    pub visible: bool,
    /// Seen at least once
    pub explored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_follow_tile() {
        for tile in [Tile::Floor, Tile::Corridor, Tile::OpenDoor, Tile::UpStairs, Tile::DownStairs, Tile::Bridge] {
            let flags = tile.flags();
            assert!(flags.passable && flags.transparent, "{tile:?}");
        }

        let water = Tile::Water.flags();
        assert!(!water.passable && water.transparent);

        for tile in [Tile::Wall, Tile::ClosedDoor, Tile::Unused] {
            let flags = tile.flags();
            assert!(!flags.passable && !flags.transparent, "{tile:?}");
        }
    }
}
