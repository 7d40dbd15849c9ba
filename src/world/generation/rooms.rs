//! Rectangular rooms
//!
//! Rooms scattered through solid rock, each kept one cell of rock apart from the
//! others.

use crate::rng::Rng;
use crate::world::{Map, Position, Tile};

/// A rectangular room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, width, height }
    }

    /// One past the last column
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// One past the last row
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.left + self.width / 2, self.top + self.height / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left && pos.x < self.right() && pos.y >= self.top && pos.y < self.bottom()
    }

    /// True if the rooms share a cell or touch without a gap
    pub fn intersects(&self, other: &Room) -> bool {
        self.left <= other.right()
            && self.right() >= other.left
            && self.top <= other.bottom()
            && self.bottom() >= other.top
    }
}

/// The room and a one-cell margin around it are all wall and inside the map
pub fn can_place_room(map: &Map, room: &Room) -> bool {
    for y in room.top - 1..room.bottom() + 1 {
        for x in room.left - 1..room.right() + 1 {
            if !map.in_bounds(x, y) || map.tile_xy(x, y) != Tile::Wall {
                return false;
            }
        }
    }
    true
}

/// Carve the room as floor
pub fn place_room(map: &mut Map, room: &Room) {
    for y in room.top..room.bottom() {
        for x in room.left..room.right() {
            map.set_tile_xy(x, y, Tile::Floor);
        }
    }
}

/// Try a room at every interior wall cell, in random order.
///
/// Sizes are 3d3 by 3d3. Rooms that would not fit or would touch existing
/// open space are skipped. Returns the rooms placed.
pub fn fill_random_rooms(map: &mut Map, rng: &mut Rng) -> Vec<Room> {
    let (width, height) = map.size();
    let mut candidates = Vec::new();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if map.tile_xy(x, y) == Tile::Wall {
                candidates.push(Position::new(x, y));
            }
        }
    }

    rng.shuffle(&mut candidates);

    let mut rooms = Vec::new();

    while let Some(pos) = candidates.pop() {
        let room = Room::new(pos.x, pos.y, rng.roll_dice(3, 3), rng.roll_dice(3, 3));

        if room.right() >= width || room.bottom() >= height {
            continue;
        }

        if can_place_room(map, &room) {
            place_room(map, &room);
            rooms.push(room);
        }
    }

    log::debug!("placed {} rooms", rooms.len());
    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::cellular::fill;

    fn rock(width: i32, height: i32) -> Map {
        let mut map = Map::new(width, height);
        fill(&mut map, Tile::Wall);
        map
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(2, 3, 4, 5);
        assert_eq!(room.right(), 6);
        assert_eq!(room.bottom(), 8);
        assert_eq!(room.center(), Position::new(4, 5));
        assert!(room.contains(Position::new(5, 7)));
        assert!(!room.contains(Position::new(6, 7)));
        assert!(room.intersects(&Room::new(6, 3, 2, 2)));
        assert!(!room.intersects(&Room::new(7, 3, 2, 2)));
    }

    #[test]
    fn test_can_place_needs_margin() {
        let mut map = rock(10, 10);
        let room = Room::new(2, 2, 3, 3);
        assert!(can_place_room(&map, &room));
        assert!(!can_place_room(&map, &Room::new(0, 2, 3, 3)));

        map.set_tile_xy(5, 5, Tile::Floor);
        assert!(!can_place_room(&map, &room));

        place_room(&mut map, &Room::new(6, 6, 2, 2));
        assert_eq!(map.count_tiles(Tile::Floor), 5);
    }

    #[test]
    fn test_random_rooms_keep_apart() {
        let mut map = rock(50, 30);
        let mut rng = Rng::new(12);
        let rooms = fill_random_rooms(&mut map, &mut rng);

        assert!(rooms.len() > 5);
        let area: i32 = rooms.iter().map(|r| r.width * r.height).sum();
        assert_eq!(map.count_tiles(Tile::Floor) as i32, area);

        for (i, a) in rooms.iter().enumerate() {
            assert!((3..=9).contains(&a.width) && (3..=9).contains(&a.height));
            assert!(a.left >= 1 && a.top >= 1 && a.right() <= 49 && a.bottom() <= 29);
            for b in &rooms[i + 1..] {
                // At least one wall cell between any two rooms
                let gap_x = (b.left - a.right()).max(a.left - b.right());
                let gap_y = (b.top - a.bottom()).max(a.top - b.bottom());
                assert!(gap_x >= 1 || gap_y >= 1, "{a:?} {b:?}");
            }
        }
    }
}
