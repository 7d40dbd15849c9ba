//! Field of View calculation
//!
//! Recursive shadowcasting over eight octants. Each octant keeps a sorted list of
//! shadow intervals in slope space; a cell is lit unless one shadow covers its
//! whole projection.

use super::map::Map;
use super::position::Position;

/// An occluded slope interval `[start, end)` within one octant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub start: f32,
    pub end: f32,
}

impl Shadow {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Projection of the cell at (`col`, `row`) of an octant
    pub fn projection(col: i32, row: i32) -> Self {
        let top_left = col as f32 / (row + 2) as f32;
        let bottom_right = (col + 1) as f32 / (row + 1) as f32;
        Self::new(top_left, bottom_right)
    }

    pub fn contains(&self, other: &Shadow) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    fn overlaps(&self, other: &Shadow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Row and column unit steps for each octant
const OCTANTS: [((i32, i32), (i32, i32)); 8] = [
    ((0, -1), (1, 0)),
    ((1, 0), (0, -1)),
    ((1, 0), (0, 1)),
    ((0, 1), (1, 0)),
    ((0, 1), (-1, 0)),
    ((-1, 0), (0, 1)),
    ((-1, 0), (0, -1)),
    ((0, -1), (-1, 0)),
];

/// Shadowcasting field of view. Reuse one instance across turns to keep the
/// shadow buffer allocated.
#[derive(Debug, Default)]
pub struct Fov {
    shadows: Vec<Shadow>,
}

impl Fov {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every `visible` flag. `explored` is kept.
    pub fn clear(&mut self, map: &mut Map) {
        map.clear_visibility();
    }

    /// Mark everything seen from `origin` within `range` as visible and explored.
    ///
    /// Does not clear previous visibility; call [`Fov::clear`] first each turn.
    pub fn compute(&mut self, map: &mut Map, origin: Position, range: i32) {
        if range < 0 {
            return;
        }

        let flags = map.at_mut(origin);
        flags.visible = true;
        flags.explored = true;

        for octant in 0..OCTANTS.len() {
            self.refresh_octant(map, octant, origin, range + 1);
        }
    }

    fn refresh_octant(&mut self, map: &mut Map, octant: usize, origin: Position, range: i32) {
        let ((rx, ry), (cx, cy)) = OCTANTS[octant];
        let row_inc = Position::new(rx, ry);
        let col_inc = Position::new(cx, cy);

        self.shadows.clear();

        'rows: for row in 1..range {
            let mut pos = origin + row_inc * row;

            if !map.contains(pos) {
                break;
            }

            for col in 0..=row {
                if pos.distance_squared(&origin) >= range * range {
                    break;
                }

                let projection = Shadow::projection(col, row);

                if !self.is_in_shadow(&projection) {
                    let flags = map.at_mut(pos);
                    flags.visible = true;
                    flags.explored = true;

                    if !flags.transparent && self.add_shadow(projection) {
                        break 'rows;
                    }
                }

                pos += col_inc;

                if !map.contains(pos) {
                    break;
                }
            }
        }
    }

    fn is_in_shadow(&self, projection: &Shadow) -> bool {
        self.shadows.iter().any(|shadow| shadow.contains(projection))
    }

    /// Merge a shadow into the sorted list. Returns true once the whole octant
    /// is covered by the single interval `[0, 1]`.
    fn add_shadow(&mut self, shadow: Shadow) -> bool {
        let index = self
            .shadows
            .iter()
            .position(|s| s.start > shadow.start)
            .unwrap_or(self.shadows.len());

        let overlaps_prev = index > 0 && self.shadows[index - 1].end > shadow.start;
        let overlaps_next = index < self.shadows.len() && self.shadows[index].start < shadow.end;

        let merged_at = match (overlaps_prev, overlaps_next) {
            (true, true) => {
                let next = self.shadows.remove(index);
                let prev = &mut self.shadows[index - 1];
                prev.end = prev.end.max(next.end).max(shadow.end);
                index - 1
            }
            (true, false) => {
                let prev = &mut self.shadows[index - 1];
                prev.end = prev.end.max(shadow.end);
                index - 1
            }
            (false, true) => {
                let next = &mut self.shadows[index];
                next.start = next.start.min(shadow.start);
                next.end = next.end.max(shadow.end);
                index
            }
            (false, false) => {
                self.shadows.insert(index, shadow);
                index
            }
        };

        // A widened interval may now reach further intervals
        while merged_at + 1 < self.shadows.len()
            && self.shadows[merged_at].overlaps(&self.shadows[merged_at + 1])
        {
            let next = self.shadows.remove(merged_at + 1);
            let merged = &mut self.shadows[merged_at];
            merged.end = merged.end.max(next.end);
        }

        self.shadows.len() == 1 && self.shadows[0].start == 0.0 && self.shadows[0].end == 1.0
    }

    /// Current shadow list of the last octant processed
    pub fn shadows(&self) -> &[Shadow] {
        &self.shadows
    }
}

pub fn is_visible(map: &Map, pos: Position) -> bool {
    map.contains(pos) && map.at(pos).visible
}

pub fn is_explored(map: &Map, pos: Position) -> bool {
    map.contains(pos) && map.at(pos).explored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::Tile;

    fn open_map(width: i32, height: i32) -> Map {
        let mut map = Map::new(width, height);
        map.tiles_mut().fill(Tile::Floor);
        map.derive_flags();
        map
    }

    #[test]
    fn test_open_room_fully_visible() {
        let mut map = open_map(5, 5);
        let mut fov = Fov::new();
        fov.compute(&mut map, Position::new(2, 2), 2);

        for y in 0..5 {
            for x in 0..5 {
                let pos = Position::new(x, y);
                assert!(is_visible(&map, pos), "{pos:?} should be visible");
                assert!(is_explored(&map, pos));
            }
        }
    }

    #[test]
    fn test_wall_column_occludes() {
        let mut map = open_map(5, 5);
        for y in 0..5 {
            map.set_tile_xy(2, y, Tile::Wall);
        }
        map.derive_flags();

        let mut fov = Fov::new();
        fov.compute(&mut map, Position::new(0, 2), 4);

        for y in 0..5 {
            assert!(is_visible(&map, Position::new(2, y)) || y == 0 || y == 4);
            for x in 3..5 {
                let pos = Position::new(x, y);
                assert!(!is_visible(&map, pos), "{pos:?} is behind the wall");
                assert!(!is_explored(&map, pos));
            }
        }
    }

    #[test]
    fn test_wall_column_with_open_ends() {
        let mut map = open_map(5, 5);
        for y in 1..4 {
            map.set_tile_xy(2, y, Tile::Wall);
        }
        map.derive_flags();

        let mut fov = Fov::new();
        fov.compute(&mut map, Position::new(0, 2), 4);

        for y in 0..5 {
            assert!(is_visible(&map, Position::new(2, y)), "column cell {y}");
        }
        // Seen past the ends of the column
        assert!(is_visible(&map, Position::new(3, 0)));
        assert!(is_visible(&map, Position::new(3, 4)));

        for (x, y) in [(3, 1), (3, 2), (3, 3), (4, 0), (4, 1), (4, 2), (4, 3), (4, 4)] {
            let pos = Position::new(x, y);
            assert!(!is_visible(&map, pos), "{pos:?} is behind the wall");
            assert!(!is_explored(&map, pos));
        }
    }

    #[test]
    fn test_range_limits_and_negative_range() {
        let mut map = open_map(11, 11);
        let mut fov = Fov::new();
        fov.compute(&mut map, Position::new(5, 5), -1);
        assert!(!is_visible(&map, Position::new(5, 5)));

        fov.compute(&mut map, Position::new(5, 5), 3);
        assert!(is_visible(&map, Position::new(8, 5)));
        assert!(!is_visible(&map, Position::new(9, 5)));
        assert!(!is_visible(&map, Position::new(8, 8)));
    }

    #[test]
    fn test_clear_keeps_explored() {
        let mut map = open_map(5, 5);
        let mut fov = Fov::new();
        fov.compute(&mut map, Position::new(2, 2), 2);
        fov.clear(&mut map);

        assert!(!is_visible(&map, Position::new(1, 1)));
        assert!(is_explored(&map, Position::new(1, 1)));
    }

    #[test]
    fn test_pillar_casts_shadow() {
        let mut map = open_map(9, 9);
        map.set_tile_xy(4, 3, Tile::Wall);
        map.derive_flags();

        let mut fov = Fov::new();
        fov.compute(&mut map, Position::new(4, 4), 4);

        assert!(is_visible(&map, Position::new(4, 3)));
        assert!(!is_visible(&map, Position::new(4, 1)));
        assert!(!is_visible(&map, Position::new(4, 0)));
        assert!(is_visible(&map, Position::new(4, 6)));
    }

    #[test]
    fn test_shadows_never_overlap() {
        let mut fov = Fov::new();
        let inserts = [
            Shadow::new(0.5, 0.6),
            Shadow::new(0.1, 0.2),
            Shadow::new(0.3, 0.4),
            Shadow::new(0.15, 0.55),
            Shadow::new(0.7, 0.8),
            Shadow::new(0.65, 0.9),
        ];
        for shadow in inserts {
            fov.add_shadow(shadow);
            let list = fov.shadows();
            for pair in list.windows(2) {
                assert!(pair[0].end <= pair[1].start, "{list:?}");
            }
        }
        assert_eq!(fov.shadows(), &[Shadow::new(0.1, 0.6), Shadow::new(0.65, 0.9)]);
    }

    #[test]
    fn test_full_shadow_detection() {
        let mut fov = Fov::new();
        assert!(!fov.add_shadow(Shadow::new(0.0, 0.5)));
        assert!(fov.add_shadow(Shadow::new(0.25, 1.0)));
    }
}
