//! Passage carving
//!
//! Everything that cuts corridors into rock: straight and wide paths, L-shaped
//! zigzags, perturbed winding roads, and round chambers.

use serde::{Deserialize, Serialize};

use crate::rng::Rng;
use crate::world::line::plot_line;
use crate::world::position::Direction;
use crate::world::{Map, Position, Tile};

/// How two points get joined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Passage {
    /// Bresenham line
    #[default]
    Straight,
    /// Axis-aligned corridor with at most two bends
    Zigzag,
    /// Randomly perturbed polyline
    Winding,
}

/// Carve a passage of the given style between two points
pub fn carve_passage(map: &mut Map, rng: &mut Rng, from: Position, to: Position, passage: Passage, wide: bool) {
    match passage {
        Passage::Straight => carve_path(map, from, to, wide),
        Passage::Zigzag => carve_corridor(map, rng, from, to),
        Passage::Winding => carve_winding_road(map, rng, from, to, wide, 10),
    }
}

/// Carve the line from `from` to `to` as corridor.
///
/// A narrow path takes orthogonal steps only. A wide path also carves the cell
/// to the right and below each line cell while those stay off the last
/// column/row.
pub fn carve_path(map: &mut Map, from: Position, to: Position, wide: bool) {
    let (width, height) = map.size();

    for pos in plot_line(from, to, !wide) {
        map.set_tile(pos, Tile::Corridor);

        if wide {
            if pos.x + 1 < width - 1 {
                map.set_tile_xy(pos.x + 1, pos.y, Tile::Corridor);
            }
            if pos.y + 1 < height - 1 {
                map.set_tile_xy(pos.x, pos.y + 1, Tile::Corridor);
            }
        }
    }
}

/// Carve a filled disc, clipped to the map interior
pub fn carve_circle(map: &mut Map, center: Position, radius: i32) {
    assert!(radius >= 0, "negative radius {radius}");
    let (width, height) = map.size();

    let left = (center.x - radius).max(1);
    let top = (center.y - radius).max(1);
    let right = (center.x + radius).min(width - 2);
    let bottom = (center.y + radius).min(height - 2);

    for y in top..=bottom {
        for x in left..=right {
            if Position::new(x, y).distance_squared(&center) <= radius * radius {
                map.set_tile_xy(x, y, Tile::Corridor);
            }
        }
    }
}

/// Axis-aligned corridor from `from` to `to`.
///
/// Walks the primary axis first, optionally turning onto the secondary axis at a
/// random winding point. The primary axis is chosen so the corridor heads into
/// rock when only one of the first steps does. Only wall cells strictly between
/// the endpoints are carved.
pub fn carve_corridor(map: &mut Map, rng: &mut Rng, from: Position, to: Position) {
    let delta = to - from;
    let mut primary_inc = Position::new(delta.x.signum(), 0);
    let mut secondary_inc = Position::new(0, delta.y.signum());
    let mut primary = delta.x.abs();
    let mut secondary = delta.y.abs();

    let rock = |map: &Map, pos: Position| !map.contains(pos) || map.tile(pos) == Tile::Wall;
    let t1 = rock(map, from + primary_inc);
    let t2 = rock(map, from + secondary_inc);

    if (!t1 && t2) || (t1 && t2 && rng.coin()) {
        std::mem::swap(&mut primary, &mut secondary);
        std::mem::swap(&mut primary_inc, &mut secondary_inc);
    }

    let winding_point = if primary > 3 {
        rng.get_int_range(2, primary - 2)
    } else {
        -1
    };

    let mut line = Vec::with_capacity((primary + secondary + 1) as usize);
    let mut current = from;

    loop {
        line.push(current);

        if primary > 0 && (primary != winding_point || secondary == 0) {
            current += primary_inc;
            primary -= 1;
        } else if secondary > 0 {
            current += secondary_inc;
            secondary -= 1;
        } else {
            debug_assert_eq!(current, to);
            break;
        }
    }

    for &pos in line.iter().skip(1).take(line.len().saturating_sub(2)) {
        if map.tile(pos) == Tile::Wall {
            map.set_tile(pos, Tile::Corridor);
        }
    }
}

/// Square of the cosine of the angle between p0p1 and p1p2, signed like the
/// cosine, in thousandths.
fn signcos2(p0: Position, p1: Position, p2: Position) -> i32 {
    let sqlen01 = (p1 - p0).length_squared();
    let sqlen12 = (p2 - p1).length_squared();
    if sqlen01 == 0 || sqlen12 == 0 {
        return 0;
    }

    let a = p1 - p0;
    let b = p2 - p1;
    let prod = a.x * b.x + a.y * b.y;
    let val = 1000 * (prod * prod / sqlen01) / sqlen12;

    if prod < 0 {
        -val
    } else {
        val
    }
}

/// Carve a meandering road from `from` to `to`.
///
/// The straight line is thinned to control points two or three cells apart, then
/// inner control points are nudged at random `perturbation` times per point as
/// long as segments stay 2..=5 cells long and no bend is sharper than 45
/// degrees. The resulting polyline is carved with radius 1 when `wide`.
pub fn carve_winding_road(
    map: &mut Map,
    rng: &mut Rng,
    from: Position,
    to: Position,
    wide: bool,
    perturbation: usize,
) {
    const MIN_DIST2: i32 = 2 * 2;
    const MAX_DIST2: i32 = 5 * 5;
    const MIN_COS2: i32 = 500;

    let (width, height) = map.size();
    let interior = |p: Position| p.x > 0 && p.x < width - 1 && p.y > 0 && p.y < height - 1;
    let mut line = plot_line(from, to, false);

    if line.len() >= 5 {
        let len = line.len();
        let mut j = 0;
        let mut i = 0;

        while i < len {
            line[j] = line[i];
            j += 1;

            if i < len - 5 || i >= len - 1 {
                i += rng.get_int_range(2, 3) as usize;
            } else if i == len - 5 {
                i += 2;
            } else {
                i = len - 1;
            }
        }

        line.truncate(j);

        if line.len() >= 3 {
            for _ in 0..j * perturbation {
                let ri = 1 + rng.get_int(j as i32 - 2) as usize;
                let rdir = Direction::ALL[rng.get_int(Direction::ALL.len() as i32) as usize];
                let rpos = line[ri] + rdir;

                let lod2 = rpos.distance_squared(&line[ri - 1]);
                let hid2 = rpos.distance_squared(&line[ri + 1]);

                if !interior(rpos)
                    || !(MIN_DIST2..=MAX_DIST2).contains(&lod2)
                    || !(MIN_DIST2..=MAX_DIST2).contains(&hid2)
                {
                    continue;
                }

                if signcos2(line[ri - 1], rpos, line[ri + 1]) < MIN_COS2 {
                    continue;
                }
                if ri > 1 && signcos2(line[ri - 2], line[ri - 1], rpos) < MIN_COS2 {
                    continue;
                }
                if ri < line.len() - 2 && signcos2(rpos, line[ri + 1], line[ri + 2]) < MIN_COS2 {
                    continue;
                }

                line[ri] = rpos;
            }
        }
    }

    let radius = if wide { 1 } else { 0 };

    for segment in line.windows(2) {
        for pos in plot_line(segment[0], segment[1], !wide) {
            let left = (pos.x - radius).max(1);
            let top = (pos.y - radius).max(1);
            let right = (pos.x + radius).min(width - 2);
            let bottom = (pos.y + radius).min(height - 2);

            for y in top..=bottom {
                for x in left..=right {
                    if Position::new(x, y).distance_squared(&pos) <= radius * radius {
                        map.set_tile_xy(x, y, Tile::Corridor);
                    }
                }
            }
        }
    }
}

/// Push both ends of the segment outward along its Bresenham direction until
/// each reaches the map border.
pub fn extend_line(map: &Map, from: Position, to: Position) -> (Position, Position) {
    assert_ne!(from, to, "cannot extend a degenerate segment");

    let delta = to - from;
    let mut primary_inc = Position::new(delta.x.signum(), 0);
    let mut secondary_inc = Position::new(0, delta.y.signum());
    let mut primary = delta.x.abs();
    let mut secondary = delta.y.abs();

    if secondary > primary {
        std::mem::swap(&mut primary, &mut secondary);
        std::mem::swap(&mut primary_inc, &mut secondary_inc);
    }

    let (width, height) = map.size();
    let interior = |p: Position| p.x > 0 && p.x < width - 1 && p.y > 0 && p.y < height - 1;

    let mut from = from;
    let mut error = 0;
    while interior(from) {
        from -= primary_inc;
        error += secondary;
        if error * 2 >= primary {
            from -= secondary_inc;
            error -= primary;
        }
    }

    let mut to = to;
    let mut error = 0;
    while interior(to) {
        to += primary_inc;
        error += secondary;
        if error * 2 >= primary {
            to += secondary_inc;
            error -= primary;
        }
    }

    (from, to)
}
