//! Line rasterization
//!
//! Bresenham lines shared by every passage carver.

use super::position::Position;

/// Cells on the Bresenham line from `from` to `to`, both ends included.
///
/// With `orthogonal_steps` an extra cell is emitted before every diagonal step so
/// consecutive cells are always 4-adjacent.
///
/// The line is traced from the lower endpoint (by row, then column) so that
/// swapping the endpoints yields exactly the reversed sequence.
pub fn plot_line(from: Position, to: Position, orthogonal_steps: bool) -> Vec<Position> {
    if (to.y, to.x) < (from.y, from.x) {
        let mut line = trace(to, from, orthogonal_steps);
        line.reverse();
        line
    } else {
        trace(from, to, orthogonal_steps)
    }
}

fn trace(from: Position, to: Position, orthogonal_steps: bool) -> Vec<Position> {
    let delta = to - from;
    let mut primary_inc = Position::new(delta.x.signum(), 0);
    let mut secondary_inc = Position::new(0, delta.y.signum());
    let mut primary = delta.x.abs();
    let mut secondary = delta.y.abs();

    if secondary > primary {
        std::mem::swap(&mut primary, &mut secondary);
        std::mem::swap(&mut primary_inc, &mut secondary_inc);
    }

    let mut line = Vec::with_capacity((primary + secondary + 1) as usize);
    let mut current = from;
    let mut error = 0;

    loop {
        line.push(current);

        if current == to {
            break;
        }

        current += primary_inc;
        error += secondary;

        if error * 2 >= primary {
            if orthogonal_steps {
                line.push(current);
            }
            current += secondary_inc;
            error -= primary;
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point() {
        let p = Position::new(3, 4);
        assert_eq!(plot_line(p, p, false), vec![p]);
        assert_eq!(plot_line(p, p, true), vec![p]);
    }

    #[test]
    fn test_reversal_symmetry() {
        let ends = [
            Position::new(0, 0),
            Position::new(7, 2),
            Position::new(2, 1),
            Position::new(-3, 5),
            Position::new(4, -6),
            Position::new(1, 9),
        ];
        for &a in &ends {
            for &b in &ends {
                for ortho in [false, true] {
                    let forward = plot_line(a, b, ortho);
                    let mut backward = plot_line(b, a, ortho);
                    backward.reverse();
                    assert_eq!(forward, backward, "{a:?} -> {b:?} ortho={ortho}");
                }
            }
        }
    }

    #[test]
    fn test_endpoints_and_adjacency() {
        let from = Position::new(1, 1);
        let to = Position::new(8, 4);

        let line = plot_line(from, to, false);
        assert_eq!(line.first(), Some(&from));
        assert_eq!(line.last(), Some(&to));
        assert_eq!(line.len(), 8);
        assert!(line.windows(2).all(|w| w[0].chebyshev_distance(&w[1]) == 1));

        let ortho = plot_line(from, to, true);
        assert_eq!(ortho.len(), 8 + 3);
        assert!(ortho.windows(2).all(|w| w[0].distance(&w[1]) == 1));
    }
}
