//! Grid coordinates and directions
//!
//! `Position` is a cell coordinate, `Direction` one of the eight unit steps
//! between neighbouring cells (or `NONE`).

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Position on the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Squared length of this position read as a vector
    pub fn length_squared(&self) -> i32 {
        self.x * self.x + self.y * self.y
    }

    /// Squared euclidean distance to another position
    pub fn distance_squared(&self, other: &Position) -> i32 {
        (*self - *other).length_squared()
    }

    /// Component-wise sign
    pub fn signum(&self) -> Position {
        Position::new(self.x.signum(), self.y.signum())
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Position {
    fn sub_assign(&mut self, rhs: Position) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<i32> for Position {
    type Output = Position;

    fn mul(self, rhs: i32) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<i32> for Position {
    type Output = Position;

    fn div(self, rhs: i32) -> Position {
        Position::new(self.x / rhs, self.y / rhs)
    }
}

/// A unit step to one of the eight neighbours, or `NONE`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const NONE: Direction = Direction::new(0, 0);
    pub const N: Direction = Direction::new(0, -1);
    pub const NE: Direction = Direction::new(1, -1);
    pub const E: Direction = Direction::new(1, 0);
    pub const SE: Direction = Direction::new(1, 1);
    pub const S: Direction = Direction::new(0, 1);
    pub const SW: Direction = Direction::new(-1, 1);
    pub const W: Direction = Direction::new(-1, 0);
    pub const NW: Direction = Direction::new(-1, -1);

    /// All eight directions, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub const CARDINAL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub const DIAGONAL: [Direction; 4] = [Direction::NE, Direction::SE, Direction::SW, Direction::NW];

    const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_none(&self) -> bool {
        *self == Direction::NONE
    }

    /// Rotate 45 degrees counter-clockwise
    pub fn left45(&self) -> Direction {
        Direction::new((self.dx + self.dy).clamp(-1, 1), (self.dy - self.dx).clamp(-1, 1))
    }

    /// Rotate 45 degrees clockwise
    pub fn right45(&self) -> Direction {
        Direction::new((self.dx - self.dy).clamp(-1, 1), (self.dy + self.dx).clamp(-1, 1))
    }

    /// Rotate 90 degrees counter-clockwise
    pub fn left90(&self) -> Direction {
        Direction::new(self.dy, -self.dx)
    }

    /// Rotate 90 degrees clockwise
    pub fn right90(&self) -> Direction {
        Direction::new(-self.dy, self.dx)
    }

    /// The step as a position offset
    pub fn offset(&self) -> Position {
        Position::new(self.dx, self.dy)
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Direction {
        Direction::new(-self.dx, -self.dy)
    }
}

impl Mul<i32> for Direction {
    type Output = Position;

    fn mul(self, rhs: i32) -> Position {
        Position::new(self.dx * rhs, self.dy * rhs)
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, rhs: Direction) -> Position {
        Position::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl AddAssign<Direction> for Position {
    fn add_assign(&mut self, rhs: Direction) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}
