use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Dir) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self, grid_size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < grid_size && self.y < grid_size
    }
}

/// Heading on the grid. `y` grows downwards, so `Up` decrements it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub fn left(self) -> Dir {
        match self {
            Dir::Up => Dir::Left,
            Dir::Left => Dir::Down,
            Dir::Down => Dir::Right,
            Dir::Right => Dir::Up,
        }
    }

    pub fn right(self) -> Dir {
        match self {
            Dir::Up => Dir::Right,
            Dir::Right => Dir::Down,
            Dir::Down => Dir::Left,
            Dir::Left => Dir::Up,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turning_wraps_through_all_four_headings() {
        let mut d = Dir::Up;
        for expected in [Dir::Right, Dir::Down, Dir::Left, Dir::Up] {
            d = d.right();
            assert_eq!(d, expected);
        }
        for expected in [Dir::Left, Dir::Down, Dir::Right, Dir::Up] {
            d = d.left();
            assert_eq!(d, expected);
        }
    }

    #[test]
    fn bounds_are_half_open() {
        assert!(Pos::new(0, 0).in_bounds(11));
        assert!(Pos::new(10, 10).in_bounds(11));
        assert!(!Pos::new(11, 3).in_bounds(11));
        assert!(!Pos::new(3, -1).in_bounds(11));
    }
}
