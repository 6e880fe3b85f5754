use crate::pos::{Dir, Pos};
use ahash::AHashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const EMPTY_CELL: f64 = 0.0;
pub const BODY_CELL: f64 = -1.0;
pub const HEAD_CELL: f64 = 0.5;
pub const APPLE_CELL: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    /// No free cell was left for the apple.
    BoardFilled,
}

#[derive(Clone, Debug)]
pub struct Game {
    pub grid_size: i32,
    pub snake: VecDeque<Pos>,
    pub dir: Dir,
    pub apple: Pos,
    pub alive: bool,
    pub death: Option<DeathCause>,
}

impl Game {
    /// Two-segment snake in the middle of the board heading up, apple on a free cell.
    pub fn new<R: Rng + ?Sized>(grid_size: i32, rng: &mut R) -> Self {
        let start = grid_size / 2;
        let snake = VecDeque::from([Pos::new(start, start), Pos::new(start, start + 1)]);
        Self::with_snake(grid_size, snake, Dir::Up, rng)
    }

    pub fn with_snake<R: Rng + ?Sized>(
        grid_size: i32,
        snake: VecDeque<Pos>,
        dir: Dir,
        rng: &mut R,
    ) -> Self {
        debug_assert!(!snake.is_empty());
        let mut g = Self {
            grid_size,
            snake,
            dir,
            apple: Pos::new(0, 0),
            alive: true,
            death: None,
        };
        if !g.place_apple(rng) {
            g.kill(DeathCause::BoardFilled);
        }
        g
    }

    pub fn head(&self) -> Pos {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn snake_contains(&self, p: Pos) -> bool {
        self.snake.iter().any(|&s| s == p)
    }

    pub fn free_cells(&self) -> Vec<Pos> {
        let occupied: AHashSet<Pos> = self.snake.iter().copied().collect();
        (0..self.grid_size)
            .flat_map(|y| (0..self.grid_size).map(move |x| Pos::new(x, y)))
            .filter(|p| !occupied.contains(p))
            .collect()
    }

    /// Moves the apple to a uniformly chosen free cell. Returns false when the
    /// snake covers the whole board.
    pub fn place_apple<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.free_cells().choose(rng) {
            Some(&p) => {
                self.apple = p;
                true
            }
            None => false,
        }
    }

    /// Grows the snake if its head sits on the apple. Returns true if it ate.
    pub fn consume_apple<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.alive || self.head() != self.apple {
            return false;
        }

        let tail = self.snake[self.snake.len() - 1];
        self.snake.push_back(tail);
        if !self.place_apple(rng) {
            self.kill(DeathCause::BoardFilled);
        }
        true
    }

    /// Tail follows head, head moves one cell along `dir`, then collisions
    /// are checked against the moved body.
    pub fn step(&mut self) {
        if !self.alive {
            return;
        }

        let new_head = self.head().offset(self.dir);
        self.snake.pop_back();
        self.snake.push_front(new_head);

        if !new_head.in_bounds(self.grid_size) {
            self.kill(DeathCause::Wall);
        } else if self.snake.iter().skip(1).any(|&s| s == new_head) {
            self.kill(DeathCause::SelfCollision);
        }
    }

    pub fn turn(&mut self, left: bool) {
        self.dir = if left { self.dir.left() } else { self.dir.right() };
    }

    /// Row-major occupancy of every cell.
    pub fn sense(&self) -> Vec<f64> {
        let n = self.grid_size as usize;
        let mut cells = vec![EMPTY_CELL; n * n];
        let mut mark = |p: Pos, v: f64| {
            if p.in_bounds(self.grid_size) {
                cells[p.y as usize * n + p.x as usize] = v;
            }
        };
        mark(self.apple, APPLE_CELL);
        for &s in self.snake.iter().skip(1) {
            mark(s, BODY_CELL);
        }
        mark(self.head(), HEAD_CELL);
        cells
    }

    fn kill(&mut self, cause: DeathCause) {
        self.alive = false;
        self.death = Some(cause);
    }
}
