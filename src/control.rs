/// Turn keys reported by the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnKey {
    Left,
    Right,
}

/// Edge detector for manual turning: a key fires once when pressed and not
/// again until it has been released.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnInput {
    left_held: bool,
    right_held: bool,
}

impl TurnInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Some(left)` when this press should turn the snake.
    pub fn key_down(&mut self, key: TurnKey) -> Option<bool> {
        let held = self.held_mut(key);
        if *held {
            return None;
        }
        *held = true;
        Some(key == TurnKey::Left)
    }

    pub fn key_up(&mut self, key: TurnKey) {
        *self.held_mut(key) = false;
    }

    fn held_mut(&mut self, key: TurnKey) -> &mut bool {
        match key {
            TurnKey::Left => &mut self.left_held,
            TurnKey::Right => &mut self.right_held,
        }
    }
}
