use crate::game::{DeathCause, Game};
use crate::neural::NeuralNetwork;
use crate::pos::{Dir, Pos};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Number of network outputs: scores for turning left, going straight, turning right.
pub const ACTIONS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Left,
    Straight,
    Right,
}

impl Action {
    /// Highest score wins; ties go to the earlier of left, straight, right.
    pub fn from_scores(scores: &[f64]) -> Action {
        debug_assert_eq!(scores.len(), ACTIONS);
        if scores[0] >= scores[1] && scores[0] >= scores[2] {
            Action::Left
        } else if scores[1] >= scores[2] {
            Action::Straight
        } else {
            Action::Right
        }
    }

    pub fn apply(self, dir: Dir) -> Dir {
        match self {
            Action::Left => dir.left(),
            Action::Straight => dir,
            Action::Right => dir.right(),
        }
    }
}

/// One snake driven by its own network.
#[derive(Clone, Debug)]
pub struct Agent {
    network: NeuralNetwork,
    game: Game,
    rng: SmallRng,
    ticks_lived: u32,
}

impl Agent {
    /// Fresh game for `network`. The seed drives apple placement only.
    pub fn new(network: NeuralNetwork, grid_size: i32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let game = Game::new(grid_size, &mut rng);
        Self {
            network,
            game,
            rng,
            ticks_lived: 0,
        }
    }

    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], grid_size: i32, rng: &mut R) -> Self {
        let network = NeuralNetwork::new(layer_sizes, rng);
        Self::new(network, grid_size, rng.r#gen())
    }

    /// Replaces the game, e.g. to stage a specific board.
    pub fn with_game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }

    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    pub fn body(&self) -> impl Iterator<Item = Pos> + '_ {
        self.game.snake.iter().copied()
    }

    pub fn target(&self) -> Pos {
        self.game.apple
    }

    pub fn direction(&self) -> Dir {
        self.game.dir
    }

    pub fn is_alive(&self) -> bool {
        self.game.alive
    }

    pub fn death(&self) -> Option<DeathCause> {
        self.game.death
    }

    pub fn ticks_lived(&self) -> u32 {
        self.ticks_lived
    }

    /// Body length; final once the agent is dead.
    pub fn fitness(&self) -> usize {
        self.game.len()
    }

    pub fn sense(&self) -> Vec<f64> {
        self.game.sense()
    }

    /// One full tick: eat if on the apple, sense, decide, move.
    pub fn advance(&mut self) {
        if !self.begin_tick() {
            return;
        }
        let input = self.sense();
        self.step(&input);
    }

    /// Tick for a human-piloted agent: the network is bypassed and the snake
    /// keeps whatever heading [`Agent::turn`] left it with.
    pub fn advance_manual(&mut self) {
        if !self.begin_tick() {
            return;
        }
        self.apply(Action::Straight);
    }

    /// Tick without movement: the snake may still eat the apple under its head.
    pub fn wait(&mut self) {
        self.begin_tick();
    }

    /// Evaluates the network on `input`, turns accordingly and moves.
    pub fn step(&mut self, input: &[f64]) -> Action {
        let scores = self.network.out(input);
        let action = Action::from_scores(&scores);
        self.apply(action);
        action
    }

    pub fn apply(&mut self, action: Action) {
        self.game.dir = action.apply(self.game.dir);
        self.game.step();
    }

    pub fn turn(&mut self, left: bool) {
        self.game.turn(left);
    }

    fn begin_tick(&mut self) -> bool {
        if !self.game.alive {
            return false;
        }
        self.ticks_lived += 1;
        if self.game.consume_apple(&mut self.rng) && !self.game.alive {
            tracing::warn!(length = self.game.len(), "snake filled the board");
        }
        self.game.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(seed: u64) -> Agent {
        let mut rng = SmallRng::seed_from_u64(seed);
        Agent::random(&[121, 10, 10, ACTIONS], 11, &mut rng)
    }

    #[test]
    fn scores_pick_the_highest_with_left_biased_ties() {
        assert_eq!(Action::from_scores(&[0.9, 0.1, 0.2]), Action::Left);
        assert_eq!(Action::from_scores(&[0.1, 0.9, 0.2]), Action::Straight);
        assert_eq!(Action::from_scores(&[0.1, 0.2, 0.9]), Action::Right);
        assert_eq!(Action::from_scores(&[0.5, 0.5, 0.5]), Action::Left);
        assert_eq!(Action::from_scores(&[0.1, 0.5, 0.5]), Action::Straight);
    }

    #[test]
    fn actions_are_relative_to_the_heading() {
        assert_eq!(Action::Left.apply(Dir::Up), Dir::Left);
        assert_eq!(Action::Right.apply(Dir::Up), Dir::Right);
        assert_eq!(Action::Straight.apply(Dir::Down), Dir::Down);
        assert_eq!(Action::Right.apply(Dir::Left), Dir::Up);
    }

    #[test]
    fn straight_move_from_the_start() {
        let mut a = agent(1);
        assert_eq!(a.body().collect::<Vec<_>>(), vec![Pos::new(5, 5), Pos::new(5, 6)]);
        a.apply(Action::Straight);
        assert_eq!(a.body().collect::<Vec<_>>(), vec![Pos::new(5, 4), Pos::new(5, 5)]);
        assert_eq!(a.direction(), Dir::Up);
    }

    #[test]
    fn step_follows_the_network_decision() {
        let mut a = agent(2);
        let input = a.sense();
        let expected = Action::from_scores(&a.network.clone().out(&input));
        let head = a.body().next().unwrap();

        let taken = a.step(&input);
        assert_eq!(taken, expected);
        let dir = expected.apply(Dir::Up);
        assert_eq!(a.direction(), dir);
        assert_eq!(a.body().next().unwrap(), head.offset(dir));
    }

    #[test]
    fn manual_turns_steer_the_piloted_snake() {
        let mut a = agent(3);
        a.game.apple = Pos::new(0, 0);
        a.turn(false);
        a.advance_manual();
        assert_eq!(a.direction(), Dir::Right);
        assert_eq!(a.body().next().unwrap(), Pos::new(6, 5));
        a.turn(true);
        a.turn(true);
        assert_eq!(a.direction(), Dir::Left);
        assert_eq!(a.ticks_lived(), 1);
    }

    #[test]
    fn waiting_eats_but_does_not_move() {
        let mut a = agent(5);
        let head = a.body().next().unwrap();
        a.game.apple = head;
        let before: Vec<Pos> = a.body().collect();

        a.wait();
        assert_eq!(a.fitness(), 3);
        assert_eq!(a.body().take(2).collect::<Vec<_>>(), before);
        assert_eq!(a.ticks_lived(), 1);
        assert!(a.is_alive());
    }

    #[test]
    fn dead_agents_stop_counting_ticks() {
        let mut a = agent(4);
        for _ in 0..10_000 {
            a.advance();
            if !a.is_alive() {
                break;
            }
        }
        assert!(!a.is_alive());
        let lived = a.ticks_lived();
        a.advance();
        assert_eq!(a.ticks_lived(), lived);
        assert!(a.death().is_some());
        assert!(a.fitness() >= 2);
    }
}
