//! Generational trainer: run every snake until the generation ends, rank by
//! length, then rebuild the population from elites, mutated clones and
//! fresh random networks.

use crate::agent::Agent;
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::game::DeathCause;
use crate::view::LeaderView;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::{debug, info, warn};

/// Generation state machine. `evolve` walks Evaluating, Selecting and
/// Reproducing in order and returns to Running before handing back control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Evaluating,
    Selecting,
    Reproducing,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: u64,
    pub ticks: u32,
    pub best_fitness: usize,
    pub mean_fitness: f64,
    /// Agents still alive when the tick budget ran out.
    pub survivors: usize,
    pub wall_deaths: usize,
    pub self_collisions: usize,
    pub boards_filled: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickReport {
    Running { alive: usize },
    GenerationComplete(GenerationSummary),
}

pub struct Population {
    config: SimConfig,
    agents: Vec<Agent>,
    generation: u64,
    tick_count: u32,
    phase: Phase,
    history: Vec<GenerationSummary>,
    best_fitness: usize,
    manual_pilot: bool,
    rng: SmallRng,
}

impl Population {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let layer_sizes = config.layer_sizes();
        let agents = (0..config.population_size)
            .map(|_| Agent::random(&layer_sizes, config.grid_size, &mut rng))
            .collect();

        if config.parallel && config.population_size < rayon::current_num_threads() {
            warn!(
                population = config.population_size,
                threads = rayon::current_num_threads(),
                "parallel ticks requested for a population smaller than the thread pool"
            );
        }
        info!(
            population = config.population_size,
            elites = config.elite_count,
            offspring = config.offspring_count(),
            random = config.random_count,
            layers = ?layer_sizes,
            "population ready"
        );

        Ok(Self {
            config,
            agents,
            generation: 0,
            tick_count: 0,
            phase: Phase::Running,
            history: Vec::new(),
            best_fitness: 0,
            manual_pilot: false,
            rng,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Between calls this is always [`Phase::Running`]; the other phases are
    /// only held while [`Population::evolve`] runs and are traced at debug
    /// level as they are entered.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    /// Longest body seen in any finished generation.
    pub fn best_fitness(&self) -> usize {
        self.best_fitness
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Advances every living agent by one step and closes the generation once
    /// everyone is dead or the tick budget is spent.
    pub fn tick(&mut self) -> TickReport {
        self.tick_count += 1;

        let manual = self.manual_pilot;
        let moves = (self.tick_count - 1) % self.config.move_interval == 0;
        let advance = |(i, agent): (usize, &mut Agent)| {
            if !moves {
                agent.wait();
            } else if manual && i == 0 {
                agent.advance_manual();
            } else {
                agent.advance();
            }
        };
        if self.config.parallel {
            self.agents.par_iter_mut().enumerate().for_each(advance);
        } else {
            self.agents.iter_mut().enumerate().for_each(advance);
        }

        let alive = self.alive_count();
        if alive == 0 || self.tick_count >= self.config.max_ticks {
            TickReport::GenerationComplete(self.evolve())
        } else {
            TickReport::Running { alive }
        }
    }

    /// Ticks until the current generation completes.
    pub fn run_generation(&mut self) -> GenerationSummary {
        loop {
            if let TickReport::GenerationComplete(summary) = self.tick() {
                return summary;
            }
        }
    }

    /// Scores the current generation, ranks it and replaces it with the next one.
    pub fn evolve(&mut self) -> GenerationSummary {
        self.enter(Phase::Evaluating);
        let summary = self.summarize();
        self.best_fitness = self.best_fitness.max(summary.best_fitness);
        info!(
            generation = summary.generation,
            ticks = summary.ticks,
            best = summary.best_fitness,
            mean = summary.mean_fitness,
            survivors = summary.survivors,
            all_time_best = self.best_fitness,
            "generation complete"
        );
        self.history.push(summary.clone());

        self.enter(Phase::Selecting);
        let ranked = rank(std::mem::take(&mut self.agents));

        self.enter(Phase::Reproducing);
        self.agents = breed(&ranked, &self.config, &mut self.rng);

        self.generation += 1;
        self.tick_count = 0;
        self.enter(Phase::Running);
        summary
    }

    /// When set, agent 0 ignores its network and only moves where
    /// [`Population::manual_turn`] points it.
    pub fn set_manual_pilot(&mut self, on: bool) {
        self.manual_pilot = on;
    }

    pub fn manual_turn(&mut self, left: bool) {
        if let Some(leader) = self.agents.first_mut() {
            leader.turn(left);
        }
    }

    pub fn leader_view(&self) -> LeaderView {
        let leader = &self.agents[0];
        LeaderView {
            generation: self.generation,
            tick: self.tick_count,
            body: leader.body().collect(),
            target: leader.target(),
            alive: leader.is_alive(),
            fitness: leader.fitness(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(generation = self.generation, from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }

    fn summarize(&self) -> GenerationSummary {
        let n = self.agents.len();
        let total: usize = self.agents.iter().map(Agent::fitness).sum();
        let deaths = |cause: DeathCause| {
            self.agents
                .iter()
                .filter(|a| a.death() == Some(cause))
                .count()
        };
        GenerationSummary {
            generation: self.generation,
            ticks: self.tick_count,
            best_fitness: self.agents.iter().map(Agent::fitness).max().unwrap_or(0),
            mean_fitness: if n == 0 { 0.0 } else { total as f64 / n as f64 },
            survivors: self.alive_count(),
            wall_deaths: deaths(DeathCause::Wall),
            self_collisions: deaths(DeathCause::SelfCollision),
            boards_filled: deaths(DeathCause::BoardFilled),
        }
    }
}

/// Longest first. The sort is stable, so equal lengths keep their order.
pub fn rank(mut agents: Vec<Agent>) -> Vec<Agent> {
    agents.sort_by_key(|a| Reverse(a.fitness()));
    agents
}

/// Builds exactly `config.population_size` agents from a ranked pool: the top
/// `elite_count` as unmutated copies, then mutated clones cycling over the
/// pool, then fresh random agents for whatever is left. An empty pool yields
/// an all-random generation.
pub fn breed<R: Rng + ?Sized>(pool: &[Agent], config: &SimConfig, rng: &mut R) -> Vec<Agent> {
    let n = config.population_size;
    let grid = config.grid_size;
    let mut next = Vec::with_capacity(n);

    let elites = config.elite_count.min(pool.len());
    for parent in &pool[..elites] {
        next.push(Agent::new(parent.network().clone(), grid, rng.r#gen()));
    }

    if !pool.is_empty() {
        for i in 0..config.offspring_count() {
            let mut network = pool[i % pool.len()].network().clone();
            network.mutate(config.mutation_min, config.mutation_max, rng);
            next.push(Agent::new(network, grid, rng.r#gen()));
        }
    }
    let offspring = next.len() - elites;

    let layer_sizes = config.layer_sizes();
    while next.len() < n {
        next.push(Agent::random(&layer_sizes, grid, rng));
    }

    debug!(
        pool = pool.len(),
        elites,
        offspring,
        random = n - elites - offspring,
        "bred next generation"
    );
    next
}
