//! Snake agents controlled by small sigmoid networks, trained by a
//! generational genetic algorithm with elitism and weight mutation.
//!
//! - [`neural`]: the networks themselves
//! - [`game`] and [`agent`]: one snake and the network steering it
//! - [`population`]: the tick loop and the select/mutate/repopulate cycle
//! - [`config`], [`control`], [`view`]: run settings, manual turn input and
//!   the read-only snapshot handed to renderers

pub mod agent;
pub mod config;
pub mod control;
pub mod error;
pub mod game;
pub mod neural;
pub mod population;
pub mod pos;
pub mod view;

pub use agent::{Action, Agent};
pub use config::SimConfig;
pub use error::ConfigError;
pub use neural::NeuralNetwork;
pub use population::{GenerationSummary, Phase, Population, TickReport};
pub use pos::{Dir, Pos};
pub use view::LeaderView;
