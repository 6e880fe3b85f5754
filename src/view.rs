use crate::pos::Pos;
use serde::Serialize;

/// What a renderer needs for one frame: the leading agent's board.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderView {
    pub generation: u64,
    pub tick: u32,
    pub body: Vec<Pos>,
    pub target: Pos,
    pub alive: bool,
    pub fitness: usize,
}
