mod astar;

pub use astar::{astar, astar_next_step, astar_on_map};
