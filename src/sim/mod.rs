/// Simulation: the world container, the per-tick step and level loading.

pub mod campaign;
pub mod event;
pub mod level;
pub mod step;
pub mod world;
