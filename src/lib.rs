/// Girder: physics, collision and interaction core of a girder-climbing
/// platformer, plus the level and configuration loaders that feed it.
///
/// The terminal front-end lives in the binary; everything here is free of
/// terminal I/O.

pub mod config;
pub mod domain;
pub mod sim;
