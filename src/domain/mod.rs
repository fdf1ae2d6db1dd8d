/// Pure game rules: geometry, physics and entity behavior.
/// Nothing in here performs I/O or knows about the world container.

pub mod entity;
pub mod equipment;
pub mod geometry;
pub mod patrol;
pub mod physics;
pub mod player;
pub mod projectile;
pub mod rules;
pub mod sprite;
