/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound; they never feed back
/// into the simulation.

use crate::domain::equipment::Weapon;
use crate::domain::projectile::ProjectileKind;

/// What ended the player's run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeathCause {
    Barrel,
    Boss,
    Monkey,
    Banana,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped,
    BarrelCleared { index: usize },
    BarrelSmashed { index: usize },
    WeaponPicked { weapon: Weapon },
    ShotFired { ammo_left: u32 },
    BananaThrown { monkey: usize },
    BossHit { health_left: u32 },
    MonkeyKilled { index: usize },
    ProjectileExpired { kind: ProjectileKind },
    PlayerKilled { cause: DeathCause },
    TimeUp,
    LevelWon,
}
