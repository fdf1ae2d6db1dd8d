/// WorldState: the complete snapshot of a running level.
///
/// ## Ownership
///
/// Every entity of the level lives in a `Vec` owned by the world, created
/// once by `from_level` and discarded wholesale on level change or restart.
/// Destroyed / collected / dead entities stay in place with their inactive
/// flag set. Projectiles are the only collection that shrinks: inactive
/// ones are purged once per tick, after every pass over them is done.
///
/// ## Query surface
///
/// The HUD reads `score()`, `seconds_left()`, `boss_health()` and `ammo()`
/// once per frame; nothing outside `sim::step` mutates the world.

use tracing::{info, warn};

use crate::config::Tuning;
use crate::domain::entity::{Barrel, Boss, Ladder, Pickup, Platform};
use crate::domain::equipment::Weapon;
use crate::domain::patrol::Monkey;
use crate::domain::player::Player;
use crate::domain::projectile::Projectile;
use crate::domain::rules::{JumpClearance, LevelOutcome};
use crate::domain::sprite::SpriteId;

use super::level::LevelData;

pub struct WorldState {
    pub tuning: Tuning,

    // ── Entities ──
    pub player: Player,
    pub boss: Boss,
    pub platforms: Vec<Platform>,
    pub ladders: Vec<Ladder>,
    pub barrels: Vec<Barrel>,
    pub pickups: Vec<Pickup>,
    pub monkeys: Vec<Monkey>,
    pub projectiles: Vec<Projectile>,

    // ── Game tracking ──
    pub level_name: String,
    pub score: u32,
    pub frame: u32,
    pub max_frames: u32,
    pub game_over: bool,
    pub level_complete: bool,
    pub outcome: Option<LevelOutcome>,
}

// ── Construction ──

impl WorldState {
    /// Build a fresh level. `score` is what the player carries in.
    pub fn from_level(level: &LevelData, tuning: Tuning, score: u32) -> Self {
        let sprites = &tuning.sprites;
        let sized = |id: SpriteId| sprites.size(id);

        let platforms: Vec<Platform> = level.platforms.iter()
            .map(|s| Platform::new(s.x, s.y, sized(SpriteId::Platform)))
            .collect();
        let mut ladders: Vec<Ladder> = level.ladders.iter()
            .map(|s| Ladder::new(s.x, s.y, sized(SpriteId::Ladder)))
            .collect();
        for (i, ladder) in ladders.iter_mut().enumerate() {
            if !ladder.settle(&tuning.gravity, &platforms, &tuning.screen) {
                warn!(level = %level.name, index = i, "ladder has no platform below it");
            }
        }
        let barrels = level.barrels.iter()
            .map(|s| Barrel::new(s.x, s.y, sized(SpriteId::Barrel)))
            .collect();
        let hammers = level.hammers.iter()
            .map(|s| Pickup::new(s.x, s.y, sized(SpriteId::Hammer), Weapon::Hammer));
        let blasters = level.blasters.iter()
            .map(|s| Pickup::new(s.x, s.y, sized(SpriteId::Blaster), Weapon::Blaster));
        let pickups = hammers.chain(blasters).collect();
        let monkeys = level.monkeys.iter()
            .map(|m| Monkey::new(m.at.x, m.at.y, m.facing, m.kind, m.pattern.clone(), sprites))
            .collect();

        let player = Player::new(level.player.x, level.player.y, sprites);
        let boss = Boss::new(
            level.boss.x, level.boss.y, sized(SpriteId::Boss), tuning.combat.boss_health,
        );

        info!(level = %level.name, score, "level started");

        WorldState {
            player,
            boss,
            platforms,
            ladders,
            barrels,
            pickups,
            monkeys,
            projectiles: vec![],
            level_name: level.name.clone(),
            score,
            frame: 0,
            max_frames: level.max_frames,
            game_over: false,
            level_complete: false,
            outcome: None,
            tuning,
        }
    }
}

// ── Query surface ──

impl WorldState {
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whole seconds until the frame ceiling, never negative.
    pub fn seconds_left(&self) -> u32 {
        self.max_frames.saturating_sub(self.frame) / self.tuning.ticks_per_second
    }

    pub fn boss_health(&self) -> u32 {
        self.boss.health
    }

    pub fn ammo(&self) -> u32 {
        self.player.ammo()
    }

    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

// ── Derived views for the step ──

impl WorldState {
    pub fn jump_clearance(&self) -> JumpClearance {
        JumpClearance {
            impulse: self.tuning.motion.jump_impulse,
            gravity: self.tuning.gravity.player.accel,
            tolerance: self.tuning.combat.jump_align_tolerance,
        }
    }
}
