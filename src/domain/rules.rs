/// Interaction rules, truth-table driven.
///
/// Pure functions over entity state, no side effects. These decide what
/// an overlap MEANS; `sim::step` applies the outcome (score, flags,
/// deactivation) and emits events.
///
/// ## Interaction Truth Table
///
/// ### Player vs barrel / monkey
/// ┌──────────────────────────────┬──────────────┬─────────────────────┐
/// │ Condition                     │ Outcome      │ Notes               │
/// ├──────────────────────────────┼──────────────┼─────────────────────┤
/// │ no overlap / target inactive  │ Harmless     │                     │
/// │ overlap, hammer held          │ Defeat       │ target destroyed    │
/// │ overlap, no hammer            │ Fatal        │ game over           │
/// └──────────────────────────────┴──────────────┴─────────────────────┘
///
/// ### Player vs boss
/// ┌──────────────────────────────┬──────────────┐
/// │ Condition                     │ Outcome      │
/// ├──────────────────────────────┼──────────────┤
/// │ no overlap                    │ None         │
/// │ overlap, hammer held          │ Win          │
/// │ overlap, no hammer            │ Fatal        │
/// └──────────────────────────────┴──────────────┘
///
/// ### Projectile targets (first match wins, one target per projectile)
/// ┌──────────┬──────────────────────────────────┬──────────────────┐
/// │ Kind     │ Checked in order                  │ Effect           │
/// ├──────────┼──────────────────────────────────┼──────────────────┤
/// │ Bullet   │ boss, then living monkeys in order│ boss −1 / kill   │
/// │ Banana   │ player                            │ game over        │
/// └──────────┴──────────────────────────────────┴──────────────────┘
///
/// ### Jump clearance (scored independently of any contact)
///   jumping
///   ∧ |player.x − barrel.x| ≤ tolerance
///   ∧ player.y < barrel.y
///   ∧ player.bottom ≥ barrel.bottom − J²/(2g) − player.h/2
/// where J is the jump impulse and g the player's gravity, so J²/(2g) is
/// the jump's peak height.
///
/// ### Level outcome (priority order)
/// ┌──────────────────────────────┬──────────────┐
/// │ Condition                     │ Outcome      │
/// ├──────────────────────────────┼──────────────┤
/// │ boss health 0 / reached boss  │ Won          │
/// │ any fatal flag / time up      │ Lost         │
/// │ otherwise                     │ in progress  │
/// └──────────────────────────────┴──────────────┘

use super::entity::{Barrel, Boss};
use super::patrol::Monkey;
use super::physics::Collidable;
use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    Harmless,
    /// The player's hammer destroys the target.
    Defeat,
    Fatal,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BossContact {
    None,
    Win,
    Fatal,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectileTarget {
    Boss,
    /// Index into the monkey list.
    Monkey(usize),
    Player,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelOutcome {
    Won,
    Lost,
}

/// Inputs to the jump-clearance test.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct JumpClearance {
    /// Jump impulse (negative = up).
    pub impulse: f64,
    /// The player's gravity acceleration.
    pub gravity: f64,
    /// Maximum horizontal misalignment, in pixels.
    pub tolerance: f64,
}

impl JumpClearance {
    /// Height reached by a jump launched at `impulse` under `gravity`.
    pub fn peak_height(&self) -> f64 {
        self.impulse * self.impulse / (2.0 * self.gravity)
    }
}

// ── Contact rules ──

/// Player touching a barrel or a monkey. See truth table above.
pub fn hazard_contact<T: Collidable>(player: &Player, target: &T) -> Contact {
    if !player.collides_with(target) { return Contact::Harmless; }
    if player.has_hammer() { Contact::Defeat } else { Contact::Fatal }
}

pub fn boss_contact(player: &Player, boss: &Boss) -> BossContact {
    if !player.collides_with(boss) { return BossContact::None; }
    if player.has_hammer() { BossContact::Win } else { BossContact::Fatal }
}

/// Is the player airborne over this barrel with enough clearance?
pub fn clears_barrel(player: &Player, barrel: &Barrel, clearance: &JumpClearance) -> bool {
    if !player.jumping || !barrel.is_active() { return false; }
    let p = &player.body;
    let b = &barrel.body;
    (p.x - b.x).abs() <= clearance.tolerance
        && p.y < b.y
        && p.bottom() >= b.bottom() - clearance.peak_height() - p.half_h()
}

// ── Projectile rules ──

/// The single target an active projectile hits this tick, if any.
pub fn projectile_target(
    projectile: &Projectile,
    boss: &Boss,
    monkeys: &[Monkey],
    player: &Player,
) -> Option<ProjectileTarget> {
    if !projectile.is_active() { return None; }
    match projectile.kind {
        ProjectileKind::Bullet => {
            if projectile.collides_with(boss) {
                return Some(ProjectileTarget::Boss);
            }
            monkeys
                .iter()
                .position(|m| projectile.collides_with(m))
                .map(ProjectileTarget::Monkey)
        }
        ProjectileKind::Banana => {
            projectile.collides_with(player).then_some(ProjectileTarget::Player)
        }
    }
}

// ── Outcome ──

/// Combine the tick's flags. A win on the same tick as a loss is a win.
pub fn level_outcome(complete: bool, game_over: bool) -> Option<LevelOutcome> {
    if complete {
        Some(LevelOutcome::Won)
    } else if game_over {
        Some(LevelOutcome::Lost)
    } else {
        None
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests: one group per truth table
// ══════════════════════════════════════════════════════════════
