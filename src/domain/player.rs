/// Player locomotion controller.
///
/// Implicit states, derived each tick rather than stored as an enum:
///
/// ┌───────────┬──────────────────────────────────────────────────────┐
/// │ State     │ Condition                                            │
/// ├───────────┼──────────────────────────────────────────────────────┤
/// │ OnLadder  │ overlaps a ladder with its center between the rails  │
/// │ Grounded  │ landed on a platform during this tick                │
/// │ Airborne  │ neither of the above                                 │
/// └───────────┴──────────────────────────────────────────────────────┘
///
/// Per-tick order:
///   1. Horizontal input (move + facing)
///   2. Weapon pickups
///   3. Sprite refresh (bottom edge preserved)
///   4. Ladder climbing (replaces gravity while on a ladder)
///   5. Gravity integration
///   6. Surface resolution (`Landing::WithinStep`) → grounded
///   7. Jump, only if grounded this tick
///   8. Screen clamps

use super::entity::{Ladder, Pickup, Platform};
use super::equipment::{Equipment, Weapon};
use super::geometry::{Body, Facing, Screen};
use super::physics::{
    self, Collidable, Gravity, HorizontallyBounded, Landing,
};
use super::sprite::{SpriteId, SpriteSheet};

/// Tolerance for "exactly at the ladder's end" comparisons.
const EDGE_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClimbDir {
    Up,
    Down,
}

/// One frame of input: held directions plus edge-triggered actions.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub horizontal: Option<Facing>,
    pub vertical: Option<ClimbDir>,
    /// Fresh press this frame.
    pub jump: bool,
    /// Fresh press this frame.
    pub fire: bool,
}

/// Result of the ladder pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Grip {
    OnLadder,
    /// Left the top rung downward this tick; not yet overlapping the ladder.
    SteppingOn,
    Free,
}

/// Per-tick movement constants.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Motion {
    pub player_speed: f64,
    pub monkey_speed: f64,
    /// Negative: up.
    pub jump_impulse: f64,
    pub climb_speed: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Motion {
            player_speed: 3.5,
            monkey_speed: 0.5,
            jump_impulse: -5.0,
            climb_speed: 2.0,
        }
    }
}

/// Everything the player reads (but never mutates) during its update.
pub struct PlayerEnv<'a> {
    pub ladders: &'a [Ladder],
    pub platforms: &'a [Platform],
    pub screen: Screen,
    pub gravity: Gravity,
    pub motion: Motion,
    pub sprites: &'a SpriteSheet,
    pub blaster_pack: u32,
}

/// What happened to the player this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerReport {
    pub picked: Vec<Weapon>,
    pub jumped: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub vy: f64,
    pub facing: Facing,
    pub equipment: Equipment,
    pub sprite: SpriteId,
    /// Set by a jump, cleared on landing. Walking off a ledge is not jumping.
    pub jumping: bool,
    /// Number of jumps started this level; identifies the current jump.
    pub jump_count: u32,
    pub on_ladder: bool,
    pub grounded: bool,
}

impl Player {
    pub fn new(x: f64, y: f64, sprites: &SpriteSheet) -> Self {
        let sprite = SpriteId::player(Equipment::Unarmed, Facing::Right);
        Player {
            body: Body::new(x, y, sprites.size(sprite)),
            vy: 0.0,
            facing: Facing::Right,
            equipment: Equipment::Unarmed,
            sprite,
            jumping: false,
            jump_count: 0,
            on_ladder: false,
            grounded: false,
        }
    }

    pub fn has_hammer(&self) -> bool {
        self.equipment.is_melee()
    }

    pub fn ammo(&self) -> u32 {
        self.equipment.ammo()
    }

    /// Advance one tick. See the module docs for the order of operations.
    pub fn update(&mut self, input: &FrameInput, env: &PlayerEnv, pickups: &mut [Pickup]) -> PlayerReport {
        let mut report = PlayerReport::default();

        self.walk(input.horizontal, env.motion.player_speed);
        report.picked = self.collect_pickups(pickups, env.blaster_pack);
        self.refresh_sprite(env.sprites);

        let grip = self.climb(input.vertical, env.ladders, env.motion.climb_speed);
        self.on_ladder = grip == Grip::OnLadder;
        match grip {
            Grip::OnLadder | Grip::SteppingOn => self.vy = 0.0,
            Grip::Free => physics::integrate(&mut self.body, &mut self.vy, env.gravity),
        }

        self.grounded = physics::resolve_surfaces(
            &mut self.body, &mut self.vy, env.platforms, Landing::WithinStep,
        );
        if self.grounded {
            self.jumping = false;
            if input.jump {
                self.vy = env.motion.jump_impulse;
                self.jumping = true;
                self.jump_count += 1;
                report.jumped = true;
            }
        }

        self.enforce_bounds(&env.screen);
        report
    }

    /// Spend one blaster round. The sprite is refreshed because firing the
    /// last round drops the blaster.
    pub fn fire(&mut self, sprites: &SpriteSheet) -> bool {
        let fired = self.equipment.fire();
        if fired {
            self.refresh_sprite(sprites);
        }
        fired
    }

    /// Re-select the sprite for the current loadout and facing.
    /// Post-condition: the bottom edge does not move.
    pub fn refresh_sprite(&mut self, sprites: &SpriteSheet) {
        let sprite = SpriteId::player(self.equipment, self.facing);
        if sprite != self.sprite {
            self.sprite = sprite;
            self.body.resize_keep_bottom(sprites.size(sprite));
        }
    }

    // ── Internal steps ──

    fn walk(&mut self, dir: Option<Facing>, speed: f64) {
        if let Some(dir) = dir {
            self.body.x += dir.sign() * speed;
            self.facing = dir;
        }
    }

    fn collect_pickups(&mut self, pickups: &mut [Pickup], pack: u32) -> Vec<Weapon> {
        let mut picked = vec![];
        for pickup in pickups.iter_mut() {
            if !self.collides_with(pickup) { continue; }
            if pickup.collect() {
                self.equipment = self.equipment.pick_up(pickup.weapon, pack);
                picked.push(pickup.weapon);
            }
        }
        picked
    }

    /// Ladder handling. Gravity is skipped unless the result is `Free`.
    fn climb(&mut self, dir: Option<ClimbDir>, ladders: &[Ladder], speed: f64) -> Grip {
        for ladder in ladders {
            if !ladder.within_rails(self.body.x) { continue; }
            let span = ladder.span();
            let bottom = self.body.bottom();

            if self.body.overlaps(&ladder.body) {
                match dir {
                    None => {}
                    Some(ClimbDir::Up) => self.body.y -= speed,
                    Some(ClimbDir::Down) => {
                        let next_bottom = bottom + speed;
                        if bottom > span.top && next_bottom <= span.bottom() {
                            self.body.y += speed;
                        } else if span.bottom() - bottom < speed {
                            self.body.set_bottom(span.bottom());
                        }
                    }
                }
                return Grip::OnLadder;
            }

            // Standing on the top rung: step down onto the ladder.
            if dir == Some(ClimbDir::Down) && (bottom - span.top).abs() < EDGE_EPSILON {
                self.body.y += speed;
                return Grip::SteppingOn;
            }
        }
        Grip::Free
    }
}

impl Collidable for Player {
    fn body(&self) -> &Body { &self.body }
}

impl HorizontallyBounded for Player {
    fn enforce_bounds(&mut self, screen: &Screen) {
        physics::clamp_horizontal(&mut self.body, screen);
        if physics::clamp_to_floor(&mut self.body, &mut self.vy, screen) {
            self.jumping = false;
        }
    }
}
