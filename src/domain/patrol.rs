/// Patrol controller for monkeys.
///
/// Each tick, for a living monkey:
///   1. Fall (monkey gravity, land on contact)
///   2. Ledge probe: if resting (vy == 0) and there is no platform one pixel
///      past the leading edge and one pixel below the feet → turn
///   3. Walk `speed` pixels in the facing direction, add to `traveled`
///   4. Pattern: if `traveled` ≥ pattern[cursor] → turn
///   5. Screen clamp → turn
///
/// Every turn flips facing, advances the cursor (mod pattern length) and
/// resets `traveled` to 0. An empty pattern never triggers step 4.
///
/// The intelligent variant also throws a banana whenever its fire counter
/// is 0 or equals the cooldown; the counter then restarts.

use super::entity::Platform;
use super::geometry::{Body, Facing, Screen};
use super::physics::{self, BodyKind, Collidable, GravityAffected, GravityTable};
use super::sprite::{SpriteId, SpriteSheet};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MonkeyKind {
    Plain,
    Intelligent,
}

/// Everything a monkey reads during its update.
pub struct PatrolEnv<'a> {
    pub platforms: &'a [Platform],
    pub screen: Screen,
    pub gravity: &'a GravityTable,
    pub speed: f64,
    pub sprites: &'a SpriteSheet,
}

#[derive(Clone, Debug)]
pub struct Monkey {
    pub body: Body,
    pub vy: f64,
    pub facing: Facing,
    pub kind: MonkeyKind,
    pub sprite: SpriteId,
    /// Cyclic walk lengths in pixels.
    pub pattern: Vec<u32>,
    pub cursor: usize,
    /// Distance walked since the last turn.
    pub traveled: f64,
    pub alive: bool,
    /// Ticks since the last banana (intelligent monkeys only).
    pub fire_counter: u32,
}

impl Monkey {
    pub fn new(
        x: f64,
        y: f64,
        facing: Facing,
        kind: MonkeyKind,
        pattern: Vec<u32>,
        sprites: &SpriteSheet,
    ) -> Self {
        let sprite = SpriteId::monkey(kind == MonkeyKind::Intelligent, facing);
        Monkey {
            body: Body::new(x, y, sprites.size(sprite)),
            vy: 0.0,
            facing,
            kind,
            sprite,
            pattern,
            cursor: 0,
            traveled: 0.0,
            alive: true,
            fire_counter: 0,
        }
    }

    pub fn is_intelligent(&self) -> bool {
        self.kind == MonkeyKind::Intelligent
    }

    pub fn update(&mut self, env: &PatrolEnv) {
        if !self.alive { return; }

        self.fall(env.gravity, env.platforms);
        if self.vy == 0.0 && !self.ground_ahead(env.platforms) {
            self.turn(env.sprites);
        }

        self.body.x += self.facing.sign() * env.speed;
        self.traveled += env.speed;
        if let Some(&limit) = self.pattern.get(self.cursor) {
            if self.traveled >= f64::from(limit) {
                self.turn(env.sprites);
            }
        }

        if physics::clamp_horizontal(&mut self.body, &env.screen) {
            self.turn(env.sprites);
        }
    }

    /// Advance the fire counter. Returns true when a banana should spawn
    /// at the monkey's current position this tick.
    pub fn try_throw(&mut self, cooldown: u32) -> bool {
        if !self.alive || !self.is_intelligent() { return false; }
        let throw = self.fire_counter == 0 || self.fire_counter == cooldown;
        if throw {
            self.fire_counter = 0;
        }
        self.fire_counter += 1;
        throw
    }

    /// Returns true only on the first call.
    pub fn kill(&mut self) -> bool {
        if !self.alive { return false; }
        self.alive = false;
        true
    }

    fn turn(&mut self, sprites: &SpriteSheet) {
        self.facing = self.facing.flipped();
        if !self.pattern.is_empty() {
            self.cursor = (self.cursor + 1) % self.pattern.len();
        }
        self.traveled = 0.0;

        self.sprite = SpriteId::monkey(self.is_intelligent(), self.facing);
        self.body.resize_keep_bottom(sprites.size(self.sprite));
    }

    fn ground_ahead(&self, platforms: &[Platform]) -> bool {
        let probe_x = match self.facing {
            Facing::Left => self.body.left() - 1.0,
            Facing::Right => self.body.right() + 1.0,
        };
        physics::supported_at(platforms, probe_x, self.body.bottom() + 1.0)
    }
}

impl Collidable for Monkey {
    fn body(&self) -> &Body { &self.body }
    fn is_active(&self) -> bool { self.alive }
}

impl GravityAffected for Monkey {
    const KIND: BodyKind = BodyKind::Monkey;
    fn motion_mut(&mut self) -> (&mut Body, &mut f64) { (&mut self.body, &mut self.vy) }
}
