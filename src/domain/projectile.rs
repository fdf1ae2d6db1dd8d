/// Projectiles: player bullets and monkey bananas.
///
/// Straight horizontal travel in the direction captured at spawn. A
/// projectile deactivates when it has traveled further than its kind's
/// maximum range or its center leaves [0, screen width]. Deactivation is
/// permanent; the world purges inactive projectiles once per tick after
/// every pass over the collection has finished.

use super::geometry::{Body, Facing, Screen};
use super::physics::Collidable;
use super::sprite::{SpriteId, SpriteSheet};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectileKind {
    /// Fired by the player's blaster. Hits the boss and monkeys.
    Bullet,
    /// Thrown by intelligent monkeys. Hits the player.
    Banana,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ballistics {
    /// Pixels per tick.
    pub speed: f64,
    pub max_range: f64,
}

/// Per-kind ballistics, keyed by `ProjectileKind`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileTable {
    pub bullet: Ballistics,
    pub banana: Ballistics,
}

impl Default for ProjectileTable {
    fn default() -> Self {
        ProjectileTable {
            bullet: Ballistics { speed: 3.8, max_range: 300.0 },
            banana: Ballistics { speed: 1.8, max_range: 300.0 },
        }
    }
}

impl ProjectileTable {
    pub fn get(&self, kind: ProjectileKind) -> Ballistics {
        match kind {
            ProjectileKind::Bullet => self.bullet,
            ProjectileKind::Banana => self.banana,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
    pub facing: Facing,
    pub traveled: f64,
    pub active: bool,
}

impl Projectile {
    /// Spawn at the firer's exact position, heading the way it faces.
    pub fn spawn(kind: ProjectileKind, firer: &Body, facing: Facing, sprites: &SpriteSheet) -> Self {
        let sprite = match kind {
            ProjectileKind::Bullet => SpriteId::bullet(facing),
            ProjectileKind::Banana => SpriteId::Banana,
        };
        Projectile {
            body: Body::new(firer.x, firer.y, sprites.size(sprite)),
            kind,
            facing,
            traveled: 0.0,
            active: true,
        }
    }

    /// Move one tick. Returns true if the projectile expired on this tick
    /// (out of range or off screen).
    pub fn advance(&mut self, ballistics: Ballistics, screen: &Screen) -> bool {
        if !self.active { return false; }
        self.body.x += self.facing.sign() * ballistics.speed;
        self.traveled += ballistics.speed;

        let off_screen = self.body.x < 0.0 || self.body.x > screen.width;
        if off_screen || self.traveled > ballistics.max_range {
            self.active = false;
            return true;
        }
        false
    }

    /// Returns true only on the first call.
    pub fn deactivate(&mut self) -> bool {
        if !self.active { return false; }
        self.active = false;
        true
    }
}

impl Collidable for Projectile {
    fn body(&self) -> &Body { &self.body }
    fn is_active(&self) -> bool { self.active }
}
