/// Entities: Platform, Ladder, Barrel, Boss, Pickup.
/// The player, patrolling monkeys and projectiles carry more behavior and
/// live in their own modules.
///
/// Nothing is ever deallocated mid-level. Destroyed / collected entities stay
/// in their collections with an inactive flag, which every update, draw and
/// collision pass checks.

use super::equipment::Weapon;
use super::geometry::{Body, Rect, Screen, Size};
use super::physics::{BodyKind, Collidable, GravityAffected, GravityTable};

/// Static surface. Its top edge is what everything lands on.
#[derive(Clone, Debug)]
pub struct Platform {
    pub body: Body,
}

impl Platform {
    pub fn new(x: f64, y: f64, size: Size) -> Self {
        Platform { body: Body::new(x, y, size) }
    }
}

impl Collidable for Platform {
    fn body(&self) -> &Body { &self.body }
}

/// Climbable zone. Falls at level start until it rests on a platform,
/// then stays put: only its horizontal extent and vertical span matter.
#[derive(Clone, Debug)]
pub struct Ladder {
    pub body: Body,
    pub vy: f64,
    pub settled: bool,
}

impl Ladder {
    pub fn new(x: f64, y: f64, size: Size) -> Self {
        Ladder { body: Body::new(x, y, size), vy: 0.0, settled: false }
    }

    /// Fall one tick unless already resting.
    pub fn update(&mut self, gravity: &GravityTable, platforms: &[Platform]) {
        if self.settled { return; }
        if self.fall(gravity, platforms) {
            self.settled = true;
        }
    }

    /// Drop the ladder onto the platform below it in one go. A ladder with
    /// nothing underneath stops once it has left the screen. Returns whether
    /// it came to rest on a platform.
    pub fn settle(&mut self, gravity: &GravityTable, platforms: &[Platform], screen: &Screen) -> bool {
        while !self.settled {
            if self.body.top() > screen.height {
                self.settled = true;
                return false;
            }
            self.update(gravity, platforms);
        }
        true
    }

    pub fn span(&self) -> Rect {
        self.body.bounding_box()
    }

    /// Is `x` strictly between the ladder's rails?
    pub fn within_rails(&self, x: f64) -> bool {
        x > self.body.left() && x < self.body.right()
    }
}

impl Collidable for Ladder {
    fn body(&self) -> &Body { &self.body }
}

impl GravityAffected for Ladder {
    const KIND: BodyKind = BodyKind::Ladder;
    fn motion_mut(&mut self) -> (&mut Body, &mut f64) { (&mut self.body, &mut self.vy) }
}

/// Rolling barrel hazard.
#[derive(Clone, Debug)]
pub struct Barrel {
    pub body: Body,
    pub vy: f64,
    pub destroyed: bool,
    /// Jump number during which the player last cleared this barrel.
    /// Keeps one jump from scoring the same barrel on consecutive ticks.
    pub cleared_on_jump: Option<u32>,
}

impl Barrel {
    pub fn new(x: f64, y: f64, size: Size) -> Self {
        Barrel { body: Body::new(x, y, size), vy: 0.0, destroyed: false, cleared_on_jump: None }
    }

    pub fn update(&mut self, gravity: &GravityTable, platforms: &[Platform]) {
        if self.destroyed { return; }
        self.fall(gravity, platforms);
    }

    /// Mark destroyed. Returns true only on the first call.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed { return false; }
        self.destroyed = true;
        true
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Collidable for Barrel {
    fn body(&self) -> &Body { &self.body }
    fn is_active(&self) -> bool { !self.destroyed }
}

impl GravityAffected for Barrel {
    const KIND: BodyKind = BodyKind::Barrel;
    fn motion_mut(&mut self) -> (&mut Body, &mut f64) { (&mut self.body, &mut self.vy) }
}

/// The objective character at the top of the level.
#[derive(Clone, Debug)]
pub struct Boss {
    pub body: Body,
    pub vy: f64,
    pub health: u32,
}

impl Boss {
    pub fn new(x: f64, y: f64, size: Size, health: u32) -> Self {
        Boss { body: Body::new(x, y, size), vy: 0.0, health }
    }

    pub fn update(&mut self, gravity: &GravityTable, platforms: &[Platform]) {
        self.fall(gravity, platforms);
    }

    /// Take one ranged hit. Returns true if this hit brought health to zero.
    pub fn take_hit(&mut self) -> bool {
        if self.health == 0 { return false; }
        self.health -= 1;
        self.health == 0
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

impl Collidable for Boss {
    fn body(&self) -> &Body { &self.body }
}

impl GravityAffected for Boss {
    const KIND: BodyKind = BodyKind::Boss;
    fn motion_mut(&mut self) -> (&mut Body, &mut f64) { (&mut self.body, &mut self.vy) }
}

/// Weapon lying in the level, waiting to be picked up.
#[derive(Clone, Debug)]
pub struct Pickup {
    pub body: Body,
    pub weapon: Weapon,
    pub collected: bool,
}

impl Pickup {
    pub fn new(x: f64, y: f64, size: Size, weapon: Weapon) -> Self {
        Pickup { body: Body::new(x, y, size), weapon, collected: false }
    }

    /// Mark collected. Returns true only on the first call; a collected
    /// pickup never comes back.
    pub fn collect(&mut self) -> bool {
        if self.collected { return false; }
        self.collected = true;
        true
    }
}

impl Collidable for Pickup {
    fn body(&self) -> &Body { &self.body }
    fn is_active(&self) -> bool { !self.collected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Vec<Platform> {
        vec![Platform::new(500.0, 748.0, Size::new(1024.0, 20.0))]
    }

    #[test]
    fn ladder_settles_on_platform_and_stops() {
        let mut l = Ladder::new(300.0, 600.0, Size::new(40.0, 150.0));
        let gravity = GravityTable::default();
        for _ in 0..100 {
            l.update(&gravity, &floor());
        }
        assert!(l.settled);
        assert_eq!(l.body.bottom(), 738.0);
        let y = l.body.y;
        l.update(&gravity, &floor());
        assert_eq!(l.body.y, y);
    }

    #[test]
    fn ladder_settles_in_one_call() {
        let mut l = Ladder::new(300.0, 600.0, Size::new(40.0, 150.0));
        let screen = Screen { width: 1024.0, height: 768.0 };
        assert!(l.settle(&GravityTable::default(), &floor(), &screen));
        assert!(l.settled);
        assert_eq!(l.body.bottom(), 738.0);
        assert_eq!(l.vy, 0.0);
    }

    #[test]
    fn ladder_without_support_stops_below_the_screen() {
        let mut l = Ladder::new(300.0, 600.0, Size::new(40.0, 150.0));
        let screen = Screen { width: 1024.0, height: 768.0 };
        assert!(!l.settle(&GravityTable::default(), &[], &screen));
        assert!(l.settled);
        assert!(l.body.top() > 768.0);
    }

    #[test]
    fn ladder_rails_are_exclusive() {
        let l = Ladder::new(300.0, 600.0, Size::new(40.0, 150.0));
        assert!(l.within_rails(300.0));
        assert!(l.within_rails(281.0));
        assert!(!l.within_rails(280.0));
        assert!(!l.within_rails(320.0));
    }

    #[test]
    fn barrel_destroy_is_idempotent() {
        let mut b = Barrel::new(100.0, 100.0, Size::new(30.0, 30.0));
        assert!(b.destroy());
        assert!(!b.destroy());
        assert!(b.is_destroyed());
        assert!(!b.is_active());
    }

    #[test]
    fn destroyed_barrel_stops_falling() {
        let mut b = Barrel::new(100.0, 100.0, Size::new(30.0, 30.0));
        b.destroy();
        b.update(&GravityTable::default(), &floor());
        assert_eq!(b.body.y, 100.0);
    }

    #[test]
    fn destroyed_barrel_does_not_collide() {
        let mut a = Barrel::new(100.0, 100.0, Size::new(30.0, 30.0));
        let b = Barrel::new(105.0, 100.0, Size::new(30.0, 30.0));
        assert!(a.collides_with(&b));
        a.destroy();
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn boss_health_counts_down_once_to_zero() {
        let mut boss = Boss::new(0.0, 0.0, Size::new(96.0, 84.0), 2);
        assert!(!boss.take_hit());
        assert!(boss.take_hit());
        assert!(boss.is_defeated());
        assert!(!boss.take_hit());
        assert_eq!(boss.health, 0);
    }

    #[test]
    fn pickup_collects_once() {
        let mut p = Pickup::new(0.0, 0.0, Size::new(28.0, 30.0), Weapon::Hammer);
        assert!(p.collect());
        assert!(!p.collect());
        assert!(!p.is_active());
    }
}
