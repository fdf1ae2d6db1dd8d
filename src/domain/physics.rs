/// Physics layer: gravity integration and surface resolution.
///
/// ## Architecture
///
/// Three capabilities, each a small trait instead of a class hierarchy:
///   1. `Collidable`          has a hitbox, may be inactive
///   2. `GravityAffected`     falls with a per-kind (accel, terminal) pair
///   3. `HorizontallyBounded` reacts to leaving the playfield
///
/// ## Integration (one tick)
///
///   vy ← min(vy + accel, terminal)
///   y  ← y + vy
///
/// ## Surface resolution
///
/// Only for vy ≥ 0 (an ascending jump never snaps to a platform underside).
/// The first platform in iteration order whose box overlaps wins: the body's
/// bottom edge is set to the platform's top edge and vy becomes 0.
///
/// ┌───────────────┬──────────────────────────────────────────────┐
/// │ Landing rule  │ Snaps when                                   │
/// ├───────────────┼──────────────────────────────────────────────┤
/// │ OnContact     │ any overlap                                  │
/// │ WithinStep    │ overlap AND bottom ≤ platform top + vy       │
/// └───────────────┴──────────────────────────────────────────────┘
///
/// `WithinStep` is the player's rule: a body that is already deeper in the
/// platform than one tick of fall (e.g. climbing down a ladder through it)
/// passes through instead of being yanked on top.

use super::entity::Platform;
use super::geometry::{Body, Screen};

/// Slack for float drift when comparing the bottom edge to `top + vy`.
const LANDING_EPSILON: f64 = 1e-6;

/// Gravity-affected entity kinds. Each has its own row in the gravity table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BodyKind {
    Player,
    Boss,
    Barrel,
    Ladder,
    Monkey,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Gravity {
    /// Added to vy every tick.
    pub accel: f64,
    /// Upper bound on vy (downward speed).
    pub terminal: f64,
}

impl Gravity {
    pub const fn new(accel: f64, terminal: f64) -> Self {
        Gravity { accel, terminal }
    }
}

/// Per-kind gravity constants, keyed by `BodyKind`.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityTable {
    pub player: Gravity,
    pub boss: Gravity,
    pub barrel: Gravity,
    pub ladder: Gravity,
    pub monkey: Gravity,
}

impl Default for GravityTable {
    fn default() -> Self {
        GravityTable {
            player: Gravity::new(0.2, 10.0),
            boss: Gravity::new(0.4, 5.0),
            barrel: Gravity::new(0.4, 5.0),
            ladder: Gravity::new(0.25, 5.0),
            monkey: Gravity::new(0.4, 5.0),
        }
    }
}

impl GravityTable {
    pub fn get(&self, kind: BodyKind) -> Gravity {
        match kind {
            BodyKind::Player => self.player,
            BodyKind::Boss => self.boss,
            BodyKind::Barrel => self.barrel,
            BodyKind::Ladder => self.ladder,
            BodyKind::Monkey => self.monkey,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Landing {
    OnContact,
    WithinStep,
}

// ══════════════════════════════════════════════════════════════
// Integration + resolution primitives
// ══════════════════════════════════════════════════════════════

/// Velocity after one tick of gravity, clamped to terminal velocity.
#[inline]
pub fn accelerate(vy: f64, g: Gravity) -> f64 {
    (vy + g.accel).min(g.terminal)
}

/// One tick of vertical integration.
#[inline]
pub fn integrate(body: &mut Body, vy: &mut f64, g: Gravity) {
    *vy = accelerate(*vy, g);
    body.y += *vy;
}

/// Snap `body` onto the first overlapping platform. Returns true if it
/// landed (i.e. is grounded this tick).
pub fn resolve_surfaces(
    body: &mut Body,
    vy: &mut f64,
    platforms: &[Platform],
    landing: Landing,
) -> bool {
    if *vy < 0.0 { return false; }

    for platform in platforms {
        let surface = platform.body.bounding_box();
        if !body.bounding_box().intersects(&surface) { continue; }
        if landing == Landing::WithinStep && body.bottom() > surface.top + *vy + LANDING_EPSILON {
            continue;
        }
        body.set_bottom(surface.top);
        *vy = 0.0;
        return true;
    }
    false
}

/// Is there a platform under the point (px, py)?
pub fn supported_at(platforms: &[Platform], px: f64, py: f64) -> bool {
    platforms.iter().any(|p| p.body.bounding_box().contains(px, py))
}

/// Clamp the body's center so its box stays within [0, screen width].
/// Returns true if it had to be moved.
pub fn clamp_horizontal(body: &mut Body, screen: &Screen) -> bool {
    let min_x = body.half_w();
    let max_x = screen.width - body.half_w();
    if body.x < min_x {
        body.x = min_x;
        true
    } else if body.x > max_x {
        body.x = max_x;
        true
    } else {
        false
    }
}

/// Screen-floor guard: never let the bottom edge drop below the screen.
/// Returns true if the body was caught.
pub fn clamp_to_floor(body: &mut Body, vy: &mut f64, screen: &Screen) -> bool {
    if body.bottom() > screen.height {
        body.set_bottom(screen.height);
        *vy = 0.0;
        true
    } else {
        false
    }
}

// ══════════════════════════════════════════════════════════════
// Capabilities
// ══════════════════════════════════════════════════════════════

pub trait Collidable {
    fn body(&self) -> &Body;

    /// Inactive (destroyed, collected, dead, expired) entities never collide.
    fn is_active(&self) -> bool { true }

    fn collides_with<T: Collidable + ?Sized>(&self, other: &T) -> bool {
        self.is_active() && other.is_active() && self.body().overlaps(other.body())
    }
}

pub trait GravityAffected: Collidable {
    const KIND: BodyKind;

    /// Split borrow of position and vertical velocity.
    fn motion_mut(&mut self) -> (&mut Body, &mut f64);

    /// Integrate one tick and land on the first overlapping platform.
    /// Returns true when grounded.
    fn fall(&mut self, table: &GravityTable, platforms: &[Platform]) -> bool {
        let g = table.get(Self::KIND);
        let (body, vy) = self.motion_mut();
        integrate(body, vy, g);
        resolve_surfaces(body, vy, platforms, Landing::OnContact)
    }
}

pub trait HorizontallyBounded {
    fn enforce_bounds(&mut self, screen: &Screen);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Size;

    fn platform(x: f64, y: f64) -> Platform {
        Platform::new(x, y, Size::new(120.0, 20.0))
    }

    fn body(x: f64, y: f64) -> Body {
        Body::new(x, y, Size::new(30.0, 40.0))
    }

    // ── integration ──

    #[test]
    fn velocity_never_exceeds_terminal() {
        for kind in [BodyKind::Player, BodyKind::Boss, BodyKind::Barrel, BodyKind::Ladder, BodyKind::Monkey] {
            let g = GravityTable::default().get(kind);
            let mut vy = 0.0;
            for _ in 0..1000 {
                vy = accelerate(vy, g);
                assert!(vy <= g.terminal);
            }
        }
    }

    #[test]
    fn velocity_converges_to_terminal() {
        let g = GravityTable::default().player;
        let mut vy = 0.0;
        let mut ticks = 0;
        while vy < g.terminal {
            vy = accelerate(vy, g);
            ticks += 1;
            assert!(ticks < 1000, "did not converge");
        }
        assert_eq!(vy, g.terminal);
    }

    #[test]
    fn integrate_moves_by_new_velocity() {
        let mut b = body(0.0, 100.0);
        let mut vy = 1.0;
        integrate(&mut b, &mut vy, Gravity::new(0.5, 10.0));
        assert_eq!(vy, 1.5);
        assert_eq!(b.y, 101.5);
    }

    #[test]
    fn upward_velocity_is_not_clamped() {
        assert_eq!(accelerate(-5.0, Gravity::new(0.2, 10.0)), -4.8);
    }

    // ── surface resolution ──

    #[test]
    fn landing_snaps_bottom_to_platform_top() {
        let platforms = vec![platform(100.0, 500.0)];
        let mut b = body(100.0, 472.0); // bottom 492, platform top 490
        let mut vy = 2.0;
        assert!(resolve_surfaces(&mut b, &mut vy, &platforms, Landing::OnContact));
        assert_eq!(b.bottom(), 490.0);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn ascending_body_passes_through_underside() {
        let platforms = vec![platform(100.0, 500.0)];
        let mut b = body(100.0, 520.0);
        let mut vy = -3.0;
        assert!(!resolve_surfaces(&mut b, &mut vy, &platforms, Landing::OnContact));
        assert_eq!(b.y, 520.0);
        assert_eq!(vy, -3.0);
    }

    #[test]
    fn first_overlapping_platform_wins() {
        // Body spans both platforms; the lower one is listed first.
        let platforms = vec![platform(100.0, 560.0), platform(100.0, 500.0)];
        let mut b = Body::new(100.0, 520.0, Size::new(30.0, 100.0));
        let mut vy = 1.0;
        assert!(resolve_surfaces(&mut b, &mut vy, &platforms, Landing::OnContact));
        assert_eq!(b.bottom(), 550.0);
    }

    #[test]
    fn resting_exactly_on_top_is_not_a_collision() {
        let platforms = vec![platform(100.0, 500.0)];
        let mut b = body(100.0, 470.0); // bottom == top == 490
        let mut vy = 0.0;
        assert!(!resolve_surfaces(&mut b, &mut vy, &platforms, Landing::OnContact));
    }

    #[test]
    fn within_step_ignores_deep_penetration() {
        let platforms = vec![platform(100.0, 500.0)];
        let mut b = body(100.0, 480.0); // bottom 500, 10 below the top
        let mut vy = 0.0;
        assert!(!resolve_surfaces(&mut b, &mut vy, &platforms, Landing::WithinStep));
        assert_eq!(b.y, 480.0);

        let mut vy = 0.2;
        let mut b = body(100.0, 470.2);
        assert!(resolve_surfaces(&mut b, &mut vy, &platforms, Landing::WithinStep));
        assert_eq!(b.bottom(), 490.0);
    }

    #[test]
    fn falling_body_comes_to_rest() {
        let platforms = vec![platform(100.0, 500.0)];
        let mut b = body(100.0, 300.0);
        let mut vy = 0.0;
        let g = GravityTable::default().barrel;
        let mut grounded = false;
        for _ in 0..200 {
            integrate(&mut b, &mut vy, g);
            grounded = resolve_surfaces(&mut b, &mut vy, &platforms, Landing::OnContact);
        }
        assert!(grounded);
        assert_eq!(b.bottom(), 490.0);
        assert_eq!(vy, 0.0);
    }

    // ── support probe ──

    #[test]
    fn support_probe_inside_platform() {
        let platforms = vec![platform(100.0, 500.0)]; // x 40..160, y 490..510
        assert!(supported_at(&platforms, 50.0, 491.0));
        assert!(!supported_at(&platforms, 161.0, 491.0));
        assert!(!supported_at(&platforms, 50.0, 489.0));
    }

    // ── bounds ──

    #[test]
    fn horizontal_clamp_uses_half_width() {
        let screen = Screen { width: 1024.0, height: 768.0 };
        let mut b = body(3.0, 100.0);
        assert!(clamp_horizontal(&mut b, &screen));
        assert_eq!(b.x, 15.0);
        let mut b = body(1020.0, 100.0);
        assert!(clamp_horizontal(&mut b, &screen));
        assert_eq!(b.x, 1009.0);
        let mut b = body(500.0, 100.0);
        assert!(!clamp_horizontal(&mut b, &screen));
    }

    #[test]
    fn floor_clamp_stops_fall() {
        let screen = Screen { width: 1024.0, height: 768.0 };
        let mut b = body(100.0, 760.0);
        let mut vy = 4.0;
        assert!(clamp_to_floor(&mut b, &mut vy, &screen));
        assert_eq!(b.bottom(), 768.0);
        assert_eq!(vy, 0.0);
    }
}
