/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Barrels (jump-over bonus, contact, gravity)
///   2. Time limit
///   3. Boss gravity
///   4. Player update (walk, pickups, climb, gravity, jump) → boss contact
///   5. Firing: player bullets, then monkey bananas
///   6. Projectiles: travel, expiry, first target hit
///   7. Player vs monkeys
///   8. Monkey patrols
///   9. Purge inactive projectiles
///  10. Win / lose check
///
/// Ladders are already resting when the world is built and never move.
///
/// A fatal contact only raises the `game_over` flag; the remaining phases
/// still run so that a win scored later in the same tick takes priority.
/// Once an outcome is set the world is frozen and `step` returns nothing.
///
/// `step` reports what happened as events. Whether the level is over is
/// read from `WorldState::is_finished()`, and win or loss from
/// `WorldState::outcome()`.

use tracing::{debug, info};

use crate::domain::patrol::PatrolEnv;
use crate::domain::physics::Collidable;
use crate::domain::player::{FrameInput, PlayerEnv};
use crate::domain::projectile::{Projectile, ProjectileKind};
use crate::domain::rules::{self, BossContact, Contact, LevelOutcome, ProjectileTarget};
use super::event::{DeathCause, GameEvent};
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    if world.is_finished() { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.frame += 1;

    resolve_barrels(world, &mut events);
    resolve_time(world, &mut events);
    resolve_boss(world);
    resolve_player(world, &input, &mut events);
    resolve_boss_contact(world, &mut events);
    resolve_firing(world, input.fire, &mut events);
    resolve_bananas(world, &mut events);
    resolve_projectiles(world, &mut events);
    resolve_monkey_contact(world, &mut events);
    resolve_monkeys(world);
    world.projectiles.retain(|p| p.active);
    resolve_outcome(world, &mut events);

    for event in &events {
        debug!(frame = world.frame, ?event, "game event");
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

/// Raise the game-over flag. Only the first fatal cause of a level is
/// reported.
fn lose(world: &mut WorldState, event: GameEvent, events: &mut Vec<GameEvent>) {
    if world.game_over { return; }
    world.game_over = true;
    events.push(event);
}

// ══════════════════════════════════════════════════════════════
// Barrels
// ══════════════════════════════════════════════════════════════

fn resolve_barrels(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let clearance = world.jump_clearance();
    let combat = world.tuning.combat.clone();

    for i in 0..world.barrels.len() {
        let barrel = &world.barrels[i];
        if barrel.is_destroyed() { continue; }

        // Jump-over bonus, once per barrel per jump
        let jump = world.player.jump_count;
        if rules::clears_barrel(&world.player, barrel, &clearance)
            && barrel.cleared_on_jump != Some(jump)
        {
            world.barrels[i].cleared_on_jump = Some(jump);
            world.score += combat.barrel_jump_score;
            events.push(GameEvent::BarrelCleared { index: i });
        }

        match rules::hazard_contact(&world.player, &world.barrels[i]) {
            Contact::Harmless => {}
            Contact::Defeat => {
                if world.barrels[i].destroy() {
                    world.score += combat.barrel_smash_score;
                    events.push(GameEvent::BarrelSmashed { index: i });
                }
            }
            Contact::Fatal => {
                lose(world, GameEvent::PlayerKilled { cause: DeathCause::Barrel }, events);
            }
        }

        world.barrels[i].update(&world.tuning.gravity, &world.platforms);
    }
}

fn resolve_time(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.frame >= world.max_frames {
        lose(world, GameEvent::TimeUp, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Boss + player
// ══════════════════════════════════════════════════════════════

fn resolve_boss(world: &mut WorldState) {
    world.boss.update(&world.tuning.gravity, &world.platforms);
}

fn resolve_player(world: &mut WorldState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let tuning = &world.tuning;
    let env = PlayerEnv {
        ladders: &world.ladders,
        platforms: &world.platforms,
        screen: tuning.screen,
        gravity: tuning.gravity.player,
        motion: tuning.motion,
        sprites: &tuning.sprites,
        blaster_pack: tuning.combat.blaster_pack,
    };
    let report = world.player.update(input, &env, &mut world.pickups);

    for weapon in report.picked {
        events.push(GameEvent::WeaponPicked { weapon });
    }
    if report.jumped {
        events.push(GameEvent::Jumped);
    }
}

fn resolve_boss_contact(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    match rules::boss_contact(&world.player, &world.boss) {
        BossContact::None => {}
        BossContact::Win => world.level_complete = true,
        BossContact::Fatal => {
            lose(world, GameEvent::PlayerKilled { cause: DeathCause::Boss }, events);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Firing
// ══════════════════════════════════════════════════════════════

fn resolve_firing(world: &mut WorldState, fire: bool, events: &mut Vec<GameEvent>) {
    if !fire { return; }

    // The muzzle is where the player stood before the shot: spending the
    // last round swaps the sprite and shifts the center.
    let muzzle = world.player.body;
    let facing = world.player.facing;
    if !world.player.fire(&world.tuning.sprites) { return; }

    world.projectiles.push(Projectile::spawn(
        ProjectileKind::Bullet, &muzzle, facing, &world.tuning.sprites,
    ));
    events.push(GameEvent::ShotFired { ammo_left: world.player.ammo() });
}

fn resolve_bananas(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let cooldown = world.tuning.combat.banana_cooldown;
    for (i, monkey) in world.monkeys.iter_mut().enumerate() {
        if !monkey.try_throw(cooldown) { continue; }
        world.projectiles.push(Projectile::spawn(
            ProjectileKind::Banana, &monkey.body, monkey.facing, &world.tuning.sprites,
        ));
        events.push(GameEvent::BananaThrown { monkey: i });
    }
}

// ══════════════════════════════════════════════════════════════
// Projectiles
// ══════════════════════════════════════════════════════════════

/// Move every projectile, then apply at most one hit each. Spent
/// projectiles stay in the list, inactive, until the end-of-tick purge.
fn resolve_projectiles(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let screen = world.tuning.screen;
    let monkey_score = world.tuning.combat.monkey_score;

    for i in 0..world.projectiles.len() {
        let ballistics = world.tuning.projectiles.get(world.projectiles[i].kind);
        if world.projectiles[i].advance(ballistics, &screen) {
            events.push(GameEvent::ProjectileExpired { kind: world.projectiles[i].kind });
            continue;
        }

        let target = rules::projectile_target(
            &world.projectiles[i], &world.boss, &world.monkeys, &world.player,
        );
        let Some(target) = target else { continue };
        world.projectiles[i].deactivate();

        match target {
            ProjectileTarget::Boss => {
                let defeated = world.boss.take_hit();
                events.push(GameEvent::BossHit { health_left: world.boss.health });
                if defeated {
                    world.level_complete = true;
                }
            }
            ProjectileTarget::Monkey(m) => {
                if world.monkeys[m].kill() {
                    world.score += monkey_score;
                    events.push(GameEvent::MonkeyKilled { index: m });
                }
            }
            ProjectileTarget::Player => {
                lose(world, GameEvent::PlayerKilled { cause: DeathCause::Banana }, events);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Monkeys
// ══════════════════════════════════════════════════════════════

fn resolve_monkey_contact(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let monkey_score = world.tuning.combat.monkey_score;
    for i in 0..world.monkeys.len() {
        if !world.monkeys[i].is_active() { continue; }
        match rules::hazard_contact(&world.player, &world.monkeys[i]) {
            Contact::Harmless => {}
            Contact::Defeat => {
                if world.monkeys[i].kill() {
                    world.score += monkey_score;
                    events.push(GameEvent::MonkeyKilled { index: i });
                }
            }
            Contact::Fatal => {
                lose(world, GameEvent::PlayerKilled { cause: DeathCause::Monkey }, events);
            }
        }
    }
}

fn resolve_monkeys(world: &mut WorldState) {
    let tuning = &world.tuning;
    let env = PatrolEnv {
        platforms: &world.platforms,
        screen: tuning.screen,
        gravity: &tuning.gravity,
        speed: tuning.motion.monkey_speed,
        sprites: &tuning.sprites,
    };
    for monkey in world.monkeys.iter_mut() {
        monkey.update(&env);
    }
}

// ══════════════════════════════════════════════════════════════
// Win / lose check
// ══════════════════════════════════════════════════════════════

fn resolve_outcome(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let Some(outcome) = rules::level_outcome(world.level_complete, world.game_over) else {
        return;
    };
    world.outcome = Some(outcome);
    if outcome == LevelOutcome::Won {
        events.push(GameEvent::LevelWon);
    }
    info!(
        level = %world.level_name,
        ?outcome,
        score = world.score,
        frame = world.frame,
        "level finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::domain::equipment::Equipment;
    use crate::domain::geometry::Facing;
    use crate::domain::patrol::MonkeyKind;
    use crate::sim::level::{LevelData, MonkeySpec, Spawn};

    /// One long floor (top edge 738), boss far to the right, nothing else.
    fn arena() -> LevelData {
        LevelData {
            name: "Arena".into(),
            max_frames: 10_000,
            player: Spawn::new(100.0, 717.0),
            boss: Spawn::new(900.0, 696.0),
            platforms: (0..9).map(|i| Spawn::new(60.0 + 120.0 * f64::from(i), 748.0)).collect(),
            ladders: vec![],
            barrels: vec![],
            hammers: vec![],
            blasters: vec![],
            monkeys: vec![],
        }
    }

    fn world(level: LevelData) -> WorldState {
        WorldState::from_level(&level, Tuning::default(), 0)
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn fire() -> FrameInput {
        FrameInput { fire: true, ..FrameInput::default() }
    }

    #[test]
    fn quiet_tick_advances_frame_only() {
        let mut w = world(arena());
        let events = step(&mut w, idle());
        assert!(events.is_empty());
        assert_eq!(w.frame, 1);
        assert_eq!(w.player.body.bottom(), 738.0);
        assert!(!w.is_finished());
    }

    #[test]
    fn hammer_smashes_barrel_and_play_continues() {
        let mut level = arena();
        level.barrels = vec![Spawn::new(110.0, 723.0)];
        let mut w = world(level);
        w.player.equipment = Equipment::Hammer;

        let events = step(&mut w, idle());
        assert!(w.barrels[0].is_destroyed());
        assert_eq!(w.score(), 100);
        assert!(events.contains(&GameEvent::BarrelSmashed { index: 0 }));
        assert!(!w.game_over);
        assert!(!w.is_finished());

        // Destroyed barrels never score again
        step(&mut w, idle());
        assert_eq!(w.score(), 100);
    }

    #[test]
    fn unarmed_barrel_contact_is_fatal() {
        let mut level = arena();
        level.barrels = vec![Spawn::new(110.0, 723.0)];
        let mut w = world(level);

        let events = step(&mut w, idle());
        assert!(w.game_over);
        assert_eq!(w.outcome(), Some(LevelOutcome::Lost));
        assert!(events.contains(&GameEvent::PlayerKilled { cause: DeathCause::Barrel }));
        assert!(!w.barrels[0].is_destroyed());
    }

    #[test]
    fn unarmed_boss_contact_is_game_over() {
        let mut level = arena();
        level.player = Spawn::new(880.0, 717.0);
        let mut w = world(level);

        let events = step(&mut w, idle());
        assert!(w.game_over);
        assert!(!w.level_complete);
        assert_eq!(w.outcome(), Some(LevelOutcome::Lost));
        assert!(events.contains(&GameEvent::PlayerKilled { cause: DeathCause::Boss }));
    }

    #[test]
    fn hammer_boss_contact_wins() {
        let mut level = arena();
        level.player = Spawn::new(880.0, 717.0);
        let mut w = world(level);
        w.player.equipment = Equipment::Hammer;

        let events = step(&mut w, idle());
        assert!(w.level_complete);
        assert_eq!(w.outcome(), Some(LevelOutcome::Won));
        assert!(events.contains(&GameEvent::LevelWon));
    }

    #[test]
    fn five_bullets_defeat_the_boss() {
        let mut level = arena();
        level.player = Spawn::new(800.0, 717.0);
        level.blasters = vec![Spawn::new(800.0, 727.0)];
        let mut w = world(level);

        step(&mut w, idle());
        assert_eq!(w.ammo(), 5);

        let mut hits = 0;
        for _ in 0..5 {
            let events = step(&mut w, fire());
            assert!(events.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
            for _ in 0..60 {
                let events = step(&mut w, idle());
                hits += events.iter().filter(|e| matches!(e, GameEvent::BossHit { .. })).count();
                if w.projectiles.is_empty() { break; }
            }
        }

        assert_eq!(hits, 5);
        assert_eq!(w.boss_health(), 0);
        assert_eq!(w.ammo(), 0);
        assert!(w.level_complete);
        assert_eq!(w.outcome(), Some(LevelOutcome::Won));
        assert!(w.seconds_left() > 0);
    }

    #[test]
    fn firing_without_ammo_spawns_nothing() {
        let mut w = world(arena());
        let events = step(&mut w, fire());
        assert!(events.is_empty());
        assert!(w.projectiles.is_empty());
    }

    #[test]
    fn bullet_spawns_at_player_and_travels_facing() {
        let mut w = world(arena());
        w.player.equipment = Equipment::Blaster { ammo: 3 };
        w.player.facing = Facing::Left;
        w.player.refresh_sprite(&w.tuning.sprites);
        let (x, y) = (w.player.body.x, w.player.body.y);

        step(&mut w, fire());
        assert_eq!(w.projectiles.len(), 1);
        let b = &w.projectiles[0];
        assert_eq!(b.facing, Facing::Left);
        assert_eq!(b.body.y, y);
        assert!((b.body.x - (x - 3.8)).abs() < 1e-9);
        assert_eq!(w.ammo(), 2);
    }

    #[test]
    fn bullet_expires_after_its_range() {
        let mut w = world(arena());
        w.player.equipment = Equipment::Blaster { ammo: 1 };
        step(&mut w, fire());
        assert_eq!(w.player.equipment, Equipment::Unarmed);

        let mut expired = false;
        for _ in 0..100 {
            let events = step(&mut w, idle());
            if events.contains(&GameEvent::ProjectileExpired { kind: ProjectileKind::Bullet }) {
                expired = true;
                break;
            }
        }
        assert!(expired);
        assert!(w.projectiles.is_empty());
    }

    #[test]
    fn time_limit_is_a_loss() {
        let mut level = arena();
        level.max_frames = 3;
        let mut w = world(level);

        step(&mut w, idle());
        step(&mut w, idle());
        let events = step(&mut w, idle());
        assert!(events.contains(&GameEvent::TimeUp));
        assert!(w.game_over);
        assert!(!w.level_complete);
        assert_eq!(w.outcome(), Some(LevelOutcome::Lost));
        assert_eq!(w.seconds_left(), 0);
    }

    #[test]
    fn finished_world_is_frozen() {
        let mut level = arena();
        level.max_frames = 1;
        let mut w = world(level);
        step(&mut w, idle());
        assert!(w.is_finished());

        let frame = w.frame;
        assert!(step(&mut w, idle()).is_empty());
        assert_eq!(w.frame, frame);
    }

    #[test]
    fn jump_over_barrel_scores_once_per_jump() {
        let mut level = arena();
        level.barrels = vec![Spawn::new(400.0, 723.0)];
        let mut w = world(level);
        // Mid-jump, directly above the barrel
        w.player.body.x = 400.0;
        w.player.body.set_bottom(680.0);
        w.player.jumping = true;
        w.player.jump_count = 1;

        let first = step(&mut w, idle());
        let second = step(&mut w, idle());
        assert!(first.contains(&GameEvent::BarrelCleared { index: 0 }));
        assert!(!second.contains(&GameEvent::BarrelCleared { index: 0 }));
        assert_eq!(w.score(), 30);
        assert!(!w.game_over);
    }

    #[test]
    fn running_jump_clears_a_barrel() {
        let mut level = arena();
        level.player = Spawn::new(250.0, 717.0);
        level.barrels = vec![Spawn::new(400.0, 723.0)];
        let mut w = world(level);

        let mut cleared = 0;
        for tick in 1..=90 {
            let input = FrameInput {
                horizontal: Some(Facing::Right),
                jump: tick == 18,
                ..FrameInput::default()
            };
            let events = step(&mut w, input);
            cleared += events.iter().filter(|e| matches!(e, GameEvent::BarrelCleared { .. })).count();
        }

        assert_eq!(cleared, 1);
        assert_eq!(w.score(), 30);
        assert!(!w.game_over);
        assert!(!w.barrels[0].is_destroyed());
        assert!(w.player.grounded);
        assert!(w.player.body.x > 400.0);
    }

    #[test]
    fn walking_past_a_barrel_without_jumping_scores_nothing() {
        let mut level = arena();
        level.barrels = vec![Spawn::new(400.0, 723.0)];
        let mut w = world(level);
        w.player.body.x = 400.0;
        w.player.body.set_bottom(680.0);

        step(&mut w, idle());
        assert_eq!(w.score(), 0);
    }

    #[test]
    fn banana_kills_the_player() {
        let mut level = arena();
        level.monkeys = vec![MonkeySpec {
            at: Spawn::new(250.0, 718.0),
            facing: Facing::Left,
            pattern: vec![400],
            kind: MonkeyKind::Intelligent,
        }];
        let mut w = world(level);

        let first = step(&mut w, idle());
        assert!(first.contains(&GameEvent::BananaThrown { monkey: 0 }));

        let mut killed = false;
        for _ in 0..200 {
            let events = step(&mut w, idle());
            if events.contains(&GameEvent::PlayerKilled { cause: DeathCause::Banana }) {
                killed = true;
                break;
            }
        }
        assert!(killed);
        assert_eq!(w.outcome(), Some(LevelOutcome::Lost));
    }

    #[test]
    fn plain_monkeys_never_throw() {
        let mut level = arena();
        level.monkeys = vec![MonkeySpec {
            at: Spawn::new(500.0, 718.0),
            facing: Facing::Left,
            pattern: vec![50],
            kind: MonkeyKind::Plain,
        }];
        let mut w = world(level);
        for _ in 0..10 {
            step(&mut w, idle());
        }
        assert!(w.projectiles.is_empty());
    }

    #[test]
    fn hammer_kills_monkey_on_contact() {
        let mut level = arena();
        level.monkeys = vec![MonkeySpec {
            at: Spawn::new(110.0, 718.0),
            facing: Facing::Left,
            pattern: vec![50],
            kind: MonkeyKind::Plain,
        }];
        let mut w = world(level);
        w.player.equipment = Equipment::Hammer;

        let events = step(&mut w, idle());
        assert!(events.contains(&GameEvent::MonkeyKilled { index: 0 }));
        assert!(!w.monkeys[0].alive);
        assert_eq!(w.score(), 100);

        step(&mut w, idle());
        assert_eq!(w.score(), 100);
    }

    #[test]
    fn unarmed_monkey_contact_is_fatal() {
        let mut level = arena();
        level.monkeys = vec![MonkeySpec {
            at: Spawn::new(110.0, 718.0),
            facing: Facing::Left,
            pattern: vec![50],
            kind: MonkeyKind::Plain,
        }];
        let mut w = world(level);

        let events = step(&mut w, idle());
        assert!(events.contains(&GameEvent::PlayerKilled { cause: DeathCause::Monkey }));
        assert!(w.monkeys[0].alive);
    }

    #[test]
    fn bullet_kills_first_monkey_in_line() {
        let mut level = arena();
        level.monkeys = vec![
            MonkeySpec {
                at: Spawn::new(200.0, 718.0),
                facing: Facing::Right,
                pattern: vec![400],
                kind: MonkeyKind::Plain,
            },
            MonkeySpec {
                at: Spawn::new(205.0, 718.0),
                facing: Facing::Right,
                pattern: vec![400],
                kind: MonkeyKind::Plain,
            },
        ];
        let mut w = world(level);
        w.player.equipment = Equipment::Blaster { ammo: 2 };
        w.player.refresh_sprite(&w.tuning.sprites);

        step(&mut w, fire());
        let mut killed = vec![];
        for _ in 0..60 {
            for e in step(&mut w, idle()) {
                if let GameEvent::MonkeyKilled { index } = e {
                    killed.push(index);
                }
            }
        }
        assert_eq!(killed, vec![0]);
        assert!(w.monkeys[1].alive);
        assert_eq!(w.score(), 100);
    }

    #[test]
    fn win_and_loss_on_the_same_tick_is_a_win() {
        let mut level = arena();
        level.player = Spawn::new(880.0, 717.0);
        level.max_frames = 1;
        let mut w = world(level);
        w.player.equipment = Equipment::Hammer;

        let events = step(&mut w, idle());
        assert!(w.game_over);
        assert!(w.level_complete);
        assert_eq!(w.outcome(), Some(LevelOutcome::Won));
        assert!(events.contains(&GameEvent::TimeUp));
        assert!(events.contains(&GameEvent::LevelWon));
    }

    #[test]
    fn pickup_event_is_reported_once() {
        let mut level = arena();
        level.hammers = vec![Spawn::new(103.0, 723.0)];
        let mut w = world(level);

        let first = step(&mut w, idle());
        let second = step(&mut w, idle());
        assert!(first.contains(&GameEvent::WeaponPicked {
            weapon: crate::domain::equipment::Weapon::Hammer,
        }));
        assert!(!second.iter().any(|e| matches!(e, GameEvent::WeaponPicked { .. })));
        assert!(w.player.has_hammer());
    }
}
