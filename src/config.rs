/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or
/// `~/.local/share/girder`. Falls back to defaults if the file is missing,
/// unreadable or malformed, and key by key if it is incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::domain::geometry::Screen;
use crate::domain::physics::{Gravity, GravityTable};
use crate::domain::player::Motion;
use crate::domain::projectile::{Ballistics, ProjectileTable};
use crate::domain::sprite::SpriteSheet;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    pub tuning: Tuning,
    pub gamepad: GamepadConfig,
    pub levels_file: PathBuf,
}

/// Every per-kind constant the simulation reads. Owned by the world so a
/// level never consults global state.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub screen: Screen,
    /// Converts the frame counter into "seconds remaining".
    pub ticks_per_second: u32,
    pub gravity: GravityTable,
    pub motion: Motion,
    pub projectiles: ProjectileTable,
    pub combat: CombatConfig,
    pub sprites: SpriteSheet,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatConfig {
    pub barrel_smash_score: u32,
    pub barrel_jump_score: u32,
    pub monkey_score: u32,
    pub boss_health: u32,
    pub blaster_pack: u32,
    /// Ticks between two bananas from the same monkey.
    pub banana_cooldown: u32,
    /// Horizontal slack for the jump-over check, in pixels.
    pub jump_align_tolerance: f64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub fire: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        TomlConfig::default().tuning()
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    window: TomlWindow,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gravity: TomlGravity,
    #[serde(default)]
    motion: TomlMotion,
    #[serde(default)]
    projectile: TomlProjectiles,
    #[serde(default)]
    combat: TomlCombat,
    #[serde(default)]
    sprites: TomlSprites,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlWindow {
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_height")]
    height: f64,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_ticks_per_second")]
    ticks_per_second: u32,
}

/// One `[gravity.<kind>]` table. Missing keys keep the kind's default.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
struct TomlGravityPair {
    accel: Option<f64>,
    terminal: Option<f64>,
}

impl TomlGravityPair {
    fn or(self, fallback: Gravity) -> Gravity {
        Gravity {
            accel: self.accel.unwrap_or(fallback.accel),
            terminal: self.terminal.unwrap_or(fallback.terminal),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct TomlGravity {
    player: TomlGravityPair,
    boss: TomlGravityPair,
    barrel: TomlGravityPair,
    ladder: TomlGravityPair,
    monkey: TomlGravityPair,
}

#[derive(Deserialize, Debug)]
struct TomlMotion {
    #[serde(default = "default_player_speed")]
    player_speed: f64,
    #[serde(default = "default_monkey_speed")]
    monkey_speed: f64,
    #[serde(default = "default_jump_impulse")]
    jump_impulse: f64,
    #[serde(default = "default_climb_speed")]
    climb_speed: f64,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
struct TomlBallistics {
    speed: Option<f64>,
    max_range: Option<f64>,
}

impl TomlBallistics {
    fn or(self, fallback: Ballistics) -> Ballistics {
        Ballistics {
            speed: self.speed.unwrap_or(fallback.speed),
            max_range: self.max_range.unwrap_or(fallback.max_range),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct TomlProjectiles {
    bullet: TomlBallistics,
    banana: TomlBallistics,
}

#[derive(Deserialize, Debug)]
struct TomlCombat {
    #[serde(default = "default_barrel_smash")]
    barrel_smash_score: u32,
    #[serde(default = "default_barrel_jump")]
    barrel_jump_score: u32,
    #[serde(default = "default_monkey_score")]
    monkey_score: u32,
    #[serde(default = "default_boss_health")]
    boss_health: u32,
    #[serde(default = "default_blaster_pack")]
    blaster_pack: u32,
    #[serde(default = "default_banana_cooldown")]
    banana_cooldown: u32,
    #[serde(default = "default_jump_tolerance")]
    jump_align_tolerance: f64,
}

/// `[sprites]`: `name = [w, h]`. Unlisted sprites keep their default size.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct TomlSprites {
    player: Option<[f64; 2]>,
    player_hammer: Option<[f64; 2]>,
    player_blaster: Option<[f64; 2]>,
    boss: Option<[f64; 2]>,
    barrel: Option<[f64; 2]>,
    ladder: Option<[f64; 2]>,
    platform: Option<[f64; 2]>,
    hammer: Option<[f64; 2]>,
    blaster: Option<[f64; 2]>,
    monkey: Option<[f64; 2]>,
    intelli_monkey: Option<[f64; 2]>,
    banana: Option<[f64; 2]>,
    bullet: Option<[f64; 2]>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_fire")]
    fire: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_file")]
    levels_file: String,
}

// ── Defaults ──

fn default_width() -> f64 { 1024.0 }
fn default_height() -> f64 { 768.0 }
fn default_tick_rate() -> u64 { 16 }      // ~60 ticks per second
fn default_ticks_per_second() -> u32 { 60 }

fn default_player_speed() -> f64 { 3.5 }
fn default_monkey_speed() -> f64 { 0.5 }
fn default_jump_impulse() -> f64 { -5.0 }
fn default_climb_speed() -> f64 { 2.0 }

fn default_barrel_smash() -> u32 { 100 }
fn default_barrel_jump() -> u32 { 30 }
fn default_monkey_score() -> u32 { 100 }
fn default_boss_health() -> u32 { 5 }
fn default_blaster_pack() -> u32 { 5 }
fn default_banana_cooldown() -> u32 { 300 } // 5 s
fn default_jump_tolerance() -> f64 { 1.0 }

fn default_pad_jump() -> Vec<String> { vec!["A".into()] }
fn default_pad_fire() -> Vec<String> { vec!["X".into(), "B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_levels_file() -> String { "levels/default.toml".into() }

impl Default for TomlWindow {
    fn default() -> Self {
        TomlWindow { width: default_width(), height: default_height() }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            ticks_per_second: default_ticks_per_second(),
        }
    }
}

impl Default for TomlMotion {
    fn default() -> Self {
        TomlMotion {
            player_speed: default_player_speed(),
            monkey_speed: default_monkey_speed(),
            jump_impulse: default_jump_impulse(),
            climb_speed: default_climb_speed(),
        }
    }
}

impl Default for TomlCombat {
    fn default() -> Self {
        TomlCombat {
            barrel_smash_score: default_barrel_smash(),
            barrel_jump_score: default_barrel_jump(),
            monkey_score: default_monkey_score(),
            boss_health: default_boss_health(),
            blaster_pack: default_blaster_pack(),
            banana_cooldown: default_banana_cooldown(),
            jump_align_tolerance: default_jump_tolerance(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            fire: default_pad_fire(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { levels_file: default_levels_file() }
    }
}

// ── TOML → domain ──

impl TomlConfig {
    fn tuning(&self) -> Tuning {
        let g = GravityTable::default();
        let p = ProjectileTable::default();
        Tuning {
            screen: Screen { width: self.window.width, height: self.window.height },
            ticks_per_second: self.timing.ticks_per_second.max(1),
            gravity: GravityTable {
                player: self.gravity.player.or(g.player),
                boss: self.gravity.boss.or(g.boss),
                barrel: self.gravity.barrel.or(g.barrel),
                ladder: self.gravity.ladder.or(g.ladder),
                monkey: self.gravity.monkey.or(g.monkey),
            },
            motion: Motion {
                player_speed: self.motion.player_speed,
                monkey_speed: self.motion.monkey_speed,
                jump_impulse: self.motion.jump_impulse,
                climb_speed: self.motion.climb_speed,
            },
            projectiles: ProjectileTable {
                bullet: self.projectile.bullet.or(p.bullet),
                banana: self.projectile.banana.or(p.banana),
            },
            combat: CombatConfig {
                barrel_smash_score: self.combat.barrel_smash_score,
                barrel_jump_score: self.combat.barrel_jump_score,
                monkey_score: self.combat.monkey_score,
                boss_health: self.combat.boss_health,
                blaster_pack: self.combat.blaster_pack,
                banana_cooldown: self.combat.banana_cooldown,
                jump_align_tolerance: self.combat.jump_align_tolerance,
            },
            sprites: self.sprites.sheet(),
        }
    }
}

impl TomlSprites {
    fn sheet(&self) -> SpriteSheet {
        let d = SpriteSheet::default();
        SpriteSheet {
            player: self.player.unwrap_or(d.player),
            player_hammer: self.player_hammer.unwrap_or(d.player_hammer),
            player_blaster: self.player_blaster.unwrap_or(d.player_blaster),
            boss: self.boss.unwrap_or(d.boss),
            barrel: self.barrel.unwrap_or(d.barrel),
            ladder: self.ladder.unwrap_or(d.ladder),
            platform: self.platform.unwrap_or(d.platform),
            hammer: self.hammer.unwrap_or(d.hammer),
            blaster: self.blaster.unwrap_or(d.blaster),
            monkey: self.monkey.unwrap_or(d.monkey),
            intelli_monkey: self.intelli_monkey.unwrap_or(d.intelli_monkey),
            banana: self.banana.unwrap_or(d.banana),
            bullet: self.bullet.unwrap_or(d.bullet),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) CWD, (3) ~/.local/share/girder.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        // Resolve the level pack next to whichever directory has it
        let levels_file_str = &toml_cfg.general.levels_file;
        let levels_file = if PathBuf::from(levels_file_str).is_absolute() {
            PathBuf::from(levels_file_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_file_str))
                .find(|p| p.is_file())
                .unwrap_or_else(|| PathBuf::from(levels_file_str))
        };

        Self::from_toml(toml_cfg, levels_file)
    }

    /// Parse a config document directly. Used by `load` and by tests.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        let levels_file = PathBuf::from(&toml_cfg.general.levels_file);
        Ok(Self::from_toml(toml_cfg, levels_file))
    }

    fn from_toml(toml_cfg: TomlConfig, levels_file: PathBuf) -> Self {
        let tuning = toml_cfg.tuning();
        GameConfig {
            tick_rate_ms: toml_cfg.timing.tick_rate_ms,
            tuning,
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                fire: toml_cfg.gamepad.fire,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            levels_file,
        }
    }
}

/// `~/.local/share/girder`, if HOME is set.
pub fn data_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| PathBuf::from(home).join(".local/share/girder"))
}

/// Candidate directories to search: exe dir + CWD + data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Some(data) = data_home() {
        if data.is_dir() && !dirs.iter().any(|d| d == &data) {
            dirs.push(data);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    info!(path = %path.display(), "loaded configuration");
                    return cfg;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config.toml parse error, using defaults");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config.toml");
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.tick_rate_ms, 16);
        assert_eq!(cfg.tuning, Tuning::default());
        assert_eq!(cfg.tuning.gravity, GravityTable::default());
        assert_eq!(cfg.tuning.combat.boss_health, 5);
        assert_eq!(cfg.tuning.screen, Screen { width: 1024.0, height: 768.0 });
        assert_eq!(cfg.levels_file, PathBuf::from("levels/default.toml"));
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let cfg = GameConfig::parse(
            r#"
            [gravity.barrel]
            accel = 0.5

            [projectile.banana]
            max_range = 120.0

            [combat]
            blaster_pack = 8

            [sprites]
            barrel = [24.0, 24.0]
            "#,
        )
        .unwrap();
        let t = &cfg.tuning;
        assert_eq!(t.gravity.barrel, Gravity::new(0.5, 5.0));
        assert_eq!(t.gravity.player, Gravity::new(0.2, 10.0));
        assert_eq!(t.projectiles.banana, Ballistics { speed: 1.8, max_range: 120.0 });
        assert_eq!(t.combat.blaster_pack, 8);
        assert_eq!(t.combat.banana_cooldown, 300);
        assert_eq!(t.sprites.barrel, [24.0, 24.0]);
        assert_eq!(t.sprites.player, SpriteSheet::default().player);
    }

    #[test]
    fn zero_ticks_per_second_is_clamped() {
        let cfg = GameConfig::parse("[timing]\nticks_per_second = 0\n").unwrap();
        assert_eq!(cfg.tuning.ticks_per_second, 1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[motion]\nplayer_speed = \"fast\"\n").is_err());
    }

    #[test]
    fn gamepad_lists_are_configurable() {
        let cfg = GameConfig::parse("[gamepad]\njump = [\"B\"]\n").unwrap();
        assert_eq!(cfg.gamepad.jump, vec!["B".to_string()]);
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string()]);
    }
}
