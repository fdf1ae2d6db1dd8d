/// Level loader.
///
/// ## Sources (priority order):
///   1. The pack file named by `general.levels_file` in config.toml
///   2. Built-in levels embedded from `levels/default.toml`
///
/// ## Pack format (TOML):
///   ```toml
///   [[level]]
///   name = "Girders"
///   max_frames = 10000
///   player = "100,700"
///   boss = "800,100"
///   platforms = ["60,748", "180,748"]     # "x,y"
///   ladders = ["870,664"]
///   barrels = ["400,530"]
///   hammers = ["90,423"]
///   blasters = ["300,727"]
///   monkeys = ["500,568;right;100,60"]    # "x,y;left|right;d1,d2,..."
///   intelligent_monkeys = ["300,416;left;80,40"]
///   ```
///
/// Coordinates are entity centers in pixels. Platforms must be listed from
/// the floor upward: a ladder comes to rest on the first platform it
/// overlaps, in list order.
///
/// ## Rejection rules
///   - A malformed entity entry is skipped with a warning; the rest of its
///     collection still loads.
///   - A level without a valid player or boss spawn is skipped.
///   - A pack that yields no level at all is an error; callers fall back
///     to the embedded levels.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::geometry::Facing;
use crate::domain::patrol::MonkeyKind;

const DEFAULT_MAX_FRAMES: u32 = 10_000;

const EMBEDDED_PACK: &str = include_str!("../../levels/default.toml");

// ══════════════════════════════════════════════════════════════
// Parsed level data
// ══════════════════════════════════════════════════════════════

/// Spawn point: an entity's center.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Spawn {
    pub x: f64,
    pub y: f64,
}

impl Spawn {
    pub const fn new(x: f64, y: f64) -> Self {
        Spawn { x, y }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct MonkeySpec {
    pub at: Spawn,
    pub facing: Facing,
    /// Positive walk lengths, never empty.
    pub pattern: Vec<u32>,
    pub kind: MonkeyKind,
}

/// One validated level, ready for `WorldState::from_level`.
#[derive(Clone, PartialEq, Debug)]
pub struct LevelData {
    pub name: String,
    pub max_frames: u32,
    pub player: Spawn,
    pub boss: Spawn,
    pub platforms: Vec<Spawn>,
    pub ladders: Vec<Spawn>,
    pub barrels: Vec<Spawn>,
    pub hammers: Vec<Spawn>,
    pub blasters: Vec<Spawn>,
    pub monkeys: Vec<MonkeySpec>,
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("level pack is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("level '{level}' has no valid {what} spawn")]
    MissingSpawn { level: String, what: &'static str },

    #[error("level pack contains no playable level")]
    Empty,
}

// ══════════════════════════════════════════════════════════════
// TOML schema
// ══════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct TomlPack {
    #[serde(default)]
    level: Vec<TomlLevel>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct TomlLevel {
    name: Option<String>,
    max_frames: Option<u32>,
    player: Option<String>,
    boss: Option<String>,
    platforms: Vec<String>,
    ladders: Vec<String>,
    barrels: Vec<String>,
    hammers: Vec<String>,
    blasters: Vec<String>,
    monkeys: Vec<String>,
    intelligent_monkeys: Vec<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Levels from the configured pack file, or the embedded ones if the file
/// is missing or yields nothing playable.
pub fn load_levels(levels_file: &Path) -> Vec<LevelData> {
    if levels_file.is_file() {
        match load_pack(levels_file) {
            Ok(levels) => {
                info!(path = %levels_file.display(), count = levels.len(), "loaded level pack");
                return levels;
            }
            Err(e) => warn!(path = %levels_file.display(), error = %e, "falling back to built-in levels"),
        }
    }
    embedded_levels()
}

pub fn load_pack(path: &Path) -> Result<Vec<LevelData>, LevelError> {
    let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pack(&text)
}

/// Parse a whole pack, skipping levels that cannot be played.
pub fn parse_pack(text: &str) -> Result<Vec<LevelData>, LevelError> {
    let pack: TomlPack = toml::from_str(text)?;
    let mut levels = Vec::with_capacity(pack.level.len());
    for (i, raw) in pack.level.into_iter().enumerate() {
        match build_level(raw, i) {
            Ok(level) => levels.push(level),
            Err(e) => warn!(index = i, error = %e, "skipping level"),
        }
    }
    if levels.is_empty() {
        return Err(LevelError::Empty);
    }
    Ok(levels)
}

pub fn embedded_levels() -> Vec<LevelData> {
    match parse_pack(EMBEDDED_PACK) {
        Ok(levels) => levels,
        Err(e) => {
            warn!(error = %e, "built-in level pack is unusable");
            vec![]
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Level building
// ══════════════════════════════════════════════════════════════

fn build_level(raw: TomlLevel, index: usize) -> Result<LevelData, LevelError> {
    let name = raw.name.unwrap_or_else(|| format!("Level {}", index + 1));

    let spawn = |entry: &Option<String>, what: &'static str| {
        entry.as_deref()
            .and_then(parse_point)
            .ok_or_else(|| LevelError::MissingSpawn { level: name.clone(), what })
    };
    let player = spawn(&raw.player, "player")?;
    let boss = spawn(&raw.boss, "boss")?;

    let mut monkeys = collect(&name, "monkeys", &raw.monkeys, |e| parse_monkey(e, MonkeyKind::Plain));
    monkeys.extend(collect(&name, "intelligent_monkeys", &raw.intelligent_monkeys, |e| {
        parse_monkey(e, MonkeyKind::Intelligent)
    }));

    Ok(LevelData {
        max_frames: raw.max_frames.unwrap_or(DEFAULT_MAX_FRAMES),
        player,
        boss,
        platforms: collect(&name, "platforms", &raw.platforms, parse_point),
        ladders: collect(&name, "ladders", &raw.ladders, parse_point),
        barrels: collect(&name, "barrels", &raw.barrels, parse_point),
        hammers: collect(&name, "hammers", &raw.hammers, parse_point),
        blasters: collect(&name, "blasters", &raw.blasters, parse_point),
        monkeys,
        name,
    })
}

/// Parse every entry of one collection, dropping (and logging) bad ones.
fn collect<T>(level_name: &str, key: &str, entries: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    entries.iter()
        .filter_map(|entry| {
            let parsed = parse(entry);
            if parsed.is_none() {
                warn!(level = level_name, key, entry = %entry, "rejected level entry");
            }
            parsed
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Entry parsing
// ══════════════════════════════════════════════════════════════

/// `"x,y"` with finite coordinates.
fn parse_point(entry: &str) -> Option<Spawn> {
    let (x, y) = entry.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some(Spawn::new(x, y))
}

/// `"x,y;left|right;d1,d2,..."` with a non-empty, all-positive pattern.
fn parse_monkey(entry: &str, kind: MonkeyKind) -> Option<MonkeySpec> {
    let mut parts = entry.split(';');
    let at = parse_point(parts.next()?)?;
    let facing = match parts.next()?.trim() {
        "left" => Facing::Left,
        "right" => Facing::Right,
        _ => return None,
    };
    let pattern = parts.next()?
        .split(',')
        .map(|d| d.trim().parse::<u32>().ok().filter(|d| *d > 0))
        .collect::<Option<Vec<u32>>>()?;
    if pattern.is_empty() || parts.next().is_some() {
        return None;
    }
    Some(MonkeySpec { at, facing, pattern, kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_pack_has_two_playable_levels() {
        let levels = embedded_levels();
        assert_eq!(levels.len(), 2);
        assert!(levels.iter().all(|l| !l.platforms.is_empty() && !l.ladders.is_empty()));
        assert!(!levels[0].hammers.is_empty());
        assert!(levels[1].monkeys.iter().any(|m| m.kind == MonkeyKind::Intelligent));
        assert!(!levels[1].blasters.is_empty());
    }

    #[test]
    fn point_parsing() {
        assert_eq!(parse_point("100,700"), Some(Spawn::new(100.0, 700.0)));
        assert_eq!(parse_point(" 12.5 , 3 "), Some(Spawn::new(12.5, 3.0)));
        assert_eq!(parse_point("100"), None);
        assert_eq!(parse_point("a,b"), None);
        assert_eq!(parse_point("1,2,3"), None);
        assert_eq!(parse_point("inf,2"), None);
    }

    #[test]
    fn monkey_parsing() {
        let m = parse_monkey("500,568;right;100,60", MonkeyKind::Plain).unwrap();
        assert_eq!(m.at, Spawn::new(500.0, 568.0));
        assert_eq!(m.facing, Facing::Right);
        assert_eq!(m.pattern, vec![100, 60]);

        assert!(parse_monkey("500,568;up;100", MonkeyKind::Plain).is_none());
        assert!(parse_monkey("500,568;left;", MonkeyKind::Plain).is_none());
        assert!(parse_monkey("500,568;left;10,0", MonkeyKind::Plain).is_none());
        assert!(parse_monkey("500,568;left;10,-3", MonkeyKind::Plain).is_none());
        assert!(parse_monkey("500,568;left", MonkeyKind::Plain).is_none());
        assert!(parse_monkey("500,568;left;10;extra", MonkeyKind::Plain).is_none());
    }

    #[test]
    fn malformed_entries_shrink_the_collection() {
        let levels = parse_pack(
            r#"
            [[level]]
            player = "100,700"
            boss = "800,100"
            platforms = ["60,748", "oops", "180,748"]
            monkeys = ["1,2;left;5", "1,2;sideways;5"]
            intelligent_monkeys = ["3,4;right;7,8"]
            "#,
        )
        .unwrap();
        let l = &levels[0];
        assert_eq!(l.name, "Level 1");
        assert_eq!(l.max_frames, DEFAULT_MAX_FRAMES);
        assert_eq!(l.platforms, vec![Spawn::new(60.0, 748.0), Spawn::new(180.0, 748.0)]);
        assert!(l.ladders.is_empty());
        assert_eq!(l.monkeys.len(), 2);
        assert_eq!(l.monkeys[0].kind, MonkeyKind::Plain);
        assert_eq!(l.monkeys[1].kind, MonkeyKind::Intelligent);
    }

    #[test]
    fn level_without_spawns_is_skipped() {
        let levels = parse_pack(
            r#"
            [[level]]
            name = "Broken"
            boss = "800,100"

            [[level]]
            name = "Fine"
            player = "100,700"
            boss = "800,100"
            "#,
        )
        .unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Fine");
    }

    #[test]
    fn missing_spawn_names_the_level() {
        let raw = TomlLevel { name: Some("Lonely".into()), player: Some("1,2".into()), ..TomlLevel::default() };
        match build_level(raw, 0) {
            Err(LevelError::MissingSpawn { level, what }) => {
                assert_eq!(level, "Lonely");
                assert_eq!(what, "boss");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pack_without_playable_levels_is_an_error() {
        assert!(matches!(parse_pack(""), Err(LevelError::Empty)));
        assert!(matches!(parse_pack("[[level]]\nname = \"x\"\n"), Err(LevelError::Empty)));
        assert!(matches!(parse_pack("[[level]\n"), Err(LevelError::Parse(_))));
    }

    #[test]
    fn missing_file_falls_back_to_embedded() {
        let levels = load_levels(Path::new("/nonexistent/girder/levels.toml"));
        assert_eq!(levels, embedded_levels());
    }

    #[test]
    fn unreadable_pack_reports_the_path() {
        let err = load_pack(Path::new("/nonexistent/girder/levels.toml")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/girder/levels.toml"));
    }
}
