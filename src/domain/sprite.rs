/// Sprite identifiers and their pixel extents.
///
/// Image loading is not the core's business: only the dimensions matter,
/// because the active sprite determines an entity's hitbox. The sheet is
/// filled from `[sprites]` in config.toml, with the defaults below.

use super::equipment::Equipment;
use super::geometry::{Facing, Size};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SpriteId {
    PlayerLeft,
    PlayerRight,
    PlayerHammerLeft,
    PlayerHammerRight,
    PlayerBlasterLeft,
    PlayerBlasterRight,
    Boss,
    Barrel,
    Ladder,
    Platform,
    Hammer,
    Blaster,
    MonkeyLeft,
    MonkeyRight,
    IntelliMonkeyLeft,
    IntelliMonkeyRight,
    Banana,
    BulletLeft,
    BulletRight,
}

impl SpriteId {
    /// Player sprite for a given loadout and facing.
    pub fn player(equipment: Equipment, facing: Facing) -> Self {
        match (equipment, facing) {
            (Equipment::Hammer, Facing::Left) => SpriteId::PlayerHammerLeft,
            (Equipment::Hammer, Facing::Right) => SpriteId::PlayerHammerRight,
            (Equipment::Blaster { .. }, Facing::Left) => SpriteId::PlayerBlasterLeft,
            (Equipment::Blaster { .. }, Facing::Right) => SpriteId::PlayerBlasterRight,
            (Equipment::Unarmed, Facing::Left) => SpriteId::PlayerLeft,
            (Equipment::Unarmed, Facing::Right) => SpriteId::PlayerRight,
        }
    }

    pub fn monkey(intelligent: bool, facing: Facing) -> Self {
        match (intelligent, facing) {
            (false, Facing::Left) => SpriteId::MonkeyLeft,
            (false, Facing::Right) => SpriteId::MonkeyRight,
            (true, Facing::Left) => SpriteId::IntelliMonkeyLeft,
            (true, Facing::Right) => SpriteId::IntelliMonkeyRight,
        }
    }

    pub fn bullet(facing: Facing) -> Self {
        match facing {
            Facing::Left => SpriteId::BulletLeft,
            Facing::Right => SpriteId::BulletRight,
        }
    }
}

/// Pixel extents for every sprite, as `[w, h]` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSheet {
    pub player: [f64; 2],
    pub player_hammer: [f64; 2],
    pub player_blaster: [f64; 2],
    pub boss: [f64; 2],
    pub barrel: [f64; 2],
    pub ladder: [f64; 2],
    pub platform: [f64; 2],
    pub hammer: [f64; 2],
    pub blaster: [f64; 2],
    pub monkey: [f64; 2],
    pub intelli_monkey: [f64; 2],
    pub banana: [f64; 2],
    pub bullet: [f64; 2],
}

impl Default for SpriteSheet {
    fn default() -> Self {
        SpriteSheet {
            player: [32.0, 42.0],
            player_hammer: [48.0, 50.0],
            player_blaster: [44.0, 44.0],
            boss: [96.0, 84.0],
            barrel: [30.0, 30.0],
            ladder: [40.0, 150.0],
            platform: [120.0, 20.0],
            hammer: [28.0, 30.0],
            blaster: [32.0, 22.0],
            monkey: [40.0, 40.0],
            intelli_monkey: [40.0, 44.0],
            banana: [18.0, 18.0],
            bullet: [20.0, 8.0],
        }
    }
}

impl SpriteSheet {
    /// Hitbox extent of a sprite. Left/right variants share dimensions.
    pub fn size(&self, id: SpriteId) -> Size {
        let [w, h] = match id {
            SpriteId::PlayerLeft | SpriteId::PlayerRight => self.player,
            SpriteId::PlayerHammerLeft | SpriteId::PlayerHammerRight => self.player_hammer,
            SpriteId::PlayerBlasterLeft | SpriteId::PlayerBlasterRight => self.player_blaster,
            SpriteId::Boss => self.boss,
            SpriteId::Barrel => self.barrel,
            SpriteId::Ladder => self.ladder,
            SpriteId::Platform => self.platform,
            SpriteId::Hammer => self.hammer,
            SpriteId::Blaster => self.blaster,
            SpriteId::MonkeyLeft | SpriteId::MonkeyRight => self.monkey,
            SpriteId::IntelliMonkeyLeft | SpriteId::IntelliMonkeyRight => self.intelli_monkey,
            SpriteId::Banana => self.banana,
            SpriteId::BulletLeft | SpriteId::BulletRight => self.bullet,
        };
        Size::new(w, h)
    }
}
