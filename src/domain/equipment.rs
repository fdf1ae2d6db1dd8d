/// Player loadout: at most one weapon kind is held at a time.
///
/// | held      | picks up hammer | picks up blaster        |
/// |-----------|-----------------|-------------------------|
/// | Unarmed   | Hammer          | Blaster { pack }        |
/// | Hammer    | Hammer          | Blaster { pack }        |
/// | Blaster n | Hammer (ammo 0) | Blaster { n + pack }    |
///
/// Ammunition only exists while the blaster is held, so exclusivity is
/// enforced by the type rather than by clearing flags.

/// Collectible weapon kinds lying around a level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Weapon {
    Hammer,
    Blaster,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Equipment {
    #[default]
    Unarmed,
    Hammer,
    Blaster { ammo: u32 },
}

impl Equipment {
    /// Melee weapon held: smashes barrels, kills monkeys, wins on reaching the boss.
    pub fn is_melee(self) -> bool {
        matches!(self, Equipment::Hammer)
    }

    pub fn is_ranged(self) -> bool {
        matches!(self, Equipment::Blaster { .. })
    }

    /// Remaining shots; zero unless the blaster is held.
    pub fn ammo(self) -> u32 {
        match self {
            Equipment::Blaster { ammo } => ammo,
            _ => 0,
        }
    }

    /// Loadout after collecting `weapon`. Blaster packs accumulate.
    pub fn pick_up(self, weapon: Weapon, pack_size: u32) -> Equipment {
        match weapon {
            Weapon::Hammer => Equipment::Hammer,
            Weapon::Blaster => Equipment::Blaster {
                ammo: self.ammo().saturating_add(pack_size),
            },
        }
    }

    /// Spend one shot. Returns false (and changes nothing) when no shot is
    /// available. Firing the last round drops the empty blaster.
    pub fn fire(&mut self) -> bool {
        match *self {
            Equipment::Blaster { ammo } if ammo > 0 => {
                *self = if ammo == 1 {
                    Equipment::Unarmed
                } else {
                    Equipment::Blaster { ammo: ammo - 1 }
                };
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hammer_replaces_blaster_and_clears_ammo() {
        let e = Equipment::Blaster { ammo: 4 }.pick_up(Weapon::Hammer, 5);
        assert_eq!(e, Equipment::Hammer);
        assert_eq!(e.ammo(), 0);
        assert!(e.is_melee());
        assert!(!e.is_ranged());
    }

    #[test]
    fn blaster_replaces_hammer() {
        let e = Equipment::Hammer.pick_up(Weapon::Blaster, 5);
        assert_eq!(e, Equipment::Blaster { ammo: 5 });
        assert!(!e.is_melee());
    }

    #[test]
    fn blaster_packs_accumulate() {
        let e = Equipment::Unarmed
            .pick_up(Weapon::Blaster, 5)
            .pick_up(Weapon::Blaster, 5);
        assert_eq!(e.ammo(), 10);
    }

    #[test]
    fn exactly_one_state_after_any_pickup() {
        let starts = [Equipment::Unarmed, Equipment::Hammer, Equipment::Blaster { ammo: 2 }];
        for start in starts {
            for weapon in [Weapon::Hammer, Weapon::Blaster] {
                let e = start.pick_up(weapon, 5);
                let held = [e.is_melee(), e.is_ranged(), e == Equipment::Unarmed];
                assert_eq!(held.iter().filter(|h| **h).count(), 1);
            }
        }
    }

    #[test]
    fn firing_consumes_ammo() {
        let mut e = Equipment::Blaster { ammo: 2 };
        assert!(e.fire());
        assert_eq!(e.ammo(), 1);
        assert!(e.fire());
        assert_eq!(e, Equipment::Unarmed);
        assert!(!e.fire());
    }

    #[test]
    fn cannot_fire_without_blaster() {
        let mut e = Equipment::Hammer;
        assert!(!e.fire());
        assert_eq!(e, Equipment::Hammer);
    }
}
