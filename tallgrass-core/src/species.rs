use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ElementType {
    Grass,
    Fire,
    Water,
    Rock,
    Electric,
    Bug,
}

/// Inclusive damage bounds with `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DamageRange {
    pub min: u16,
    pub max: u16,
}

impl DamageRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(self) -> bool {
        self.min <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Move {
    pub name: String,
    pub damage: DamageRange,
}

impl Move {
    /// Panics in debug builds when `min_damage > max_damage`.
    pub fn new(name: impl Into<String>, min_damage: u16, max_damage: u16) -> Self {
        debug_assert!(
            min_damage <= max_damage,
            "inverted damage range {min_damage}..={max_damage}"
        );
        Self {
            name: name.into(),
            damage: DamageRange::new(min_damage, max_damage),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Species {
    pub name: String,
    pub element: ElementType,
    pub max_hp: u16,
    #[serde(default)]
    pub moves: Vec<Move>,
}

impl Species {
    pub fn find_move(&self, name: &str) -> Option<&Move> {
        self.moves
            .iter()
            .find(|mv| mv.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// A species instance with its current health.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Combatant {
    pub species: Species,
    hp: u16,
}

impl Combatant {
    pub fn fresh(species: Species) -> Self {
        let hp = species.max_hp;
        Self { species, hp }
    }

    pub fn hp(&self) -> u16 {
        self.hp
    }

    pub fn max_hp(&self) -> u16 {
        self.species.max_hp
    }

    pub fn name(&self) -> &str {
        &self.species.name
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Returns a copy with `amount` subtracted, floored at zero.
    pub fn damaged(&self, amount: u16) -> Self {
        Self {
            species: self.species.clone(),
            hp: self.hp.saturating_sub(amount),
        }
    }

    /// Builds an instance at a given health, clamped to `max_hp`.
    pub fn with_hp(species: Species, hp: u16) -> Self {
        let hp = hp.min(species.max_hp);
        Self { species, hp }
    }
}

/// Keys accepted by starter selection, in menu order.
pub const STARTER_KEYS: [&str; 3] = ["sproutle", "embercub", "ripplet"];

pub fn starter(key: &str) -> Option<Species> {
    let species = match key.trim().to_ascii_lowercase().as_str() {
        "sproutle" => Species {
            name: "Sproutle".to_string(),
            element: ElementType::Grass,
            max_hp: 42,
            moves: vec![Move::new("Vine Lash", 6, 10), Move::new("Seed Burst", 3, 13)],
        },
        "embercub" => Species {
            name: "Embercub".to_string(),
            element: ElementType::Fire,
            max_hp: 38,
            moves: vec![Move::new("Ember Snap", 7, 11), Move::new("Cinder Claw", 5, 13)],
        },
        "ripplet" => Species {
            name: "Ripplet".to_string(),
            element: ElementType::Water,
            max_hp: 46,
            moves: vec![Move::new("Bubble Jet", 5, 9), Move::new("Tide Slam", 4, 12)],
        },
        _ => return None,
    };
    Some(species)
}

/// Wild creatures that can appear in tall grass. They have no moves of their
/// own; their counter-attacks use the shared range from `Rules`.
pub fn wild_pool() -> Vec<Species> {
    [
        ("Bramblemouse", ElementType::Grass, 24),
        ("Pebblit", ElementType::Rock, 30),
        ("Zapwing", ElementType::Electric, 20),
        ("Mossnail", ElementType::Bug, 26),
    ]
    .into_iter()
    .map(|(name, element, max_hp)| Species {
        name: name.to_string(),
        element,
        max_hp,
        moves: Vec::new(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_starter_key_resolves_with_moves() {
        for key in STARTER_KEYS {
            let species = starter(key).expect("starter");
            assert!(!species.moves.is_empty());
            assert!(species.moves.iter().all(|mv| mv.damage.is_ordered()));
        }
        assert!(starter("missingno").is_none());
        assert_eq!(starter(" Sproutle ").map(|s| s.name), Some("Sproutle".to_string()));
    }

    #[test]
    fn damage_never_underflows() {
        let mon = Combatant::fresh(wild_pool().remove(2));
        let hurt = mon.damaged(500);
        assert_eq!(hurt.hp(), 0);
        assert!(hurt.is_fainted());
        assert_eq!(mon.hp(), mon.max_hp());
    }

    #[test]
    fn move_keeps_damage_bounds_in_order() {
        assert_eq!(Move::new("Ember Snap", 7, 11).damage, DamageRange::new(7, 11));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "inverted damage range")]
    fn move_rejects_inverted_damage_bounds() {
        let _ = Move::new("Tide Slam", 12, 4);
    }

    #[test]
    fn move_lookup_ignores_case() {
        let sproutle = starter("sproutle").expect("starter");
        assert_eq!(
            sproutle.find_move("vine lash").map(|mv| mv.damage),
            Some(DamageRange::new(6, 10))
        );
        assert!(sproutle.find_move("Tackle").is_none());
    }
}
