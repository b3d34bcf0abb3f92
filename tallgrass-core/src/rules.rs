use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::species::DamageRange;
use crate::world::Position;

/// Tunables for a session. Defaults are the classic route values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Rules {
    /// Chance that a step onto grass starts a battle.
    pub encounter_rate: f64,
    /// Shared counter-attack range for every wild creature.
    pub counter_damage: DamageRange,
    pub spawn: Position,
    pub log_capacity: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            encounter_rate: 0.30,
            counter_damage: DamageRange::new(4, 10),
            spawn: Position::new(2, 2),
            log_capacity: 4,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(0.0..=1.0).contains(&self.encounter_rate) {
            return Err(RulesError::EncounterRate(self.encounter_rate));
        }
        if !self.counter_damage.is_ordered() {
            return Err(RulesError::InvertedRange {
                min: self.counter_damage.min,
                max: self.counter_damage.max,
            });
        }
        if self.log_capacity == 0 {
            return Err(RulesError::ZeroLogCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let rules = Rules {
            encounter_rate: 1.5,
            ..Rules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::EncounterRate(1.5)));

        let rules = Rules {
            counter_damage: DamageRange::new(9, 2),
            ..Rules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(RulesError::InvertedRange { min: 9, max: 2 })
        );

        let rules = Rules {
            log_capacity: 0,
            ..Rules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::ZeroLogCapacity));
    }
}
