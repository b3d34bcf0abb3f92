use log::debug;

use crate::rng::{sample_inclusive, RandomSource};
use crate::species::{Combatant, DamageRange, Move};

/// Outcome of one exchange. Fields are listed in resolution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleStep {
    pub damage_dealt: u16,
    pub defender_defeated: bool,
    pub counter_damage: u16,
    pub attacker_defeated: bool,
    pub attacker: Combatant,
    pub defender: Combatant,
}

/// Applies a single player move followed by the wild counter-attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BattleResolver {
    counter_damage: DamageRange,
}

impl BattleResolver {
    pub fn new(counter_damage: DamageRange) -> Self {
        Self { counter_damage }
    }

    /// Moves always hit. A defender knocked to zero never counters.
    pub fn resolve<R: RandomSource + ?Sized>(
        &self,
        attacker: &Combatant,
        mv: &Move,
        defender: &Combatant,
        rng: &mut R,
    ) -> BattleStep {
        let damage_dealt = sample_inclusive(rng, mv.damage.min, mv.damage.max);
        let defender = defender.damaged(damage_dealt);
        debug!(
            "{} used {} for {damage_dealt}, {} at {}/{}",
            attacker.name(),
            mv.name,
            defender.name(),
            defender.hp(),
            defender.max_hp()
        );

        if defender.is_fainted() {
            return BattleStep {
                damage_dealt,
                defender_defeated: true,
                counter_damage: 0,
                attacker_defeated: false,
                attacker: attacker.clone(),
                defender,
            };
        }

        let counter_damage = sample_inclusive(rng, self.counter_damage.min, self.counter_damage.max);
        let attacker = attacker.damaged(counter_damage);
        debug!(
            "{} countered for {counter_damage}, {} at {}/{}",
            defender.name(),
            attacker.name(),
            attacker.hp(),
            attacker.max_hp()
        );

        BattleStep {
            damage_dealt,
            defender_defeated: false,
            counter_damage,
            attacker_defeated: attacker.is_fainted(),
            attacker,
            defender,
        }
    }
}
