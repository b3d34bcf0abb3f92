use log::debug;

use crate::rng::{sample_index, RandomSource};
use crate::species::{wild_pool, Combatant, Species};
use crate::world::{Tile, TileType};

/// Rolls wild encounters for tiles the player steps onto.
#[derive(Clone, Debug, PartialEq)]
pub struct EncounterGenerator {
    rate: f64,
    pool: Vec<Species>,
}

impl EncounterGenerator {
    pub fn new(rate: f64, pool: Vec<Species>) -> Self {
        Self { rate, pool }
    }

    pub fn with_default_pool(rate: f64) -> Self {
        Self::new(rate, wild_pool())
    }

    pub fn pool(&self) -> &[Species] {
        &self.pool
    }

    /// One trigger draw on grass; a second draw picks the species when it
    /// fires. Other terrain never consumes randomness.
    pub fn roll_encounter<R: RandomSource + ?Sized>(
        &self,
        tile: Tile,
        rng: &mut R,
    ) -> Option<Combatant> {
        if tile.kind != TileType::Grass {
            return None;
        }
        let roll = rng.next_unit();
        if roll >= self.rate {
            debug!("encounter roll {roll:.3} missed (rate {:.2})", self.rate);
            return None;
        }
        let index = sample_index(rng, self.pool.len())?;
        let species = self.pool[index].clone();
        debug!("encounter roll {roll:.3} hit, pool index {index} ({})", species.name);
        Some(Combatant::fresh(species))
    }
}
