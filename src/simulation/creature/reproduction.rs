//! Birth ages and offspring creation.

use rand::Rng;
use std::f32::consts::TAU;

use super::super::params::SimParams;
use super::creature::{Creature, CreatureId, MAX_ENERGY};

/// Maximum deviation of a birth age from its base age.
pub const BIRTH_AGE_JITTER: i64 = 10;

/// Jitters each base age by a uniform integer in `[-10, 10]`.
///
/// Ages never go below zero.
pub fn dice_birth_ages<R: Rng + ?Sized>(base_ages: &[u32], rng: &mut R) -> Vec<u32> {
    base_ages
        .iter()
        .map(|&base| {
            let jitter = rng.gen_range(-BIRTH_AGE_JITTER..=BIRTH_AGE_JITTER);
            (i64::from(base) + jitter).max(0) as u32
        })
        .collect()
}

impl Creature {
    /// Whether the creature reproduces at its current age.
    pub fn can_reproduce(&self) -> bool {
        self.birth_ages.contains(&self.age)
    }

    /// Re-rolls birth ages from the given base ages.
    pub fn reroll_birth_ages<R: Rng + ?Sized>(&mut self, base_ages: &[u32], rng: &mut R) {
        self.birth_ages = dice_birth_ages(base_ages, rng);
    }

    /// Creates `reproduction_offsprings` children at the parent's position.
    ///
    /// Each child gets a mutated copy of the parent's brain (an exact copy when
    /// mutations are disabled), the next generation number, a random heading
    /// and freshly diced birth ages. Ids are drawn from `next_id`.
    pub fn offspring<R, F>(&self, params: &SimParams, rng: &mut R, mut next_id: F) -> Vec<Creature>
    where
        R: Rng + ?Sized,
        F: FnMut() -> CreatureId,
    {
        (0..params.reproduction_offsprings)
            .map(|_| {
                let brain = if params.allow_mutations {
                    self.brain
                        .mutated(params.mutation_probability, params.mutation_strength, rng)
                } else {
                    self.brain.clone()
                };

                Creature {
                    id: next_id(),
                    x: self.x,
                    y: self.y,
                    angle: rng.gen_range(0.0..TAU),
                    speed: 0.0,
                    energy: MAX_ENERGY,
                    age: 0,
                    generation: self.generation + 1,
                    bite_effort: 0.0,
                    vision_distance: self.vision_distance,
                    bite_range: self.bite_range,
                    brain,
                    birth_ages: dice_birth_ages(&params.reproduction_ages, rng),
                }
            })
            .collect()
    }
}
