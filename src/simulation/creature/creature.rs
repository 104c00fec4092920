//! Creature state and per-tick bookkeeping.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::brain::{Decision, NeuralNetwork};
use super::super::geometric_utils::project;
use super::super::params::SimParams;
use super::super::vision::Pose;
use super::reproduction::dice_birth_ages;

/// Identifier handed out by the world, strictly increasing.
pub type CreatureId = u64;

/// Speed is clamped to `[-MAX_SPEED, MAX_SPEED]`.
pub const MAX_SPEED: f32 = 0.5;
/// Energy is clamped to at most this value when gained.
pub const MAX_ENERGY: f32 = 1.0;
/// Energy forced onto a creature that outlived the age cap.
pub const OLD_AGE_ENERGY: f32 = -100.0;
/// Bite effort above which a creature actually bites.
pub const BITE_THRESHOLD: f32 = 0.5;
/// Ray length of a freshly generated creature.
pub const DEFAULT_VISION_DISTANCE: f32 = 10.0;
/// Reach of a freshly generated creature's bite.
pub const DEFAULT_BITE_RANGE: f32 = 1.0;

/// A simulated creature with a neural network brain.
///
/// Creatures:
/// - Turn and accelerate based on brain outputs
/// - See the grid through raycast vision
/// - Bite food and other creatures for energy
/// - Reproduce at their birth ages, passing on a mutated brain
/// - Die when energy drops below zero or they grow too old
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Unique identifier for this creature.
    pub id: CreatureId,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Heading in radians.
    pub angle: f32,
    /// Signed speed in cells per tick.
    pub speed: f32,
    /// Current energy (dead below zero).
    pub energy: f32,
    /// Ticks lived.
    pub age: u32,
    /// Lineage depth.
    pub generation: u32,
    /// Bite effort decided on the last tick.
    pub bite_effort: f32,
    /// Maximum ray length.
    pub vision_distance: f32,
    /// Distance ahead at which bites land.
    pub bite_range: f32,
    /// Neural network that controls behavior.
    pub brain: NeuralNetwork,
    /// Ages at which this creature reproduces.
    pub birth_ages: Vec<u32>,
}

impl Creature {
    /// Creates a newborn creature with full energy and freshly diced birth ages.
    pub fn new<R: Rng + ?Sized>(
        id: CreatureId,
        x: f32,
        y: f32,
        angle: f32,
        brain: NeuralNetwork,
        params: &SimParams,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            x,
            y,
            angle,
            speed: 0.0,
            energy: MAX_ENERGY,
            age: 0,
            generation: 0,
            bite_effort: 0.0,
            vision_distance: DEFAULT_VISION_DISTANCE,
            bite_range: DEFAULT_BITE_RANGE,
            brain,
            birth_ages: dice_birth_ages(&params.reproduction_ages, rng),
        }
    }

    /// Checks if the creature is alive (energy not below zero).
    pub fn is_alive(&self) -> bool {
        self.energy >= 0.0
    }

    /// Position, heading and vision range as consumed by the vision system.
    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            angle: self.angle,
            vision_distance: self.vision_distance,
        }
    }

    /// Applies a decision to heading and speed and returns the candidate
    /// position one step ahead. The position itself is not changed.
    pub fn steer(&mut self, decision: &Decision) -> (f32, f32) {
        self.angle += decision.angle_delta;
        self.speed = (self.speed + decision.speed_delta).clamp(-MAX_SPEED, MAX_SPEED);
        self.bite_effort = decision.bite_effort;

        project(self.x, self.y, self.angle, self.speed)
    }

    /// Whether the last decision asked for a bite.
    pub fn wants_to_bite(&self) -> bool {
        self.bite_effort > BITE_THRESHOLD
    }

    /// Point `bite_range` ahead of the creature.
    pub fn bite_target(&self) -> (f32, f32) {
        project(self.x, self.y, self.angle, self.bite_range)
    }

    /// Total energy a tick costs given the rotation just applied.
    pub fn tick_cost(&self, angle_delta: f32, params: &SimParams) -> f32 {
        params.energy_cost_speed * self.speed.abs()
            + params.energy_cost_rotate * angle_delta.abs()
            + params.energy_cost_bite * self.bite_effort.abs()
            + params.energy_cost_tick
    }

    /// Reduces the creature's energy. There is no lower bound.
    pub fn consume_energy(&mut self, amount: f32) {
        self.energy -= amount;
    }

    /// Increases the creature's energy, capped at [`MAX_ENERGY`].
    pub fn gain_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(MAX_ENERGY);
    }

    /// Adds one tick of age; past `max_age` the creature is doomed.
    pub fn grow_older(&mut self, max_age: u32) {
        self.age += 1;
        if self.age > max_age {
            self.energy = OLD_AGE_ENERGY;
        }
    }
}
