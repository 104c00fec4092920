//! Hand-laid worlds for behavioural checks and analysis.
//!
//! ```
//! use gridlife::simulation::scenario::ScenarioBuilder;
//!
//! let scenario = ScenarioBuilder::new(50, 50)
//!     .creature_at(5.7, 25.5, 0.0)
//!     .food_at(6, 25)
//!     .build()
//!     .unwrap();
//! assert_eq!(scenario.world.creatures.len(), 1);
//! ```

use super::context::SimulationContext;
use super::creature::CreatureId;
use super::error::{Result, SimError};
use super::grid::Cell;
use super::params::SimParams;
use super::world::World;

/// A built scenario: the world plus the ids of the placed creatures, in
/// placement order.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// The world.
    pub world: World,
    /// Ids of the creatures placed by the builder.
    pub creature_ids: Vec<CreatureId>,
}

/// Builder for a walled world with exact placements.
///
/// Unless parameters are supplied, `food_amount` is set to the number of
/// placed food items so no random food appears on the first tick.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    width: usize,
    height: usize,
    seed: u64,
    params: Option<SimParams>,
    walls: Vec<(usize, usize)>,
    foods: Vec<(usize, usize)>,
    creatures: Vec<(f32, f32, f32)>,
}

impl ScenarioBuilder {
    /// Starts an empty walled `width × height` world.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            seed: 0,
            params: None,
            walls: Vec::new(),
            foods: Vec::new(),
            creatures: Vec::new(),
        }
    }

    /// Seed of the world's random generator.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parameters to use instead of the defaults.
    #[must_use]
    pub fn params(mut self, params: SimParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Adds an interior wall.
    #[must_use]
    pub fn wall_at(mut self, x: usize, y: usize) -> Self {
        self.walls.push((x, y));
        self
    }

    /// Adds a food item on a cell.
    #[must_use]
    pub fn food_at(mut self, x: usize, y: usize) -> Self {
        self.foods.push((x, y));
        self
    }

    /// Adds a creature with a random brain.
    #[must_use]
    pub fn creature_at(mut self, x: f32, y: f32, angle: f32) -> Self {
        self.creatures.push((x, y, angle));
        self
    }

    /// Builds the world. Fails on bad dimensions or placements.
    pub fn build(self) -> Result<Scenario> {
        let params = self.params.unwrap_or_else(|| SimParams {
            food_amount: self.foods.len(),
            ..SimParams::default()
        });

        let mut world = World::empty(
            self.width,
            self.height,
            SimulationContext::new(params),
            self.seed,
        )?;

        for &(x, y) in &self.walls {
            world.set_cell(x, y, Cell::Wall)?;
        }
        for &(x, y) in &self.foods {
            world.set_cell(x, y, Cell::Food)?;
        }
        let creature_ids = self
            .creatures
            .iter()
            .map(|&(x, y, angle)| world.spawn_creature(x, y, angle))
            .collect();

        Ok(Scenario {
            world,
            creature_ids,
        })
    }
}

impl Scenario {
    /// Id of the `index`-th placed creature.
    ///
    /// Fails with `NoSuchPlacement` for an index past the placed creatures and
    /// with `NotFound` if that creature is no longer alive.
    pub fn creature_id(&self, index: usize) -> Result<CreatureId> {
        let &id = self
            .creature_ids
            .get(index)
            .ok_or(SimError::NoSuchPlacement {
                index,
                placed: self.creature_ids.len(),
            })?;
        self.world
            .creature_by_id(id)
            .map(|c| c.id)
            .ok_or(SimError::NotFound(id))
    }
}
