//! The world: grid, population and the tick loop.
//!
//! One call to [`World::update`] runs a full step:
//! vision for everyone, one batched brain evaluation, then per creature
//! movement, energy costs, biting and aging, followed by reproduction,
//! removal of the dead, food re-balancing and telemetry.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f32::consts::TAU;
use tracing::{debug, info, trace, warn};

use super::brain::{BrainBatch, Decision, NeuralNetwork};
use super::context::SimulationContext;
use super::creature::{Creature, CreatureId};
use super::error::{Result, SimError};
use super::food::Food;
use super::grid::{Cell, Grid};
use super::params::ParamEdit;
use super::telemetry::EventKind;
use super::vision::{self, Pose};

/// Shape and initial population of a generated world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid columns, at least 3.
    pub width: usize,
    /// Grid rows, at least 3.
    pub height: usize,
    /// Creatures placed at generation time.
    pub creature_count: usize,
    /// Seed of the world's random generator.
    pub seed: u64,
    /// Probability that an interior cell starts as a wall.
    pub wall_density: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            creature_count: 50,
            seed: 0,
            wall_density: 0.0,
        }
    }
}

/// Read-only view of a creature for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureView {
    /// Creature id.
    pub id: CreatureId,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Heading in radians.
    pub angle: f32,
    /// Current energy.
    pub energy: f32,
    /// Lineage depth.
    pub generation: u32,
}

/// Copy of everything a renderer draws, taken between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Cell codes, `height × width`.
    pub cells: Array2<u8>,
    /// Live creatures.
    pub creatures: Vec<CreatureView>,
    /// Food items.
    pub foods: Vec<Food>,
}

/// What one creature currently sees and would decide.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    /// Creature id.
    pub id: CreatureId,
    /// 45-value vision vector.
    pub vision: Array1<f32>,
    /// Raycast sample points.
    pub dots: Vec<(f32, f32)>,
    /// Network outputs for `vision`.
    pub decision: Decision,
    /// Recorded energy samples.
    pub energy_history: Vec<f32>,
}

/// The simulated world.
///
/// `map` is rebuilt from the static wall layer, food and creatures by
/// [`World::update_map`]; creatures are drawn last and win shared cells.
#[derive(Debug, Clone)]
pub struct World {
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Renderable grid: walls, then food, then creatures.
    pub map: Grid,
    /// Live creatures.
    pub creatures: Vec<Creature>,
    /// Food items.
    pub foods: Vec<Food>,
    /// Completed ticks.
    pub tick: u64,
    /// Parameters, telemetry and debug data.
    pub ctx: SimulationContext,
    walls: Grid,
    rng: StdRng,
    next_id: CreatureId,
}

impl World {
    /// Creates a walled world without creatures or food.
    pub fn empty(width: usize, height: usize, ctx: SimulationContext, seed: u64) -> Result<Self> {
        if width < 3 || height < 3 {
            return Err(SimError::Config(format!(
                "world must be at least 3x3, got {width}x{height}"
            )));
        }

        let walls = Grid::walled(width, height);
        Ok(Self {
            width,
            height,
            map: walls.clone(),
            creatures: Vec::new(),
            foods: Vec::new(),
            tick: 0,
            ctx,
            walls,
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
        })
    }

    /// Generates a world: border walls, random interior walls, creatures with
    /// random brains on free cells and `food_amount` food items.
    pub fn new(config: &WorldConfig, ctx: SimulationContext) -> Result<Self> {
        let mut world = Self::empty(config.width, config.height, ctx, config.seed)?;

        let density = config.wall_density.clamp(0.0, 1.0);
        if density > 0.0 {
            for y in 1..config.height - 1 {
                for x in 1..config.width - 1 {
                    if world.rng.gen_range(0.0..1.0) < density {
                        world.walls.set(x, y, Cell::Wall);
                    }
                }
            }
        }

        let mut occupied = HashSet::new();
        for _ in 0..config.creature_count {
            let Some((cx, cy)) = world.random_free_cell(&occupied) else {
                warn!("no free cell left for initial creatures");
                break;
            };
            occupied.insert((cx, cy));
            let angle = world.rng.gen_range(0.0..TAU);
            world.spawn_creature(cx as f32 + 0.5, cy as f32 + 0.5, angle);
        }

        world.rebalance_food();
        world.update_map();

        info!(
            width = config.width,
            height = config.height,
            creatures = world.creatures.len(),
            foods = world.foods.len(),
            seed = config.seed,
            "world generated"
        );
        Ok(world)
    }

    /// The static wall layer.
    pub fn walls(&self) -> &Grid {
        &self.walls
    }

    /// Cell of the renderable grid, `None` outside the grid.
    pub fn get_cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.map.get(x, y)
    }

    /// Edits one cell.
    ///
    /// `Wall` and `Empty` edit the static wall layer and remove any food on
    /// the cell. `Food` places a fresh food item, or refills the one already
    /// there. Creatures cannot be written as cells; use
    /// [`World::spawn_creature`]. Border walls are fixed.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(SimError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        match cell {
            Cell::Wall => {
                self.walls.set(x, y, Cell::Wall);
                self.remove_food_at(x, y);
            }
            Cell::Empty => {
                if self.walls.is_border(x, y) {
                    return Err(SimError::ProtectedBorder { x, y });
                }
                self.walls.set(x, y, Cell::Empty);
                self.remove_food_at(x, y);
            }
            Cell::Food => {
                if self.walls.get(x, y) == Some(Cell::Wall) {
                    return Err(SimError::InvalidCell(format!(
                        "cannot place food on the wall at ({x}, {y})"
                    )));
                }
                let nutrition = self.ctx.params.food_energy_capacity;
                let walls = &self.walls;
                match self
                    .foods
                    .iter_mut()
                    .find(|f| walls.index_of(f.x, f.y) == Some((x, y)))
                {
                    Some(food) => food.nutrition = nutrition,
                    None => self.foods.push(Food::new(x as f32, y as f32, nutrition)),
                }
            }
            Cell::Creature => {
                return Err(SimError::InvalidCell(
                    "creatures are spawned, not written as cells".to_string(),
                ));
            }
        }

        self.update_map();
        Ok(())
    }

    fn remove_food_at(&mut self, x: usize, y: usize) {
        let walls = &self.walls;
        self.foods
            .retain(|f| walls.index_of(f.x, f.y) != Some((x, y)));
    }

    /// Live creature with the given id.
    pub fn creature_by_id(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    /// Mutable access to a live creature.
    pub fn creature_by_id_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    /// Hands out the next creature id.
    pub fn next_creature_id(&mut self) -> CreatureId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a creature with a random brain and returns its id.
    pub fn spawn_creature(&mut self, x: f32, y: f32, angle: f32) -> CreatureId {
        let id = self.next_creature_id();
        let brain = NeuralNetwork::new_random(&mut self.rng);
        let creature = Creature::new(id, x, y, angle, brain, &self.ctx.params, &mut self.rng);
        self.creatures.push(creature);
        self.update_map();
        id
    }

    /// Adds a prepared creature. Its id is replaced by a fresh one, which is returned.
    pub fn add_creature(&mut self, mut creature: Creature) -> CreatureId {
        creature.id = self.next_creature_id();
        let id = creature.id;
        self.creatures.push(creature);
        self.update_map();
        id
    }

    /// Rebuilds the renderable grid from walls, food and creatures.
    ///
    /// Touches nothing but `map`, so calling it repeatedly is harmless.
    pub fn update_map(&mut self) {
        self.map.copy_from(&self.walls);
        for food in self.foods.iter().filter(|f| !f.is_exhausted()) {
            if let Some((x, y)) = self.map.index_of(food.x, food.y) {
                self.map.set(x, y, Cell::Food);
            }
        }
        for creature in &self.creatures {
            if let Some((x, y)) = self.map.index_of(creature.x, creature.y) {
                self.map.set(x, y, Cell::Creature);
            }
        }
    }

    /// Advances the simulation by one tick.
    pub fn update(&mut self) {
        self.update_map();

        let poses: Vec<Pose> = self.creatures.iter().map(Creature::pose).collect();
        let sight = vision::observe_all(&self.map, &poses);

        let batch = BrainBatch::stack(self.creatures.iter().map(|c| &c.brain));
        let outputs = batch.forward(sight.visions.view());

        self.ctx
            .debug
            .store_raycasts(self.creatures.iter().map(|c| c.id).zip(sight.dots));

        for (i, row) in outputs.rows().into_iter().enumerate() {
            self.act(i, &Decision::from_outputs(row));
        }

        self.reproduce();
        self.remove_dead();
        self.rebalance_food();
        self.update_map();
        self.ctx.telemetry.write_stats(&self.creatures);

        trace!(
            tick = self.tick,
            creatures = self.creatures.len(),
            foods = self.foods.len(),
            "tick complete"
        );
        self.tick += 1;
    }

    /// Movement, energy costs, bite and aging for creature `i`.
    fn act(&mut self, i: usize, decision: &Decision) {
        if !self.creatures[i].is_alive() {
            // Bitten to death earlier this tick; removed below.
            return;
        }

        let params = &self.ctx.params;
        let creature = &mut self.creatures[i];

        let (new_x, new_y) = creature.steer(decision);
        if move_allowed(&self.walls, new_x, new_y) {
            creature.x = new_x;
            creature.y = new_y;
        } else {
            creature.consume_energy(params.energy_loss_collision);
            self.ctx.telemetry.log_event(
                creature.id,
                self.tick,
                EventKind::WallCollision,
                params.energy_loss_collision,
            );
        }

        let cost = creature.tick_cost(decision.angle_delta, params);
        creature.consume_energy(cost);

        if creature.wants_to_bite() {
            self.bite(i);
        }

        let max_age = self.ctx.params.creature_max_age;
        self.creatures[i].grow_older(max_age);
    }

    /// Creature `i` bites whatever sits `bite_range` ahead: food first, then
    /// another creature.
    fn bite(&mut self, i: usize) {
        let (tx, ty) = self.creatures[i].bite_target();
        let Some(target) = self.walls.index_of(tx, ty) else {
            return;
        };
        let params = &self.ctx.params;
        let biter_id = self.creatures[i].id;

        let walls = &self.walls;
        if let Some(food) = self
            .foods
            .iter_mut()
            .find(|f| !f.is_exhausted() && walls.index_of(f.x, f.y) == Some(target))
        {
            let taken = food.take_bite(params.food_energy_chunk);
            self.creatures[i].gain_energy(taken * params.energy_gain_from_food);
            self.ctx
                .telemetry
                .log_event(biter_id, self.tick, EventKind::EatFood, taken);
            return;
        }

        let victim = self.creatures.iter().position(|c| {
            c.id != biter_id && c.is_alive() && walls.index_of(c.x, c.y) == Some(target)
        });
        if let Some(j) = victim {
            let victim_id = self.creatures[j].id;
            self.creatures[j].consume_energy(params.energy_loss_bitten);
            self.creatures[i].gain_energy(params.energy_gain_from_bite_cr);

            let telemetry = &mut self.ctx.telemetry;
            telemetry.log_interaction(
                biter_id,
                victim_id,
                self.tick,
                EventKind::BiteCreature,
                params.energy_gain_from_bite_cr,
            );
            telemetry.log_interaction(
                victim_id,
                biter_id,
                self.tick,
                EventKind::Bitten,
                params.energy_loss_bitten,
            );
        }
    }

    /// Every live creature at one of its birth ages produces offspring.
    fn reproduce(&mut self) {
        let mut children = Vec::new();

        for parent in self.creatures.iter().filter(|c| c.is_alive() && c.can_reproduce()) {
            let next_id = &mut self.next_id;
            let kids = parent.offspring(&self.ctx.params, &mut self.rng, || {
                let id = *next_id;
                *next_id += 1;
                id
            });

            for kid in &kids {
                self.ctx.telemetry.log_interaction(
                    parent.id,
                    kid.id,
                    self.tick,
                    EventKind::CreateChild,
                    1.0,
                );
            }
            debug!(
                parent = parent.id,
                generation = parent.generation + 1,
                children = kids.len(),
                "creature reproduced"
            );
            children.extend(kids);
        }

        self.creatures.extend(children);
    }

    /// Drops creatures whose energy fell below zero and records their deaths.
    fn remove_dead(&mut self) {
        let (alive, dead): (Vec<Creature>, Vec<Creature>) = std::mem::take(&mut self.creatures)
            .into_iter()
            .partition(Creature::is_alive);

        for creature in &dead {
            debug!(
                id = creature.id,
                age = creature.age,
                generation = creature.generation,
                "creature died"
            );
            self.ctx.telemetry.record_death(creature);
        }
        self.creatures = alive;
    }

    /// Removes exhausted food and tops up (or trims) to `food_amount` items.
    fn rebalance_food(&mut self) {
        self.foods.retain(|f| !f.is_exhausted());

        let target = self.ctx.params.food_amount;
        self.foods.truncate(target);

        let walls = &self.walls;
        let mut occupied: HashSet<(usize, usize)> = self
            .foods
            .iter()
            .filter_map(|f| walls.index_of(f.x, f.y))
            .collect();

        while self.foods.len() < target {
            let Some((x, y)) = self.random_free_cell(&occupied) else {
                warn!(
                    foods = self.foods.len(),
                    wanted = target,
                    "no free cell left for food"
                );
                break;
            };
            occupied.insert((x, y));
            let nutrition = self.ctx.params.food_energy_capacity;
            self.foods.push(Food::new(x as f32, y as f32, nutrition));
        }
    }

    /// Random non-wall cell not in `occupied`, or `None` when there is none.
    ///
    /// Tries random draws first and falls back to picking among the
    /// remaining free cells once the draws keep missing.
    fn random_free_cell(&mut self, occupied: &HashSet<(usize, usize)>) -> Option<(usize, usize)> {
        let is_free = |walls: &Grid, x: usize, y: usize| {
            walls.get(x, y) == Some(Cell::Empty) && !occupied.contains(&(x, y))
        };

        let attempts = self.width * self.height;
        for _ in 0..attempts {
            let x = self.rng.gen_range(0..self.width);
            let y = self.rng.gen_range(0..self.height);
            if is_free(&self.walls, x, y) {
                return Some((x, y));
            }
        }

        let free: Vec<(usize, usize)> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| is_free(&self.walls, x, y))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }

    /// Sets `food_amount` and immediately re-balances the food on the map.
    pub fn set_food_amount(&mut self, amount: usize) {
        self.ctx.params.food_amount = amount;
        self.rebalance_food();
        self.update_map();
    }

    /// Sets the base reproduction ages and re-rolls every creature's birth ages.
    pub fn set_reproduction_ages(&mut self, ages: Vec<u32>) {
        self.ctx.params.reproduction_ages = ages;
        self.reroll_birth_ages();
    }

    fn reroll_birth_ages(&mut self) {
        let ages = &self.ctx.params.reproduction_ages;
        for creature in &mut self.creatures {
            creature.reroll_birth_ages(ages, &mut self.rng);
        }
    }

    /// Applies a textual parameter edit and its side effects.
    pub fn set_param(&mut self, name: &str, text: &str) -> ParamEdit {
        let edit = self.ctx.params.apply_edit(name, text);
        match edit {
            ParamEdit::FoodAmountChanged => {
                self.rebalance_food();
                self.update_map();
            }
            ParamEdit::ReproductionAgesChanged => self.reroll_birth_ages(),
            ParamEdit::Applied | ParamEdit::Ignored => {}
        }
        edit
    }

    /// Copies the renderable state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            cells: self.map.to_codes(),
            creatures: self
                .creatures
                .iter()
                .map(|c| CreatureView {
                    id: c.id,
                    x: c.x,
                    y: c.y,
                    angle: c.angle,
                    energy: c.energy,
                    generation: c.generation,
                })
                .collect(),
            foods: self.foods.clone(),
        }
    }

    /// Computes what a creature currently sees and what its brain would decide.
    pub fn inspect_creature(&self, id: CreatureId) -> Result<Inspection> {
        let creature = self.creature_by_id(id).ok_or(SimError::NotFound(id))?;
        let observation = vision::observe(&self.map, &creature.pose());
        let decision = creature.brain.decide(observation.vision.view());

        Ok(Inspection {
            id,
            vision: observation.vision,
            dots: observation.dots,
            decision,
            energy_history: self.ctx.telemetry.creature_energy_history(id),
        })
    }
}

/// A move is accepted when it stays inside the grid and off wall cells.
fn move_allowed(walls: &Grid, x: f32, y: f32) -> bool {
    matches!(walls.cell_at(x, y), Some(cell) if cell != Cell::Wall)
}
