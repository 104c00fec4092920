use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::error::Result;

/// Tunable simulation parameters.
///
/// Every field can be edited while the simulation runs. Edits coming from text
/// (config panels, command lines) go through [`SimParams::apply_edit`], which
/// clamps numbers to their declared range and ignores anything unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Probability that a single weight or bias is perturbed on reproduction.
    pub mutation_probability: f32,
    /// Scale of the Gaussian perturbation applied to mutated parameters.
    pub mutation_strength: f32,
    /// Creatures older than this many ticks die.
    pub creature_max_age: u32,
    /// Number of food items kept on the map.
    pub food_amount: usize,
    /// Nutrition of a freshly spawned food item.
    pub food_energy_capacity: f32,
    /// Nutrition removed from a food item by one bite.
    pub food_energy_chunk: f32,
    /// Base ages at which a creature reproduces (each jittered per creature).
    pub reproduction_ages: Vec<u32>,
    /// Children produced per reproduction.
    pub reproduction_offsprings: u32,
    /// Energy spent every tick just by existing.
    pub energy_cost_tick: f32,
    /// Energy spent per unit of absolute speed.
    pub energy_cost_speed: f32,
    /// Energy spent per radian of rotation.
    pub energy_cost_rotate: f32,
    /// Energy spent per unit of absolute bite effort.
    pub energy_cost_bite: f32,
    /// Multiplier applied to the nutrition taken from food.
    pub energy_gain_from_food: f32,
    /// Energy gained by biting another creature.
    pub energy_gain_from_bite_cr: f32,
    /// Energy lost when bitten by another creature.
    pub energy_loss_bitten: f32,
    /// Energy lost when a move is rejected by a wall or the grid edge.
    pub energy_loss_collision: f32,
    /// When false, children receive an exact copy of the parent network.
    pub allow_mutations: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            mutation_probability: 0.1,
            mutation_strength: 0.1,
            creature_max_age: 3000,
            food_amount: 100,
            food_energy_capacity: 1.0,
            food_energy_chunk: 0.1,
            reproduction_ages: vec![400, 800, 1200],
            reproduction_offsprings: 2,
            energy_cost_tick: 0.001,
            energy_cost_speed: 0.002,
            energy_cost_rotate: 0.001,
            energy_cost_bite: 0.0005,
            energy_gain_from_food: 1.0,
            energy_gain_from_bite_cr: 0.05,
            energy_loss_bitten: 0.1,
            energy_loss_collision: 0.01,
            allow_mutations: true,
        }
    }
}

/// Outcome of a textual parameter edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamEdit {
    /// A value was stored; no follow-up needed.
    Applied,
    /// `food_amount` changed; the world must re-balance its food.
    FoodAmountChanged,
    /// `reproduction_ages` changed; live creatures must re-roll birth ages.
    ReproductionAgesChanged,
    /// Unknown name or unparsable value; nothing changed.
    Ignored,
}

/// A numeric parameter with its declared range.
struct NumericField {
    name: &'static str,
    min: f64,
    max: f64,
    set: fn(&mut SimParams, f64),
}

const MAX_AGE_LIMIT: f64 = 1_000_000.0;

const NUMERIC_FIELDS: &[NumericField] = &[
    NumericField {
        name: "mutation_probability",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.mutation_probability = v as f32,
    },
    NumericField {
        name: "mutation_strength",
        min: 0.0,
        max: 10.0,
        set: |p, v| p.mutation_strength = v as f32,
    },
    NumericField {
        name: "creature_max_age",
        min: 1.0,
        max: MAX_AGE_LIMIT,
        set: |p, v| p.creature_max_age = v as u32,
    },
    NumericField {
        name: "food_amount",
        min: 0.0,
        max: 100_000.0,
        set: |p, v| p.food_amount = v as usize,
    },
    NumericField {
        name: "food_energy_capacity",
        min: 0.0,
        max: 100.0,
        set: |p, v| p.food_energy_capacity = v as f32,
    },
    NumericField {
        name: "food_energy_chunk",
        min: 0.001,
        max: 100.0,
        set: |p, v| p.food_energy_chunk = v as f32,
    },
    NumericField {
        name: "reproduction_offsprings",
        min: 0.0,
        max: 20.0,
        set: |p, v| p.reproduction_offsprings = v as u32,
    },
    NumericField {
        name: "energy_cost_tick",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_cost_tick = v as f32,
    },
    NumericField {
        name: "energy_cost_speed",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_cost_speed = v as f32,
    },
    NumericField {
        name: "energy_cost_rotate",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_cost_rotate = v as f32,
    },
    NumericField {
        name: "energy_cost_bite",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_cost_bite = v as f32,
    },
    NumericField {
        name: "energy_gain_from_food",
        min: 0.0,
        max: 10.0,
        set: |p, v| p.energy_gain_from_food = v as f32,
    },
    NumericField {
        name: "energy_gain_from_bite_cr",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_gain_from_bite_cr = v as f32,
    },
    NumericField {
        name: "energy_loss_bitten",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_loss_bitten = v as f32,
    },
    NumericField {
        name: "energy_loss_collision",
        min: 0.0,
        max: 1.0,
        set: |p, v| p.energy_loss_collision = v as f32,
    },
];

impl SimParams {
    /// Names accepted by [`SimParams::apply_edit`].
    pub fn editable_names() -> Vec<&'static str> {
        NUMERIC_FIELDS
            .iter()
            .map(|f| f.name)
            .chain(["reproduction_ages", "allow_mutations"])
            .collect()
    }

    /// Applies a textual edit to the named parameter.
    ///
    /// Numbers outside the declared range are clamped. Input that cannot be
    /// parsed, and unknown names, leave the parameters untouched.
    pub fn apply_edit(&mut self, name: &str, text: &str) -> ParamEdit {
        let text = text.trim();

        if let Some(field) = NUMERIC_FIELDS.iter().find(|f| f.name == name) {
            let Ok(value) = text.parse::<f64>() else {
                warn!(name, text, "ignoring unparsable parameter value");
                return ParamEdit::Ignored;
            };
            if !value.is_finite() {
                warn!(name, text, "ignoring non-finite parameter value");
                return ParamEdit::Ignored;
            }
            let clamped = value.clamp(field.min, field.max);
            (field.set)(self, clamped);
            debug!(name, value = clamped, "parameter updated");

            return if name == "food_amount" {
                ParamEdit::FoodAmountChanged
            } else {
                ParamEdit::Applied
            };
        }

        match name {
            "reproduction_ages" => match parse_age_list(text) {
                Some(ages) => {
                    self.reproduction_ages = ages;
                    debug!(ages = ?self.reproduction_ages, "reproduction ages updated");
                    ParamEdit::ReproductionAgesChanged
                }
                None => {
                    warn!(text, "ignoring unparsable reproduction ages");
                    ParamEdit::Ignored
                }
            },
            "allow_mutations" => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => {
                    self.allow_mutations = true;
                    ParamEdit::Applied
                }
                "false" | "0" | "no" | "off" => {
                    self.allow_mutations = false;
                    ParamEdit::Applied
                }
                _ => {
                    warn!(text, "ignoring unparsable allow_mutations value");
                    ParamEdit::Ignored
                }
            },
            _ => {
                warn!(name, "ignoring edit of unknown parameter");
                ParamEdit::Ignored
            }
        }
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }

    /// Saves parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Parses `"300, 600, 900"` into clamped ages. `None` if any entry is not a number.
fn parse_age_list(text: &str) -> Option<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, MAX_AGE_LIMIT) as u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_list_rejects_garbage() {
        assert_eq!(parse_age_list("10, 20,30"), Some(vec![10, 20, 30]));
        assert_eq!(parse_age_list("-5"), Some(vec![0]));
        assert_eq!(parse_age_list("10, abc"), None);
        assert_eq!(parse_age_list(""), Some(vec![]));
    }

    #[test]
    fn every_numeric_field_has_a_sane_range() {
        for field in NUMERIC_FIELDS {
            assert!(field.min <= field.max, "{}", field.name);
        }
    }
}
