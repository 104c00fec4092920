//! Neural network driving creature decisions.
//!
//! Every creature owns a small feed-forward network mapping its 45-value
//! vision vector to three raw outputs: angle delta, speed delta and bite
//! effort. [`BrainBatch`] evaluates the whole population in one call.

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod batch;
pub mod dense;

pub use batch::BrainBatch;
pub use dense::{Activation, Dense};

/// Length of the vision vector fed into the network.
pub const INPUT_SIZE: usize = 45;
/// Width of the first hidden layer.
pub const HIDDEN1_SIZE: usize = 50;
/// Width of the second hidden layer.
pub const HIDDEN2_SIZE: usize = 10;
/// Number of outputs.
pub const OUTPUT_SIZE: usize = 3;

/// Raw network outputs for one creature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Decision {
    /// Added to the creature's heading.
    pub angle_delta: f32,
    /// Added to the creature's speed before clamping.
    pub speed_delta: f32,
    /// Bite attempt strength; callers compare it against a threshold.
    pub bite_effort: f32,
}

impl Decision {
    /// Builds a decision from the three network outputs.
    pub fn from_outputs(outputs: ArrayView1<f32>) -> Self {
        Self {
            angle_delta: outputs[0],
            speed_delta: outputs[1],
            bite_effort: outputs[2],
        }
    }
}

/// `45 → 50 (tanh) → 10 (tanh) → 3 (linear)` network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralNetwork {
    /// Ordered layers from input to output.
    pub layers: Vec<Dense>,
}

impl NeuralNetwork {
    /// Creates a network with Xavier-uniform weights and zero biases.
    pub fn new_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            layers: vec![
                Dense::new_xavier(INPUT_SIZE, HIDDEN1_SIZE, Activation::Tanh, rng),
                Dense::new_xavier(HIDDEN1_SIZE, HIDDEN2_SIZE, Activation::Tanh, rng),
                Dense::new_xavier(HIDDEN2_SIZE, OUTPUT_SIZE, Activation::Linear, rng),
            ],
        }
    }

    /// Runs a forward pass and returns the raw outputs.
    #[inline]
    pub fn forward(&self, inputs: ArrayView1<f32>) -> Array1<f32> {
        let mut layers = self.layers.iter();
        let Some(first) = layers.next() else {
            return inputs.to_owned();
        };
        let mut output = first.forward(inputs);
        for layer in layers {
            output = layer.forward(output.view());
        }
        output
    }

    /// Runs a forward pass and interprets the outputs.
    pub fn decide(&self, inputs: ArrayView1<f32>) -> Decision {
        Decision::from_outputs(self.forward(inputs).view())
    }

    /// Returns a mutated copy, leaving `self` untouched.
    pub fn mutated<R: Rng + ?Sized>(&self, probability: f32, strength: f32, rng: &mut R) -> Self {
        let mut child = self.clone();
        child.mutate(probability, strength, rng);
        child
    }

    /// Mutates all parameters in place.
    pub fn mutate<R: Rng + ?Sized>(&mut self, probability: f32, strength: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.mutate(probability, strength, rng);
        }
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.parameter_count());
        for layer in &self.layers {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }

    /// Euclidean distance between the parameters of two networks.
    pub fn distance(a: &NeuralNetwork, b: &NeuralNetwork) -> f32 {
        a.to_flat_vector()
            .iter()
            .zip(b.to_flat_vector().iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}
