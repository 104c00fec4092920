//! Fully connected layer.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Activation applied to a layer's pre-activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Hyperbolic tangent.
    Tanh,
    /// Identity; outputs are raw real values.
    Linear,
}

impl Activation {
    #[inline]
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

/// A single dense layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
    /// Activation applied after the affine map.
    pub activation: Activation,
}

impl Dense {
    /// Creates a layer with Xavier/Glorot-uniform weights and zero biases.
    pub fn new_xavier<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (input_size + output_size) as f32).sqrt();
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new(-limit, limit),
                rng,
            ),
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    /// Number of inputs the layer expects.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs the forward pass for one input vector.
    #[inline]
    pub fn forward(&self, inputs: ArrayView1<f32>) -> Array1<f32> {
        dense_kernel(
            self.weights.view(),
            self.biases.view(),
            self.activation,
            inputs,
        )
    }

    /// Perturbs weights and biases in place.
    ///
    /// Every element independently receives `strength * N(0, 1)` with
    /// probability `probability` and is left alone otherwise.
    pub fn mutate<R: Rng + ?Sized>(&mut self, probability: f32, strength: f32, rng: &mut R) {
        let probability = probability.clamp(0.0, 1.0);

        let weight_noise = gated_noise(self.weights.dim(), probability, strength, rng);
        self.weights += &weight_noise;

        let bias_noise = gated_noise((1, self.biases.len()), probability, strength, rng);
        self.biases += &bias_noise.row(0);
    }
}

/// Gaussian noise multiplied element-wise by a Bernoulli(`probability`) mask.
fn gated_noise<R: Rng + ?Sized>(
    dim: (usize, usize),
    probability: f32,
    strength: f32,
    rng: &mut R,
) -> Array2<f32> {
    let noise: Array2<f32> = Array2::random_using(dim, StandardNormal, rng);
    let gate = Array2::random_using(dim, Uniform::new(0.0f32, 1.0), rng)
        .mapv(|u| if u < probability { strength } else { 0.0 });
    noise * gate
}

/// Affine map plus activation with a fixed summation order.
///
/// Both the per-creature and the batched forward pass go through this
/// function, so their outputs are bit-identical.
#[inline]
pub(crate) fn dense_kernel(
    weights: ArrayView2<f32>,
    biases: ArrayView1<f32>,
    activation: Activation,
    inputs: ArrayView1<f32>,
) -> Array1<f32> {
    weights
        .rows()
        .into_iter()
        .zip(biases.iter())
        .map(|(row, &bias)| {
            let sum = row
                .iter()
                .zip(inputs.iter())
                .fold(bias, |acc, (&w, &x)| acc + w * x);
            activation.apply(sum)
        })
        .collect()
}
