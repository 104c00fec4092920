//! Population-wide forward pass.

use ndarray::{Array2, Array3, ArrayView2, Axis};
use rayon::prelude::*;

use super::dense::{Activation, dense_kernel};
use super::{NeuralNetwork, OUTPUT_SIZE};

/// Parameters of one layer, stacked along axis 0 by creature.
#[derive(Debug, Clone)]
struct StackedLayer {
    /// `creatures × outputs × inputs`.
    weights: Array3<f32>,
    /// `creatures × outputs`.
    biases: Array2<f32>,
    activation: Activation,
}

/// Network parameters of a whole population stacked into dense arrays.
///
/// All networks must share the same layer shapes, which is always true for
/// creature brains.
#[derive(Debug, Clone)]
pub struct BrainBatch {
    layers: Vec<StackedLayer>,
    len: usize,
}

impl BrainBatch {
    /// Stacks the parameters of `brains` in order.
    pub fn stack<'a, I>(brains: I) -> Self
    where
        I: IntoIterator<Item = &'a NeuralNetwork>,
        I::IntoIter: ExactSizeIterator + Clone,
    {
        let brains = brains.into_iter();
        let len = brains.len();

        let Some(template) = brains.clone().next() else {
            return Self {
                layers: Vec::new(),
                len: 0,
            };
        };

        let mut layers: Vec<StackedLayer> = template
            .layers
            .iter()
            .map(|layer| StackedLayer {
                weights: Array3::zeros((len, layer.output_size(), layer.input_size())),
                biases: Array2::zeros((len, layer.output_size())),
                activation: layer.activation,
            })
            .collect();

        for (i, brain) in brains.enumerate() {
            for (stacked, layer) in layers.iter_mut().zip(&brain.layers) {
                stacked
                    .weights
                    .index_axis_mut(Axis(0), i)
                    .assign(&layer.weights);
                stacked.biases.row_mut(i).assign(&layer.biases);
            }
        }

        Self { layers, len }
    }

    /// Number of stacked networks.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the batch holds no networks.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Computes the outputs of every network for its row of `inputs`.
    ///
    /// Returns a `creatures × 3` matrix. Rows are evaluated in parallel, each
    /// with exactly the arithmetic of [`NeuralNetwork::forward`].
    pub fn forward(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        assert_eq!(
            inputs.nrows(),
            self.len,
            "one input row per stacked network"
        );

        let rows: Vec<_> = (0..self.len)
            .into_par_iter()
            .map(|i| {
                let mut activations = inputs.row(i).to_owned();
                for layer in &self.layers {
                    activations = dense_kernel(
                        layer.weights.index_axis(Axis(0), i),
                        layer.biases.row(i),
                        layer.activation,
                        activations.view(),
                    );
                }
                activations
            })
            .collect();

        let mut outputs = Array2::zeros((self.len, OUTPUT_SIZE));
        for (mut out, row) in outputs.rows_mut().into_iter().zip(rows) {
            out.assign(&row);
        }
        outputs
    }
}
