#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use gridlife::simulation::brain::{
    Activation, BrainBatch, HIDDEN1_SIZE, HIDDEN2_SIZE, INPUT_SIZE, NeuralNetwork, OUTPUT_SIZE,
};
use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_rng() -> StdRng {
    StdRng::seed_from_u64(1234)
}

#[test]
fn test_network_shapes() {
    let mut rng = create_test_rng();
    let brain = NeuralNetwork::new_random(&mut rng);

    let shapes: Vec<(usize, usize)> = brain
        .layers
        .iter()
        .map(|l| (l.input_size(), l.output_size()))
        .collect();
    assert_eq!(
        shapes,
        vec![
            (INPUT_SIZE, HIDDEN1_SIZE),
            (HIDDEN1_SIZE, HIDDEN2_SIZE),
            (HIDDEN2_SIZE, OUTPUT_SIZE)
        ]
    );

    let activations: Vec<Activation> = brain.layers.iter().map(|l| l.activation).collect();
    assert_eq!(
        activations,
        vec![Activation::Tanh, Activation::Tanh, Activation::Linear]
    );

    let output = brain.forward(Array1::zeros(INPUT_SIZE).view());
    assert_eq!(output.len(), OUTPUT_SIZE);
}

#[test]
fn test_xavier_initialization() {
    let mut rng = create_test_rng();
    let brain = NeuralNetwork::new_random(&mut rng);

    for layer in &brain.layers {
        let limit = (6.0 / (layer.input_size() + layer.output_size()) as f32).sqrt();
        assert!(layer.weights.iter().all(|w| w.abs() <= limit));
        assert!(layer.biases.iter().all(|&b| b == 0.0));
    }

    // Zero biases and zero input give zero output.
    let output = brain.forward(Array1::zeros(INPUT_SIZE).view());
    assert!(output.iter().all(|&o| o == 0.0));
}

#[test]
fn test_hidden_layers_are_bounded() {
    let mut rng = create_test_rng();
    let brain = NeuralNetwork::new_random(&mut rng);
    let inputs = Array1::random_using(INPUT_SIZE, Uniform::new(0.0f32, 1.0), &mut rng);

    let hidden = brain.layers[0].forward(inputs.view());
    assert!(hidden.iter().all(|h| (-1.0..=1.0).contains(h)));
}

#[test]
fn test_batched_forward_matches_sequential_exactly() {
    let mut rng = create_test_rng();
    let brains: Vec<NeuralNetwork> = (0..17).map(|_| NeuralNetwork::new_random(&mut rng)).collect();
    let inputs = Array2::random_using(
        (brains.len(), INPUT_SIZE),
        Uniform::new(0.0f32, 1.0),
        &mut rng,
    );

    let batch = BrainBatch::stack(brains.iter());
    assert_eq!(batch.len(), brains.len());

    let outputs = batch.forward(inputs.view());
    assert_eq!(outputs.dim(), (brains.len(), OUTPUT_SIZE));

    for (i, brain) in brains.iter().enumerate() {
        let single = brain.forward(inputs.row(i));
        assert_eq!(outputs.row(i), single);
    }
}

#[test]
fn test_empty_batch() {
    let batch = BrainBatch::stack(std::iter::empty::<&NeuralNetwork>());
    assert!(batch.is_empty());

    let outputs = batch.forward(Array2::zeros((0, INPUT_SIZE)).view());
    assert_eq!(outputs.dim(), (0, OUTPUT_SIZE));
}

#[test]
fn test_mutated_leaves_parent_untouched() {
    let mut rng = create_test_rng();
    let parent = NeuralNetwork::new_random(&mut rng);
    let original = parent.clone();

    let child = parent.mutated(1.0, 0.5, &mut rng);

    assert_eq!(parent, original);
    assert_ne!(child, parent);
    assert_eq!(child.parameter_count(), parent.parameter_count());
}

#[test]
fn test_zero_probability_is_identity() {
    let mut rng = create_test_rng();
    let parent = NeuralNetwork::new_random(&mut rng);

    let child = parent.mutated(0.0, 10.0, &mut rng);

    assert_eq!(child, parent);
    assert_eq!(NeuralNetwork::distance(&parent, &child), 0.0);
}

#[test]
fn test_mutation_probability_gates_elements() {
    let mut rng = create_test_rng();
    let parent = NeuralNetwork::new_random(&mut rng);

    let child = parent.mutated(0.5, 0.1, &mut rng);

    let changed = parent
        .to_flat_vector()
        .iter()
        .zip(child.to_flat_vector().iter())
        .filter(|(a, b)| a != b)
        .count();
    let total = parent.parameter_count();
    assert!(changed > total * 2 / 5, "changed {changed} of {total}");
    assert!(changed < total * 3 / 5, "changed {changed} of {total}");
}

#[test]
fn test_mutation_strength_scales_noise() {
    let mut rng = create_test_rng();
    let parent = NeuralNetwork::new_random(&mut rng);

    let weak = parent.mutated(1.0, 0.01, &mut rng);
    let strong = parent.mutated(1.0, 1.0, &mut rng);

    assert!(NeuralNetwork::distance(&parent, &weak) < NeuralNetwork::distance(&parent, &strong));
}

#[test]
fn test_parameter_count() {
    let mut rng = create_test_rng();
    let brain = NeuralNetwork::new_random(&mut rng);

    let expected = INPUT_SIZE * HIDDEN1_SIZE
        + HIDDEN1_SIZE
        + HIDDEN1_SIZE * HIDDEN2_SIZE
        + HIDDEN2_SIZE
        + HIDDEN2_SIZE * OUTPUT_SIZE
        + OUTPUT_SIZE;
    assert_eq!(brain.parameter_count(), expected);
    assert_eq!(brain.to_flat_vector().len(), expected);
}

#[test]
fn test_brain_serialization() {
    let mut rng = create_test_rng();
    let brain = NeuralNetwork::new_random(&mut rng);

    let json = serde_json::to_string(&brain).unwrap();
    let restored: NeuralNetwork = serde_json::from_str(&json).unwrap();

    let inputs = Array1::random_using(INPUT_SIZE, Uniform::new(0.0f32, 1.0), &mut rng);
    let before = brain.forward(inputs.view());
    let after = restored.forward(inputs.view());
    assert!(before.iter().zip(after.iter()).all(|(a, b)| (a - b).abs() < 1e-5));
}
