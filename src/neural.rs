//! Fully connected sigmoid networks stored as a layer-indexed arena.
//!
//! Every neuron lives inside its owning [`NeuralNetwork`]. A computed neuron
//! refers to its fan-in through [`NeuronRef`] pairs that are resolved against
//! the previous layer during evaluation, so cloning a network never shares
//! storage with the original.

use rand::Rng;

/// Position of a neuron inside its network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeuronRef {
    pub layer: usize,
    pub index: usize,
}

#[derive(Clone, Debug)]
pub struct Neuron {
    is_input: bool,
    bias: f64,
    weights: Vec<f64>,
    links: Vec<NeuronRef>,
    stored_input: f64,
}

impl Neuron {
    pub fn input() -> Self {
        Self {
            is_input: true,
            bias: 0.0,
            weights: Vec::new(),
            links: Vec::new(),
            stored_input: 0.0,
        }
    }

    /// A computed neuron with one weight in `[0, 1)` per link and a bias in `[0, 1)`.
    pub fn computed<R: Rng + ?Sized>(links: Vec<NeuronRef>, rng: &mut R) -> Self {
        let weights = links.iter().map(|_| rng.r#gen::<f64>()).collect();
        Self {
            is_input: false,
            bias: rng.r#gen::<f64>(),
            weights,
            links,
            stored_input: 0.0,
        }
    }

    pub fn is_input(&self) -> bool {
        self.is_input
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn links(&self) -> &[NeuronRef] {
        &self.links
    }

    /// Output given the already evaluated outputs of the previous layer.
    /// Input neurons ignore `prev` and return their stored value.
    pub fn out(&self, prev: &[f64]) -> f64 {
        if self.is_input {
            return self.stored_input;
        }

        let sum: f64 = self
            .weights
            .iter()
            .zip(&self.links)
            .map(|(w, link)| w * prev[link.index])
            .sum();
        sigmoid(sum + self.bias)
    }
}

#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    layers: Vec<Vec<Neuron>>,
}

impl NeuralNetwork {
    /// Builds `layer_sizes[0]` input neurons followed by fully connected
    /// computed layers. Needs at least an input and an output layer, none empty.
    pub fn new<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        assert!(
            layer_sizes.len() >= 2,
            "a network needs an input and an output layer, got {layer_sizes:?}"
        );
        assert!(
            layer_sizes.iter().all(|&n| n > 0),
            "layer sizes must be non-zero, got {layer_sizes:?}"
        );

        let mut layers: Vec<Vec<Neuron>> = Vec::with_capacity(layer_sizes.len());
        for (i, &size) in layer_sizes.iter().enumerate() {
            let layer = if i == 0 {
                (0..size).map(|_| Neuron::input()).collect()
            } else {
                let fan_in = layer_sizes[i - 1];
                (0..size)
                    .map(|_| {
                        let links = (0..fan_in)
                            .map(|index| NeuronRef { layer: i - 1, index })
                            .collect();
                        Neuron::computed(links, rng)
                    })
                    .collect()
            };
            layers.push(layer);
        }

        Self { layers }
    }

    pub fn layers(&self) -> &[Vec<Neuron>] {
        &self.layers
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }

    pub fn input_len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .flatten()
            .filter(|n| !n.is_input)
            .map(|n| n.weights.len() + 1)
            .sum()
    }

    pub fn is_finite(&self) -> bool {
        self.layers
            .iter()
            .flatten()
            .all(|n| n.bias.is_finite() && n.weights.iter().all(|w| w.is_finite()))
    }

    /// Feeds `inputs` to layer 0 and returns the output layer's values.
    ///
    /// Layers are evaluated in order; each neuron's value is kept only for
    /// the duration of this call.
    ///
    /// # Panics
    ///
    /// If `inputs.len()` differs from the input layer size.
    pub fn out(&mut self, inputs: &[f64]) -> Vec<f64> {
        assert_eq!(
            inputs.len(),
            self.input_len(),
            "network input length mismatch"
        );

        for (neuron, &value) in self.layers[0].iter_mut().zip(inputs) {
            neuron.stored_input = value;
        }

        let mut prev: Vec<f64> = self.layers[0].iter().map(|n| n.out(&[])).collect();
        for (i, layer) in self.layers.iter().enumerate().skip(1) {
            debug_assert!(layer.iter().all(|n| n.links.iter().all(|l| l.layer == i - 1)));
            prev = layer.iter().map(|n| n.out(&prev)).collect();
        }
        prev
    }

    /// Adds an independent uniform draw from `[min, max]` to every weight and
    /// bias. Values are not clamped.
    ///
    /// # Panics
    ///
    /// If `min > max` or either bound is not finite.
    pub fn mutate<R: Rng + ?Sized>(&mut self, min: f64, max: f64, rng: &mut R) {
        assert!(
            min.is_finite() && max.is_finite() && min <= max,
            "invalid mutation range [{min}, {max}]"
        );
        for neuron in self.layers.iter_mut().flatten() {
            if neuron.is_input {
                continue;
            }
            for w in neuron.weights.iter_mut() {
                *w += perturbation(min, max, rng);
            }
            neuron.bias += perturbation(min, max, rng);
        }
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn perturbation<R: Rng + ?Sized>(min: f64, max: f64, rng: &mut R) -> f64 {
    if min == max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}
