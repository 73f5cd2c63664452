use std::fmt;

use crate::error::{Result, VizError};

/// Ordered layer sizes of a dense, layered network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    /// Creates a topology from layer sizes.
    ///
    /// # Errors
    /// Returns [`VizError::InvalidTopology`] if `sizes` is empty or any layer
    /// has no neurons.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(VizError::InvalidTopology("no layers".into()));
        }
        if let Some(layer) = sizes.iter().position(|&n| n == 0) {
            return Err(VizError::InvalidTopology(format!("layer {layer} is empty")));
        }
        Ok(Self { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn layer_count(&self) -> usize {
        self.sizes.len()
    }

    /// Neurons in `layer`, 0 if out of range.
    pub fn layer_size(&self, layer: usize) -> usize {
        self.sizes.get(layer).copied().unwrap_or(0)
    }

    pub fn neuron_count(&self) -> usize {
        self.sizes.iter().sum()
    }

    pub fn widest_layer(&self) -> usize {
        self.sizes.iter().copied().max().unwrap_or(0)
    }

    /// Number of adjacent layer pairs.
    pub fn boundary_count(&self) -> usize {
        self.sizes.len().saturating_sub(1)
    }

    /// Connections of a fully connected feed-forward net with this shape.
    pub fn dense_connection_count(&self) -> usize {
        self.sizes.windows(2).map(|w| w[0] * w[1]).sum()
    }

    /// Flat position of a neuron in layer/index order.
    pub fn flat_index(&self, id: NeuronId) -> Option<usize> {
        if id.index >= self.layer_size(id.layer) {
            return None;
        }
        Some(self.sizes[..id.layer].iter().sum::<usize>() + id.index)
    }

    /// All neuron identities in layer/index order.
    pub fn neurons(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.sizes
            .iter()
            .enumerate()
            .flat_map(|(layer, &n)| (0..n).map(move |index| NeuronId { layer, index }))
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            sizes: vec![3, 4, 4, 2],
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.sizes.iter().map(|n| n.to_string()).collect();
        write!(f, "[{}]", parts.join(","))
    }
}

/// Identity of a neuron: its layer and position within the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronId {
    pub layer: usize,
    pub index: usize,
}

impl NeuronId {
    pub const fn new(layer: usize, index: usize) -> Self {
        Self { layer, index }
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}-n{}", self.layer, self.index)
    }
}
