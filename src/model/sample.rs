use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{NeuronId, Topology};

/// Per-layer, per-neuron activation and error values.
///
/// Purely illustrative: nothing here is computed by a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    pub activations: Vec<Vec<f32>>,
    pub errors: Vec<Vec<f32>>,
}

impl SampleData {
    /// Activation of `id`; 0 when the arrays are shorter than the topology.
    pub fn activation(&self, id: NeuronId) -> f32 {
        lookup(&self.activations, id)
    }

    /// Error of `id`; 0 when the arrays are shorter than the topology.
    pub fn error(&self, id: NeuronId) -> f32 {
        lookup(&self.errors, id)
    }
}

fn lookup(values: &[Vec<f32>], id: NeuronId) -> f32 {
    values
        .get(id.layer)
        .and_then(|layer| layer.get(id.index))
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Produces a fresh [`SampleData`] for a topology.
pub trait SampleSource {
    fn sample(&mut self, topology: &Topology) -> SampleData;
}

impl<F> SampleSource for F
where
    F: FnMut(&Topology) -> SampleData,
{
    fn sample(&mut self, topology: &Topology) -> SampleData {
        self(topology)
    }
}

/// Uniform random stand-ins: activations in `[0,1)`, errors in `[0,0.4)`.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    const ERROR_SCALE: f32 = 0.4;

    /// Seeded for reproducible runs, OS-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl SampleSource for RandomSource {
    fn sample(&mut self, topology: &Topology) -> SampleData {
        let rng = &mut self.rng;
        let activations = topology
            .sizes()
            .iter()
            .map(|&n| (0..n).map(|_| rng.random::<f32>()).collect())
            .collect();
        let errors = topology
            .sizes()
            .iter()
            .map(|&n| (0..n).map(|_| rng.random::<f32>() * Self::ERROR_SCALE).collect())
            .collect();

        SampleData {
            activations,
            errors,
        }
    }
}

/// Always yields the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct FixedSource(pub SampleData);

impl SampleSource for FixedSource {
    fn sample(&mut self, _topology: &Topology) -> SampleData {
        self.0.clone()
    }
}
