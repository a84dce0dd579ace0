use rand::Rng;

use crate::sampler::StateSequence;

/// Primary-sample-space state of one Metropolis chain: a growable vector of
/// coordinates in [0, 1). Coordinates 0 and 1 are the pixel location; the
/// image resolution scales their mutation kernel.
#[derive(Clone, Debug)]
pub struct MarkovChain {
    resolution: (usize, usize),
    states: Vec<f32>,
}

impl MarkovChain {
    pub fn new(width: usize, height: usize) -> Self {
        MarkovChain {
            resolution: (width, height),
            states: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Coordinate `i`, extending the chain with fresh uniforms on demand.
    /// Existing coordinates are stable across reads.
    pub fn state(&mut self, i: usize, rng: &mut impl Rng) -> f32 {
        while self.states.len() <= i {
            self.states.push(rng.gen());
        }
        self.states[i]
    }

    /// A fresh independent point in primary sample space: the new chain has
    /// no coordinates yet, so every one consulted later is drawn uniformly.
    pub fn large_step(&self) -> Self {
        MarkovChain::new(self.resolution.0, self.resolution.1)
    }

    /// Kelemen-style small step: every existing coordinate is perturbed with
    /// the two-scale exponential kernel. Coordinates past the current length
    /// stay unborn and are drawn fresh if consulted.
    pub fn mutate(&self, strength: f32, rng: &mut impl Rng) -> Self {
        let mut result = self.clone();
        result.state(1, rng);
        let delta_pixel = 2.0 / (self.resolution.0 + self.resolution.1) as f32;
        result.states[0] = perturb(result.states[0], delta_pixel * strength, 0.1 * strength, rng);
        result.states[1] = perturb(result.states[1], delta_pixel * strength, 0.1 * strength, rng);
        for i in 2..result.states.len() {
            result.states[i] = perturb(
                result.states[i],
                strength / 1024.0,
                strength / 64.0,
                rng,
            );
        }
        result
    }
}

/// Exponentially distributed offset between magnitudes `s1` and `s2`, either
/// side of `value` with equal probability, wrapped back into [0, 1).
fn perturb(value: f32, s1: f32, s2: f32, rng: &mut impl Rng) -> f32 {
    let r: f32 = rng.gen();
    let result = if r < 0.5 {
        let r = r * 2.0;
        value + s2 * (-(s2 / s1).ln() * r).exp()
    } else {
        let r = (r - 0.5) * 2.0;
        value - s2 * (-(s2 / s1).ln() * r).exp()
    };
    result - result.floor()
}

/// `StateSequence` reading from a chain, growing it lazily as the path
/// consumes more dimensions than the chain currently holds.
pub struct ChainStateSequence<'a, R: Rng> {
    chain: &'a mut MarkovChain,
    rng: &'a mut R,
    cursor: usize,
}

impl<'a, R: Rng> ChainStateSequence<'a, R> {
    pub fn new(chain: &'a mut MarkovChain, rng: &'a mut R) -> Self {
        ChainStateSequence {
            chain,
            rng,
            cursor: 0,
        }
    }
}

impl<R: Rng> StateSequence for ChainStateSequence<'_, R> {
    fn next(&mut self) -> f32 {
        let value = self.chain.state(self.cursor, self.rng);
        self.cursor += 1;
        value
    }
}
