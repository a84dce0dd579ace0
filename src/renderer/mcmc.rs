use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::camera::PinholeCamera;
use crate::config::{ConfigError, RenderSettings};
use crate::film::Film;
use crate::integrator::PathContribution;
use crate::markov_chain::{ChainStateSequence, MarkovChain};
use crate::math::{luminance, Color};
use crate::profile::Profile;
use crate::renderer::{PathTracingCore, Renderer};
use crate::sampler::{PrandSampler, RandomStateSequence};
use crate::scene::Scene;

struct MarkovState {
    chain: MarkovChain,
    pc: PathContribution,
    sc: f32,
}

/// Primary-sample-space Metropolis light transport over the shared path
/// integrator. Phase 1 estimates the normalization constant `b` from
/// independent path-traced samples; phase 2 runs Metropolis-Hastings over
/// the chain's coordinates with expected-value (both-candidate) splatting.
pub struct McmcRenderer {
    core: PathTracingCore,
    buffer: Film<Color>,
    sample_count: u64,
    b: f32,
    large_step_prob: f32,
    mutation_strength: f32,
    estimation_rounds: u32,
    first_stage_done: bool,
    current: MarkovState,
    rng: ChaCha8Rng,
    seed: u64,
    profile: Profile,
}

impl McmcRenderer {
    pub fn new(
        scene: Arc<Scene>,
        camera: PinholeCamera,
        settings: &RenderSettings,
    ) -> Result<Self, ConfigError> {
        let core = PathTracingCore::new(scene, camera, settings)?;
        let mutation_strength = settings.mutation_strength.ok_or_else(|| {
            ConfigError::Invalid("mcmc renderer requires mutation_strength".to_string())
        })?;
        let buffer = Film::new(settings.width, settings.height, Color::ZERO);
        Ok(McmcRenderer {
            core,
            buffer,
            sample_count: 0,
            b: 0.0,
            large_step_prob: settings.large_step_prob,
            mutation_strength,
            estimation_rounds: settings.estimation_rounds,
            first_stage_done: false,
            current: MarkovState {
                chain: MarkovChain::new(settings.width, settings.height),
                pc: PathContribution::default(),
                sc: 0.0,
            },
            rng: ChaCha8Rng::seed_from_u64(settings.seed ^ 0x9E37_79B9_7F4A_7C15),
            seed: settings.seed,
            profile: Profile::default(),
        })
    }

    /// Mean scalar contribution over independent path-traced samples.
    /// Always drawn from the independent sampler so the estimate does not
    /// depend on the chain construction.
    fn estimate_normalization(&mut self) {
        let num_samples =
            (self.core.width * self.core.height) as u64 * self.estimation_rounds as u64;
        let sampler = PrandSampler::new(self.seed);
        let core = &self.core;
        let (total, profile) = (0..num_samples)
            .into_par_iter()
            .fold(
                || (0.0f64, Profile::default()),
                |(sum, mut profile), i| {
                    let mut rand = RandomStateSequence::new(&sampler, i);
                    let pc = core.path_contribution(&mut rand, &mut profile);
                    (sum + luminance(pc.c) as f64, profile)
                },
            )
            .reduce(
                || (0.0f64, Profile::default()),
                |(sa, pa), (sb, pb)| (sa + sb, pa.combine(pb)),
            );
        self.b = (total / num_samples as f64) as f32;
        self.profile = self.profile.combine(profile);
        info!("estimated normalization b = {}", self.b);
        if self.b <= 0.0 {
            warn!("normalization estimate is zero; the image appears to be black");
        }

        let mut chain = MarkovChain::new(self.core.width, self.core.height);
        let pc = {
            let mut rand = ChainStateSequence::new(&mut chain, &mut self.rng);
            self.core.path_contribution(&mut rand, &mut self.profile)
        };
        let sc = luminance(pc.c);
        self.current = MarkovState { chain, pc, sc };
        self.first_stage_done = true;
    }

    fn splat(&mut self, pc: PathContribution, scale: f32) {
        if (0.0..=1.0 - 1e-7).contains(&pc.x) && (0.0..=1.0 - 1e-7).contains(&pc.y) {
            let ix = (pc.x * self.buffer.width as f32).floor() as usize;
            let iy = (pc.y * self.buffer.height as f32).floor() as usize;
            let scaled = (self.buffer.width * self.buffer.height) as f32 * scale * pc.c;
            debug_assert!(scaled.is_finite());
            let value = self.buffer.at(ix, iy) + scaled;
            self.buffer.write_at(ix, iy, value);
        }
    }
}

/// Acceptance and expected-value splat weights for one Metropolis
/// iteration. Returns `(a, new_weight, current_weight)`; a candidate with
/// zero scalar contribution is never written.
fn expected_value_weights(
    new_sc: f32,
    current_sc: f32,
    b: f32,
    large_step_prob: f32,
    is_large: bool,
) -> (f32, f32, f32) {
    let a = if current_sc > 0.0 {
        (new_sc / current_sc).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let is_large_term = if is_large { 1.0 } else { 0.0 };
    let new_weight = if new_sc > 0.0 {
        (a + is_large_term) / (new_sc / b + large_step_prob)
    } else {
        0.0
    };
    let current_weight = if current_sc > 0.0 {
        (1.0 - a) / (current_sc / b + large_step_prob)
    } else {
        0.0
    };
    (a, new_weight, current_weight)
}

impl Renderer for McmcRenderer {
    fn render_stage(&mut self) {
        if !self.first_stage_done {
            self.estimate_normalization();
        }
        let iterations = self.core.width * self.core.height;
        for _ in 0..iterations {
            let is_large = self.rng.gen::<f32>() <= self.large_step_prob;
            let mut chain = if is_large {
                self.current.chain.large_step()
            } else {
                self.current.chain.mutate(self.mutation_strength, &mut self.rng)
            };
            let pc = {
                let mut rand = ChainStateSequence::new(&mut chain, &mut self.rng);
                self.core.path_contribution(&mut rand, &mut self.profile)
            };
            let sc = luminance(pc.c);

            let (a, new_weight, current_weight) =
                expected_value_weights(sc, self.current.sc, self.b, self.large_step_prob, is_large);
            if sc > 0.0 {
                self.splat(pc, new_weight);
            }
            if self.current.sc > 0.0 {
                self.splat(self.current.pc, current_weight);
            }
            if self.rng.gen::<f32>() <= a {
                self.current = MarkovState { chain, pc, sc };
            }
            self.sample_count += 1;
        }
        debug!("mcmc stage done, {} samples total", self.sample_count);
    }

    fn get_output(&self) -> Film<Color> {
        let mut output = Film::new(self.buffer.width, self.buffer.height, Color::ZERO);
        if self.sample_count > 0 {
            let r = 1.0 / self.sample_count as f32;
            for (out, sum) in output.buffer.iter_mut().zip(self.buffer.buffer.iter()) {
                *out = *sum * r;
            }
        }
        output
    }

    fn profile(&self) -> Profile {
        self.profile
    }
}
