use std::sync::Arc;

use rayon::prelude::*;

use crate::camera::PinholeCamera;
use crate::config::{ConfigError, RenderSettings};
use crate::film::{Film, ImageAccumulator};
use crate::math::Color;
use crate::profile::Profile;
use crate::renderer::{PathTracingCore, Renderer};
use crate::sampler::{create_sampler, RandomStateSequence, Sampler};
use crate::scene::Scene;

/// Unidirectional path tracer: each stage runs `width * height` independent
/// paths, each driven by its own deterministic state sequence. Path indices
/// continue across stages so every stage extends the same sample stream.
pub struct PathTracingRenderer {
    core: PathTracingCore,
    sampler: Box<dyn Sampler>,
    accumulator: ImageAccumulator,
    index: u64,
    profile: Profile,
}

impl PathTracingRenderer {
    pub fn new(
        scene: Arc<Scene>,
        camera: PinholeCamera,
        settings: &RenderSettings,
    ) -> Result<Self, ConfigError> {
        let core = PathTracingCore::new(scene, camera, settings)?;
        let sampler = create_sampler(&settings.sampler, settings.seed).ok_or_else(|| {
            ConfigError::Invalid(format!("unknown sampler \"{}\"", settings.sampler))
        })?;
        let accumulator = ImageAccumulator::new(settings.width, settings.height);
        Ok(PathTracingRenderer {
            core,
            sampler,
            accumulator,
            index: 0,
            profile: Profile::default(),
        })
    }
}

impl Renderer for PathTracingRenderer {
    fn render_stage(&mut self) {
        let (width, height) = (self.core.width, self.core.height);
        let paths = (width * height) as u64;
        let base = self.index;
        let core = &self.core;
        let sampler = &*self.sampler;

        // Workers own disjoint index ranges and private accumulators;
        // merging afterwards is equivalent to sequential accumulation.
        let (tile, profile) = (0..paths)
            .into_par_iter()
            .fold(
                || (ImageAccumulator::new(width, height), Profile::default()),
                |(mut acc, mut profile), k| {
                    let mut rand = RandomStateSequence::new(sampler, base + k);
                    let pc = core.path_contribution(&mut rand, &mut profile);
                    let x = pc.x.clamp(0.0, 1.0 - 1e-7);
                    let y = pc.y.clamp(0.0, 1.0 - 1e-7);
                    acc.accumulate(
                        (x * width as f32) as usize,
                        (y * height as f32) as usize,
                        pc.c,
                    );
                    (acc, profile)
                },
            )
            .reduce(
                || (ImageAccumulator::new(width, height), Profile::default()),
                |(mut a, pa), (b, pb)| {
                    a.merge(&b);
                    (a, pa.combine(pb))
                },
            );

        self.accumulator.merge(&tile);
        self.profile = self.profile.combine(profile);
        self.index += paths;
        debug!("path tracing stage done, {} paths total", self.index);
    }

    fn get_output(&self) -> Film<Color> {
        self.accumulator.averaged()
    }

    fn profile(&self) -> Profile {
        self.profile
    }
}
