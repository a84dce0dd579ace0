use std::sync::Arc;

use crate::camera::PinholeCamera;
use crate::config::{ConfigError, RenderSettings};
use crate::film::Film;
use crate::integrator::{PathContribution, PathIntegrator};
use crate::math::{luminance, Color};
use crate::profile::Profile;
use crate::sampler::StateSequence;
use crate::scene::Scene;

mod mcmc;
mod pt;

pub use mcmc::McmcRenderer;
pub use pt::PathTracingRenderer;

/// A renderer advances in stages; the driver may stop between stages and
/// read the current image at any point.
pub trait Renderer {
    fn render_stage(&mut self);
    fn get_output(&self) -> Film<Color>;
    fn profile(&self) -> Profile;
}

/// The path-sampling pipeline both renderers share: film sample, camera
/// ray, trace, optional luminance clamp.
pub struct PathTracingCore {
    pub integrator: PathIntegrator,
    pub camera: PinholeCamera,
    pub width: usize,
    pub height: usize,
    pub luminance_clamping: f32,
}

impl PathTracingCore {
    pub fn new(
        scene: Arc<Scene>,
        camera: PinholeCamera,
        settings: &RenderSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(PathTracingCore {
            integrator: PathIntegrator {
                scene,
                min_path_length: settings.min_path_length,
                max_path_length: settings.max_path_length,
                direct_lighting: settings.direct_lighting,
                direct_lighting_bsdf: settings.direct_lighting_bsdf,
                direct_lighting_light: settings.direct_lighting_light,
                full_direct_lighting: settings.full_direct_lighting,
                russian_roulette: settings.russian_roulette,
            },
            camera,
            width: settings.width,
            height: settings.height,
            luminance_clamping: settings.luminance_clamping,
        })
    }

    pub fn path_contribution(
        &self,
        rand: &mut dyn StateSequence,
        profile: &mut Profile,
    ) -> PathContribution {
        profile.camera_rays += 1;
        let x = rand.next();
        let y = rand.next();
        let ray = self.camera.sample(
            (x, y),
            (1.0 / self.width as f32, 1.0 / self.height as f32),
        );
        let mut c = self.integrator.trace(ray, rand, profile);
        let lum = luminance(c);
        if self.luminance_clamping > 0.0 && lum > self.luminance_clamping {
            c *= self.luminance_clamping / lum;
        }
        PathContribution { x, y, c }
    }
}
