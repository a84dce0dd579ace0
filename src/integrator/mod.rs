use std::sync::Arc;

use crate::geometry::Intersection;
use crate::materials::{Bsdf, SurfaceEvent};
use crate::math::{luminance, Color, Point3, Ray, Vec3, PDF_CUTOFF, RAY_EPSILON};
use crate::mediums::{MediumEnum, MediumEvent, VolumeStack};
use crate::profile::Profile;
use crate::sampler::StateSequence;
use crate::scene::Scene;

/// One traced path's result: film coordinates in [0, 1)² and radiance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathContribution {
    pub x: f32,
    pub y: f32,
    pub c: Color,
}

/// Walks light paths through surfaces and participating media. All
/// randomness comes from the `StateSequence` handed to `trace`, so the same
/// integrator serves both independent sampling and Markov-chain replay.
pub struct PathIntegrator {
    pub scene: Arc<Scene>,
    pub min_path_length: u32,
    pub max_path_length: u32,
    pub direct_lighting: bool,
    pub direct_lighting_bsdf: u32,
    pub direct_lighting_light: u32,
    pub full_direct_lighting: bool,
    pub russian_roulette: bool,
}

impl PathIntegrator {
    fn path_length_in_range(&self, depth: u32) -> bool {
        self.min_path_length <= depth && depth <= self.max_path_length
    }

    pub fn trace(&self, mut ray: Ray, rand: &mut dyn StateSequence, profile: &mut Profile) -> Color {
        let mut ret = Color::ZERO;
        let mut importance = Color::ONE;
        let stack = VolumeStack::new(self.scene.atmosphere.as_ref());
        // Emissive hits behind a delta bounce carry full weight: next-event
        // estimation cannot propose the delta direction.
        let mut prev_delta = false;
        for depth in 1..=self.max_path_length {
            let volume = stack.top();
            let info = self.scene.intersect(&ray);
            let safe_distance = volume.sample_free_distance(rand);
            let mut f = Color::ONE;
            let out_ray;
            if let Some(info) = info.filter(|i| i.dist < safe_distance) {
                // reached the next surface before a medium collision
                profile.bounce_rays += 1;
                let bsdf = Bsdf::new(&self.scene, &info);
                let in_dir = -ray.dir;
                if bsdf.is_emissive() {
                    let count =
                        info.front && (depth == 1 || !self.direct_lighting || prev_delta);
                    if count && self.path_length_in_range(depth) {
                        ret += importance * bsdf.emitted_radiance(in_dir);
                    }
                    break;
                }
                if self.direct_lighting
                    && !bsdf.is_delta()
                    && self.path_length_in_range(depth + 1)
                {
                    ret += importance
                        * self.direct_lighting_surface(in_dir, &info, &bsdf, volume, rand, profile);
                }
                let (out_dir, bsdf_f, pdf, event) = bsdf.sample(in_dir, rand.next(), rand.next());
                if pdf < PDF_CUTOFF {
                    break;
                }
                let cos = out_dir.dot(info.normal).abs();
                f = bsdf_f * cos / pdf;
                prev_delta = event.is_delta();
                out_ray = Ray::new(info.point, out_dir, RAY_EPSILON);
            } else if volume.sample_event(rand) == MediumEvent::Scattering {
                profile.volume_events += 1;
                let orig = ray.at(safe_distance);
                let in_dir = -ray.dir;
                if self.direct_lighting && self.path_length_in_range(depth + 1) {
                    ret += importance
                        * self.direct_lighting_volumetric(in_dir, orig, volume, rand, profile);
                }
                // phase sample carries unit weight; pdf folded in
                let out_dir = volume.sample_phase(rand);
                prev_delta = false;
                out_ray = Ray::new(orig, out_dir, RAY_EPSILON);
            } else {
                // volumetric absorption, or escaped the scene
                break;
            }
            ray = out_ray;
            importance *= f;
            if self.russian_roulette {
                let p = luminance(importance);
                if p <= 1.0 {
                    if rand.next() < p {
                        importance /= p;
                    } else {
                        break;
                    }
                }
            }
        }
        debug_assert!(ret.is_finite(), "non-finite radiance: {:?}", ret);
        ret
    }

    /// Next-event estimation at a surface vertex: MIS over BSDF-sampled and
    /// light-sampled shadow rays toward one power-picked emissive triangle,
    /// or summed over all of them when `full_direct_lighting` is on.
    fn direct_lighting_surface(
        &self,
        in_dir: Vec3,
        info: &Intersection,
        bsdf: &Bsdf,
        volume: &MediumEnum,
        rand: &mut dyn StateSequence,
        profile: &mut Profile,
    ) -> Color {
        let mut acc = Color::ZERO;
        if !self.full_direct_lighting {
            let Some((triangle_id, pick_pdf)) = self.scene.sample_light_emission(rand.next())
            else {
                return acc;
            };
            let triangle = &self.scene.triangles[triangle_id];
            if triangle.plane_side(info.point) > 0.0 {
                acc += self
                    .direct_lighting_on_triangle(in_dir, info, bsdf, triangle_id, volume, rand, profile)
                    / pick_pdf;
            }
        } else {
            for &triangle_id in self.scene.emissive_triangles() {
                let triangle = &self.scene.triangles[triangle_id];
                if triangle.plane_side(info.point) > 0.0 {
                    acc += self.direct_lighting_on_triangle(
                        in_dir, info, bsdf, triangle_id, volume, rand, profile,
                    );
                }
            }
        }
        acc
    }

    fn direct_lighting_on_triangle(
        &self,
        in_dir: Vec3,
        info: &Intersection,
        bsdf: &Bsdf,
        triangle_id: usize,
        volume: &MediumEnum,
        rand: &mut dyn StateSequence,
        profile: &mut Profile,
    ) -> Color {
        let triangle = &self.scene.triangles[triangle_id];
        let nb = self.direct_lighting_bsdf;
        let nl = self.direct_lighting_light;
        debug_assert!(nb + nl > 0);
        let mut acc = Color::ZERO;
        for i in 0..nb + nl {
            let sample_bsdf = i < nb;
            let mut f;
            let mut bsdf_p;
            let out_dir;
            let mut event = SurfaceEvent::Diffuse;
            if sample_bsdf {
                let (dir, value, pdf, ev) = bsdf.sample(in_dir, rand.next(), rand.next());
                out_dir = dir;
                f = value;
                bsdf_p = pdf;
                event = ev;
            } else {
                let on_light = triangle.sample_point(rand.next(), rand.next());
                out_dir = (on_light - info.point).normalize();
                f = Color::ZERO;
                bsdf_p = 0.0;
            }
            let shadow_ray = Ray::new(info.point, out_dir, RAY_EPSILON);
            profile.shadow_rays += 1;
            let test = match self.scene.intersect(&shadow_ray) {
                Some(test) if test.triangle_id == triangle.id => test,
                _ => continue, // occluded, or hit something else entirely
            };
            if !sample_bsdf {
                f = bsdf.evaluate(in_dir, out_dir);
                bsdf_p = bsdf.probability_density(in_dir, out_dir);
            }
            let co = out_dir.dot(info.normal).abs();
            let c = out_dir.dot(triangle.normal).abs();
            let to_light = test.point - info.point;
            // solid-angle pdf of uniform area sampling
            let light_p = to_light.length_squared() / (triangle.area * c);
            let light_bsdf = Bsdf::new(&self.scene, &test);
            let emission = light_bsdf.emitted_radiance(-out_dir);
            let throughput = emission * co * f * volume.attenuation(test.dist);
            let weight = if sample_bsdf && event.is_delta() {
                1.0 / (nb as f32 * bsdf_p)
            } else {
                1.0 / (nb as f32 * bsdf_p + nl as f32 * light_p)
            };
            acc += weight * throughput;
        }
        acc
    }

    /// One-bounce light sampling from inside a medium: phase-sampled
    /// direction only, no MIS.
    fn direct_lighting_volumetric(
        &self,
        _in_dir: Vec3,
        orig: Point3,
        volume: &MediumEnum,
        rand: &mut dyn StateSequence,
        profile: &mut Profile,
    ) -> Color {
        let out_dir = volume.sample_phase(rand);
        let ray = Ray::new(orig, out_dir, RAY_EPSILON);
        profile.shadow_rays += 1;
        match self.scene.intersect(&ray) {
            Some(test) if test.front => {
                let light_bsdf = Bsdf::new(&self.scene, &test);
                light_bsdf.emitted_radiance(-out_dir) * volume.attenuation(test.dist)
            }
            _ => Color::ZERO,
        }
    }
}
