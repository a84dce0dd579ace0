#[macro_use]
extern crate log;

pub mod camera;
pub mod config;
pub mod film;
pub mod geometry;
pub mod integrator;
pub mod markov_chain;
pub mod materials;
pub mod math;
pub mod mediums;
pub mod profile;
pub mod renderer;
pub mod sampler;
pub mod scene;

#[cfg(test)]
pub(crate) mod test_scenes;
