use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Pt,
    Mcmc,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_renderer")]
    pub renderer: RendererKind,
    #[serde(default = "default_sampler")]
    pub sampler: String,
    #[serde(default = "default_true")]
    pub direct_lighting: bool,
    #[serde(default = "default_one_u32")]
    pub direct_lighting_bsdf: u32,
    #[serde(default = "default_one_u32")]
    pub direct_lighting_light: u32,
    #[serde(default)]
    pub full_direct_lighting: bool,
    #[serde(default)]
    pub luminance_clamping: f32,
    #[serde(default = "default_true")]
    pub russian_roulette: bool,
    #[serde(default = "default_one_u32")]
    pub min_path_length: u32,
    #[serde(default = "default_max_path_length")]
    pub max_path_length: u32,
    #[serde(default = "default_stages")]
    pub stages: u32,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_large_step_prob")]
    pub large_step_prob: f32,
    #[serde(default = "default_one_u32")]
    pub estimation_rounds: u32,
    #[serde(default)]
    pub mutation_strength: Option<f32>,
}

fn default_renderer() -> RendererKind {
    RendererKind::Pt
}

fn default_sampler() -> String {
    "prand".to_string()
}

fn default_true() -> bool {
    true
}

fn default_one_u32() -> u32 {
    1
}

fn default_max_path_length() -> u32 {
    10
}

fn default_stages() -> u32 {
    16
}

fn default_large_step_prob() -> f32 {
    0.3
}

impl RenderSettings {
    /// Programmatic defaults, matching the serde defaults.
    pub fn new(width: usize, height: usize) -> Self {
        RenderSettings {
            width,
            height,
            renderer: default_renderer(),
            sampler: default_sampler(),
            direct_lighting: true,
            direct_lighting_bsdf: 1,
            direct_lighting_light: 1,
            full_direct_lighting: false,
            luminance_clamping: 0.0,
            russian_roulette: true,
            min_path_length: 1,
            max_path_length: default_max_path_length(),
            stages: default_stages(),
            seed: 0,
            large_step_prob: default_large_step_prob(),
            estimation_rounds: 1,
            mutation_strength: Some(1.0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.direct_lighting_bsdf + self.direct_lighting_light == 0 {
            return Err(ConfigError::Invalid(
                "direct_lighting_bsdf and direct_lighting_light must not both be 0".to_string(),
            ));
        }
        if self.min_path_length == 0 || self.min_path_length > self.max_path_length {
            return Err(ConfigError::Invalid(format!(
                "path length window [{}, {}] is empty",
                self.min_path_length, self.max_path_length
            )));
        }
        if !(0.0..=1.0).contains(&self.large_step_prob) {
            return Err(ConfigError::Invalid(format!(
                "large_step_prob must be in [0, 1], got {}",
                self.large_step_prob
            )));
        }
        Ok(())
    }
}

pub fn load(path: &Path) -> Result<RenderSettings, ConfigError> {
    let input = fs::read_to_string(path)?;
    let settings: RenderSettings = toml::from_str(&input)?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_toml_gets_defaults() {
        let settings: RenderSettings = toml::from_str("width = 64\nheight = 48\n").unwrap();
        assert_eq!(settings.renderer, RendererKind::Pt);
        assert_eq!(settings.sampler, "prand");
        assert!(settings.direct_lighting);
        assert_eq!(settings.direct_lighting_bsdf, 1);
        assert_eq!(settings.direct_lighting_light, 1);
        assert!(!settings.full_direct_lighting);
        assert_eq!(settings.luminance_clamping, 0.0);
        assert!(settings.russian_roulette);
        assert_eq!(settings.max_path_length, 10);
        assert_eq!(settings.large_step_prob, 0.3);
        assert_eq!(settings.estimation_rounds, 1);
        assert!(settings.mutation_strength.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn mcmc_toml_round_trip() {
        let settings: RenderSettings = toml::from_str(
            "width = 32\nheight = 32\nrenderer = \"mcmc\"\nmutation_strength = 0.5\nlarge_step_prob = 0.25\n",
        )
        .unwrap();
        assert_eq!(settings.renderer, RendererKind::Mcmc);
        assert_eq!(settings.mutation_strength, Some(0.5));
        assert_eq!(settings.large_step_prob, 0.25);
    }

    #[test]
    fn validation_catches_bad_settings() {
        let mut settings = RenderSettings::new(0, 16);
        assert!(settings.validate().is_err());
        settings = RenderSettings::new(16, 16);
        settings.direct_lighting_bsdf = 0;
        settings.direct_lighting_light = 0;
        assert!(settings.validate().is_err());
        settings = RenderSettings::new(16, 16);
        settings.min_path_length = 5;
        settings.max_path_length = 2;
        assert!(settings.validate().is_err());
        settings = RenderSettings::new(16, 16);
        settings.large_step_prob = 1.5;
        assert!(settings.validate().is_err());
    }
}
