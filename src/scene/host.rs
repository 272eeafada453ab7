//! Scene host configuration: camera, lights, environment, controls and the
//! parameters of the two scene elements, with URL query overrides.

use super::color::Rgb;
use super::stars::{DriftParams, StarFieldParams, DEFAULT_STAR_COUNT, STAR_COUNT_BOUNDS};
use super::title::{RotationParams, TitleMaterial, TitleParams};
use crate::config::parse_usize_with_bounds;
use crate::motion::{FadeBinding, TriggerSpec};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub position: [f32; 3],
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub ambient_intensity: f32,
    pub directional_position: [f32; 3],
    pub directional_intensity: f32,
    pub directional_color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvironmentPreset {
    City,
}

impl EnvironmentPreset {
    const HDRI_BASE: &'static str =
        "https://raw.githack.com/pmndrs/drei-assets/456060a26bbeb8fdf79326f224b6d99b8bcce736/hdri/";

    pub fn file_name(self) -> &'static str {
        match self {
            Self::City => "potsdamer_platz_1k.hdr",
        }
    }

    pub fn url(self) -> String {
        format!("{}{}", Self::HDRI_BASE, self.file_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParams {
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub camera: CameraParams,
    pub lights: LightParams,
    pub environment: EnvironmentPreset,
    pub controls: OrbitParams,
    pub stars: StarFieldParams,
    pub drift: DriftParams,
    pub title: TitleParams,
    pub title_material: TitleMaterial,
    pub rotation: RotationParams,
    pub hero_trigger: TriggerSpec,
    pub title_fade: FadeBinding,
    /// `None` seeds the star field from the host's random source.
    pub seed: Option<u64>,
    pub reduced_motion: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraParams {
                position: [0.0, 0.0, 7.0],
                fov: 75.0,
                near: 0.1,
                far: 1000.0,
            },
            lights: LightParams {
                ambient_intensity: 1.0,
                directional_position: [0.0, 0.0, 10.0],
                directional_intensity: 2.0,
                directional_color: Rgb::WHITE,
            },
            environment: EnvironmentPreset::City,
            controls: OrbitParams {
                enable_pan: false,
                enable_zoom: false,
                enable_rotate: true,
                enable_damping: true,
                damping_factor: 0.05,
            },
            stars: StarFieldParams::default(),
            drift: DriftParams::default(),
            title: TitleParams::default(),
            title_material: TitleMaterial::default(),
            rotation: RotationParams::default(),
            hero_trigger: TriggerSpec::full_height_pin(),
            title_fade: FadeBinding::FADE_OUT,
            seed: None,
            reduced_motion: false,
        }
    }
}

impl SceneConfig {
    /// Applies `stars` and `seed` overrides from a query string (with or
    /// without the leading `?`). Unknown keys are ignored.
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "stars" => {
                    self.stars.count = parse_usize_with_bounds(
                        Some(value.as_ref()),
                        DEFAULT_STAR_COUNT,
                        STAR_COUNT_BOUNDS,
                    );
                }
                "seed" => {
                    self.seed = value.trim().parse::<u64>().ok();
                }
                _ => {}
            }
        }

        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Anchor, Pin};
    use std::f64::consts::PI;

    #[test]
    fn defaults_match_hero_layout() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.position, [0.0, 0.0, 7.0]);
        assert_eq!(config.lights.directional_position, [0.0, 0.0, 10.0]);
        assert_eq!(config.lights.directional_intensity, 2.0);
        assert!(!config.controls.enable_pan);
        assert!(!config.controls.enable_zoom);
        assert!(config.controls.enable_rotate);
        assert_eq!(config.stars.count, 8000);
        assert_eq!(config.rotation.peak, PI / 14.0);
        assert_eq!(config.hero_trigger.start, Anchor::TOP_TOP);
        assert_eq!(config.hero_trigger.end, Anchor::BOTTOM_TOP);
        assert_eq!(config.hero_trigger.pin, Pin::Pinned { spacing: false });
        assert!(config.hero_trigger.scrub);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn query_overrides_star_count_and_seed() {
        let config = SceneConfig::default().with_query("?stars=1500&seed=99&theme=dark");
        assert_eq!(config.stars.count, 1500);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn out_of_bounds_star_count_keeps_default() {
        let config = SceneConfig::default().with_query("stars=999999");
        assert_eq!(config.stars.count, DEFAULT_STAR_COUNT);

        let config = SceneConfig::default().with_query("stars=12");
        assert_eq!(config.stars.count, DEFAULT_STAR_COUNT);
    }

    #[test]
    fn malformed_seed_stays_unseeded() {
        let config = SceneConfig::default().with_query("seed=abc");
        assert_eq!(config.seed, None);
    }

    #[test]
    fn environment_url_points_at_hdri() {
        let url = EnvironmentPreset::City.url();
        assert!(url.starts_with("https://"));
        assert!(url.ends_with("potsdamer_platz_1k.hdr"));
    }
}
