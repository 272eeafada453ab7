//! The floating hero title: extruded text parameters, its material, a
//! rocking rotation tween and a scroll-driven opacity binding.

use std::f64::consts::PI;

use super::color::Rgb;
use crate::motion::{Ease, FadeBinding, Repeat, Tween};
use crate::telemetry::{log_event, LogLevel};

pub const TITLE_TEXT: &str = "Welcome, It's Arnav!";
pub const TITLE_FONT_URL: &str =
    "https://cdn.jsdelivr.net/npm/three@0.160.0/examples/fonts/helvetiker_regular.typeface.json";

const BASE_COLOR_HEX: &str = "#e600ff";
const TINT_COLOR_HEX: &str = "#c200ff";
const TINT_AMOUNT: f32 = 0.6;
const EMISSIVE_HEX: &str = "#551155";

pub trait OpacityTarget {
    fn set_opacity(&self, opacity: f32);
}

/// Named handle to a rendered text object. The material is optional because
/// the renderer may hand back a mesh before its material is ready.
pub trait TextMeshHandle {
    type Material: OpacityTarget;

    fn set_rotation_y(&self, radians: f32);
    fn material(&self) -> Option<&Self::Material>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bevel {
    pub enabled: bool,
    pub thickness: f32,
    pub size: f32,
    pub offset: f32,
    pub segments: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TitleParams {
    pub text: &'static str,
    pub font_url: &'static str,
    pub position: [f32; 3],
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel: Bevel,
}

impl Default for TitleParams {
    fn default() -> Self {
        Self {
            text: TITLE_TEXT,
            font_url: TITLE_FONT_URL,
            position: [-7.5, 0.0, 0.0],
            size: 1.2,
            depth: 0.3,
            curve_segments: 32,
            bevel: Bevel {
                enabled: true,
                thickness: 0.05,
                size: 0.02,
                offset: 0.0,
                segments: 4,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitleMaterial {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub transparent: bool,
    pub opacity: f32,
}

impl Default for TitleMaterial {
    fn default() -> Self {
        let base = Rgb::from_hex(BASE_COLOR_HEX).unwrap_or(Rgb::WHITE);
        let tint = Rgb::from_hex(TINT_COLOR_HEX).unwrap_or(Rgb::WHITE);

        Self {
            color: base.lerp(tint, TINT_AMOUNT),
            metalness: 1.0,
            roughness: 0.0,
            emissive: Rgb::from_hex(EMISSIVE_HEX).unwrap_or(Rgb::WHITE),
            emissive_intensity: 0.3,
            transparent: true,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationParams {
    pub peak: f64,
    pub duration_seconds: f64,
    pub ease: Ease,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            peak: PI / 14.0,
            duration_seconds: 3.0,
            ease: Ease::Power2InOut,
        }
    }
}

impl RotationParams {
    pub fn tween(&self, now: f64) -> Tween {
        Tween::new(0.0, self.peak, self.duration_seconds)
            .repeat(Repeat::Infinite)
            .yoyo(true)
            .ease(self.ease)
            .starting_at(now)
    }
}

pub struct FloatingTitle<H: TextMeshHandle> {
    pub params: TitleParams,
    pub material: TitleMaterial,
    rotation: RotationParams,
    animate: bool,
    handle: Option<H>,
    spin: Option<Tween>,
    fade: Option<FadeBinding>,
    fade_bound: bool,
}

impl<H: TextMeshHandle> FloatingTitle<H> {
    pub fn new(params: TitleParams, material: TitleMaterial, rotation: RotationParams) -> Self {
        Self {
            params,
            material,
            rotation,
            animate: true,
            handle: None,
            spin: None,
            fade: None,
            fade_bound: false,
        }
    }

    /// With motion off the title holds still; scroll fading is unaffected.
    pub fn with_motion(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    pub fn is_fade_bound(&self) -> bool {
        self.fade_bound
    }

    /// Takes ownership of the rendered mesh handle and starts the rotation
    /// tween. A fade requested earlier is wired now if the material exists.
    pub fn attach(&mut self, handle: H, now: f64) {
        self.spin = self.animate.then(|| self.rotation.tween(now));
        self.handle = Some(handle);

        if self.fade.is_some() && !self.fade_bound {
            self.fade_bound = self.try_bind_fade();
        }
    }

    pub fn detach(&mut self) -> Option<H> {
        self.spin = None;
        self.fade_bound = false;
        self.handle.take()
    }

    /// Binds material opacity to scroll progress. When the mesh or its
    /// material is missing the binding is skipped and `false` returned.
    pub fn bind_fade(&mut self, binding: FadeBinding) -> bool {
        self.fade = Some(binding);
        self.fade_bound = self.try_bind_fade();
        self.fade_bound
    }

    fn try_bind_fade(&self) -> bool {
        let reason = match self.handle.as_ref() {
            None => "mesh_missing",
            Some(handle) if handle.material().is_none() => "material_missing",
            Some(_) => return true,
        };

        log_event(
            LogLevel::Debug,
            "title_fade_skipped",
            serde_json::json!({ "reason": reason }),
        );
        false
    }

    pub fn rotation_y(&self, now: f64) -> f32 {
        self.spin.as_ref().map_or(0.0, |tween| tween.sample(now) as f32)
    }

    pub fn opacity(&self, progress: f64) -> f32 {
        match (self.fade_bound, self.fade) {
            (true, Some(binding)) => binding.value(progress) as f32,
            _ => self.material.opacity,
        }
    }

    pub fn tick(&self, now: f64, scroll_progress: f64) {
        let Some(handle) = self.handle.as_ref() else {
            return;
        };

        handle.set_rotation_y(self.rotation_y(now));

        if self.fade_bound {
            if let Some(material) = handle.material() {
                material.set_opacity(self.opacity(scroll_progress));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeMaterial {
        opacity: Cell<f32>,
        writes: Cell<u32>,
    }

    impl OpacityTarget for FakeMaterial {
        fn set_opacity(&self, opacity: f32) {
            self.opacity.set(opacity);
            self.writes.set(self.writes.get() + 1);
        }
    }

    #[derive(Default)]
    struct FakeMesh {
        rotation_y: Cell<f32>,
        material: Option<FakeMaterial>,
    }

    impl TextMeshHandle for FakeMesh {
        type Material = FakeMaterial;

        fn set_rotation_y(&self, radians: f32) {
            self.rotation_y.set(radians);
        }

        fn material(&self) -> Option<&FakeMaterial> {
            self.material.as_ref()
        }
    }

    fn title() -> FloatingTitle<FakeMesh> {
        FloatingTitle::new(
            TitleParams::default(),
            TitleMaterial::default(),
            RotationParams::default(),
        )
    }

    fn mesh_with_material() -> FakeMesh {
        FakeMesh {
            material: Some(FakeMaterial::default()),
            ..FakeMesh::default()
        }
    }

    #[test]
    fn default_colors_parse() {
        assert!(Rgb::from_hex(BASE_COLOR_HEX).is_ok());
        assert!(Rgb::from_hex(TINT_COLOR_HEX).is_ok());
        assert!(Rgb::from_hex(EMISSIVE_HEX).is_ok());

        let material = TitleMaterial::default();
        assert_eq!(material.color.g, 0.0);
        assert!(material.color.r > 0.0 && material.color.r < 1.0);
        assert!((material.color.b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fade_before_mesh_exists_is_skipped() {
        let mut title = title();
        assert!(!title.bind_fade(FadeBinding::FADE_OUT));
        assert!(!title.is_fade_bound());
        title.tick(1.0, 0.5);
    }

    #[test]
    fn fade_requested_early_is_wired_on_attach() {
        let mut title = title();
        title.bind_fade(FadeBinding::FADE_OUT);
        title.attach(mesh_with_material(), 0.0);
        assert!(title.is_fade_bound());

        title.tick(0.5, 1.0);
        let material = title
            .handle()
            .and_then(|mesh| mesh.material())
            .expect("material attached");
        assert_eq!(material.opacity.get(), 0.0);
        assert_eq!(material.writes.get(), 1);
    }

    #[test]
    fn missing_material_keeps_rotation_running() {
        let mut title = title();
        title.attach(FakeMesh::default(), 0.0);
        assert!(!title.bind_fade(FadeBinding::FADE_OUT));

        title.tick(1.5, 0.3);
        let mesh = title.handle().expect("mesh attached");
        assert!(mesh.rotation_y.get() > 0.0);
        assert!(mesh.rotation_y.get() <= (PI / 14.0) as f32);
    }

    #[test]
    fn opacity_follows_scroll_progress() {
        let mut title = title();
        title.attach(mesh_with_material(), 0.0);
        assert!(title.bind_fade(FadeBinding::FADE_OUT));

        assert_eq!(title.opacity(0.0), 1.0);
        assert_eq!(title.opacity(1.0), 0.0);
        assert!(title.opacity(0.25) > title.opacity(0.75));
    }

    #[test]
    fn rotation_stays_within_peak() {
        let mut title = title();
        title.attach(mesh_with_material(), 2.0);
        let peak = (PI / 14.0) as f32;

        for step in 0..5_000 {
            let angle = title.rotation_y(f64::from(step) * 0.011);
            assert!((0.0..=peak).contains(&angle), "angle {angle} at step {step}");
        }
    }

    #[test]
    fn reduced_motion_holds_rotation_at_zero() {
        let mut title = title().with_motion(false);
        title.attach(mesh_with_material(), 0.0);
        title.tick(1.5, 0.0);
        assert_eq!(title.handle().expect("mesh attached").rotation_y.get(), 0.0);
    }

    #[test]
    fn detach_releases_handle_and_unbinds() {
        let mut title = title();
        title.attach(mesh_with_material(), 0.0);
        title.bind_fade(FadeBinding::FADE_OUT);

        assert!(title.detach().is_some());
        assert!(title.handle().is_none());
        assert!(!title.is_fade_bound());
        assert_eq!(title.rotation_y(1.0), 0.0);
    }

    #[test]
    fn unbound_title_reports_material_opacity() {
        let title = title();
        assert_eq!(title.opacity(0.9), 1.0);
    }
}
