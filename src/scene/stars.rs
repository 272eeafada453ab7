//! Star field: a fixed-size point cloud in a spherical shell whose points
//! drift independently every frame.

use glam::Vec3;
use rand::Rng;

use super::color::Rgb;

pub const DEFAULT_STAR_COUNT: usize = 8000;
pub const STAR_COUNT_BOUNDS: (usize, usize) = (500, 20_000);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarFieldParams {
    pub radius: f32,
    /// Points start at `radius + depth` and walk inward.
    pub depth: f32,
    pub count: usize,
    pub factor: f32,
    pub saturation: f32,
    pub fade: bool,
    pub speed: f32,
}

impl Default for StarFieldParams {
    fn default() -> Self {
        Self {
            radius: 250.0,
            depth: 80.0,
            count: DEFAULT_STAR_COUNT,
            factor: 10.0,
            saturation: 1.0,
            fade: true,
            speed: 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftParams {
    pub min_speed: f32,
    pub speed_spread: f32,
    pub amplitude: f32,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            min_speed: 0.0001,
            speed_spread: 0.0005,
            amplitude: 0.002,
        }
    }
}

pub trait PositionSink {
    fn upload(&self, positions: &[f32]);
}

/// xyz and rgb interleaved, one size per point. Buffer lengths never change
/// after generation.
#[derive(Clone, Debug)]
pub struct StarField {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    speeds: Vec<f32>,
    amplitude: f32,
    twinkle_rate: f32,
    twinkle_time: f32,
}

impl StarField {
    pub fn generate(params: &StarFieldParams, drift: &DriftParams, rng: &mut impl Rng) -> Self {
        let count = params.count;
        let mut positions = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);
        let mut speeds = Vec::with_capacity(count);

        let mut r = params.radius + params.depth;
        let increment = if count == 0 {
            0.0
        } else {
            params.depth / count as f32
        };

        for i in 0..count {
            r -= increment * rng.random::<f32>();
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            positions.extend_from_slice(&spherical_to_cartesian(r, phi, theta).to_array());

            let color = Rgb::from_hsl(i as f32 / count as f32, params.saturation, 0.9);
            colors.extend_from_slice(&color.to_array());

            sizes.push((0.5 + 0.5 * rng.random::<f32>()) * params.factor);
            speeds.push(rng.random::<f32>() * drift.speed_spread + drift.min_speed);
        }

        Self {
            positions,
            colors,
            sizes,
            speeds,
            amplitude: drift.amplitude,
            twinkle_rate: params.speed,
            twinkle_time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    /// Advances and uploads one frame of drift. Without a sink the frame is
    /// skipped entirely and `false` returned.
    pub fn drift<S: PositionSink>(&mut self, elapsed_seconds: f32, sink: Option<&S>) -> bool {
        let Some(sink) = sink else {
            return false;
        };

        self.advance(elapsed_seconds);
        sink.upload(&self.positions);
        true
    }

    pub fn advance(&mut self, elapsed_seconds: f32) {
        let amplitude = self.amplitude;
        for (point, speed) in self.positions.chunks_exact_mut(3).zip(&self.speeds) {
            let (sin, cos) = (elapsed_seconds * speed).sin_cos();
            point[0] += sin * amplitude;
            point[1] += cos * amplitude;
            point[2] += sin * amplitude;
        }
    }

    pub fn tick_twinkle(&mut self, delta_seconds: f32) -> f32 {
        self.twinkle_time += delta_seconds.max(0.0) * self.twinkle_rate;
        self.twinkle_time
    }
}

fn spherical_to_cartesian(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi_radius = phi.sin() * radius;
    Vec3::new(
        sin_phi_radius * theta.sin(),
        phi.cos() * radius,
        sin_phi_radius * theta.cos(),
    )
}
