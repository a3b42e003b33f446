use super::{Force, ForceGate, ForceOutput, PerlinNoise};
use crate::math::{Vector2D, Vector3D};
use crate::particle::Particle;

/// 第二通道的采样偏移，使 x/y 两个分量互不相关
const CHANNEL_OFFSET: Vector3D = Vector3D::new(31.416, 47.853, 12.793);

/// 湍流力
///
/// 在 `(x, y, time) × frequency × spatial_scale` 处采样两路 fBm 噪声，
/// 分别作为力的 x/y 分量。`time` 在 [`Force::advance`] 中推进。
#[derive(Debug, Clone)]
pub struct TurbulenceForce {
    pub gate: ForceGate,
    pub strength: f64,
    pub frequency: f64,
    pub spatial_scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub time_scale: f64,
    time: f64,
    noise: PerlinNoise,
}

impl TurbulenceForce {
    pub fn new(strength: f64, frequency: f64) -> Self {
        Self {
            gate: ForceGate::default(),
            strength,
            frequency,
            spatial_scale: 1.0,
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
            time_scale: 1.0,
            time: 0.0,
            noise: PerlinNoise::new(0x5EED),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.noise = PerlinNoise::new(seed);
        self
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves.clamp(1, 8);
        self
    }

    pub fn with_fractal(mut self, persistence: f64, lacunarity: f64) -> Self {
        self.persistence = persistence;
        self.lacunarity = lacunarity;
        self
    }

    pub fn with_spatial_scale(mut self, scale: f64) -> Self {
        self.spatial_scale = scale;
        self
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// 某点的噪声场（未乘强度）
    pub fn sample(&self, position: Vector2D) -> Vector2D {
        let point = position.extend(self.time) * (self.frequency * self.spatial_scale);
        let shifted = point + CHANNEL_OFFSET;
        let fbm = |p: Vector3D| {
            self.noise
                .fbm(p.x, p.y, p.z, self.octaves, self.persistence, self.lacunarity)
        };
        Vector2D::new(fbm(point), fbm(shifted))
    }
}

impl Force for TurbulenceForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        self.time += dt * self.time_scale;
    }

    fn compute(&mut self, particle: &Particle, _dt: f64) -> ForceOutput {
        ForceOutput::new(self.sample(particle.position) * self.strength)
    }

    fn name(&self) -> &'static str {
        "turbulence"
    }
}
