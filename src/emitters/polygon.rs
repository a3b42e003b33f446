use super::{Emitter, EmitterCore};
use crate::config::{ParticleConfiguration, PolygonMode};
use crate::math::random::{self, SimRng};
use crate::math::{Bounds, Vector2D};

/// 内部填充的拒绝采样次数上限，失败后退回质心
const MAX_FILL_ATTEMPTS: usize = 64;

/// 多边形发射器（顶点相对发射器位置）
#[derive(Debug, Clone)]
pub struct PolygonEmitter {
    core: EmitterCore,
    vertices: Vec<Vector2D>,
    pub mode: PolygonMode,
    /// 各边终点处的累计周长
    cumulative: Vec<f64>,
    bounds: Option<Bounds>,
    centroid: Vector2D,
}

impl PolygonEmitter {
    pub fn new(
        position: Vector2D,
        config: ParticleConfiguration,
        vertices: Vec<Vector2D>,
        mode: PolygonMode,
    ) -> Self {
        let mut emitter = Self {
            core: EmitterCore::new(config, position),
            vertices: Vec::new(),
            mode,
            cumulative: Vec::new(),
            bounds: None,
            centroid: Vector2D::ZERO,
        };
        emitter.set_vertices(vertices);
        emitter
    }

    pub fn vertices(&self) -> &[Vector2D] {
        &self.vertices
    }

    /// 替换顶点并重新计算周长表、包围盒与质心
    pub fn set_vertices(&mut self, vertices: Vec<Vector2D>) {
        let n = vertices.len();
        let mut cumulative = Vec::with_capacity(n);
        let mut total = 0.0;
        for i in 0..n {
            total += vertices[i].distance(vertices[(i + 1) % n]);
            cumulative.push(total);
        }

        self.bounds = vertices.split_first().map(|(first, rest)| {
            rest.iter().fold(Bounds::new(*first, *first), |b, v| {
                Bounds::new(
                    Vector2D::new(b.min.x.min(v.x), b.min.y.min(v.y)),
                    Vector2D::new(b.max.x.max(v.x), b.max.y.max(v.y)),
                )
            })
        });
        self.centroid = polygon_centroid(&vertices);
        self.cumulative = cumulative;
        self.vertices = vertices;
    }

    /// 局部坐标下的点是否在多边形内部（射线法）
    pub fn contains_local(&self, point: Vector2D) -> bool {
        point_in_polygon(&self.vertices, point)
    }

    fn sample_local(&self, rng: &mut SimRng) -> Vector2D {
        if self.vertices.is_empty() {
            return Vector2D::ZERO;
        }
        match self.mode {
            PolygonMode::Vertices => random::pick_index(rng, self.vertices.len())
                .map(|i| self.vertices[i])
                .unwrap_or(Vector2D::ZERO),
            PolygonMode::Edges => self.sample_edge(rng),
            PolygonMode::Fill => self.sample_fill(rng),
            PolygonMode::Centroid => self.centroid,
        }
    }

    fn sample_edge(&self, rng: &mut SimRng) -> Vector2D {
        let n = self.vertices.len();
        let perimeter = self.cumulative.last().copied().unwrap_or(0.0);
        if n == 1 || perimeter <= 0.0 {
            return self.vertices[0];
        }
        let target = random::unit(rng) * perimeter;
        let edge = self
            .cumulative
            .iter()
            .position(|&c| target < c)
            .unwrap_or(n - 1);
        let edge_start = if edge == 0 { 0.0 } else { self.cumulative[edge - 1] };
        let edge_length = self.cumulative[edge] - edge_start;
        let t = if edge_length > 0.0 {
            (target - edge_start) / edge_length
        } else {
            0.0
        };
        self.vertices[edge].lerp(self.vertices[(edge + 1) % n], t)
    }

    fn sample_fill(&self, rng: &mut SimRng) -> Vector2D {
        let Some(bounds) = self.bounds else {
            return self.centroid;
        };
        for _ in 0..MAX_FILL_ATTEMPTS {
            let candidate = Vector2D::new(
                random::uniform(rng, bounds.min.x, bounds.max.x),
                random::uniform(rng, bounds.min.y, bounds.max.y),
            );
            if self.contains_local(candidate) {
                return candidate;
            }
        }
        self.centroid
    }
}

impl Emitter for PolygonEmitter {
    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore {
        &mut self.core
    }

    fn spawn_position(&mut self, rng: &mut SimRng) -> Vector2D {
        self.core.position + self.sample_local(rng)
    }

    fn name(&self) -> &'static str {
        "polygon"
    }
}

/// 射线法判定点是否在多边形内
pub fn point_in_polygon(vertices: &[Vector2D], point: Vector2D) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// 面积加权质心；面积退化时取顶点平均
pub fn polygon_centroid(vertices: &[Vector2D]) -> Vector2D {
    let n = vertices.len();
    if n == 0 {
        return Vector2D::ZERO;
    }
    let mut area = 0.0;
    let mut centroid = Vector2D::ZERO;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[(i + 1) % n]);
        let cross = a.cross(b);
        area += cross;
        centroid += (a + b) * cross;
    }
    if area.abs() < 1e-12 {
        return vertices.iter().fold(Vector2D::ZERO, |acc, v| acc + *v) / n as f64;
    }
    centroid / (3.0 * area)
}
