use super::{CircleEmitter, Emitter, LineEmitter, PointEmitter, PolygonEmitter};
use crate::config::{EmissionShape, ParticleConfiguration};
use crate::math::Vector2D;

/// 按配置中的发射形状构造发射器
pub fn build_emitter(position: Vector2D, config: &ParticleConfiguration) -> Box<dyn Emitter> {
    let emitter: Box<dyn Emitter> = match &config.shape {
        EmissionShape::Point { jitter } => {
            Box::new(PointEmitter::new(position, config.clone()).with_jitter(*jitter))
        }
        EmissionShape::Line {
            length,
            angle,
            distribution,
        } => Box::new(LineEmitter::new(
            position,
            config.clone(),
            *length,
            *angle,
            *distribution,
        )),
        EmissionShape::Circle { radius, mode } => {
            Box::new(CircleEmitter::new(position, config.clone(), *radius, *mode))
        }
        EmissionShape::Polygon { vertices, mode } => Box::new(PolygonEmitter::new(
            position,
            config.clone(),
            vertices.clone(),
            *mode,
        )),
    };
    tracing::debug!(target: "emitter", kind = emitter.name(), "Emitter built");
    emitter
}
