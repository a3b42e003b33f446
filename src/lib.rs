//! # Particle Engine
//!
//! A real-time 2D particle simulation engine built with Rust.
//!
//! ## Features
//!
//! - **Emitters**: point, line, circle and polygon emission shapes with continuous, burst and looping timing
//! - **Forces**: gravity, wind with gusts, attractors/repellers, vortices, Perlin turbulence, plus composite, timed and conditional combinators
//! - **Behaviors**: eased fade, scale (uniform or per-axis, with pulse) and color transitions over a particle's lifetime
//! - **Pooling**: bounded particle pool with reuse statistics and a thread-safe shared variant
//! - **Fixed-step simulation**: variable frame deltas drive a capped fixed-step physics loop
//! - **Rendering boundary**: plain-data render snapshots, no graphics API dependency
//! - **ECS**: the particle system is a bevy_ecs `Resource`
//!
//! ## Frame Pipeline
//!
//! ```text
//! update(delta)
//!   ├─ fixed steps (≤ max_substeps): reset forces → forces → behaviors → drag, integrate, bounds
//!   ├─ emission (variable step, limited by headroom)
//!   ├─ sweep dead particles back to the pool
//!   └─ completion check
//! ```
//!
//! ### Example
//!
//! ```
//! use particle_engine::prelude::*;
//!
//! let config = ParticleConfiguration { emission_rate: 50.0, max_particles: 100, ..Default::default() };
//! let mut system = ParticleSystem::new(SystemSettings { max_particles: 100, ..Default::default() }).unwrap();
//! system.add_emitter(PointEmitter::new(Vector2D::new(400.0, 300.0), config));
//! system.add_force(GravityForce::new(98.0));
//! system.add_behavior(FadeOutBehavior::default());
//! system.start().unwrap();
//!
//! for _ in 0..120 {
//!     system.update(1.0 / 60.0);
//! }
//! assert!(system.particle_count() <= 100);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types, identifiers and macros
//! - [`config`]: Particle configuration, system settings and logging setup
//! - [`math`]: Vectors, bounds, easing and random helpers
//! - [`particle`]: The particle record and its colors and shapes
//! - [`forces`]: Force strategies
//! - [`behaviors`]: Lifetime behaviors
//! - [`emitters`]: Emission shapes and timing
//! - [`pool`]: Particle pooling
//! - [`system`]: The orchestrator
//! - [`render`]: Render snapshots and frame hand-off
//! - [`ecs`]: bevy_ecs integration

/// Core infrastructure: errors, identifiers, macros
#[macro_use]
pub mod core;
/// Configuration system
pub mod config;
/// Vector math and numeric helpers
pub mod math;
/// Particle data
pub mod particle;
/// Force strategies
pub mod forces;
/// Lifetime behaviors
pub mod behaviors;
/// Emitters
pub mod emitters;
/// Particle pooling
pub mod pool;
/// Particle system orchestrator
pub mod system;
/// Render boundary
pub mod render;
/// bevy_ecs integration
pub mod ecs;

/// Commonly used types
pub mod prelude {
    pub use crate::behaviors::{
        Behavior, BehaviorWindow, ColorBehavior, ColorSpace, ColorStop, ColorTransition,
        CompositeBehavior, FadeOutBehavior, ScaleBehavior, ScaleMode,
    };
    pub use crate::config::{
        ConfigFile, EmissionShape, ParticleConfiguration, PhysicsSettings, SystemSettings,
        ValueRange,
    };
    pub use crate::core::{ParticleError, ParticleId, ParticleResult, SystemError, SystemResult};
    pub use crate::emitters::{
        build_emitter, CircleEmitter, Emitter, LineEmitter, PointEmitter, PolygonEmitter,
    };
    pub use crate::forces::{
        AttractorForce, CompositeForce, ConditionalForce, Falloff, Force, ForceGate, ForceOutput,
        GravityForce, TimedForce, TurbulenceForce, VortexForce, WindForce,
    };
    pub use crate::math::{Bounds, Easing, Vector2D, Vector3D};
    pub use crate::particle::{Color, Particle, ParticleInit, ParticleShape, Size};
    pub use crate::pool::{ParticlePool, SharedParticlePool};
    pub use crate::render::{BlendMode, ParticleRenderState, RenderFrame};
    pub use crate::system::{
        BehaviorHandle, EmitterHandle, ForceHandle, FrameStatistics, ParticleSystem, SystemState,
    };
}
