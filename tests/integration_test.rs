use std::thread;

use anyhow::Result;
use bevy_ecs::prelude::{Schedule, World};
use particle_engine::ecs::{advance_particle_systems, FrameTime};
use particle_engine::prelude::*;

const STEP: f64 = 1.0 / 60.0;

fn scenario_system(config: ParticleConfiguration) -> Result<ParticleSystem> {
    let mut system = ParticleSystem::new(SystemSettings {
        max_particles: 100,
        seed: Some(2024),
        ..Default::default()
    })?;
    system.add_emitter(PointEmitter::new(Vector2D::new(400.0, 300.0), config));
    system.add_force(GravityForce::new(98.0));
    system.add_behavior(FadeOutBehavior::default());
    system.start()?;
    Ok(system)
}

fn mean_vertical_velocity(system: &ParticleSystem) -> f64 {
    let particles = system.particles();
    particles.iter().map(|p| p.velocity.y).sum::<f64>() / particles.len() as f64
}

#[test]
fn test_end_to_end_capacity_and_sweep() -> Result<()> {
    let config = ParticleConfiguration {
        emission_rate: 50.0,
        max_particles: 100,
        ..Default::default()
    };
    let mut system = scenario_system(config)?;

    for _ in 0..120 {
        system.update(STEP);
        assert!(system.particle_count() <= 100);
        assert!(system
            .particles()
            .iter()
            .all(|p| p.age < p.lifetime && p.is_alive()));
    }

    let stats = system.statistics();
    assert_eq!(stats.frame_count, 120);
    assert!(stats.total_emitted >= 90);
    // 寿命 1~2 秒，两秒内必然有粒子被回收
    assert!(stats.total_released > 0);
    Ok(())
}

#[test]
fn test_end_to_end_gravity_accumulates() -> Result<()> {
    let config = ParticleConfiguration {
        emission_rate: 50.0,
        max_particles: 100,
        lifetime: ValueRange::constant(5.0),
        ..Default::default()
    };
    let mut system = scenario_system(config)?;

    let mut checkpoints = Vec::new();
    for frame in 1..=120 {
        system.update(STEP);
        if frame % 30 == 0 {
            checkpoints.push(mean_vertical_velocity(&system));
        }
    }

    assert_eq!(checkpoints.len(), 4);
    for pair in checkpoints.windows(2) {
        assert!(pair[1] > pair[0], "mean vy should grow: {checkpoints:?}");
    }
    Ok(())
}

#[test]
fn test_configuration_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ParticleConfiguration {
        emission_rate: 75.0,
        burst_count: 3,
        duration: Some(2.5),
        colors: vec![Color::RED, Color::new(0.2, 0.4, 0.6, 1.0)],
        physics: PhysicsSettings {
            gravity: 98.0,
            bounds_collision: true,
            bounds: Some(Bounds::from_size(800.0, 600.0)),
            ..Default::default()
        },
        ..Default::default()
    };

    let toml_path = dir.path().join("effect.toml");
    config.save_toml(&toml_path)?;
    assert_eq!(ParticleConfiguration::from_toml_file(&toml_path)?, config);

    let json_path = dir.path().join("effect.json");
    config.save_json(&json_path)?;
    let loaded = ParticleConfiguration::from_json_file(&json_path)?;
    assert_eq!(loaded, config);

    let system = ParticleSystem::from_configuration(Vector2D::ZERO, &loaded)?;
    assert_eq!(system.force_count(), 1);
    assert!(system.settings().bounds_collision);
    Ok(())
}

#[test]
fn test_shared_pool_across_threads() {
    let pool = SharedParticlePool::new(64);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    if let Some(particle) = pool.acquire_default() {
                        pool.with_pool(|inner| {
                            assert!(inner.available_count() + inner.active_count() <= inner.capacity());
                        });
                        assert!(pool.release(particle));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(pool.active_count(), 0);
    let stats = pool.statistics();
    assert_eq!(stats.acquired, stats.released);
    assert!(stats.reused > 0);
}

#[test]
fn test_particle_system_as_ecs_resource() -> Result<()> {
    let config = ParticleConfiguration {
        emission_rate: 60.0,
        ..Default::default()
    };
    let mut system = ParticleSystem::from_configuration_seeded(Vector2D::ZERO, &config, Some(9))?;
    system.start()?;

    let mut world = World::new();
    world.insert_resource(system);
    world.insert_resource(FrameTime::default());
    let mut schedule = Schedule::default();
    schedule.add_systems(advance_particle_systems);

    for _ in 0..30 {
        world.resource_mut::<FrameTime>().tick(STEP);
        schedule.run(&mut world);
    }

    let system = world.resource::<ParticleSystem>();
    assert_eq!(system.state(), SystemState::Running);
    assert!(system.particle_count() > 0);
    assert_eq!(system.statistics().frame_count, 30);
    Ok(())
}
