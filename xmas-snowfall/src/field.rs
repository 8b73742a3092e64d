//! This module contains the [`ParticleField`], which owns the fall simulation.

use crate::{Particle, SnowfallConfig, Timing};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// The frame rate that [`Timing::WallClock`] treats [`SnowfallConfig::fall_rate`] as being
/// relative to.
pub const REFERENCE_FRAME_RATE: f32 = 60.;

/// A fixed number of falling snowflakes.
///
/// Particles never get added, removed, or reordered after initialisation, so index `i` always
/// refers to the same snowflake.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    /// The config that the field was initialised with.
    config: SnowfallConfig,

    /// The snowflakes themselves.
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Create a field of `config.count` randomly placed snowflakes.
    #[instrument(skip(rng))]
    pub fn initialize<R: Rng + ?Sized>(config: SnowfallConfig, rng: &mut R) -> Self {
        let particles = sample_particles(&config, rng);
        debug!(count = particles.len(), "Initialised particle field");

        Self { config, particles }
    }

    /// Resample every particle using the same config. The number of particles doesn't change.
    pub fn reinitialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.particles = sample_particles(&self.config, rng);
        debug!(count = self.particles.len(), "Reinitialised particle field");
    }

    /// Drop every particle by one fall step, respawning any particle that falls below the floor
    /// at the respawn height directly above where it was.
    ///
    /// `elapsed` is ignored with [`Timing::PerFrame`].
    ///
    /// A non-finite fall step is treated as zero.
    ///
    /// Return the number of particles that respawned.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let step = match self.config.timing {
            Timing::PerFrame => self.config.fall_rate,
            Timing::WallClock => {
                self.config.fall_rate * REFERENCE_FRAME_RATE * elapsed.as_secs_f32()
            }
        };
        let step = if step.is_finite() { step } else { 0. };

        let mut respawned = 0;
        for particle in self.particles.iter_mut() {
            particle.position.y -= step;

            if particle.position.y < self.config.floor {
                particle.position.y = self.config.respawn_height;
                respawned += 1;
            }
        }

        trace!(step, respawned);
        respawned
    }

    /// The config that this field was initialised with.
    pub fn config(&self) -> &SnowfallConfig {
        &self.config
    }

    /// The particles, in index order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field has no particles at all.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Sample `config.count` new particles.
fn sample_particles<R: Rng + ?Sized>(config: &SnowfallConfig, rng: &mut R) -> Vec<Particle> {
    (0..config.count)
        .map(|_| {
            Particle::random(
                &mut *rng,
                config.spawn_extent,
                config.spawn_height,
                config.rotation_range,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    /// A per-frame config with the given count, extent, and spawn height.
    fn per_frame_config(count: usize, spawn_extent: f32, spawn_height: f32) -> SnowfallConfig {
        SnowfallConfig {
            count,
            spawn_extent,
            spawn_height,
            timing: Timing::PerFrame,
            ..SnowfallConfig::default()
        }
    }

    #[test]
    fn initialize_produces_exactly_count_particles_in_bounds() {
        let mut rng = StdRng::seed_from_u64(12345);

        for count in [0, 1, 3, 350, 500] {
            let field = ParticleField::initialize(per_frame_config(count, 10., 20.), &mut rng);
            assert_eq!(field.len(), count);
            assert_eq!(field.is_empty(), count == 0);

            for particle in field.particles() {
                assert!((-5.0..=5.0).contains(&particle.position.x));
                assert!((0.0..=20.0).contains(&particle.position.y));
                assert!((-5.0..=5.0).contains(&particle.position.z));
            }
        }
    }

    #[test]
    fn advance_strictly_decreases_height_until_respawn() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut field = ParticleField::initialize(per_frame_config(20, 10., 20.), &mut rng);

        for _ in 0..300 {
            let before = field.particles().to_vec();
            field.advance(Duration::ZERO);

            for (old, new) in before.iter().zip(field.particles()) {
                if old.position.y - 0.05 < -10. {
                    assert_eq!(new.position.y, 50.);
                } else {
                    assert!(new.position.y < old.position.y);
                    assert!(approx_eq!(
                        f32,
                        new.position.y,
                        old.position.y - 0.05,
                        epsilon = 1e-4
                    ));
                }
            }
        }
    }

    #[test]
    fn respawn_keeps_the_column() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut field = ParticleField::initialize(per_frame_config(1, 10., 20.), &mut rng);
        field.particles[0].position.y = -9.98;
        let before = field.particles()[0];

        assert_eq!(field.advance(Duration::ZERO), 1);

        let after = field.particles()[0];
        assert_eq!(after.position.y, 50.);
        assert_eq!(after.position.x, before.position.x);
        assert_eq!(after.position.z, before.position.z);
        assert_eq!(after.rotation, before.rotation);
    }

    #[test]
    fn every_particle_wraps_within_a_thousand_frames() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut field = ParticleField::initialize(per_frame_config(3, 10., 20.), &mut rng);
        let mut wrapped = [false; 3];

        for _ in 0..1000 {
            let before = field.particles().to_vec();
            field.advance(Duration::ZERO);

            for (i, (old, new)) in before.iter().zip(field.particles()).enumerate() {
                if new.position.y > old.position.y {
                    wrapped[i] = true;
                }
            }
        }

        assert_eq!(wrapped, [true; 3]);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn advance_never_reorders_or_moves_sideways() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut field = ParticleField::initialize(per_frame_config(50, 150., 150.), &mut rng);
        let before = field.particles().to_vec();

        for _ in 0..5000 {
            field.advance(Duration::ZERO);
        }

        assert_eq!(field.len(), before.len());
        for (old, new) in before.iter().zip(field.particles()) {
            assert_eq!(old.position.x, new.position.x);
            assert_eq!(old.position.z, new.position.z);
            assert_eq!(old.rotation, new.rotation);
        }
    }

    #[test]
    fn wall_clock_timing_scales_with_elapsed_time() {
        let config = SnowfallConfig {
            count: 4,
            spawn_height: 20.,
            timing: Timing::WallClock,
            ..SnowfallConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(12345);
        let mut field = ParticleField::initialize(config, &mut rng);
        let before = field.particles().to_vec();

        // One second at the reference frame rate is 60 frames of 0.05
        field.advance(Duration::from_millis(500));
        for (old, new) in before.iter().zip(field.particles()) {
            assert!(approx_eq!(
                f32,
                new.position.y,
                old.position.y - 1.5,
                epsilon = 1e-4
            ));
        }

        let paused = field.particles().to_vec();
        field.advance(Duration::ZERO);
        assert_eq!(paused, field.particles());
    }

    #[test]
    fn reinitialize_keeps_the_count() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut field = ParticleField::initialize(per_frame_config(42, 10., 20.), &mut rng);
        let before = field.particles().to_vec();

        field.reinitialize(&mut rng);
        assert_eq!(field.len(), 42);
        assert_ne!(before, field.particles());
    }

    #[test]
    fn unusable_config_never_panics_or_poisons_heights() {
        let mut rng = StdRng::seed_from_u64(12345);
        let config = SnowfallConfig {
            count: 20,
            spawn_extent: f32::INFINITY,
            rotation_range: f32::INFINITY,
            fall_rate: f32::NAN,
            ..SnowfallConfig::default()
        };

        let mut field = ParticleField::initialize(config, &mut rng);
        assert_eq!(field.len(), 20);

        for _ in 0..10 {
            field.advance(Duration::from_millis(16));
        }
        for particle in field.particles() {
            assert!(particle.position.is_finite());
            assert!(particle.rotation.is_finite());
        }
    }
}
