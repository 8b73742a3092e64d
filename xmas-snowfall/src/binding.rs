//! This module handles mirroring a [`ParticleField`] onto drawable instances.

use crate::{particle::usable_range, JitterMode, ParticleField, Pose, SnowfallError};
use glam::Vec3;
use rand::{rngs::StdRng, Rng};
use tracing::{debug, instrument};

/// A loaded asset that can be cloned into independent instances, one per particle.
pub trait Template {
    /// The thing that gets created for each particle.
    type Instance;

    /// Whether the underlying asset has loaded. A template that isn't ready can't be
    /// instantiated.
    fn is_ready(&self) -> bool;

    /// Create the instance for the particle at the given index. Every call must produce a new
    /// instance that shares no mutable state with the others.
    fn instantiate(&mut self, index: usize) -> Self::Instance;
}

/// One instance per particle, with instance `i` always showing particle `i`.
#[derive(Debug)]
pub struct VisualBinding<I> {
    /// The instances, in the same order as the particles of the field.
    instances: Vec<I>,

    /// How rotations get perturbed on each sync.
    jitter: JitterMode,

    /// The maximum jitter per axis per sync.
    amplitude: f32,

    /// The current jitter offset of each instance.
    offsets: Vec<Vec3>,

    /// The RNG used for jitter.
    rng: StdRng,
}

impl<I> VisualBinding<I> {
    /// Instantiate the template once for every particle in the field.
    ///
    /// Return [`SnowfallError::TemplateNotReady`] without instantiating anything if the template
    /// hasn't loaded yet. The caller should just try again on a later frame.
    #[instrument(skip_all, fields(count = field.len()))]
    pub fn bind_all<T>(
        field: &ParticleField,
        template: &mut T,
        rng: StdRng,
    ) -> Result<Self, SnowfallError>
    where
        T: Template<Instance = I>,
    {
        if !template.is_ready() {
            return Err(SnowfallError::TemplateNotReady);
        }

        let instances: Vec<I> = (0..field.len())
            .map(|index| template.instantiate(index))
            .collect();
        debug!(instances = instances.len(), "Bound particle field");

        Ok(Self {
            offsets: vec![Vec3::ZERO; instances.len()],
            instances,
            jitter: field.config().jitter,
            amplitude: field.config().jitter_amplitude,
            rng,
        })
    }

    /// Apply the current pose of each particle to its instance using the given closure.
    ///
    /// Translations only change when the field advances, but rotations get a new jitter on every
    /// call unless the jitter mode is [`JitterMode::Off`], so syncing twice in a row is not
    /// idempotent.
    pub fn sync<F>(&mut self, field: &ParticleField, mut apply: F) -> Result<(), SnowfallError>
    where
        F: FnMut(&mut I, Pose),
    {
        if self.instances.len() != field.len() {
            return Err(SnowfallError::SizeMismatch {
                binding: self.instances.len(),
                field: field.len(),
            });
        }

        for ((instance, particle), offset) in self
            .instances
            .iter_mut()
            .zip(field.particles())
            .zip(self.offsets.iter_mut())
        {
            match self.jitter {
                JitterMode::Off => {}
                JitterMode::Flicker => *offset = random_offset(&mut self.rng, self.amplitude),
                JitterMode::Drift => *offset += random_offset(&mut self.rng, self.amplitude),
            }

            apply(
                instance,
                Pose {
                    translation: particle.position,
                    euler: particle.rotation + *offset,
                },
            );
        }

        Ok(())
    }

    /// The instances, in particle order.
    pub fn instances(&self) -> &[I] {
        &self.instances
    }

    /// Consume the binding and return the instances, so that the caller can destroy them.
    pub fn into_instances(self) -> Vec<I> {
        self.instances
    }

    /// The number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether there are no instances at all.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// A random offset in `[0, amplitude)` on every axis.
fn random_offset(rng: &mut StdRng, amplitude: f32) -> Vec3 {
    let amplitude = usable_range(amplitude);
    if amplitude > 0. {
        Vec3::new(
            rng.gen_range(0.0..amplitude),
            rng.gen_range(0.0..amplitude),
            rng.gen_range(0.0..amplitude),
        )
    } else {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SnowfallConfig, Timing};
    use rand::SeedableRng;
    use std::time::Duration;

    /// A template that produces an empty slot for each particle, recording the last pose applied.
    struct SlotTemplate {
        ready: bool,
        instantiated: Vec<usize>,
    }

    /// The instance made by [`SlotTemplate`].
    #[derive(Clone, Debug, PartialEq)]
    struct Slot {
        index: usize,
        pose: Option<Pose>,
    }

    impl SlotTemplate {
        fn new(ready: bool) -> Self {
            Self {
                ready,
                instantiated: vec![],
            }
        }
    }

    impl Template for SlotTemplate {
        type Instance = Slot;

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn instantiate(&mut self, index: usize) -> Slot {
            self.instantiated.push(index);
            Slot { index, pose: None }
        }
    }

    fn field(count: usize, jitter: JitterMode) -> ParticleField {
        let config = SnowfallConfig {
            count,
            spawn_extent: 10.,
            spawn_height: 20.,
            jitter,
            timing: Timing::PerFrame,
            ..SnowfallConfig::default()
        };
        ParticleField::initialize(config, &mut StdRng::seed_from_u64(12345))
    }

    fn sync_poses(binding: &mut VisualBinding<Slot>, field: &ParticleField) -> Vec<Pose> {
        binding
            .sync(field, |slot, pose| slot.pose = Some(pose))
            .expect("binding should match the field");
        binding
            .instances()
            .iter()
            .map(|slot| slot.pose.expect("every slot should have been synced"))
            .collect()
    }

    #[test]
    fn bind_all_makes_one_instance_per_particle() {
        for count in [0, 1, 7, 350] {
            let field = field(count, JitterMode::Off);
            let mut template = SlotTemplate::new(true);
            let binding =
                VisualBinding::bind_all(&field, &mut template, StdRng::seed_from_u64(1)).unwrap();

            assert_eq!(binding.len(), count);
            assert_eq!(binding.is_empty(), count == 0);
            assert_eq!(template.instantiated, (0..count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn bind_all_waits_for_the_template() {
        let field = field(5, JitterMode::Off);
        let mut template = SlotTemplate::new(false);

        let result = VisualBinding::bind_all(&field, &mut template, StdRng::seed_from_u64(1));
        assert_eq!(result.unwrap_err(), SnowfallError::TemplateNotReady);
        assert!(template.instantiated.is_empty());

        template.ready = true;
        let binding =
            VisualBinding::bind_all(&field, &mut template, StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(binding.len(), 5);
    }

    #[test]
    fn sync_keeps_index_alignment() {
        let mut field = field(25, JitterMode::Off);
        let mut binding = VisualBinding::bind_all(
            &field,
            &mut SlotTemplate::new(true),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        for _ in 0..3 {
            field.advance(Duration::ZERO);
            let poses = sync_poses(&mut binding, &field);

            for (i, (slot, particle)) in binding.instances().iter().zip(field.particles()).enumerate()
            {
                assert_eq!(slot.index, i);
                assert_eq!(poses[i].translation, particle.position);
                assert_eq!(poses[i].euler, particle.rotation);
            }
        }
    }

    #[test]
    fn sync_rejects_a_field_of_a_different_size() {
        let small = field(3, JitterMode::Off);
        let large = field(4, JitterMode::Off);
        let mut binding = VisualBinding::bind_all(
            &small,
            &mut SlotTemplate::new(true),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        let mut applied = 0;
        let result = binding.sync(&large, |_, _| applied += 1);
        assert_eq!(
            result,
            Err(SnowfallError::SizeMismatch {
                binding: 3,
                field: 4
            })
        );
        assert_eq!(applied, 0);
    }

    #[test]
    fn sync_without_jitter_is_idempotent() {
        let field = field(10, JitterMode::Off);
        let mut binding = VisualBinding::bind_all(
            &field,
            &mut SlotTemplate::new(true),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(
            sync_poses(&mut binding, &field),
            sync_poses(&mut binding, &field)
        );
    }

    /// Jittered sync is deliberately not idempotent: positions stay put between advances but the
    /// rotations change on every call.
    #[test]
    fn jittered_sync_changes_rotation_but_not_position() {
        for jitter in [JitterMode::Flicker, JitterMode::Drift] {
            let field = field(10, jitter);
            let mut binding = VisualBinding::bind_all(
                &field,
                &mut SlotTemplate::new(true),
                StdRng::seed_from_u64(1),
            )
            .unwrap();

            let first = sync_poses(&mut binding, &field);
            let second = sync_poses(&mut binding, &field);

            for (a, b) in first.iter().zip(&second) {
                assert_eq!(a.translation, b.translation);
                assert_ne!(a.euler, b.euler, "{jitter:?} should change the rotation");
            }
        }
    }

    #[test]
    fn flicker_stays_bounded() {
        let field = field(10, JitterMode::Flicker);
        let mut binding = VisualBinding::bind_all(
            &field,
            &mut SlotTemplate::new(true),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        for _ in 0..1000 {
            let poses = sync_poses(&mut binding, &field);
            for (pose, particle) in poses.iter().zip(field.particles()) {
                let offset = pose.euler - particle.rotation;
                for axis in offset.to_array() {
                    assert!((0.0..0.0101).contains(&axis), "{axis} is out of range");
                }
            }
        }
    }

    #[test]
    fn infinite_amplitude_adds_no_jitter() {
        let config = SnowfallConfig {
            count: 10,
            jitter: JitterMode::Flicker,
            jitter_amplitude: f32::INFINITY,
            ..SnowfallConfig::default()
        };
        let field = ParticleField::initialize(config, &mut StdRng::seed_from_u64(12345));
        let mut binding = VisualBinding::bind_all(
            &field,
            &mut SlotTemplate::new(true),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        let poses = sync_poses(&mut binding, &field);
        for (pose, particle) in poses.iter().zip(field.particles()) {
            assert_eq!(pose.euler, particle.rotation);
        }
    }

    #[test]
    fn drift_accumulates() {
        let field = field(10, JitterMode::Drift);
        let mut binding = VisualBinding::bind_all(
            &field,
            &mut SlotTemplate::new(true),
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        let mut previous = sync_poses(&mut binding, &field);
        for _ in 0..1000 {
            let poses = sync_poses(&mut binding, &field);
            for (now, before) in poses.iter().zip(&previous) {
                assert!(now.euler.cmpge(before.euler).all());
            }
            previous = poses;
        }

        // The expected drift after 1001 syncs is about 5 radians per axis
        for (pose, particle) in previous.iter().zip(field.particles()) {
            let offset = pose.euler - particle.rotation;
            assert!(offset.min_element() > 1.);
        }
    }
}
