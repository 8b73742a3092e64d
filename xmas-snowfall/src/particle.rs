//! This module contains the state of a single snowflake and the pose it gets drawn with.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

/// The widest range that gets sampled from. Anything wider is clamped to this, so the span of the
/// range stays finite.
pub(crate) const MAX_RANGE: f32 = f32::MAX / 4.;

/// Turn a configured width into one that can be sampled from: negative, NaN and infinite widths
/// become zero, and huge ones are clamped to [`MAX_RANGE`].
pub(crate) fn usable_range(width: f32) -> f32 {
    if width.is_finite() && width > 0. {
        width.min(MAX_RANGE)
    } else {
        0.
    }
}

/// The numeric state of one snowflake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// The position of the snowflake.
    pub position: Vec3,

    /// The rotation of the snowflake as Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
}

impl Particle {
    /// Sample a new particle. `x` and `z` come from `[-extent / 2, extent / 2]`, `y` comes from
    /// `[0, height]`, and every rotation angle comes from `[0, rotation_range)`.
    pub(crate) fn random<R: Rng + ?Sized>(
        rng: &mut R,
        extent: f32,
        height: f32,
        rotation_range: f32,
    ) -> Self {
        let half = usable_range(extent) / 2.;
        let height = usable_range(height);
        let rotation_range = usable_range(rotation_range);

        let mut angle = || {
            if rotation_range > 0. {
                rng.gen_range(0.0..rotation_range)
            } else {
                0.
            }
        };
        let rotation = Vec3::new(angle(), angle(), angle());

        Self {
            position: Vec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(0.0..=height),
                rng.gen_range(-half..=half),
            ),
            rotation,
        }
    }
}

/// The transform that a [`VisualBinding`](crate::VisualBinding) applies to one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Where to put the instance.
    pub translation: Vec3,

    /// The orientation as Euler angles in radians, applied in XYZ order.
    pub euler: Vec3,
}

impl Pose {
    /// The orientation as a quaternion.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.euler.x, self.euler.y, self.euler.z)
    }
}
