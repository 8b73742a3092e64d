//! This module contains the config for the snowfall.

use crate::SnowfallError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// How the fall step of each particle is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timing {
    /// Drop every particle by [`SnowfallConfig::fall_rate`] on every call to
    /// [`advance`](crate::ParticleField::advance), ignoring elapsed time. The fall speed then
    /// depends on the frame rate.
    PerFrame,

    /// Scale the fall rate by the elapsed time, treating [`SnowfallConfig::fall_rate`] as the drop
    /// per frame at [`REFERENCE_FRAME_RATE`](crate::REFERENCE_FRAME_RATE).
    WallClock,
}

/// How the rotation of each instance is perturbed when it gets synced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JitterMode {
    /// Use the particle's rotation exactly.
    Off,

    /// Add a fresh random offset in `[0, amplitude)` to every axis on every sync. The rotation
    /// flickers around its base value but never strays further than `amplitude`.
    Flicker,

    /// Accumulate a random offset in `[0, amplitude)` on every sync, so the rotation drifts
    /// steadily and without bound.
    Drift,
}

/// The config for the snowfall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowfallConfig {
    /// The number of snowflakes.
    pub count: usize,

    /// The width of the square in the xz-plane that particles spawn in, centred on the origin.
    pub spawn_extent: f32,

    /// The maximum height that particles spawn at. The minimum is 0.
    pub spawn_height: f32,

    /// How far a particle falls per frame.
    pub fall_rate: f32,

    /// A particle that falls below this height gets respawned.
    pub floor: f32,

    /// The height that respawned particles reappear at.
    pub respawn_height: f32,

    /// Initial rotations are sampled from `[0, rotation_range)` on every axis.
    pub rotation_range: f32,

    /// How the rotations are perturbed on every sync.
    pub jitter: JitterMode,

    /// The maximum jitter per axis per sync, in radians.
    pub jitter_amplitude: f32,

    /// How the fall step is computed.
    pub timing: Timing,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            count: 350,
            spawn_extent: 150.,
            spawn_height: 150.,
            fall_rate: 0.05,
            floor: -10.,
            respawn_height: 50.,
            rotation_range: PI,
            jitter: JitterMode::Drift,
            jitter_amplitude: 0.01,
            timing: Timing::WallClock,
        }
    }
}

impl SnowfallConfig {
    /// Check that every field can be simulated. Every number must be finite, the ranges must not
    /// be negative, and the fall rate must be positive.
    pub fn validate(&self) -> Result<(), SnowfallError> {
        let ranges = [
            ("spawn_extent", self.spawn_extent),
            ("spawn_height", self.spawn_height),
            ("rotation_range", self.rotation_range),
            ("jitter_amplitude", self.jitter_amplitude),
        ];
        for (field, value) in ranges {
            if !(value.is_finite() && value >= 0.) {
                return Err(SnowfallError::InvalidConfig { field });
            }
        }

        if !(self.fall_rate.is_finite() && self.fall_rate > 0.) {
            return Err(SnowfallError::InvalidConfig { field: "fall_rate" });
        }

        for (field, value) in [("floor", self.floor), ("respawn_height", self.respawn_height)] {
            if !value.is_finite() {
                return Err(SnowfallError::InvalidConfig { field });
            }
        }

        Ok(())
    }
}
