//! This crate provides the snowfall simulation: a [`ParticleField`] of falling snowflakes and a
//! [`VisualBinding`] which mirrors every particle onto a drawable instance.
//!
//! Nothing in here knows about a renderer. The renderer supplies a [`Template`] to clone instances
//! from and a closure to apply each [`Pose`], and it calls [`ParticleField::advance`] and
//! [`VisualBinding::sync`] once per frame.
//!
//! The vertical axis is y.

mod binding;
mod config;
mod error;
mod field;
mod particle;

pub use self::{
    binding::{Template, VisualBinding},
    config::{JitterMode, SnowfallConfig, Timing},
    error::SnowfallError,
    field::{ParticleField, REFERENCE_FRAME_RATE},
    particle::{Particle, Pose},
};
