//! This module contains the error type for the snowfall.

use thiserror::Error;

/// An error from binding or syncing the snowfall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnowfallError {
    /// The binding and the field it was asked to sync have different lengths.
    ///
    /// This is a programming error. The binding must be rebuilt whenever the field is.
    #[error("Binding has {binding} instances but the particle field has {field} particles")]
    SizeMismatch {
        /// The number of instances in the binding.
        binding: usize,

        /// The number of particles in the field.
        field: usize,
    },

    /// The template asset hasn't loaded yet, so nothing could be instantiated.
    #[error("The template asset is not ready yet")]
    TemplateNotReady,

    /// A field of the [`SnowfallConfig`](crate::SnowfallConfig) is out of range.
    #[error("Snowfall config field `{field}` is out of range")]
    InvalidConfig {
        /// The name of the bad field.
        field: &'static str,
    },
}
