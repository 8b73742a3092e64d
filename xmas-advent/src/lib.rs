//! This crate provides everything about the advent scene that isn't rendering: the calendar of
//! decorations, the start and modal state machine, picking decorations with a ray cast from the
//! cursor, and the scene config.
//!
//! The vertical axis is y.

mod calendar;
mod config;
mod error;
mod ray;
mod state;

pub use self::{
    calendar::{today, Calendar, Decoration},
    config::{
        AssetPaths, CameraConfig, DecorationPlacement, LightingConfig, ModalConfig, RGBArray,
        SceneConfig, StartScreenConfig,
    },
    error::AdventError,
    ray::cursor_ray,
    state::{AdventState, ClickOutcome, Modal, Phase},
};
