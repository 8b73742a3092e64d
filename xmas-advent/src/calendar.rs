//! This module contains the [`Calendar`] of decorations hung on the tree.

use crate::{AdventError, DecorationPlacement};
use chrono::Datelike;
use glam::Vec3;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// The current day of the month according to the local clock.
pub fn today() -> u32 {
    chrono::Local::now().day()
}

/// A single decoration on the tree, belonging to one day of the calendar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// The day of the month that this decoration opens on.
    pub day: u32,

    /// Where the decoration hangs.
    pub position: Vec3,

    /// The linear RGB colour that every mesh of this decoration gets tinted with.
    ///
    /// This is chosen once when the calendar is built and never changes.
    pub tint: [f32; 3],
}

/// The set of decorations, which day it is today, and the pictures behind each day.
#[derive(Clone, Debug, PartialEq)]
pub struct Calendar {
    /// The decorations, in the order they were placed.
    decorations: Vec<Decoration>,

    /// The day of the month. Only the decoration for this day can be opened.
    current_day: u32,

    /// The asset path of the picture for each day.
    images: BTreeMap<u32, String>,
}

impl Calendar {
    /// Build a calendar from the given placements, choosing a random tint for each decoration.
    ///
    /// Every placement must have a distinct day between 1 and 31.
    #[instrument(skip(placements, images, rng))]
    pub fn new<R: Rng + ?Sized>(
        placements: &[DecorationPlacement],
        current_day: u32,
        images: BTreeMap<u32, String>,
        rng: &mut R,
    ) -> Result<Self, AdventError> {
        let mut seen = HashSet::new();
        let mut decorations = Vec::with_capacity(placements.len());

        for placement in placements {
            if !(1..=31).contains(&placement.day) {
                return Err(AdventError::InvalidDay(placement.day));
            }
            if !seen.insert(placement.day) {
                return Err(AdventError::DuplicateDay(placement.day));
            }

            decorations.push(Decoration {
                day: placement.day,
                position: placement.position,
                tint: [rng.gen(), rng.gen(), rng.gen()],
            });
        }
        debug!(decorations = decorations.len(), "Built calendar");

        Ok(Self {
            decorations,
            current_day,
            images,
        })
    }

    /// All the decorations.
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// The day of the month that the calendar thinks it is.
    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    /// The single decoration that can be opened today, if there is one.
    pub fn clickable(&self) -> Option<&Decoration> {
        self.decorations
            .iter()
            .find(|decoration| decoration.day == self.current_day)
    }

    /// Whether the decoration for the given day can be opened today.
    pub fn is_clickable(&self, day: u32) -> bool {
        self.clickable()
            .is_some_and(|decoration| decoration.day == day)
    }

    /// The asset path of the picture behind the given day, if it has one.
    pub fn image_for(&self, day: u32) -> Option<&str> {
        self.images.get(&day).map(String::as_str)
    }

    /// Find every decoration whose bounding sphere of the given radius is hit by the ray, nearest
    /// first, and return their days.
    pub fn pick(&self, origin: Vec3, direction: Vec3, radius: f32) -> Vec<u32> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return vec![];
        }

        let mut hits: Vec<(f32, u32)> = self
            .decorations
            .iter()
            .filter_map(|decoration| {
                ray_hits_sphere(origin, direction, decoration.position, radius)
                    .map(|distance| (distance, decoration.day))
            })
            .collect();
        hits.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        hits.into_iter().map(|(_, day)| day).collect()
    }
}

/// Return the distance along the ray to the first point on the sphere, or 0 if the ray starts
/// inside it. `direction` must be normalised.
fn ray_hits_sphere(origin: Vec3, direction: Vec3, centre: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - centre;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;

    // Outside the sphere and pointing away from it
    if c > 0. && b > 0. {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0. {
        return None;
    }

    Some((-b - discriminant.sqrt()).max(0.))
}
