//! This module contains the state machine of the advent scene.
//!
//! There are two independent parts. The [`Phase`] goes from [`Phase::NotStarted`] to
//! [`Phase::Running`] exactly once, when the user presses start. The [`Modal`] toggles between
//! [`Modal::Closed`] and [`Modal::Open`] when today's decoration is clicked and when the modal
//! itself is clicked.

use crate::Calendar;
use tracing::{debug, info, instrument};

/// Whether the scene has been started yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Only the start screen is shown.
    #[default]
    NotStarted,

    /// The tree and the snowfall are shown.
    Running,
}

/// The full-screen picture shown after opening a decoration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Modal {
    /// Nothing is shown.
    #[default]
    Closed,

    /// The picture for the given day is shown.
    Open(u32),
}

/// What happened when a decoration was clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The decoration was today's, so its picture is now shown.
    Revealed(u32),

    /// Nothing happened.
    Ignored,
}

/// The state of the whole advent scene.
#[derive(Clone, Debug, PartialEq)]
pub struct AdventState {
    /// Whether we've started.
    phase: Phase,

    /// Whether a picture is being shown.
    modal: Modal,

    /// The decorations and pictures.
    calendar: Calendar,
}

impl AdventState {
    /// Create a new state on the start screen with the modal closed.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            phase: Phase::NotStarted,
            modal: Modal::Closed,
            calendar,
        }
    }

    /// Start the scene. Return whether this actually changed anything, since the scene can only
    /// be started once.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }

        info!("Starting the advent scene");
        self.phase = Phase::Running;
        true
    }

    /// Handle a click on the decoration for the given day.
    ///
    /// Only today's decoration does anything, and only while the scene is running with no picture
    /// already shown.
    #[instrument(skip(self))]
    pub fn click_decoration(&mut self, day: u32) -> ClickOutcome {
        if self.phase != Phase::Running || self.modal != Modal::Closed {
            return ClickOutcome::Ignored;
        }

        if !self.calendar.is_clickable(day) {
            debug!("Decoration is not today's");
            return ClickOutcome::Ignored;
        }

        info!("Revealing decoration");
        self.modal = Modal::Open(day);
        ClickOutcome::Revealed(day)
    }

    /// Handle a click anywhere on the modal, which closes it.
    pub fn click_modal(&mut self) {
        if let Modal::Open(day) = self.modal {
            debug!(day, "Closing modal");
            self.modal = Modal::Closed;
        }
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current modal.
    pub fn modal(&self) -> Modal {
        self.modal
    }

    /// The calendar.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecorationPlacement;
    use glam::Vec3;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeMap;

    /// A state with decorations for days 1 to 24 and the given current day.
    fn state(current_day: u32) -> AdventState {
        let placements: Vec<DecorationPlacement> = (1..=24)
            .map(|day| DecorationPlacement {
                day,
                position: Vec3::new(day as f32, 10., 0.),
            })
            .collect();

        AdventState::new(
            Calendar::new(
                &placements,
                current_day,
                BTreeMap::new(),
                &mut StdRng::seed_from_u64(12345),
            )
            .unwrap(),
        )
    }

    #[test]
    fn start_is_one_way() {
        let mut state = state(5);
        assert_eq!(state.phase(), Phase::NotStarted);

        assert!(state.start());
        assert_eq!(state.phase(), Phase::Running);

        assert!(!state.start());
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn clicks_before_starting_do_nothing() {
        let mut state = state(5);

        assert_eq!(state.click_decoration(5), ClickOutcome::Ignored);
        assert_eq!(state.modal(), Modal::Closed);
    }

    #[test]
    fn only_todays_decoration_reveals() {
        let mut state = state(5);
        state.start();

        for day in (1..=24).filter(|&day| day != 5) {
            assert_eq!(state.click_decoration(day), ClickOutcome::Ignored);
            assert_eq!(state.modal(), Modal::Closed);
        }

        assert_eq!(state.click_decoration(5), ClickOutcome::Revealed(5));
        assert_eq!(state.modal(), Modal::Open(5));
    }

    #[test]
    fn clicking_the_modal_closes_it() {
        let mut state = state(5);
        state.start();

        state.click_decoration(5);
        assert_eq!(state.click_decoration(5), ClickOutcome::Ignored);

        state.click_modal();
        assert_eq!(state.modal(), Modal::Closed);

        state.click_modal();
        assert_eq!(state.modal(), Modal::Closed);

        assert_eq!(state.click_decoration(5), ClickOutcome::Revealed(5));
    }

    #[test]
    fn nothing_reveals_after_advent() {
        let mut state = state(27);
        state.start();

        for day in 1..=31 {
            assert_eq!(state.click_decoration(day), ClickOutcome::Ignored);
        }
    }
}
