//! Current location and visit history of a running tour.
//!
//! Every operation leaves `history.last() == current` and never stores the
//! same id twice in a row. Unknown ids are rejected with
//! [`TourError::InvalidTarget`] and leave the state untouched.

use std::sync::Arc;

use crate::{
    error::TourError,
    tour::{LocationId, Tour},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: LocationId,
    history: Vec<LocationId>,
}

impl NavigationState {
    pub fn new(start: LocationId) -> Self {
        Self {
            current: start,
            history: vec![start],
        }
    }

    pub fn current(&self) -> LocationId {
        self.current
    }

    pub fn history(&self) -> &[LocationId] {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    fn visit(&mut self, target: LocationId) -> bool {
        if target == self.current {
            return false;
        }
        self.current = target;
        if self.history.last() != Some(&target) {
            self.history.push(target);
        }
        true
    }

    fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.history.pop();
        if let Some(&previous) = self.history.last() {
            self.current = previous;
        }
        true
    }

    fn reset(&mut self, start: LocationId) {
        self.current = start;
        self.history.clear();
        self.history.push(start);
    }
}

/// Emitted after every operation that changed the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub current: LocationId,
    pub history: Vec<LocationId>,
}

pub struct Navigator {
    tour: Arc<Tour>,
    state: NavigationState,
    events: Vec<NavigationEvent>,
}

impl Navigator {
    pub fn new(tour: Arc<Tour>) -> Self {
        let state = NavigationState::new(tour.start());
        Self {
            tour,
            state,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current(&self) -> LocationId {
        self.state.current()
    }

    pub fn history(&self) -> &[LocationId] {
        self.state.history()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.can_go_back()
    }

    /// Configured start location of the tour.
    pub fn home(&self) -> LocationId {
        self.tour.start()
    }

    /// Moves to `target`, recording the step in the history.
    ///
    /// Returns `Ok(false)` when already there.
    pub fn navigate(&mut self, target: LocationId) -> Result<bool, TourError> {
        self.check(target)?;
        let moved = self.state.visit(target);
        if moved {
            log::info!("navigate to {target}, history {:?}", self.state.history());
            self.emit();
        }
        Ok(moved)
    }

    /// Jumps straight to any location, ignoring the hotspot graph.
    pub fn select_direct(&mut self, target: LocationId) -> Result<bool, TourError> {
        self.check(target)?;
        if !self.tour.graph().has_edge(self.current(), target) {
            log::debug!("direct jump {} -> {target}", self.current());
        }
        self.navigate(target)
    }

    /// Steps back one entry. Returns `false` when there is nothing to go
    /// back to.
    pub fn go_back(&mut self) -> bool {
        let moved = self.state.back();
        if moved {
            log::info!("back to {}, history {:?}", self.current(), self.state.history());
            self.emit();
        }
        moved
    }

    /// Discards the whole history and restarts at `start`.
    pub fn go_home(&mut self, start: LocationId) -> Result<(), TourError> {
        self.check(start)?;
        self.state.reset(start);
        log::info!("home to {start}");
        self.emit();
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }

    fn check(&self, target: LocationId) -> Result<(), TourError> {
        if self.tour.contains(target) {
            Ok(())
        } else {
            log::warn!("rejected navigation to unknown location {target}");
            Err(TourError::InvalidTarget(target))
        }
    }

    fn emit(&mut self) {
        self.events.push(NavigationEvent {
            current: self.state.current(),
            history: self.state.history().to_vec(),
        });
    }
}
