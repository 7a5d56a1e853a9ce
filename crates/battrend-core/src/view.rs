//! Live / snapshot view toggle
//!
//! Switching into snapshot mode freezes the snapshot history at that moment.
//! The frozen copy lives inside the [`ViewMode::Snapshot`] variant and is
//! dropped on the way back to live mode. Toggling never touches the buffers.

use log::info;

use crate::storage::{FrozenSnapshot, LiveBuffer, SnapshotBuffer};

/// Which view is on screen, without the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Live,
    Snapshot,
}

impl ViewKind {
    /// Title shown in the chart header
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "Live 60s",
            Self::Snapshot => "History",
        }
    }
}

/// Current view and, in snapshot mode, the data frozen at entry
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewMode {
    /// Rolling per-second bars
    #[default]
    Live,
    /// Long-horizon trend, frozen when the mode was entered
    Snapshot(FrozenSnapshot),
}

impl ViewMode {
    /// Which view is active
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Live => ViewKind::Live,
            Self::Snapshot(_) => ViewKind::Snapshot,
        }
    }

    /// Frozen data when in snapshot mode
    pub fn frozen(&self) -> Option<&FrozenSnapshot> {
        match self {
            Self::Live => None,
            Self::Snapshot(frozen) => Some(frozen),
        }
    }

    /// Switch to live mode, dropping any frozen copy
    pub fn enter_live(&mut self) {
        if let Self::Snapshot(frozen) = core::mem::take(self) {
            info!("Leaving snapshot view ({} points released)", frozen.len());
        }
    }

    /// Switch to snapshot mode with a fresh copy of `history`
    ///
    /// Re-entering while already in snapshot mode replaces the copy.
    pub fn enter_snapshot(&mut self, history: &SnapshotBuffer) {
        let frozen = history.freeze();
        info!("Entering snapshot view with {} points", frozen.len());
        *self = Self::Snapshot(frozen);
    }

    /// Flip between the two modes
    pub fn toggle(&mut self, history: &SnapshotBuffer) -> ViewKind {
        match self {
            Self::Live => self.enter_snapshot(history),
            Self::Snapshot(_) => self.enter_live(),
        }
        self.kind()
    }
}

/// Data the chart renderer should draw
#[derive(Debug, Clone, Copy)]
pub enum DisplaySource<'a> {
    /// The live buffer, still receiving appends in the background
    Live(&'a LiveBuffer),
    /// The copy taken when snapshot mode was entered
    Snapshot(&'a FrozenSnapshot),
}

impl<'a> DisplaySource<'a> {
    /// Resolve the display source for a mode
    pub fn new(mode: &'a ViewMode, live: &'a LiveBuffer) -> Self {
        match mode {
            ViewMode::Live => Self::Live(live),
            ViewMode::Snapshot(frozen) => Self::Snapshot(frozen),
        }
    }

    /// Which view this source belongs to
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Live(_) => ViewKind::Live,
            Self::Snapshot(_) => ViewKind::Snapshot,
        }
    }
}
