#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-mode system responsible for emitting building placement commands.

use survival_core::{BuildingKind, Command, Event, Vec2};

/// Whether the player is currently placing a building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    /// No building selected; placement requests are ignored.
    #[default]
    Idle,
    /// The next placement constructs the selected building.
    Placing(BuildingKind),
}

/// Build-mode system that turns placement requests into world commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    mode: BuildMode,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: BuildMode::Idle,
        }
    }

    /// Current build mode.
    #[must_use]
    pub const fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Selects a building type, or leaves build mode.
    ///
    /// Selecting the type that is already active toggles build mode off, as
    /// does passing `None`. Returns the resulting mode.
    pub fn toggle(&mut self, kind: Option<BuildingKind>) -> BuildMode {
        self.mode = match (self.mode, kind) {
            (BuildMode::Placing(current), Some(requested)) if current == requested => {
                BuildMode::Idle
            }
            (_, Some(requested)) => BuildMode::Placing(requested),
            (_, None) => BuildMode::Idle,
        };
        self.mode
    }

    /// Requests placement of the selected building at `position`.
    ///
    /// Returns `false` without emitting anything when no building is selected.
    pub fn place(&self, position: Vec2, out: &mut Vec<Command>) -> bool {
        match self.mode {
            BuildMode::Placing(kind) => {
                out.push(Command::PlaceBuilding { kind, position });
                true
            }
            BuildMode::Idle => false,
        }
    }

    /// Consumes world events to keep the build mode in sync.
    ///
    /// A successful placement of the selected type ends build mode; a
    /// rejection keeps it active so the player can try again.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::BuildingPlaced { kind, .. } if self.mode == BuildMode::Placing(*kind) => {
                    self.mode = BuildMode::Idle;
                }
                Event::GameOver | Event::SessionReset => self.mode = BuildMode::Idle,
                _ => {}
            }
        }
    }
}
