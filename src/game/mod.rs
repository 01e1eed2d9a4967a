//! Round simulation
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM:
//! - Time only advances through [`RoundController::advance`]
//! - Randomness comes from a seeded PCG32
//! - Output is a queue of [`GameEvent`]s for the presentation layer

pub mod controller;
pub mod spawn;
pub mod state;
pub mod timer;

pub use controller::{Input, RoundController};
pub use spawn::SpawnScheduler;
pub use state::{
    GameEvent, Grid, IconId, IconKind, MILESTONES, RoundPhase, RoundState, SpawnedIcon,
    milestone_message,
};
pub use timer::{IntervalTimer, PendingRemoval};
