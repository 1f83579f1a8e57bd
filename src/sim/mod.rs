//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One bounded step per display refresh
//! - Seeded RNG only, injected through the `World`
//! - No rendering, audio, or platform dependencies: collaborators consume
//!   the `World` snapshot and the drained event queue

pub mod collide;
pub mod geom;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use geom::Rect;
pub use spawn::{SpawnState, chunk_gap, jump_travel_distance, landing_gap, run_spawners};
pub use state::{
    GameEvent, GamePhase, Hazard, Obstacle, ObstacleKind, Particle, ParticleKind, Pickup,
    Platform, PlatformKind, Player, Support, TimeScale, World,
};
pub use tick::{TickInput, tick};
