//! Deterministic flight simulation
//!
//! All gameplay logic lives here. Given a seed the module is deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod error;
pub mod mission;
pub mod physics;
pub mod random;
pub mod spacecraft;
pub mod state;
pub mod terrain;

pub use collision::{Contact, ContactClass, Surface, detect_contact};
pub use error::{MissionError, RangeError, TerrainError};
pub use mission::MissionController;
pub use physics::Integrator;
pub use random::RandomDistribution;
pub use spacecraft::{FuelDraw, Spacecraft, SpacecraftState, TorqueAction};
pub use state::{
    EffectKind, EffectSet, GameEvent, MissionOutcome, MissionState, Snapshot, TickInput,
};
pub use terrain::{LandingPad, Terrain, TerrainGenerator};
