//! Mission state and the types exchanged with the presentation layer
//!
//! Everything here is plain data: the controller produces events and
//! snapshots, the host consumes them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Phase of a landing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissionState {
    /// Waiting for the player to start
    #[default]
    Idle,
    /// Physics running, input accepted
    Running,
    /// Physics stopped, resumable
    Paused,
    /// Touched down on a pad at a safe speed
    Landed,
    /// Too fast, or a safe touchdown off every pad
    Crashed,
}

impl MissionState {
    /// Landed and Crashed only leave through a reset
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionState::Landed | MissionState::Crashed)
    }
}

/// How a contact ended the flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionOutcome {
    /// Impact faster than the safe speed
    Crash,
    /// Safe speed, inside a pad
    Landed,
    /// Safe speed, but not on a pad
    Missed,
}

impl MissionOutcome {
    pub fn resulting_state(self) -> MissionState {
        match self {
            MissionOutcome::Landed => MissionState::Landed,
            MissionOutcome::Crash | MissionOutcome::Missed => MissionState::Crashed,
        }
    }
}

/// A thruster whose firing the presentation layer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Main engine
    Thrust,
    /// Left-side RCS nozzle
    RcsLeft,
    /// Right-side RCS nozzle
    RcsRight,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Thrust, EffectKind::RcsLeft, EffectKind::RcsRight];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            EffectKind::Thrust => 1,
            EffectKind::RcsLeft => 1 << 1,
            EffectKind::RcsRight => 1 << 2,
        }
    }
}

/// Set of effects active during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectSet(u8);

impl EffectSet {
    pub const EMPTY: EffectSet = EffectSet(0);

    pub fn insert(&mut self, kind: EffectKind) {
        self.0 |= kind.bit();
    }

    pub fn contains(self, kind: EffectKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Active effects in [`EffectKind::ALL`] order
    pub fn iter(self) -> impl Iterator<Item = EffectKind> {
        EffectKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Effects in `self` that are not in `other`
    pub fn difference(self, other: EffectSet) -> EffectSet {
        EffectSet(self.0 & !other.0)
    }
}

impl FromIterator<EffectKind> for EffectSet {
    fn from_iter<I: IntoIterator<Item = EffectKind>>(iter: I) -> Self {
        let mut set = EffectSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// Notifications for the presentation layer, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EffectBegan(EffectKind),
    EffectEnded(EffectKind),
    ContactOccurred(MissionOutcome),
    StateChanged(MissionState),
}

/// Pilot intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub thrust: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl TickInput {
    pub fn rotation_commanded(&self) -> bool {
        self.rotate_left || self.rotate_right
    }
}

/// Read-only view of the flight for HUDs and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub fuel_kg: i32,
    pub velocity: Vec2,
    pub position: Vec2,
    /// Radians, counter-clockwise from upright
    pub rotation: f32,
    pub mission_state: MissionState,
    /// Height above the terrain directly below, `None` off the playfield
    pub altitude: Option<f32>,
    pub tick: u64,
}
