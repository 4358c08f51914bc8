//! Spacecraft flight state and control actions
//!
//! Control actions only queue impulses; the integrator applies them on the
//! next step. Every action draws fuel first and reports how much it got.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::CraftConfig;
use crate::{rotate, up_vector};

/// Outcome of drawing fuel for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelDraw {
    /// The full cost was available
    Full,
    /// Tank ran dry part-way; the action is scaled down
    Partial { drawn: i32 },
    /// Nothing left; the action was not applied
    Empty,
}

impl FuelDraw {
    /// Share of the requested effect that was paid for
    pub fn fraction(&self, cost: i32) -> f32 {
        match *self {
            FuelDraw::Full => 1.0,
            FuelDraw::Partial { drawn } if cost > 0 => drawn as f32 / cost as f32,
            FuelDraw::Partial { .. } => 1.0,
            FuelDraw::Empty => 0.0,
        }
    }

    pub fn applied(&self) -> bool {
        !matches!(self, FuelDraw::Empty)
    }
}

/// Kinematic state plus fuel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacecraftState {
    pub position: Vec2,
    /// Radians, counter-clockwise from upright
    pub rotation: f32,
    pub linear_velocity: Vec2,
    /// Radians per second
    pub angular_velocity: f32,
    /// Never negative
    pub fuel_kg: i32,
}

/// An angular impulse being delivered over time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorqueAction {
    /// Angular impulse per second
    pub rate: f32,
    /// Seconds left to deliver
    pub remaining: f32,
}

/// The player's spacecraft
#[derive(Debug, Clone)]
pub struct Spacecraft {
    pub state: SpacecraftState,
    config: CraftConfig,
    /// Linear impulse queued for the next integration step
    pending_impulse: Vec2,
    torque_actions: Vec<TorqueAction>,
}

impl Spacecraft {
    pub fn new(config: CraftConfig) -> Self {
        let state = Self::initial_state(&config);
        Self {
            state,
            config,
            pending_impulse: Vec2::ZERO,
            torque_actions: Vec::new(),
        }
    }

    /// Session-start state described by `config`
    pub fn initial_state(config: &CraftConfig) -> SpacecraftState {
        SpacecraftState {
            position: config.initial_position,
            rotation: config.initial_rotation_deg.to_radians(),
            linear_velocity: config.initial_velocity,
            angular_velocity: 0.0,
            fuel_kg: config.initial_fuel,
        }
    }

    pub fn config(&self) -> &CraftConfig {
        &self.config
    }

    pub fn mass(&self) -> f32 {
        self.config.mass
    }

    pub fn moment_of_inertia(&self) -> f32 {
        self.config.moment_of_inertia
    }

    pub fn speed(&self) -> f32 {
        self.state.linear_velocity.length()
    }

    pub fn has_fuel(&self) -> bool {
        self.state.fuel_kg > 0
    }

    /// Fire the main engine for one tick along the craft's roof direction
    pub fn thrust(&mut self) -> FuelDraw {
        let cost = self.config.thrust_fuel_cost;
        let draw = self.consume_fuel(cost);
        let magnitude = self.config.engine_thrust * draw.fraction(cost);
        self.pending_impulse += up_vector(self.state.rotation) * magnitude;
        draw
    }

    /// Fire the RCS to roll left
    pub fn apply_torque_counter_clockwise(&mut self) -> FuelDraw {
        self.queue_torque(1.0)
    }

    /// Fire the RCS to roll right
    pub fn apply_torque_clockwise(&mut self) -> FuelDraw {
        self.queue_torque(-1.0)
    }

    fn queue_torque(&mut self, direction: f32) -> FuelDraw {
        let cost = self.config.rcs_fuel_cost;
        let draw = self.consume_fuel(cost);
        if draw.applied() {
            let impulse = self.config.rcs_impulse * draw.fraction(cost) * direction;
            self.torque_actions.push(TorqueAction {
                rate: impulse / self.config.rcs_duration,
                remaining: self.config.rcs_duration,
            });
        }
        draw
    }

    /// Take up to `amount` kg from the tank, flooring at zero
    pub fn consume_fuel(&mut self, amount: i32) -> FuelDraw {
        let fuel = self.state.fuel_kg;
        if amount <= 0 {
            return FuelDraw::Full;
        }
        if fuel <= 0 {
            self.state.fuel_kg = 0;
            return FuelDraw::Empty;
        }
        if fuel >= amount {
            self.state.fuel_kg = fuel - amount;
            FuelDraw::Full
        } else {
            self.state.fuel_kg = 0;
            FuelDraw::Partial { drawn: fuel }
        }
    }

    /// Restore everything to the given values and drop queued impulses
    pub fn reset(&mut self, position: Vec2, rotation: f32, velocity: Vec2, fuel: i32) {
        self.state = SpacecraftState {
            position,
            rotation,
            linear_velocity: velocity,
            angular_velocity: 0.0,
            fuel_kg: fuel.max(0),
        };
        self.pending_impulse = Vec2::ZERO;
        self.torque_actions.clear();
    }

    /// Reset to the configured session-start state
    pub fn reset_to_initial(&mut self) {
        let initial = Self::initial_state(&self.config);
        self.reset(
            initial.position,
            initial.rotation,
            initial.linear_velocity,
            initial.fuel_kg,
        );
    }

    /// Stop all motion and cancel anything still queued
    pub fn freeze(&mut self) {
        self.state.linear_velocity = Vec2::ZERO;
        self.state.angular_velocity = 0.0;
        self.pending_impulse = Vec2::ZERO;
        self.torque_actions.clear();
    }

    pub fn pending_impulse(&self) -> Vec2 {
        self.pending_impulse
    }

    pub fn torque_actions(&self) -> &[TorqueAction] {
        &self.torque_actions
    }

    pub(crate) fn take_pending_impulse(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending_impulse)
    }

    /// Angular impulse delivered over the next `dt`; finished actions are dropped
    pub(crate) fn advance_torque(&mut self, dt: f32) -> f32 {
        let mut impulse = 0.0;
        for action in &mut self.torque_actions {
            let slice = action.remaining.min(dt);
            impulse += action.rate * slice;
            action.remaining -= slice;
        }
        self.torque_actions.retain(|a| a.remaining > 0.0);
        impulse
    }

    /// Corners of the collision hull in world space
    pub fn hull_corners(&self) -> [Vec2; 4] {
        let h = self.config.half_extents;
        let offsets = [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ];
        offsets.map(|o| self.state.position + rotate(o, self.state.rotation))
    }
}
