//! Rigid-body integration for the spacecraft
//!
//! Semi-implicit Euler at a fixed timestep: impulses and gravity update the
//! velocities first, damping is applied, then positions advance with the new
//! velocities.

use crate::config::PhysicsConfig;
use crate::normalize_angle;

use super::spacecraft::Spacecraft;

/// Advances a [`Spacecraft`] by one tick
#[derive(Debug, Clone)]
pub struct Integrator {
    config: PhysicsConfig,
}

impl Integrator {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn dt(&self) -> f32 {
        self.config.dt
    }

    /// High damping settles the craft when the pilot lets go of the RCS
    pub fn angular_damping(&self, rotation_commanded: bool) -> f32 {
        if rotation_commanded {
            self.config.angular_damping_active
        } else {
            self.config.angular_damping_idle
        }
    }

    /// One fixed step: consume queued impulses, apply gravity and damping, move
    pub fn step(&self, craft: &mut Spacecraft, rotation_commanded: bool) {
        let dt = self.config.dt;
        let impulse = craft.take_pending_impulse();
        let angular_impulse = craft.advance_torque(dt);
        let mass = craft.mass();
        let inertia = craft.moment_of_inertia();

        let state = &mut craft.state;

        state.linear_velocity += impulse / mass;
        state.linear_velocity += self.config.gravity_vector() * dt;
        state.linear_velocity *= damping_factor(self.config.linear_damping, dt);

        state.angular_velocity += angular_impulse / inertia;
        state.angular_velocity *= damping_factor(self.angular_damping(rotation_commanded), dt);

        state.position += state.linear_velocity * dt;
        state.rotation = normalize_angle(state.rotation + state.angular_velocity * dt);
    }
}

/// Per-step velocity multiplier for a damping coefficient
#[inline]
fn damping_factor(damping: f32, dt: f32) -> f32 {
    (1.0 - damping * dt).max(0.0)
}
