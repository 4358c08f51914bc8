//! Martian Lander - land a spacecraft on a procedurally generated Mars surface
//!
//! Core modules:
//! - `sim`: Simulation (terrain generation, flight physics, mission state machine)
//! - `config`: Data-driven game constants, loadable from JSON
//! - `hud`: Presentation seam (events, snapshots, HUD readouts)
//! - `runner`: Fixed-timestep host loop
//! - `autopilot`: Simple controller used by the headless demo

pub mod autopilot;
pub mod config;
pub mod hud;
pub mod runner;
pub mod sim;

pub use config::{ConfigError, LanderConfig};
pub use runner::FixedStepRunner;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the host loop will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Number of equal-width terrain segments
    pub const SEGMENT_COUNT: usize = 30;
    /// Landing pads per generated terrain
    pub const LANDING_PAD_COUNT: usize = 4;

    /// Gravitational acceleration on Mars as tuned for the game (m/s²)
    pub const GRAVITY: f32 = 0.2;
    /// World units per meter (host engine convention)
    pub const UNITS_PER_METER: f32 = 150.0;

    /// Touchdown speeds above this are crashes
    pub const MAX_SAFE_SPEED: f32 = 35.0;

    /// Fuel at session start (kg)
    pub const INITIAL_FUEL: i32 = 3500;
    /// Fuel per main engine burn (one tick)
    pub const THRUST_FUEL_COST: i32 = 5;
    /// Fuel per RCS burn (one tick)
    pub const RCS_FUEL_COST: i32 = 2;

    /// Angular damping with no rotation input
    pub const ANGULAR_DAMPING_IDLE: f32 = 7.0;
    /// Angular damping while rotation is commanded
    pub const ANGULAR_DAMPING_ACTIVE: f32 = 2.0;

    /// HUD text refresh cadence (ticks)
    pub const HUD_INTERVAL_TICKS: u64 = 5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing out of the craft's roof for a given rotation.
///
/// Rotation 0 means upright; positive rotation is counter-clockwise.
#[inline]
pub fn up_vector(rotation: f32) -> Vec2 {
    let angle = rotation + std::f32::consts::FRAC_PI_2;
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate a local-space offset into world space
#[inline]
pub fn rotate(offset: Vec2, rotation: f32) -> Vec2 {
    let (sin, cos) = rotation.sin_cos();
    Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        // 3π lands on the wrap point, f32 rounding decides which side
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI)).abs() < 1e-5);
    }

    #[test]
    fn test_up_vector() {
        let up = up_vector(0.0);
        assert!(up.x.abs() < 1e-6 && (up.y - 1.0).abs() < 1e-6);

        // Lying on its side (90° CCW) the roof points left
        let left = up_vector(FRAC_PI_2);
        assert!((left.x + 1.0).abs() < 1e-6 && left.y.abs() < 1e-6);
    }

    #[test]
    fn test_rotate() {
        let p = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(p.x.abs() < 1e-6 && (p.y - 1.0).abs() < 1e-6);
    }
}
