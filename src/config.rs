//! Game configuration
//!
//! Every tunable constant of the game lives here so that a session can be
//! reshaped from a JSON file without touching the simulation. Defaults carry
//! the classic tuning of the game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse JSON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize config to JSON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Parsed, but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What happens when the craft touches the playfield border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The border is a solid wall: push back and bounce, flight continues
    #[default]
    Bounce,
    /// The border counts as a touchdown and is scored like terrain
    Terminal,
}

/// Whether `reset()` keeps the current terrain or rolls a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerrainPolicy {
    #[default]
    Keep,
    Regenerate,
}

/// Terrain generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Width of the playfield in world units
    pub playfield_width: f32,
    /// Number of equal-width segments
    pub segment_count: usize,
    /// Number of flat landing pads
    pub landing_pad_count: usize,
    /// Range for the height of the leftmost vertex
    pub start_height_min: i32,
    pub start_height_max: i32,
    /// Largest height change (and slope sample) per segment
    pub max_height_step: i32,
    /// Above this height the terrain is forced to descend
    pub upper_bound: f32,
    /// Below this height the terrain is forced to climb
    pub lower_bound: f32,
    /// Bottom edge of the closed terrain polygon
    pub baseline: f32,
    /// Polyline vertices emitted per curved segment
    pub curve_resolution: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            playfield_width: 1920.0,
            segment_count: SEGMENT_COUNT,
            landing_pad_count: LANDING_PAD_COUNT,
            start_height_min: -100,
            start_height_max: 300,
            max_height_step: 200,
            upper_bound: 640.0,
            lower_bound: -280.0,
            baseline: -900.0,
            curve_resolution: 8,
        }
    }
}

impl TerrainConfig {
    /// Horizontal extent of one segment
    pub fn segment_width(&self) -> f32 {
        self.playfield_width / self.segment_count as f32
    }
}

/// Spacecraft constants and session-start state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    /// Mass (kg)
    pub mass: f32,
    /// Moment of inertia about the center of mass
    pub moment_of_inertia: f32,
    /// Main engine impulse per burn
    pub engine_thrust: f32,
    /// Angular impulse per RCS burn
    pub rcs_impulse: f32,
    /// Seconds over which one RCS impulse is delivered
    pub rcs_duration: f32,
    pub thrust_fuel_cost: i32,
    pub rcs_fuel_cost: i32,
    pub initial_fuel: i32,
    pub initial_position: Vec2,
    /// Start orientation in degrees, counter-clockwise from upright
    pub initial_rotation_deg: f32,
    pub initial_velocity: Vec2,
    /// Half width / half height of the collision hull
    pub half_extents: Vec2,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            mass: 8000.0,
            moment_of_inertia: 4000.0,
            engine_thrust: 16000.0,
            rcs_impulse: 75.0,
            rcs_duration: 1.0,
            thrust_fuel_cost: THRUST_FUEL_COST,
            rcs_fuel_cost: RCS_FUEL_COST,
            initial_fuel: INITIAL_FUEL,
            initial_position: Vec2::new(480.0, 1440.0),
            initial_rotation_deg: 90.0,
            initial_velocity: Vec2::new(300.0, 0.0),
            half_extents: Vec2::new(24.0, 28.0),
        }
    }
}

/// Integrator and contact parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity: f32,
    /// World units per meter
    pub units_per_meter: f32,
    /// Fixed timestep (seconds)
    pub dt: f32,
    pub linear_damping: f32,
    pub angular_damping_idle: f32,
    pub angular_damping_active: f32,
    /// Contact speed above which touchdown is a crash
    pub max_safe_speed: f32,
    /// Top edge of the playfield
    pub ceiling: f32,
    pub boundary_policy: BoundaryPolicy,
    /// Fraction of normal speed kept after a border bounce
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            units_per_meter: UNITS_PER_METER,
            dt: SIM_DT,
            linear_damping: 0.1,
            angular_damping_idle: ANGULAR_DAMPING_IDLE,
            angular_damping_active: ANGULAR_DAMPING_ACTIVE,
            max_safe_speed: MAX_SAFE_SPEED,
            ceiling: 1800.0,
            boundary_policy: BoundaryPolicy::Bounce,
            restitution: 0.2,
        }
    }
}

impl PhysicsConfig {
    /// Gravity as a world-space acceleration vector
    pub fn gravity_vector(&self) -> Vec2 {
        Vec2::new(0.0, -self.gravity * self.units_per_meter)
    }
}

/// Session-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub terrain_policy: TerrainPolicy,
    /// Ticks between HUD snapshots
    pub hud_interval: u64,
    /// Fixed RNG seed; `None` seeds from the thread RNG
    pub seed: Option<u64>,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            terrain_policy: TerrainPolicy::Keep,
            hud_interval: HUD_INTERVAL_TICKS,
            seed: None,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    pub terrain: TerrainConfig,
    pub craft: CraftConfig,
    pub physics: PhysicsConfig,
    pub mission: MissionConfig,
}

impl LanderConfig {
    /// Parse and validate a JSON document. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        let c = &self.craft;
        let p = &self.physics;

        let checks = [
            (t.playfield_width > 0.0, "terrain.playfield_width must be positive"),
            (t.segment_count >= 4, "terrain.segment_count must be at least 4"),
            (t.curve_resolution > 0, "terrain.curve_resolution must be positive"),
            (
                t.start_height_min <= t.start_height_max,
                "terrain.start_height_min exceeds start_height_max",
            ),
            (t.max_height_step >= 0, "terrain.max_height_step must not be negative"),
            (t.lower_bound < t.upper_bound, "terrain.lower_bound must be below upper_bound"),
            (t.baseline < t.lower_bound, "terrain.baseline must be below lower_bound"),
            (c.mass > 0.0, "craft.mass must be positive"),
            (c.moment_of_inertia > 0.0, "craft.moment_of_inertia must be positive"),
            (c.rcs_duration > 0.0, "craft.rcs_duration must be positive"),
            (c.initial_fuel >= 0, "craft.initial_fuel must not be negative"),
            (
                c.thrust_fuel_cost >= 0 && c.rcs_fuel_cost >= 0,
                "craft fuel costs must not be negative",
            ),
            (
                c.half_extents.x > 0.0 && c.half_extents.y > 0.0,
                "craft.half_extents must be positive",
            ),
            (
                c.initial_position.x > 0.0 && c.initial_position.x < t.playfield_width,
                "craft.initial_position.x must lie inside the playfield",
            ),
            (
                c.initial_position.y < p.ceiling,
                "craft.initial_position.y must lie below the ceiling",
            ),
            (p.dt > 0.0, "physics.dt must be positive"),
            (p.units_per_meter > 0.0, "physics.units_per_meter must be positive"),
            (p.max_safe_speed >= 0.0, "physics.max_safe_speed must not be negative"),
            (
                (0.0..=1.0).contains(&p.restitution),
                "physics.restitution must be within [0, 1]",
            ),
            (p.ceiling > t.upper_bound, "physics.ceiling must be above terrain.upper_bound"),
            (self.mission.hud_interval > 0, "mission.hud_interval must be positive"),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(ConfigError::Invalid((*reason).to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = LanderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.terrain.segment_count, 30);
        assert_eq!(config.terrain.landing_pad_count, 4);
        assert_eq!(config.craft.initial_fuel, 3500);
        assert_eq!(config.physics.max_safe_speed, 35.0);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{ "terrain": { "landing_pad_count": 2 }, "mission": { "seed": 7 } }"#;
        let config = LanderConfig::from_json_str(json).unwrap();
        assert_eq!(config.terrain.landing_pad_count, 2);
        assert_eq!(config.terrain.segment_count, 30);
        assert_eq!(config.mission.seed, Some(7));
        assert_eq!(config.mission.terrain_policy, TerrainPolicy::Keep);
    }

    #[test]
    fn test_policies_parse_snake_case() {
        let json = r#"{
            "physics": { "boundary_policy": "terminal" },
            "mission": { "terrain_policy": "regenerate" }
        }"#;
        let config = LanderConfig::from_json_str(json).unwrap();
        assert_eq!(config.physics.boundary_policy, BoundaryPolicy::Terminal);
        assert_eq!(config.mission.terrain_policy, TerrainPolicy::Regenerate);
    }

    #[test]
    fn test_roundtrip_preserves_values() {
        let mut config = LanderConfig::default();
        config.craft.initial_velocity = Vec2::new(-50.0, 10.0);
        let json = config.to_json_pretty().unwrap();
        let back = LanderConfig::from_json_str(&json).unwrap();
        assert_eq!(back.craft.initial_velocity, Vec2::new(-50.0, 10.0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let json = r#"{ "terrain": { "segment_count": 2 } }"#;
        assert!(matches!(
            LanderConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));

        let json = r#"{ "physics": { "restitution": 1.5 } }"#;
        assert!(matches!(
            LanderConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            LanderConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "craft": {{ "initial_fuel": 1200 }} }}"#).unwrap();
        let config = LanderConfig::load(file.path()).unwrap();
        assert_eq!(config.craft.initial_fuel, 1200);

        assert!(matches!(
            LanderConfig::load("/nonexistent/lander.json"),
            Err(ConfigError::Read(_))
        ));
    }
}
