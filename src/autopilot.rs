//! Simple pilots for headless runs
//!
//! A [`Pilot`] turns the latest snapshot into intents for the next tick. The
//! [`Autopilot`] steers toward the nearest pad with a velocity-tracking
//! controller and rations fuel as the tank empties; it flies, it does not
//! promise to land.

use glam::Vec2;

use crate::config::LanderConfig;
use crate::normalize_angle;
use crate::sim::{MissionState, Snapshot, Terrain, TickInput};

/// Produces pilot intents from what the HUD shows
pub trait Pilot {
    fn control(&mut self, snapshot: &Snapshot, terrain: &Terrain) -> TickInput;
}

/// Keeps hands off the controls
#[derive(Debug, Default, Clone, Copy)]
pub struct Coast;

impl Pilot for Coast {
    fn control(&mut self, _snapshot: &Snapshot, _terrain: &Terrain) -> TickInput {
        TickInput::default()
    }
}

/// Velocity-tracking pilot aiming for the closest pad
#[derive(Debug, Clone)]
pub struct Autopilot {
    gravity: f32,
    /// Largest tilt from upright the pilot will command (radians)
    max_tilt: f32,
    /// Horizontal speed cap while crossing to the pad on a full tank
    max_cruise_speed: f32,
    /// Tank size the cruise cap scales against
    initial_fuel: f32,
    /// Below this the pilot stops chasing pads and only brakes the descent
    reserve_fuel: i32,
    /// Target sink rate close to the ground
    touchdown_speed: f32,
    /// Target sink rate high up
    max_descent_speed: f32,
    /// Velocity error to acceleration
    velocity_gain: f32,
    /// Attitude error tolerated before the engine fires
    thrust_alignment: f32,
    /// Attitude error to spin rate
    attitude_gain: f32,
    /// Fastest spin the pilot asks for (rad/s)
    max_spin: f32,
    /// Spin error tolerated before an RCS pulse
    spin_deadband: f32,
    dt: f32,
    /// Rotation seen on the previous call, for the spin estimate
    last_rotation: Option<f32>,
}

impl Autopilot {
    pub fn new(config: &LanderConfig) -> Self {
        let max_safe = config.physics.max_safe_speed;
        let initial_fuel = config.craft.initial_fuel.max(1);
        Self {
            gravity: config.physics.gravity_vector().length(),
            max_tilt: 1.0,
            max_cruise_speed: 80.0,
            initial_fuel: initial_fuel as f32,
            reserve_fuel: initial_fuel * 3 / 20,
            touchdown_speed: (max_safe * 0.4).max(1.0),
            max_descent_speed: 60.0,
            velocity_gain: 1.0,
            thrust_alignment: 0.35,
            attitude_gain: 1.0,
            max_spin: 0.5,
            spin_deadband: 0.1,
            dt: config.physics.dt,
            last_rotation: None,
        }
    }

    /// X of the pad centre nearest to `x`, or `x` itself without pads
    fn target_x(terrain: &Terrain, x: f32) -> f32 {
        terrain
            .pads
            .iter()
            .map(|pad| pad.center().x)
            .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
            .unwrap_or(x)
    }

    /// Horizontal speed cap for the fuel left, zero once into the reserve
    fn cruise_limit(&self, fuel_kg: i32) -> f32 {
        if fuel_kg <= self.reserve_fuel {
            return 0.0;
        }
        self.max_cruise_speed * (fuel_kg as f32 / self.initial_fuel).min(1.0)
    }

    /// Velocity the pilot wants right now
    fn target_velocity(&self, snapshot: &Snapshot, target_x: f32) -> Vec2 {
        let cruise = self.cruise_limit(snapshot.fuel_kg);
        let offset = target_x - snapshot.position.x;
        let vx = (offset * 0.2).clamp(-cruise, cruise);

        let altitude = snapshot.altitude.unwrap_or(f32::MAX);
        // Hold altitude until roughly above the pad, unless the tank can't afford it
        let vy = if cruise > 0.0 && offset.abs() > 40.0 && altitude < 300.0 {
            0.0
        } else {
            -(altitude * 0.1).clamp(self.touchdown_speed, self.max_descent_speed)
        };
        Vec2::new(vx, vy)
    }

    /// Rotation that points the engine along `accel`, within the tilt limit
    fn desired_rotation(&self, accel: Vec2) -> f32 {
        // up_vector(r) = (-sin r, cos r)
        let upward = accel.y.max(self.gravity);
        (-accel.x).atan2(upward).clamp(-self.max_tilt, self.max_tilt)
    }
}

impl Pilot for Autopilot {
    fn control(&mut self, snapshot: &Snapshot, terrain: &Terrain) -> TickInput {
        if snapshot.mission_state != MissionState::Running {
            self.last_rotation = None;
            return TickInput::default();
        }

        let target_x = Self::target_x(terrain, snapshot.position.x);
        let target_velocity = self.target_velocity(snapshot, target_x);
        let accel = (target_velocity - snapshot.velocity) * self.velocity_gain
            + Vec2::new(0.0, self.gravity);

        let error = normalize_angle(self.desired_rotation(accel) - snapshot.rotation);
        let spin = self
            .last_rotation
            .map_or(0.0, |last| normalize_angle(snapshot.rotation - last) / self.dt);
        self.last_rotation = Some(snapshot.rotation);

        // Pulse the RCS only to correct the spin rate
        let wanted_spin = (self.attitude_gain * error).clamp(-self.max_spin, self.max_spin);
        let command = wanted_spin - spin;

        let up = crate::up_vector(snapshot.rotation);
        TickInput {
            thrust: error.abs() < self.thrust_alignment && accel.dot(up) > self.gravity,
            rotate_left: command > self.spin_deadband,
            rotate_right: command < -self.spin_deadband,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain() -> Terrain {
        Terrain::from_heights(2000.0, &[0.0; 21], &[5, 15], -900.0).unwrap()
    }

    fn snapshot(position: Vec2, velocity: Vec2, rotation: f32) -> Snapshot {
        Snapshot {
            fuel_kg: LanderConfig::default().craft.initial_fuel,
            velocity,
            position,
            rotation,
            mission_state: MissionState::Running,
            altitude: Some(position.y),
            tick: 0,
        }
    }

    #[test]
    fn test_brakes_when_falling_fast_over_pad() {
        let mut pilot = Autopilot::new(&LanderConfig::default());
        let input = pilot.control(
            &snapshot(Vec2::new(550.0, 500.0), Vec2::new(0.0, -100.0), 0.0),
            &terrain(),
        );
        assert!(input.thrust);
        assert!(!input.rotate_left && !input.rotate_right);
    }

    #[test]
    fn test_turns_toward_distant_pad() {
        let mut pilot = Autopilot::new(&LanderConfig::default());
        // Lying on its side, pad far to the right
        let input = pilot.control(
            &snapshot(Vec2::new(100.0, 500.0), Vec2::ZERO, std::f32::consts::FRAC_PI_2),
            &terrain(),
        );
        assert!(input.rotate_right);
        assert!(!input.rotate_left);
        assert!(!input.thrust);
    }

    #[test]
    fn test_cruise_limit_follows_fuel() {
        let pilot = Autopilot::new(&LanderConfig::default());
        let full = LanderConfig::default().craft.initial_fuel;
        assert_eq!(pilot.cruise_limit(full), 80.0);
        assert!((pilot.cruise_limit(full / 2) - 40.0).abs() < 0.1);
        assert_eq!(pilot.cruise_limit(pilot.reserve_fuel), 0.0);
        assert_eq!(pilot.cruise_limit(0), 0.0);
    }

    #[test]
    fn test_reserve_fuel_skips_the_crossing() {
        let position = Vec2::new(100.0, 500.0);

        let mut pilot = Autopilot::new(&LanderConfig::default());
        let input = pilot.control(&snapshot(position, Vec2::ZERO, 0.0), &terrain());
        assert!(input.rotate_right);

        // Same spot on reserve fuel: stay upright and let it sink
        let mut pilot = Autopilot::new(&LanderConfig::default());
        let mut low = snapshot(position, Vec2::ZERO, 0.0);
        low.fuel_kg = pilot.reserve_fuel;
        assert_eq!(pilot.control(&low, &terrain()), TickInput::default());
    }

    #[test]
    fn test_reserve_fuel_still_brakes() {
        let mut pilot = Autopilot::new(&LanderConfig::default());
        let mut falling = snapshot(Vec2::new(100.0, 500.0), Vec2::new(0.0, -100.0), 0.0);
        falling.fuel_kg = 50;
        let input = pilot.control(&falling, &terrain());
        assert!(input.thrust);
        assert!(!input.rotate_left && !input.rotate_right);
    }

    #[test]
    fn test_rcs_rests_while_spinning_at_the_limit() {
        let mut pilot = Autopilot::new(&LanderConfig::default());
        let dt = LanderConfig::default().physics.dt;
        let position = Vec2::new(100.0, 500.0);

        assert!(pilot.control(&snapshot(position, Vec2::ZERO, 0.0), &terrain()).rotate_right);
        // Already turning clockwise at the spin cap
        let turning = snapshot(position, Vec2::ZERO, -0.5 * dt);
        let input = pilot.control(&turning, &terrain());
        assert!(!input.rotate_left && !input.rotate_right);
    }

    #[test]
    fn test_hands_off_unless_running() {
        let mut pilot = Autopilot::new(&LanderConfig::default());
        let mut idle = snapshot(Vec2::new(550.0, 500.0), Vec2::new(0.0, -100.0), 0.0);
        idle.mission_state = MissionState::Idle;
        assert_eq!(pilot.control(&idle, &terrain()), TickInput::default());
    }

    #[test]
    fn test_nearest_pad_is_targeted() {
        let terrain = terrain();
        assert_eq!(Autopilot::target_x(&terrain, 100.0), 550.0);
        assert_eq!(Autopilot::target_x(&terrain, 1900.0), 1550.0);

        let flat = Terrain::from_heights(100.0, &[0.0, 0.0], &[], -900.0).unwrap();
        assert_eq!(Autopilot::target_x(&flat, 42.0), 42.0);
    }

    #[test]
    fn test_coast_never_fires() {
        let mut pilot = Coast;
        let input = pilot.control(
            &snapshot(Vec2::new(550.0, 500.0), Vec2::new(0.0, -100.0), 0.0),
            &terrain(),
        );
        assert_eq!(input, TickInput::default());
    }
}
