//! Mission controller: the state machine around one landing attempt
//!
//! Owns the terrain, the spacecraft and the integrator. Each tick turns pilot
//! intents into thruster actions, steps the physics and judges any contact.
//! Everything the presentation needs comes out as [`GameEvent`]s and
//! [`Snapshot`]s.

use crate::config::{BoundaryPolicy, LanderConfig, TerrainPolicy};

use super::collision::{ContactClass, Surface, bounce, detect_contact};
use super::error::MissionError;
use super::physics::Integrator;
use super::random::RandomDistribution;
use super::spacecraft::Spacecraft;
use super::state::{
    EffectKind, EffectSet, GameEvent, MissionOutcome, MissionState, Snapshot, TickInput,
};
use super::terrain::{Terrain, TerrainGenerator};

/// Drives a session from `Idle` through flight to `Landed` or `Crashed`
#[derive(Debug)]
pub struct MissionController {
    config: LanderConfig,
    generator: TerrainGenerator,
    rng: RandomDistribution,
    terrain: Terrain,
    spacecraft: Spacecraft,
    integrator: Integrator,
    state: MissionState,
    /// Thrusters that fired on the previous tick
    active_effects: EffectSet,
    events: Vec<GameEvent>,
    tick_count: u64,
}

impl MissionController {
    /// Validate `config` and generate the first terrain
    pub fn new(config: LanderConfig) -> Result<Self, MissionError> {
        config.validate()?;
        let generator = TerrainGenerator::new(config.terrain.clone())?;
        let mut rng = RandomDistribution::new(config.mission.seed);
        let terrain = generator.generate(&mut rng)?;
        Ok(Self::assemble(config, generator, rng, terrain))
    }

    /// Fly over a prepared terrain instead of a generated one
    pub fn with_terrain(config: LanderConfig, terrain: Terrain) -> Result<Self, MissionError> {
        config.validate()?;
        let generator = TerrainGenerator::new(config.terrain.clone())?;
        let rng = RandomDistribution::new(config.mission.seed);
        Ok(Self::assemble(config, generator, rng, terrain))
    }

    fn assemble(
        config: LanderConfig,
        generator: TerrainGenerator,
        rng: RandomDistribution,
        terrain: Terrain,
    ) -> Self {
        let spacecraft = Spacecraft::new(config.craft.clone());
        let integrator = Integrator::new(config.physics.clone());
        Self {
            config,
            generator,
            rng,
            terrain,
            spacecraft,
            integrator,
            state: MissionState::Idle,
            active_effects: EffectSet::EMPTY,
            events: Vec::new(),
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &LanderConfig {
        &self.config
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn spacecraft(&self) -> &Spacecraft {
        &self.spacecraft
    }

    /// Ticks simulated since the last reset
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Thrusters that fired on the last tick
    pub fn active_effects(&self) -> EffectSet {
        self.active_effects
    }

    /// Idle → Running
    pub fn start(&mut self) {
        if self.state != MissionState::Idle {
            log::debug!("Ignoring start in {:?}", self.state);
            return;
        }
        self.transition(MissionState::Running);
    }

    /// Running ⇄ Paused
    pub fn toggle_pause(&mut self) {
        match self.state {
            MissionState::Running => {
                self.update_effects(EffectSet::EMPTY);
                self.transition(MissionState::Paused);
            }
            MissionState::Paused => self.transition(MissionState::Running),
            other => log::debug!("Ignoring pause toggle in {other:?}"),
        }
    }

    /// Advance one fixed step. Does nothing outside `Running`.
    pub fn tick(&mut self, input: &TickInput) {
        if self.state != MissionState::Running {
            return;
        }
        self.tick_count += 1;

        // Intents in fixed order; each one re-checks the tank
        let mut effects = EffectSet::EMPTY;
        if input.thrust && self.spacecraft.has_fuel() && self.spacecraft.thrust().applied() {
            effects.insert(EffectKind::Thrust);
        }
        // Rolling left fires the nozzle on the right side
        if input.rotate_left
            && self.spacecraft.has_fuel()
            && self.spacecraft.apply_torque_counter_clockwise().applied()
        {
            effects.insert(EffectKind::RcsRight);
        }
        if input.rotate_right
            && self.spacecraft.has_fuel()
            && self.spacecraft.apply_torque_clockwise().applied()
        {
            effects.insert(EffectKind::RcsLeft);
        }
        self.update_effects(effects);

        self.integrator
            .step(&mut self.spacecraft, input.rotation_commanded());
        self.resolve_contact();
    }

    fn resolve_contact(&mut self) {
        let physics = self.integrator.config();
        let Some(contact) = detect_contact(&self.spacecraft, &self.terrain, physics.ceiling) else {
            return;
        };

        if contact.surface == Surface::Boundary && physics.boundary_policy == BoundaryPolicy::Bounce
        {
            let restitution = physics.restitution;
            bounce(&mut self.spacecraft, &contact, restitution);
            return;
        }

        let class = ContactClass::from_speed(contact.speed, physics.max_safe_speed);
        log::debug!(
            "Contact with {:?} at {:?}, speed {:.2}",
            contact.surface,
            contact.point,
            contact.speed
        );
        self.on_contact(class, self.spacecraft.state.position.x);
    }

    /// Judge a touchdown at `spacecraft_x` and end the flight.
    ///
    /// A landing attempt only wins strictly inside a pad.
    pub fn on_contact(&mut self, class: ContactClass, spacecraft_x: f32) {
        if self.state != MissionState::Running {
            log::debug!("Ignoring contact in {:?}", self.state);
            return;
        }

        self.spacecraft.freeze();
        self.update_effects(EffectSet::EMPTY);

        let outcome = match class {
            ContactClass::Crash => MissionOutcome::Crash,
            ContactClass::LandingAttempt if self.terrain.pad_containing(spacecraft_x).is_some() => {
                MissionOutcome::Landed
            }
            ContactClass::LandingAttempt => MissionOutcome::Missed,
        };

        log::info!(
            "Touchdown at x = {spacecraft_x:.1} after {} ticks: {outcome:?}",
            self.tick_count
        );
        self.events.push(GameEvent::ContactOccurred(outcome));
        self.transition(outcome.resulting_state());
    }

    /// Back to `Idle` with a fresh spacecraft; any state
    pub fn reset(&mut self) {
        self.update_effects(EffectSet::EMPTY);
        self.spacecraft.reset_to_initial();
        self.tick_count = 0;

        if self.config.mission.terrain_policy == TerrainPolicy::Regenerate {
            match self.generator.generate(&mut self.rng) {
                Ok(terrain) => self.terrain = terrain,
                Err(e) => log::warn!("Keeping previous terrain, regeneration failed: {e}"),
            }
        }

        self.transition(MissionState::Idle);
    }

    /// Current readout for the HUD
    pub fn snapshot(&self) -> Snapshot {
        let state = &self.spacecraft.state;
        Snapshot {
            fuel_kg: state.fuel_kg,
            velocity: state.linear_velocity,
            position: state.position,
            rotation: state.rotation,
            mission_state: self.state,
            altitude: self
                .terrain
                .height_at(state.position.x)
                .map(|ground| state.position.y - ground),
            tick: self.tick_count,
        }
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Emit edge events against the previous tick's effects
    fn update_effects(&mut self, current: EffectSet) {
        let previous = self.active_effects;
        self.events
            .extend(previous.difference(current).iter().map(GameEvent::EffectEnded));
        self.events
            .extend(current.difference(previous).iter().map(GameEvent::EffectBegan));
        self.active_effects = current;
    }

    fn transition(&mut self, next: MissionState) {
        if self.state == next {
            return;
        }
        log::info!("Mission {:?} -> {:?}", self.state, next);
        self.state = next;
        self.events.push(GameEvent::StateChanged(next));
    }
}
