//! Fixed-timestep host loop
//!
//! Converts variable frame deltas into whole simulation ticks. Frame time is
//! accumulated and consumed in `dt` slices. A single frame runs at most
//! `max_substeps` ticks; whatever is left beyond that is dropped so a slow
//! host cannot fall further and further behind.

use crate::config::LanderConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::hud::Presenter;
use crate::sim::{GameEvent, MissionController, TickInput};

/// Drives a [`MissionController`] from wall-clock frame deltas
#[derive(Debug, Clone)]
pub struct FixedStepRunner {
    dt: f32,
    hud_interval: u64,
    max_substeps: u32,
    max_frame_dt: f32,
    accumulator: f32,
    /// Ticks discarded by the substep cap
    dropped_ticks: u64,
}

impl FixedStepRunner {
    pub fn new(config: &LanderConfig) -> Self {
        Self {
            dt: config.physics.dt,
            hud_interval: config.mission.hud_interval.max(1),
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            accumulator: 0.0,
            dropped_ticks: 0,
        }
    }

    /// Override the per-frame limits
    pub fn with_limits(mut self, max_substeps: u32, max_frame_dt: f32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self.max_frame_dt = max_frame_dt;
        self
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    /// Time banked toward the next tick
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Run the ticks owed for one frame and forward the output.
    ///
    /// Returns how many ticks ran.
    pub fn frame(
        &mut self,
        mission: &mut MissionController,
        input: &TickInput,
        frame_dt: f32,
        presenter: &mut impl Presenter,
    ) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_dt);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            let before = mission.tick_count();
            mission.tick(input);
            self.accumulator -= self.dt;
            substeps += 1;

            let ticked = mission.tick_count() != before;
            let hud_due = ticked && mission.tick_count() % self.hud_interval == 0;
            self.forward(mission, presenter, hud_due);
        }

        if self.accumulator >= self.dt {
            let excess = (self.accumulator / self.dt).floor();
            self.dropped_ticks += excess as u64;
            self.accumulator = (self.accumulator - excess * self.dt).max(0.0);
            log::debug!("Frame over budget, dropped {excess} ticks");
        }

        substeps
    }

    /// Forward pending events, e.g. after `start()` or `reset()` outside a frame
    pub fn flush(&mut self, mission: &mut MissionController, presenter: &mut impl Presenter) {
        self.forward(mission, presenter, false);
    }

    /// Forget banked time, e.g. when resuming from a pause
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }

    fn forward(
        &self,
        mission: &mut MissionController,
        presenter: &mut impl Presenter,
        hud_due: bool,
    ) {
        let events = mission.drain_events();
        for event in &events {
            presenter.on_event(event);
        }
        let state_changed = events
            .iter()
            .any(|e| matches!(e, GameEvent::StateChanged(_)));
        if hud_due || state_changed {
            presenter.on_snapshot(&mission.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{EffectKind, MissionState, Snapshot, Terrain};
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        events: Vec<GameEvent>,
        snapshots: Vec<Snapshot>,
    }

    impl Presenter for Recorder {
        fn on_event(&mut self, event: &GameEvent) {
            self.events.push(*event);
        }

        fn on_snapshot(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(snapshot.clone());
        }
    }

    fn mission() -> MissionController {
        let mut config = LanderConfig::default();
        config.craft.initial_position = Vec2::new(500.0, 1000.0);
        config.craft.initial_velocity = Vec2::ZERO;
        let terrain = Terrain::from_heights(1920.0, &[0.0; 31], &[3, 10, 17, 24], -900.0).unwrap();
        MissionController::with_terrain(config, terrain).unwrap()
    }

    #[test]
    fn test_one_tick_per_sim_frame() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config());
        let mut presenter = Recorder::default();
        mission.start();

        let idle = TickInput::default();
        for _ in 0..10 {
            assert_eq!(runner.frame(&mut mission, &idle, SIM_DT, &mut presenter), 1);
        }
        assert_eq!(mission.tick_count(), 10);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config());
        let mut presenter = Recorder::default();
        mission.start();

        let idle = TickInput::default();
        assert_eq!(runner.frame(&mut mission, &idle, SIM_DT * 0.5, &mut presenter), 0);
        assert_eq!(runner.frame(&mut mission, &idle, SIM_DT * 0.6, &mut presenter), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config()).with_limits(8, 1.0);
        let mut presenter = Recorder::default();
        mission.start();

        let ticks = runner.frame(&mut mission, &TickInput::default(), 1.0, &mut presenter);
        assert_eq!(ticks, 8);
        assert_eq!(mission.tick_count(), 8);
        assert!(runner.dropped_ticks() >= 50);
        assert!(runner.accumulator() < runner.dt());
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config());
        let mut presenter = Recorder::default();
        mission.start();

        let ticks = runner.frame(&mut mission, &TickInput::default(), 5.0, &mut presenter);
        assert!(ticks <= 6);
        assert_eq!(runner.dropped_ticks(), 0);
    }

    #[test]
    fn test_snapshots_on_interval_and_state_change() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config());
        let mut presenter = Recorder::default();

        mission.start();
        runner.flush(&mut mission, &mut presenter);
        assert_eq!(presenter.snapshots.len(), 1);
        assert_eq!(presenter.snapshots[0].mission_state, MissionState::Running);

        for _ in 0..20 {
            runner.frame(&mut mission, &TickInput::default(), SIM_DT, &mut presenter);
        }
        let ticks: Vec<u64> = presenter.snapshots.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 5, 10, 15, 20]);
    }

    #[test]
    fn test_events_are_forwarded() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config());
        let mut presenter = Recorder::default();
        mission.start();

        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        runner.frame(&mut mission, &thrust, SIM_DT, &mut presenter);
        assert_eq!(
            presenter.events,
            vec![
                GameEvent::StateChanged(MissionState::Running),
                GameEvent::EffectBegan(EffectKind::Thrust),
            ]
        );
    }

    #[test]
    fn test_idle_mission_does_not_advance() {
        let mut mission = mission();
        let mut runner = FixedStepRunner::new(mission.config());
        let mut presenter = Recorder::default();

        for _ in 0..10 {
            runner.frame(&mut mission, &TickInput::default(), SIM_DT, &mut presenter);
        }
        assert_eq!(mission.tick_count(), 0);
        assert!(presenter.snapshots.is_empty());
        assert!(presenter.events.is_empty());
    }
}
