//! Presentation seam
//!
//! The simulation never talks to a display. Hosts implement [`Presenter`] and
//! receive events after every tick plus periodic snapshots. The helpers here
//! format those into the game's HUD strings.

use crate::sim::{GameEvent, MissionOutcome, MissionState, Snapshot};

/// World units per displayed meter for speed readouts
const SPEED_DISPLAY_SCALE: f32 = 10.0;

/// Receives simulation output
pub trait Presenter {
    fn on_event(&mut self, event: &GameEvent);
    fn on_snapshot(&mut self, snapshot: &Snapshot);
}

/// HUD labels derived from a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudReadout {
    pub fuel: String,
    pub horizontal_speed: String,
    pub vertical_speed: String,
}

impl HudReadout {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        // Truncate toward zero like an integer cast
        let horizontal = (snapshot.velocity.x / SPEED_DISPLAY_SCALE).abs() as i32;
        let vertical = (snapshot.velocity.y / SPEED_DISPLAY_SCALE) as i32;
        Self {
            fuel: format!("Fuel: {} kg", snapshot.fuel_kg),
            horizontal_speed: format!("H. Speed: {horizontal} m/s"),
            vertical_speed: format!("V. Speed: {vertical} m/s"),
        }
    }
}

/// Status line for a state, `None` while flying
pub fn status_text(state: MissionState, outcome: Option<MissionOutcome>) -> Option<&'static str> {
    match state {
        MissionState::Idle => Some("Press Space to Start"),
        MissionState::Running => None,
        MissionState::Paused => Some("PAUSED"),
        MissionState::Landed => Some("Successfully landed!"),
        MissionState::Crashed => Some(match outcome {
            Some(MissionOutcome::Missed) => "You missed the target! Press R to try again!",
            _ => "Maybe go a little slower next time\n Press R to try again!",
        }),
    }
}

/// Writes HUD lines and events through the `log` facade
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_outcome: Option<MissionOutcome>,
    last_status: Option<&'static str>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome of the most recent contact since the last reset
    pub fn last_outcome(&self) -> Option<MissionOutcome> {
        self.last_outcome
    }
}

impl Presenter for LogPresenter {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EffectBegan(kind) => log::debug!("{kind:?} on"),
            GameEvent::EffectEnded(kind) => log::debug!("{kind:?} off"),
            GameEvent::ContactOccurred(outcome) => {
                self.last_outcome = Some(*outcome);
                log::info!("Contact: {outcome:?}");
            }
            GameEvent::StateChanged(MissionState::Idle) => self.last_outcome = None,
            GameEvent::StateChanged(_) => {}
        }
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let hud = HudReadout::from_snapshot(snapshot);
        let altitude = snapshot
            .altitude
            .map_or_else(|| "-".to_string(), |a| format!("{a:.0}"));
        log::info!(
            "[{:>5}] {} | {} | {} | alt {}",
            snapshot.tick,
            hud.fuel,
            hud.horizontal_speed,
            hud.vertical_speed,
            altitude
        );

        let status = status_text(snapshot.mission_state, self.last_outcome);
        if status != self.last_status {
            if let Some(text) = status {
                log::info!("{}", text.replace('\n', ""));
            }
            self.last_status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn snapshot(velocity: Vec2, fuel_kg: i32) -> Snapshot {
        Snapshot {
            fuel_kg,
            velocity,
            position: Vec2::new(480.0, 1440.0),
            rotation: 0.0,
            mission_state: MissionState::Running,
            altitude: Some(900.0),
            tick: 0,
        }
    }

    #[test]
    fn test_initial_readout() {
        let hud = HudReadout::from_snapshot(&snapshot(Vec2::new(300.0, 0.0), 3500));
        assert_eq!(hud.fuel, "Fuel: 3500 kg");
        assert_eq!(hud.horizontal_speed, "H. Speed: 30 m/s");
        assert_eq!(hud.vertical_speed, "V. Speed: 0 m/s");
    }

    #[test]
    fn test_speeds_truncate() {
        let hud = HudReadout::from_snapshot(&snapshot(Vec2::new(-57.9, -129.9), 12));
        assert_eq!(hud.horizontal_speed, "H. Speed: 5 m/s");
        assert_eq!(hud.vertical_speed, "V. Speed: -12 m/s");
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(MissionState::Idle, None), Some("Press Space to Start"));
        assert_eq!(status_text(MissionState::Running, None), None);
        assert_eq!(status_text(MissionState::Paused, None), Some("PAUSED"));
        assert_eq!(
            status_text(MissionState::Landed, Some(MissionOutcome::Landed)),
            Some("Successfully landed!")
        );
        assert!(
            status_text(MissionState::Crashed, Some(MissionOutcome::Missed))
                .unwrap()
                .starts_with("You missed")
        );
        assert!(
            status_text(MissionState::Crashed, Some(MissionOutcome::Crash))
                .unwrap()
                .starts_with("Maybe go a little slower")
        );
    }

    #[test]
    fn test_log_presenter_tracks_outcome() {
        let mut presenter = LogPresenter::new();
        presenter.on_event(&GameEvent::ContactOccurred(MissionOutcome::Missed));
        assert_eq!(presenter.last_outcome(), Some(MissionOutcome::Missed));
        presenter.on_event(&GameEvent::StateChanged(MissionState::Idle));
        assert_eq!(presenter.last_outcome(), None);
    }
}
