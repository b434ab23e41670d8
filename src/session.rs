//! Session orchestration
//!
//! A [`Session`] owns one [`World`] plus the lifecycle phase around it. The
//! host drives it with `on_tick` once per frame and forwards player input;
//! everything observable comes back through listeners or snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Lane;
use crate::events::{GameEvent, SessionListener, dispatch};
use crate::input::{InputKind, LaneIntentDebouncer};
use crate::sim::{PowerUpKind, PowerUpTimer, World, step};
use crate::snapshot::{EntityInstance, Snapshot};
use crate::tuning::Tuning;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    #[default]
    Menu,
    Running,
    Paused,
    GameOver,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Menu => "menu",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::GameOver => "game over",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle command issued in a phase that does not accept it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {command} while in {phase}")]
    InvalidPhase {
        command: &'static str,
        phase: SessionPhase,
    },
}

pub struct Session {
    phase: SessionPhase,
    world: World,
    tuning: Tuning,
    debouncer: LaneIntentDebouncer,
    listeners: Vec<Box<dyn SessionListener>>,
    /// Frame time not yet consumed by a fixed step
    accumulator: f32,
    /// Events produced by the most recent tick
    events: Vec<GameEvent>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("world", &self.world)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// New session in the menu. Invalid tuning falls back to the defaults.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                debug_assert!(false, "invalid tuning: {e}");
                Tuning::default()
            }
        };
        log::info!("Session created (seed {})", seed);
        Self {
            phase: SessionPhase::Menu,
            world: World::new(seed, &tuning),
            tuning,
            debouncer: LaneIntentDebouncer::default(),
            listeners: Vec::new(),
            accumulator: 0.0,
            events: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn SessionListener>) {
        self.listeners.push(listener);
    }

    // --- Lifecycle ---

    fn expect_phase(
        &self,
        command: &'static str,
        allowed: &[SessionPhase],
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            log::warn!("Rejected '{}' while in {}", command, self.phase);
            Err(TransitionError::InvalidPhase {
                command,
                phase: self.phase,
            })
        }
    }

    fn reset_run(&mut self) {
        self.world.reset(&self.tuning);
        self.debouncer.reset();
        self.accumulator = 0.0;
        self.events.clear();
    }

    /// Menu → Running
    pub fn start_session(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("start", &[SessionPhase::Menu])?;
        self.reset_run();
        self.phase = SessionPhase::Running;
        log::info!("Session started");
        Ok(())
    }

    /// Running → Paused
    pub fn pause_session(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("pause", &[SessionPhase::Running])?;
        self.phase = SessionPhase::Paused;
        log::info!("Paused at distance {:.0}", self.world.distance);
        Ok(())
    }

    /// Paused → Running
    pub fn resume_session(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("resume", &[SessionPhase::Paused])?;
        self.phase = SessionPhase::Running;
        log::info!("Resumed");
        Ok(())
    }

    /// GameOver or Paused → fresh Running run
    pub fn restart_session(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("restart", &[SessionPhase::GameOver, SessionPhase::Paused])?;
        self.reset_run();
        self.phase = SessionPhase::Running;
        log::info!("Session restarted");
        Ok(())
    }

    /// GameOver or Paused → Menu
    pub fn return_to_menu(&mut self) -> Result<(), TransitionError> {
        self.expect_phase("return to menu", &[SessionPhase::GameOver, SessionPhase::Paused])?;
        self.reset_run();
        self.phase = SessionPhase::Menu;
        log::info!("Returned to menu");
        Ok(())
    }

    // --- Frame ---

    /// Advance by one frame of `dt` seconds.
    ///
    /// The frame is clamped to `max_frame_dt` and fed to an accumulator that
    /// the simulation drains in fixed `max_step_dt` steps, so the outcome
    /// depends only on total time, never on how the host slices it. Nothing
    /// advances in Menu or Paused. Returns the events produced, which were
    /// also forwarded to every listener.
    pub fn on_tick(&mut self, dt: f32) -> &[GameEvent] {
        self.events.clear();

        if !matches!(self.phase, SessionPhase::Running | SessionPhase::GameOver) {
            return &self.events;
        }
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Ignoring frame with dt {}", dt);
            return &self.events;
        }
        if dt > self.tuning.max_frame_dt {
            log::warn!("Frame dt {:.3}s clamped to {:.3}s", dt, self.tuning.max_frame_dt);
        }

        let step_dt = self.tuning.max_step_dt;
        self.accumulator += dt.min(self.tuning.max_frame_dt);
        while self.accumulator >= step_dt {
            self.accumulator -= step_dt;
            for event in step(&mut self.world, step_dt, &self.tuning) {
                if matches!(event, GameEvent::GameOver { .. }) {
                    self.phase = SessionPhase::GameOver;
                    self.debouncer.reset();
                }
                self.events.push(event);
            }
        }

        for listener in &mut self.listeners {
            for event in &self.events {
                dispatch(listener.as_mut(), event);
            }
        }
        &self.events
    }

    // --- Input ---

    /// Apply a discrete command. Returns whether the actor accepted it.
    pub fn on_directional_input(&mut self, input: InputKind) -> bool {
        if self.phase != SessionPhase::Running {
            log::debug!("Ignoring {:?} while in {}", input, self.phase);
            return false;
        }
        let actor = &mut self.world.actor;
        let accepted = match input {
            InputKind::Jump => actor.jump(&self.tuning),
            InputKind::RollOrCrouch => actor.roll(&self.tuning),
            InputKind::StrafeLeft => actor.strafe(-1),
            InputKind::StrafeRight => actor.strafe(1),
        };
        if matches!(input, InputKind::StrafeLeft | InputKind::StrafeRight) {
            self.debouncer.reset();
        }
        if !accepted {
            log::debug!("{:?} rejected in state {:?}", input, actor.state());
        }
        accepted
    }

    /// Continuous lane selection (gaze or pointer) held on `target_lane` for
    /// `sustained_seconds` since the previous call. Commits once held long
    /// enough. Returns whether the lane changed.
    pub fn on_lane_intent_continuous(&mut self, target_lane: u8, sustained_seconds: f32) -> bool {
        let Some(target) = Lane::new(target_lane) else {
            log::warn!("Ignoring lane intent for out-of-range lane {}", target_lane);
            debug_assert!(false, "lane index {target_lane} out of range");
            return false;
        };
        if self.phase != SessionPhase::Running {
            return false;
        }
        let current = self.world.actor.lane();
        match self
            .debouncer
            .signal(target, sustained_seconds, current, self.tuning.gaze_duration)
        {
            Some(lane) => {
                let moved = self.world.actor.set_lane(lane);
                if moved {
                    self.debouncer.reset();
                    log::debug!("Lane intent committed to {}", lane.index());
                }
                moved
            }
            None => false,
        }
    }

    // --- Views ---

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.world.score
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.world.distance
    }

    #[inline]
    pub fn difficulty_level(&self) -> u32 {
        self.world.difficulty_level()
    }

    #[inline]
    pub fn game_speed(&self) -> f32 {
        self.world.game_speed()
    }

    pub fn power_up(&self, kind: PowerUpKind) -> PowerUpTimer {
        self.world.power_ups.get(kind)
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent tick
    #[inline]
    pub fn last_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.phase, &self.world)
    }

    pub fn instances(&self) -> Vec<EntityInstance> {
        EntityInstance::collect(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::events::GameOverReason;
    use crate::sim::{ActorState, ObstacleKind};

    const FRAME: f32 = 1.0 / 60.0;

    /// Tuning with random spawning pushed far out so tests control the track
    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_spawn_timer: 1000.0,
            ..Tuning::default()
        }
    }

    fn running(tuning: Tuning) -> Session {
        let mut session = Session::new(tuning, 7);
        session.start_session().unwrap();
        session
    }

    #[derive(Default)]
    struct Log {
        lines: Vec<String>,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl SessionListener for Recorder {
        fn on_score_changed(&mut self, score: u64) {
            self.0.borrow_mut().lines.push(format!("score {score}"));
        }
        fn on_game_over(&mut self, reason: GameOverReason) {
            self.0.borrow_mut().lines.push(format!("over {reason}"));
        }
        fn on_death_sequence_finished(&mut self) {
            self.0.borrow_mut().lines.push("death".to_string());
        }
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut session = Session::new(Tuning::default(), 1);
        assert_eq!(session.phase(), SessionPhase::Menu);
        assert!(session.pause_session().is_err());
        assert!(session.resume_session().is_err());
        assert!(session.restart_session().is_err());

        session.start_session().unwrap();
        assert_eq!(
            session.start_session(),
            Err(TransitionError::InvalidPhase {
                command: "start",
                phase: SessionPhase::Running
            })
        );
        session.pause_session().unwrap();
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert!(session.pause_session().is_err());
        session.resume_session().unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.return_to_menu().is_err());
    }

    #[test]
    fn test_transition_error_message() {
        let err = TransitionError::InvalidPhase {
            command: "pause",
            phase: SessionPhase::Menu,
        };
        assert_eq!(err.to_string(), "cannot pause while in menu");
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut session = Session::new(Tuning::default(), 1);
        assert!(session.on_tick(0.1).is_empty());
        assert_eq!(session.distance(), 0.0);
    }

    #[test]
    fn test_pause_accrues_nothing() {
        let mut session = running(Tuning::default());
        for _ in 0..30 {
            session.on_tick(FRAME);
        }
        session.pause_session().unwrap();
        let before = serde_json::to_string(&session.snapshot()).unwrap();
        let steps = session.world().time_steps;
        for _ in 0..100 {
            assert!(session.on_tick(FRAME).is_empty());
        }
        session.resume_session().unwrap();
        let after = serde_json::to_string(&session.snapshot()).unwrap();
        assert_eq!(before.replace("Paused", "Running"), after);
        assert_eq!(session.world().time_steps, steps);
    }

    #[test]
    fn test_barrier_in_lane_ends_run() {
        let mut session = running(quiet_tuning());
        let spawn_z = session.tuning().spawn_z;
        session.world.spawner.spawn_obstacle(
            Lane::CENTER,
            ObstacleKind::Barrier,
            spawn_z,
            &session.tuning,
        );
        let recorder = Rc::new(RefCell::new(Log::default()));
        session.add_listener(Box::new(Recorder(recorder.clone())));

        let limit = (-spawn_z / 12.0 / FRAME) as usize + 60;
        for _ in 0..limit {
            session.on_tick(FRAME);
            if session.phase() == SessionPhase::GameOver {
                break;
            }
        }
        assert_eq!(session.phase(), SessionPhase::GameOver);
        let summary = session.snapshot().summary.unwrap();
        assert_eq!(summary.reason.to_string(), "obstacle collision");
        assert_eq!(
            summary.reason,
            GameOverReason::ObstacleCollision {
                kind: ObstacleKind::Barrier
            }
        );
        assert!(recorder.borrow().lines.contains(&"over obstacle collision".to_string()));

        // Input is ignored after death; the death sequence still completes
        assert!(!session.on_directional_input(InputKind::Jump));
        for _ in 0..120 {
            session.on_tick(FRAME);
        }
        assert_eq!(session.world().actor.state(), ActorState::Dead);
        assert!(recorder.borrow().lines.contains(&"death".to_string()));
    }

    #[test]
    fn test_roll_under_barrier_survives() {
        let mut session = running(quiet_tuning());
        session
            .world
            .spawner
            .spawn_obstacle(Lane::CENTER, ObstacleKind::Barrier, -6.0, &session.tuning);
        assert!(session.on_directional_input(InputKind::RollOrCrouch));
        // 6 units at speed 12 takes 0.5s, well inside the 0.7s roll
        for _ in 0..45 {
            session.on_tick(FRAME);
        }
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_return_to_menu_resets_run() {
        let fresh = Session::new(quiet_tuning(), 7).snapshot();
        let mut session = running(quiet_tuning());
        session
            .world
            .spawner
            .spawn_obstacle(Lane::CENTER, ObstacleKind::Wall, -1.0, &session.tuning);
        session.world.spawner.spawn_coin_run(Lane::LEFT, -30.0, &session.tuning);
        session.on_tick(FRAME * 10.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        session.return_to_menu().unwrap();
        let once = serde_json::to_string(&session.snapshot()).unwrap();
        session.start_session().unwrap();
        session.pause_session().unwrap();
        session.return_to_menu().unwrap();
        let twice = serde_json::to_string(&session.snapshot()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, serde_json::to_string(&fresh).unwrap());
        assert_eq!(session.score(), 0);
        assert_eq!(session.difficulty_level(), 1);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = running(quiet_tuning());
        session
            .world
            .spawner
            .spawn_obstacle(Lane::CENTER, ObstacleKind::Barrel, -0.5, &session.tuning);
        session.on_tick(0.1);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(session.last_events().iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        session.restart_session().unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.distance(), 0.0);
        assert_eq!(session.world().actor.state(), ActorState::Running);
        assert_eq!(session.world().spawner.live_count(), 0);
    }

    /// Binary-exact step so accumulator arithmetic has no rounding
    const STEP_64: f32 = 1.0 / 64.0;

    fn binary_tuning(base: Tuning) -> Tuning {
        Tuning {
            max_step_dt: STEP_64,
            ..base
        }
    }

    #[test]
    fn test_large_frame_is_clamped_and_substepped() {
        let mut session = running(binary_tuning(quiet_tuning()));
        session.on_tick(10.0);
        assert_eq!(session.world().time_steps, 16);
        assert!((session.distance() - 12.0 * 0.25).abs() < 1e-3);

        session.on_tick(f32::NAN);
        session.on_tick(-1.0);
        session.on_tick(0.0);
        assert_eq!(session.world().time_steps, 16);
    }

    #[test]
    fn test_short_frames_carry_over() {
        let mut session = running(binary_tuning(quiet_tuning()));
        session.on_tick(STEP_64 / 2.0);
        assert_eq!(session.world().time_steps, 0);
        session.on_tick(STEP_64 / 2.0);
        assert_eq!(session.world().time_steps, 1);
    }

    #[test]
    fn test_frame_slicing_does_not_change_outcome() {
        let run = |frames: &[f32]| {
            let mut session = running(binary_tuning(Tuning::default()));
            session.world.power_ups.activate(PowerUpKind::Magnet, 15.0);
            for _ in 0..(1280 / (frames.iter().sum::<f32>() / STEP_64) as usize) {
                for &frame in frames {
                    session.on_tick(frame);
                }
            }
            (
                session.world().time_steps,
                serde_json::to_string(&session.snapshot()).unwrap(),
            )
        };

        let steady = run(&[STEP_64]);
        let jittery = run(&[STEP_64 / 2.0, STEP_64 * 1.5]);
        let bursty = run(&[STEP_64 * 3.0, STEP_64]);
        assert!(steady.0 > 0);
        assert_eq!(steady, jittery);
        assert_eq!(steady, bursty);
    }

    #[test]
    fn test_directional_input_only_while_running() {
        let mut session = Session::new(Tuning::default(), 1);
        assert!(!session.on_directional_input(InputKind::StrafeLeft));
        session.start_session().unwrap();
        assert!(session.on_directional_input(InputKind::StrafeLeft));
        assert_eq!(session.world().actor.lane(), Lane::LEFT);
        assert!(!session.on_directional_input(InputKind::StrafeLeft));
        assert!(session.on_directional_input(InputKind::Jump));
        assert!(!session.on_directional_input(InputKind::RollOrCrouch));
    }

    #[test]
    fn test_lane_intent_blip_never_moves() {
        let mut session = running(quiet_tuning());
        assert!(!session.on_lane_intent_continuous(2, 0.3));
        assert!(!session.on_lane_intent_continuous(1, 0.1));
        assert!(!session.on_lane_intent_continuous(2, 0.3));
        assert_eq!(session.world().actor.lane(), Lane::CENTER);

        assert!(session.on_lane_intent_continuous(2, 0.3));
        assert_eq!(session.world().actor.lane(), Lane::RIGHT);
    }

    #[test]
    fn test_lane_intent_held_through_jump_commits_on_landing() {
        let mut session = running(quiet_tuning());
        assert!(session.on_directional_input(InputKind::Jump));

        let mut committed_at = None;
        for frame in 0..90 {
            if session.on_lane_intent_continuous(2, FRAME) {
                committed_at = Some(frame);
                break;
            }
            session.on_tick(FRAME);
        }
        // Airtime is 2 * 25 / 70 = 0.71s, about 43 frames
        let frame = committed_at.expect("intent should commit after landing");
        assert!((42..=46).contains(&frame), "committed at frame {frame}");
        assert_eq!(session.world().actor.lane(), Lane::RIGHT);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_invalid_lane_intent_asserts_in_debug() {
        let mut session = running(Tuning::default());
        session.on_lane_intent_continuous(3, 1.0);
    }
}
