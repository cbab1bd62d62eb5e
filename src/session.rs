//! Frame-driven round orchestration
//!
//! `Session` is what the platform's frame callback drives. It owns the round
//! state, takes one hand snapshot per frame from the mailbox, forwards
//! persistence work to background tasks and tells the caller when to stop
//! scheduling frames.

use crate::config::GameConfig;
use crate::highscores::{HighScoreStore, PersistenceResult};
use crate::platform::HandReceiver;
use crate::sim::{GameEvent, GameState, TickInput, autopilot_hands, tick};
use crate::ui::RoundSummary;

/// Whether the frame callback should be scheduled again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// One player's game: rounds, hands, high score
pub struct Session {
    config: GameConfig,
    state: GameState,
    hands: HandReceiver,
    high_scores: HighScoreStore,
    /// A round is being simulated; false before the first start and after game over
    active: bool,
    /// Synthesize hands instead of reading the tracker
    autopilot: bool,
    summary: Option<RoundSummary>,
}

impl Session {
    /// Create a session and kick off loading the stored high score
    pub fn new(
        config: GameConfig,
        seed: u64,
        hands: HandReceiver,
        high_scores: HighScoreStore,
    ) -> Self {
        let state = GameState::new(&config, seed);
        high_scores.request_load();
        Self {
            config,
            state,
            hands,
            high_scores,
            active: false,
            autopilot: false,
            summary: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Summary of the last finished round
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        if !enabled {
            // Synthetic hands must not linger until the tracker's next detection
            self.state.hands.clear();
        }
        log::info!("Autopilot: {}", enabled);
    }

    /// Reset the round and enter the countdown
    pub fn start_round(&mut self) {
        self.apply_persistence_results();
        self.state.restart(&self.config);
        self.summary = None;
        self.active = true;
        log::info!("Round started (high score {})", self.state.high_score);
    }

    /// Advance one frame. After `Stop`, frames are no-ops until `start_round`.
    pub fn frame(&mut self, now_ms: f64) -> FrameControl {
        self.apply_persistence_results();

        if !self.active {
            return FrameControl::Stop;
        }

        let hands = if self.autopilot {
            // Keep the mailbox drained so stale detections don't pile up
            self.hands.clear();
            Some(autopilot_hands(&self.state, &self.config))
        } else {
            self.hands.take()
        };
        let input = TickInput { hands, now_ms };

        for event in tick(&mut self.state, &input, &self.config) {
            match event {
                GameEvent::CountdownFinished => log::info!("Go!"),
                GameEvent::NewHighScore(score) => log::info!("Beating the record: {}s", score),
                GameEvent::Challenge(kind) => log::debug!("Challenge event: {:?}", kind),
                GameEvent::RoundOver {
                    score,
                    new_high_score,
                } => self.end_round(score, new_high_score),
            }
        }

        if self.active {
            FrameControl::Continue
        } else {
            FrameControl::Stop
        }
    }

    fn end_round(&mut self, score: u32, new_high_score: bool) {
        self.active = false;
        if new_high_score {
            self.high_scores.request_save(self.state.high_score);
        }
        let summary = RoundSummary::from_state(&self.state);
        log::info!("{} {}", summary.tier.headline(), summary.detail());
        debug_assert_eq!(summary.score, score);
        self.summary = Some(summary);
    }

    fn apply_persistence_results(&mut self) {
        for result in self.high_scores.poll() {
            match result {
                PersistenceResult::Loaded(score) => {
                    if score > self.state.high_score {
                        // The stored record outranks anything set this session
                        self.state.high_score = score;
                        self.state.is_new_high_score = false;
                    }
                }
                PersistenceResult::Saved(_) | PersistenceResult::SaveFailed { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::highscores::STORAGE_KEY;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::platform::hand_channel;
    use crate::sim::{GamePhase, Hand};
    use glam::Vec2;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some("3".to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "read only".to_string(),
            })
        }
    }

    /// Memory store that counts writes
    #[derive(Clone, Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }
    }

    fn session(memory: &MemoryStore) -> (Session, crate::platform::HandSender) {
        let (tx, rx) = hand_channel();
        let session = Session::new(
            GameConfig::default(),
            7,
            rx,
            HighScoreStore::new(memory.clone()),
        );
        (session, tx)
    }

    /// Run frames at 60 Hz until the session stops or `max` frames pass
    fn run(session: &mut Session, start_ms: f64, max: usize) -> (usize, f64) {
        let mut now = start_ms;
        for i in 0..max {
            now = start_ms + i as f64 * 1000.0 / 60.0;
            if session.frame(now) == FrameControl::Stop {
                return (i, now);
            }
        }
        (max, now)
    }

    #[test]
    fn test_frames_before_start_do_nothing() {
        let memory = MemoryStore::new();
        let (mut session, _tx) = session(&memory);
        assert_eq!(session.frame(0.0), FrameControl::Stop);
        assert_eq!(session.state().time_ticks, 0);
        assert_eq!(session.state().phase, GamePhase::Countdown);
    }

    #[test]
    fn test_round_runs_to_game_over_and_stops() {
        let memory = MemoryStore::new();
        let (mut session, _tx) = session(&memory);
        session.start_round();

        // No hands: the ball drops out a few seconds after the countdown
        let (frames, end_ms) = run(&mut session, 0.0, 1000);
        assert!(frames < 1000);
        assert!(!session.is_active());
        assert_eq!(session.state().phase, GamePhase::GameOver);

        // Orphaned frames don't touch the finished round
        let ticks = session.state().time_ticks;
        assert_eq!(session.frame(end_ms + 5000.0), FrameControl::Stop);
        assert_eq!(session.state().time_ticks, ticks);

        let summary = session.summary().unwrap();
        assert_eq!(summary.score, session.state().score);
    }

    #[test]
    fn test_new_high_score_is_saved() {
        let memory = MemoryStore::new();
        let (mut session, _tx) = session(&memory);
        session.start_round();
        run(&mut session, 0.0, 1000);

        let state = session.state();
        assert!(state.score >= 1);
        assert!(state.is_new_high_score);
        assert_eq!(
            memory.get(STORAGE_KEY),
            Ok(Some(state.high_score.to_string()))
        );
    }

    #[test]
    fn test_stored_high_score_loaded_on_first_frame() {
        let memory = MemoryStore::new();
        memory.set(STORAGE_KEY, "250").unwrap();
        let (mut session, _tx) = session(&memory);
        session.start_round();
        assert_eq!(session.state().high_score, 250);

        run(&mut session, 0.0, 1000);
        // Short round, record untouched
        assert!(!session.state().is_new_high_score);
        assert_eq!(memory.get(STORAGE_KEY), Ok(Some("250".to_string())));
        assert_eq!(
            session.summary().map(|s| s.high_score_line()),
            Some(Some("High Score: 250s".to_string()))
        );
    }

    #[test]
    fn test_failed_save_is_non_fatal() {
        let (tx, rx) = hand_channel();
        let mut session = Session::new(
            GameConfig::default(),
            1,
            rx,
            HighScoreStore::new(ReadOnlyStore),
        );
        drop(tx);
        session.start_round();
        assert_eq!(session.state().high_score, 3);

        // Survive long enough to beat 3 seconds, then let the ball drop
        session.set_autopilot(true);
        run(&mut session, 0.0, 60 * 8);
        session.set_autopilot(false);
        run(&mut session, 8000.0, 1000);

        assert_eq!(session.state().phase, GamePhase::GameOver);
        assert!(session.state().is_new_high_score);
        assert!(session.summary().is_some());
    }

    #[test]
    fn test_late_stored_record_outranks_live_high_score() {
        let store = CountingStore::default();
        let (_tx, rx) = hand_channel();
        let mut session = Session::new(
            GameConfig::default(),
            1,
            rx,
            HighScoreStore::new(store.clone()),
        );
        session.start_round();
        assert_eq!(session.state().high_score, 0);

        // Beat the empty record while the load is still "in flight"
        session.set_autopilot(true);
        run(&mut session, 0.0, 60 * 6);
        assert_eq!(session.state().phase, GamePhase::Running);
        assert!(session.state().is_new_high_score);
        let live = session.state().high_score;
        assert!(live >= 1);

        // The stored record arrives mid-round and is higher
        store.inner.set(STORAGE_KEY, "500").unwrap();
        session.high_scores.request_load();
        session.frame(6000.0);
        assert_eq!(session.state().high_score, 500);
        assert!(!session.state().is_new_high_score);

        session.set_autopilot(false);
        run(&mut session, 6000.0, 1000);
        assert_eq!(session.state().phase, GamePhase::GameOver);
        assert!(!session.state().is_new_high_score);
        assert_eq!(store.writes.get(), 0);
        assert_eq!(store.inner.get(STORAGE_KEY), Ok(Some("500".to_string())));
        assert_ne!(
            session.summary().map(|s| s.tier),
            Some(crate::ui::SummaryTier::NewHighScore)
        );
    }

    #[test]
    fn test_hands_taken_once_per_frame() {
        let memory = MemoryStore::new();
        let (mut session, tx) = session(&memory);
        session.start_round();

        tx.publish(vec![Hand::new(100.0, 400.0)]);
        session.frame(0.0);
        assert_eq!(session.state().hands, vec![Hand::new(100.0, 400.0)]);

        // Nothing new published: hands persist
        session.frame(16.0);
        assert_eq!(session.state().hands.len(), 1);

        tx.publish(Vec::new());
        session.frame(32.0);
        assert!(session.state().hands.is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let memory = MemoryStore::new();
        let (mut session, _tx) = session(&memory);
        session.start_round();
        run(&mut session, 0.0, 1000);
        assert!(!session.is_active());

        session.start_round();
        assert!(session.is_active());
        assert!(session.summary().is_none());
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.score, 0);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].pos, Vec2::new(320.0, 100.0));
        assert_eq!(session.frame(0.0), FrameControl::Continue);
    }
}
