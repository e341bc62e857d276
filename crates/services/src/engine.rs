//! Intent-driven facade over the quiz engine.
//!
//! `QuizEngine` owns the bank, the scoreboard, the timer configuration and
//! the active session. `EngineHandle` is the shared entry point the
//! presentation layer talks to: every mutation runs synchronously under one
//! lock, then change notifications are emitted to subscribers ("mutate, then
//! emit"). The one-second ticker is a `TimerHandle` owned by the engine and
//! cancelled on every path that ends or restarts a session; an epoch counter
//! keeps a stale tick from ever completing a newer session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use quiz_core::Clock;
use quiz_core::model::{
    Answer, ChoiceKey, Question, QuestionBank, QuestionDraft, QuestionId, TimerSettings,
};

use crate::error::EngineError;
use crate::sessions::{HighScores, QuestionOutcome, ScoreSummary, SessionProgress, SessionService};
use crate::timer::{Countdown, TickControl, TickOutcome, TimerHandle};

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Change notification emitted after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A bank edit went through (create, update or delete).
    BankChanged,
    /// Timer configuration changed; takes effect at the next start.
    SettingsChanged,
    /// Session state moved: navigation, answer selection, start or restart.
    SessionChanged,
    /// The armed countdown lost one second.
    TimerTick { remaining_secs: u32 },
    /// The session finished, by intent, by advancing past the last question
    /// or by timer expiry. Emitted exactly once per session.
    SessionCompleted { score: u32, total: u32 },
}

type Subscriber = Arc<dyn Fn(EngineEvent) + Send + Sync>;
type Subscribers = Arc<Mutex<Vec<Subscriber>>>;

//
// ─── ENGINE STATE ──────────────────────────────────────────────────────────────
//

struct QuizEngine {
    bank: QuestionBank,
    timer_settings: TimerSettings,
    high_scores: HighScores,
    session: Option<SessionService>,
    countdown: Countdown,
    ticker: Option<TimerHandle>,
    timer_epoch: u64,
    clock: Clock,
}

impl QuizEngine {
    fn new(bank: QuestionBank, clock: Clock) -> Self {
        Self {
            bank,
            timer_settings: TimerSettings::default(),
            high_scores: HighScores::new(),
            session: None,
            countdown: Countdown::default(),
            ticker: None,
            timer_epoch: 0,
            clock,
        }
    }

    /// Snapshot the bank into a fresh session. Returns the countdown length
    /// to arm, if any.
    fn start_session(&mut self) -> (Vec<EngineEvent>, Option<u32>) {
        // Dropping the handle aborts a ticker left over from a previous run.
        self.ticker.take();
        self.countdown.disarm();
        self.timer_epoch += 1;

        let session = SessionService::start(self.bank.questions().to_vec(), self.clock.now());
        let mut events = vec![EngineEvent::SessionChanged];
        let mut arm = None;

        if session.is_complete() {
            // Empty bank: the session degrades to a completed 0/0 run.
            let score = session.score().unwrap_or(0);
            self.high_scores.record(session.total_questions(), score);
            events.push(EngineEvent::SessionCompleted {
                score,
                total: total_u32(&session),
            });
        } else if self.timer_settings.enabled() {
            let duration = self.timer_settings.duration_secs();
            self.countdown.arm(duration);
            arm = Some(duration);
        }

        self.session = Some(session);
        (events, arm)
    }

    fn finish_session(&mut self) -> Vec<EngineEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.is_complete() {
            return Vec::new();
        }

        let score = session.finish(self.clock.now());
        let total = total_u32(session);
        self.high_scores.record(session.total_questions(), score);
        self.countdown.disarm();
        self.ticker.take();
        vec![
            EngineEvent::SessionChanged,
            EngineEvent::SessionCompleted { score, total },
        ]
    }

    fn select_choice(&mut self, question_id: QuestionId, key: ChoiceKey) -> Vec<EngineEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.select_choice(question_id, key) {
            vec![EngineEvent::SessionChanged]
        } else {
            Vec::new()
        }
    }

    fn next(&mut self) -> Vec<EngineEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.current_index() + 1 < session.total_questions() {
            session.next(self.clock.now());
            vec![EngineEvent::SessionChanged]
        } else {
            self.finish_session()
        }
    }

    fn previous(&mut self) -> Vec<EngineEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.previous() {
            vec![EngineEvent::SessionChanged]
        } else {
            Vec::new()
        }
    }

    fn on_tick(&mut self, epoch: u64) -> (Vec<EngineEvent>, TickControl) {
        if epoch != self.timer_epoch {
            // A tick scheduled for a session that has already moved on.
            return (Vec::new(), TickControl::Stop);
        }
        match self.countdown.tick() {
            TickOutcome::Noop => (Vec::new(), TickControl::Stop),
            TickOutcome::Running { remaining_secs } => (
                vec![EngineEvent::TimerTick { remaining_secs }],
                TickControl::Continue,
            ),
            TickOutcome::Expired => {
                let mut events = vec![EngineEvent::TimerTick { remaining_secs: 0 }];
                events.extend(self.finish_session());
                (events, TickControl::Stop)
            }
        }
    }
}

fn total_u32(session: &SessionService) -> u32 {
    u32::try_from(session.total_questions()).unwrap_or(u32::MAX)
}

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Shared, cloneable handle to the engine.
///
/// All intents are synchronous; subscribers are invoked after the engine lock
/// is released, so a subscriber may call back into the handle.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Arc<Mutex<QuizEngine>>,
    subscribers: Subscribers,
}

impl EngineHandle {
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_clock(bank, Clock::default_clock())
    }

    #[must_use]
    pub fn with_clock(bank: QuestionBank, clock: Clock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QuizEngine::new(bank, clock))),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a change-notification callback.
    pub fn subscribe(&self, subscriber: impl Fn(EngineEvent) + Send + Sync + 'static) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(subscriber));
    }

    fn lock(&self) -> MutexGuard<'_, QuizEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(subscribers: &Subscribers, events: &[EngineEvent]) {
        if events.is_empty() {
            return;
        }
        // Snapshot the list so no lock is held while callbacks run; a
        // subscriber may call back into the handle or subscribe again.
        let subs: Vec<Subscriber> = subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for event in events {
            for subscriber in &subs {
                subscriber(*event);
            }
        }
    }

    fn emit(&self, events: &[EngineEvent]) {
        Self::notify(&self.subscribers, events);
    }

    //
    // ── Intents ────────────────────────────────────────────────────────────
    //

    /// Start (or restart) a session over the current bank.
    ///
    /// Arms the countdown and spawns the ticker when the timer is enabled,
    /// which requires a tokio runtime; with the timer disabled no task is
    /// spawned.
    pub fn start_session(&self) {
        let events = {
            let mut engine = self.lock();
            let (events, arm) = engine.start_session();
            if arm.is_some() {
                let epoch = engine.timer_epoch;
                let weak = Arc::downgrade(&self.inner);
                let subscribers = Arc::clone(&self.subscribers);
                engine.ticker = Some(TimerHandle::spawn(move || {
                    Self::tick(&weak, &subscribers, epoch)
                }));
            }
            events
        };
        self.emit(&events);
    }

    /// Restart is a fresh session over the same bank.
    pub fn restart(&self) {
        self.start_session();
    }

    fn tick(weak: &Weak<Mutex<QuizEngine>>, subscribers: &Subscribers, epoch: u64) -> TickControl {
        let Some(inner) = weak.upgrade() else {
            return TickControl::Stop;
        };
        let (events, control) = {
            let mut engine = inner.lock().unwrap_or_else(PoisonError::into_inner);
            engine.on_tick(epoch)
        };
        Self::notify(subscribers, &events);
        control
    }

    pub fn select_choice(&self, question_id: QuestionId, key: ChoiceKey) {
        let events = self.lock().select_choice(question_id, key);
        self.emit(&events);
    }

    pub fn next(&self) {
        let events = self.lock().next();
        self.emit(&events);
    }

    pub fn previous(&self) {
        let events = self.lock().previous();
        self.emit(&events);
    }

    pub fn finish(&self) {
        let events = self.lock().finish_session();
        self.emit(&events);
    }

    /// Toggle the countdown for future sessions. An already-armed countdown
    /// keeps running; the toggle is read again at the next start.
    pub fn set_timer_enabled(&self, enabled: bool) {
        {
            let mut engine = self.lock();
            engine.timer_settings.set_enabled(enabled);
        }
        self.emit(&[EngineEvent::SettingsChanged]);
    }

    /// Reconfigure the countdown length in whole minutes (minimum 1).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::TimerArmed` while a countdown is in flight and
    /// `EngineError::Timer` for a zero-minute duration.
    pub fn set_timer_duration_mins(&self, minutes: u32) -> Result<(), EngineError> {
        {
            let mut engine = self.lock();
            if engine.countdown.is_armed() {
                return Err(EngineError::TimerArmed);
            }
            engine.timer_settings.set_duration_mins(minutes)?;
        }
        self.emit(&[EngineEvent::SettingsChanged]);
        Ok(())
    }

    //
    // ── Bank editing ───────────────────────────────────────────────────────
    //

    /// Validate a draft and append it to the bank.
    ///
    /// The active session keeps its snapshot; edits apply from the next
    /// start.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Bank` when validation rejects the draft.
    pub fn create_question(&self, draft: QuestionDraft) -> Result<QuestionId, EngineError> {
        let id = self.lock().bank.create(draft)?;
        self.emit(&[EngineEvent::BankChanged]);
        Ok(id)
    }

    /// Replace a bank entry in place, preserving its id and position.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Bank` for an unknown id or a rejected draft.
    pub fn update_question(&self, id: QuestionId, draft: QuestionDraft) -> Result<(), EngineError> {
        self.lock().bank.update(id, draft)?;
        self.emit(&[EngineEvent::BankChanged]);
        Ok(())
    }

    /// Remove a bank entry, keeping the remaining order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Bank` for an unknown id.
    pub fn delete_question(&self, id: QuestionId) -> Result<(), EngineError> {
        self.lock().bank.delete(id)?;
        self.emit(&[EngineEvent::BankChanged]);
        Ok(())
    }

    //
    // ── Read accessors ─────────────────────────────────────────────────────
    //

    /// Full bank listing, for the editor.
    #[must_use]
    pub fn questions(&self) -> Vec<Question> {
        self.lock().bank.questions().to_vec()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<Question> {
        self.lock().bank.get(id).cloned()
    }

    #[must_use]
    pub fn timer_settings(&self) -> TimerSettings {
        self.lock().timer_settings
    }

    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.lock()
            .session
            .as_ref()
            .and_then(|session| session.current_question().cloned())
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<Answer> {
        self.lock()
            .session
            .as_ref()
            .and_then(|session| session.answer_for(id).cloned())
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.lock().session.as_ref().map(SessionService::progress)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock()
            .session
            .as_ref()
            .is_some_and(SessionService::is_complete)
    }

    /// Final score next to the high-water mark, once the session completed.
    #[must_use]
    pub fn score_summary(&self) -> Option<ScoreSummary> {
        let engine = self.lock();
        let session = engine.session.as_ref()?;
        let score = session.score()?;
        Some(ScoreSummary {
            score,
            total: total_u32(session),
            highest: engine.high_scores.best(session.total_questions()),
        })
    }

    #[must_use]
    pub fn breakdown(&self) -> Vec<QuestionOutcome> {
        self.lock()
            .session
            .as_ref()
            .map(SessionService::breakdown)
            .unwrap_or_default()
    }

    /// Best score observed for sessions over the current bank size.
    #[must_use]
    pub fn highest_score(&self) -> u32 {
        let engine = self.lock();
        let len = engine
            .session
            .as_ref()
            .map_or(engine.bank.len(), SessionService::total_questions);
        engine.high_scores.best(len)
    }

    /// Seconds left on the countdown, `None` while no timer is armed.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.lock().countdown.remaining_secs()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
