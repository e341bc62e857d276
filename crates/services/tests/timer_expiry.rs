use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::model::{Answer, Choice, QuestionBank, QuestionDraft, QuestionType};
use quiz_core::time::fixed_clock;
use services::{EngineEvent, EngineHandle};

fn bank() -> QuestionBank {
    QuestionBank::seed([
        QuestionDraft {
            kind: QuestionType::TrueFalse,
            prompt: "one".to_string(),
            choices: vec![Choice::new("A", "True"), Choice::new("B", "False")],
            answer: Answer::single("A"),
        },
        QuestionDraft {
            kind: QuestionType::TrueFalse,
            prompt: "two".to_string(),
            choices: vec![Choice::new("A", "True"), Choice::new("B", "False")],
            answer: Answer::single("B"),
        },
    ])
    .unwrap()
}

fn timed_engine() -> (EngineHandle, Arc<Mutex<u32>>) {
    let engine = EngineHandle::with_clock(bank(), fixed_clock());
    engine.set_timer_enabled(true);
    engine.set_timer_duration_mins(1).unwrap();

    let completions = Arc::new(Mutex::new(0_u32));
    let seen = Arc::clone(&completions);
    engine.subscribe(move |event| {
        if matches!(event, EngineEvent::SessionCompleted { .. }) {
            *seen.lock().unwrap() += 1;
        }
    });
    (engine, completions)
}

async fn advance_secs(secs: u32) {
    // Let a freshly spawned ticker register its interval before the clock
    // moves, otherwise the first tick lands a second late.
    tokio::task::yield_now().await;
    for _ in 0..secs {
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn expiry_forces_completion_exactly_once() {
    let (engine, completions) = timed_engine();

    engine.start_session();
    assert_eq!(engine.remaining_secs(), Some(60));

    advance_secs(59).await;
    assert!(!engine.is_complete());
    assert_eq!(engine.remaining_secs(), Some(1));

    advance_secs(1).await;
    assert!(engine.is_complete());
    assert_eq!(engine.score_summary().unwrap().score, 0);

    // Ticks delivered after expiry are no-ops.
    advance_secs(30).await;
    assert_eq!(*completions.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn manual_finish_disarms_the_countdown() {
    let (engine, completions) = timed_engine();

    engine.start_session();
    advance_secs(10).await;
    engine.finish();
    assert_eq!(engine.remaining_secs(), None);

    advance_secs(120).await;
    assert_eq!(*completions.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_rearms_and_drops_the_stale_ticker() {
    let (engine, completions) = timed_engine();

    engine.start_session();
    advance_secs(40).await;
    assert_eq!(engine.remaining_secs(), Some(20));

    // Restarting re-seeds the countdown; the first session's ticker must not
    // be able to expire the new one.
    engine.restart();
    assert_eq!(engine.remaining_secs(), Some(60));

    advance_secs(30).await;
    assert!(!engine.is_complete());
    assert_eq!(*completions.lock().unwrap(), 0);

    advance_secs(30).await;
    assert!(engine.is_complete());
    assert_eq!(*completions.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn disabling_mid_session_only_affects_the_next_start() {
    let (engine, completions) = timed_engine();

    engine.start_session();
    advance_secs(5).await;
    engine.set_timer_enabled(false);

    // The in-flight countdown keeps running.
    advance_secs(55).await;
    assert!(engine.is_complete());
    assert_eq!(*completions.lock().unwrap(), 1);

    // The next session starts without a timer.
    engine.restart();
    assert_eq!(engine.remaining_secs(), None);
    advance_secs(120).await;
    assert!(!engine.is_complete());
}
