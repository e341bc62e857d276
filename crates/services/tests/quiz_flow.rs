use quiz_core::model::{
    Answer, Choice, QuestionBank, QuestionDraft, QuestionId, QuestionType,
    QuestionValidationError,
};
use quiz_core::time::fixed_clock;
use services::{EngineError, EngineHandle};

fn true_false_bank() -> QuestionBank {
    QuestionBank::seed([QuestionDraft {
        kind: QuestionType::TrueFalse,
        prompt: "The borrow checker runs at compile time".to_string(),
        choices: vec![Choice::new("A", "True"), Choice::new("B", "False")],
        answer: Answer::single("A"),
    }])
    .unwrap()
}

#[test]
fn true_false_scenario_scores_and_keeps_high_score() {
    let engine = EngineHandle::with_clock(true_false_bank(), fixed_clock());

    // Correct run.
    engine.start_session();
    engine.select_choice(QuestionId::new(1), "A".into());
    engine.finish();
    assert_eq!(engine.score_summary().unwrap().score, 1);
    assert_eq!(engine.highest_score(), 1);

    // Unanswered run.
    engine.restart();
    engine.finish();
    assert_eq!(engine.score_summary().unwrap().score, 0);
    assert_eq!(engine.highest_score(), 1);

    // Wrong run leaves the prior high score untouched.
    engine.restart();
    engine.select_choice(QuestionId::new(1), "B".into());
    engine.finish();
    let summary = engine.score_summary().unwrap();
    assert_eq!(summary.score, 0);
    assert_eq!(summary.highest, 1);
}

#[test]
fn multi_select_is_all_or_nothing() {
    let bank = QuestionBank::seed([QuestionDraft {
        kind: QuestionType::MultiSelect,
        prompt: "Select A and C".to_string(),
        choices: vec![
            Choice::new("A", "first"),
            Choice::new("B", "second"),
            Choice::new("C", "third"),
        ],
        answer: Answer::multiple(["A", "C"]),
    }])
    .unwrap();
    let engine = EngineHandle::with_clock(bank, fixed_clock());
    let id = QuestionId::new(1);

    // {C, A} in any selection order is correct.
    engine.start_session();
    engine.select_choice(id, "C".into());
    engine.select_choice(id, "A".into());
    engine.finish();
    assert_eq!(engine.score_summary().unwrap().score, 1);

    // {A} alone is not.
    engine.restart();
    engine.select_choice(id, "A".into());
    engine.finish();
    assert_eq!(engine.score_summary().unwrap().score, 0);

    // Overshooting with {A, B, C} is not either.
    engine.restart();
    engine.select_choice(id, "A".into());
    engine.select_choice(id, "B".into());
    engine.select_choice(id, "C".into());
    engine.finish();
    assert_eq!(engine.score_summary().unwrap().score, 0);
}

#[test]
fn breakdown_follows_snapshot_order_after_completion() {
    let bank = QuestionBank::seed([
        QuestionDraft {
            kind: QuestionType::TrueFalse,
            prompt: "first".to_string(),
            choices: vec![Choice::new("A", "True"), Choice::new("B", "False")],
            answer: Answer::single("A"),
        },
        QuestionDraft {
            kind: QuestionType::SingleChoice,
            prompt: "second".to_string(),
            choices: vec![Choice::new("A", "one"), Choice::new("B", "two")],
            answer: Answer::single("B"),
        },
    ])
    .unwrap();
    let engine = EngineHandle::with_clock(bank, fixed_clock());

    engine.start_session();
    engine.select_choice(QuestionId::new(1), "A".into());
    engine.next();
    engine.select_choice(QuestionId::new(2), "A".into());
    engine.next();

    let breakdown = engine.breakdown();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(
        (breakdown[0].ordinal, breakdown[0].correct),
        (1, true)
    );
    assert_eq!(
        (breakdown[1].ordinal, breakdown[1].correct),
        (2, false)
    );
}

#[test]
fn editor_flow_create_edit_delete() {
    let engine = EngineHandle::with_clock(QuestionBank::new(), fixed_clock());

    let id = engine
        .create_question(QuestionDraft {
            kind: QuestionType::SingleChoice,
            prompt: "What is Rust?".to_string(),
            choices: vec![
                Choice::new("A", "A systems language"),
                Choice::new("B", "  "),
                Choice::new("C", "A fungus"),
            ],
            answer: Answer::single("A"),
        })
        .expect("create question");

    // The blank choice was dropped during normalization.
    let stored = engine.question(id).expect("stored question");
    assert_eq!(stored.choices().len(), 2);

    engine
        .update_question(
            id,
            QuestionDraft {
                kind: QuestionType::SingleChoice,
                prompt: "What is Rust, really?".to_string(),
                choices: vec![
                    Choice::new("A", "A systems language"),
                    Choice::new("C", "A fungus"),
                ],
                answer: Answer::single("C"),
            },
        )
        .expect("update question");
    let updated = engine.question(id).expect("updated question");
    assert_eq!(updated.prompt(), "What is Rust, really?");
    assert_eq!(updated.id(), id);

    // A draft that loses every answer reference is rejected and the bank
    // stays as it was.
    let err = engine
        .update_question(
            id,
            QuestionDraft {
                kind: QuestionType::SingleChoice,
                prompt: "broken".to_string(),
                choices: vec![Choice::new("A", "kept")],
                answer: Answer::single("Z"),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Bank(quiz_core::model::BankError::Validation(
            QuestionValidationError::NoValidAnswer
        ))
    ));
    assert_eq!(engine.question(id).unwrap().prompt(), "What is Rust, really?");

    engine.delete_question(id).expect("delete question");
    assert!(engine.questions().is_empty());
    assert!(matches!(
        engine.delete_question(id),
        Err(EngineError::Bank(quiz_core::model::BankError::NotFound(_)))
    ));
}
