use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{FinishReason, QuizId, SessionSettings};
use quiz_core::time::fixed_now;
use services::{Clock, QuizService, SessionLoopService, TickOutcome, Ticker};
use storage::repository::Storage;

async fn seeded() -> (Storage, SessionLoopService) {
    let storage = Storage::in_memory();
    QuizService::new(Arc::clone(&storage.quizzes))
        .seed_examples()
        .await
        .unwrap();
    let loop_svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::clone(&storage.quizzes),
        Arc::clone(&storage.attempts),
    );
    (storage, loop_svc)
}

#[tokio::test]
async fn session_loop_scores_and_persists_attempt() {
    let (storage, loop_svc) = seeded().await;
    let quiz_id = QuizId::new("sci-mock-1").unwrap();
    let mut active = loop_svc
        .start_session(&quiz_id, SessionSettings::new(None, true))
        .await
        .unwrap();

    // Correct, correct, wrong, within tolerance, unanswered.
    let inputs = [("PHY-Q1", "a"), ("PHY-Q2", "5"), ("CHEM-Q1", "c"), ("MATH-Q1", "3.143")];
    for (question, raw) in inputs {
        let question_id = question.parse().unwrap();
        loop_svc.answer_raw(&mut active, &question_id, raw).unwrap();
        active.session_mut().next();
    }
    assert!(!active.is_complete());
    assert_eq!(active.session().progress().remaining_unanswered, 1);

    let outcome = loop_svc.finish(&mut active).await.unwrap();
    let result = outcome.attempt.result();
    assert_eq!(result.finish_reason, FinishReason::Submitted);
    assert_eq!(result.correct(), 3);
    assert_eq!(result.incorrect(), 1);
    assert_eq!(result.unanswered(), 1);

    let stored = storage.attempts.get_attempt(outcome.attempt_id).await.unwrap();
    assert_eq!(stored, outcome.attempt);
}

#[tokio::test(start_paused = true)]
async fn timed_session_runs_out_via_ticker() {
    let (storage, loop_svc) = seeded().await;
    let quiz_id = QuizId::new("warmup-1").unwrap();
    let mut active = loop_svc
        .start_session(&quiz_id, SessionSettings::new(Some(1), false))
        .await
        .unwrap();

    let (mut handle, mut ticks) = Ticker::spawn(Duration::from_secs(1));
    let mut time_ups = 0;
    while ticks.recv().await.is_some() {
        match active.session_mut().tick() {
            TickOutcome::TimeUp => {
                time_ups += 1;
                handle.cancel();
            }
            TickOutcome::Ignored | TickOutcome::Running { .. } => {}
        }
    }
    assert_eq!(time_ups, 1);

    let outcome = loop_svc.finish(&mut active).await.unwrap();
    assert_eq!(outcome.attempt.result().finish_reason, FinishReason::TimeUp);
    assert_eq!(outcome.attempt.result().elapsed_seconds, 60);
    assert_eq!(storage.attempts.list_attempts(None, 10).await.unwrap().len(), 1);
}
