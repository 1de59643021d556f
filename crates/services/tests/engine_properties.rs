use proptest::prelude::*;
use quiz_core::model::{
    AnswerValue, FinishReason, Question, QuestionId, Quiz, QuizId, SessionSettings,
};
use services::{Navigation, QuizSession, SessionState, TickOutcome};

fn quiz(len: usize) -> Quiz {
    let questions = (0..len)
        .map(|i| {
            Question::numerical(
                QuestionId::new(format!("q{i}")).unwrap(),
                "Maths",
                "Compute",
                2.0,
                1.0,
                f64::from(u32::try_from(i).unwrap()),
                None,
            )
            .unwrap()
        })
        .collect();
    Quiz::new(QuizId::new("props").unwrap(), "Props", None, None, questions).unwrap()
}

#[derive(Debug, Clone)]
enum Action {
    GoTo(usize),
    Next,
    Previous,
    Answer(usize, i32),
    Flag(usize),
    Tick,
    Finalize,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..12usize).prop_map(Action::GoTo),
        Just(Action::Next),
        Just(Action::Previous),
        (0..12usize, -3..3i32).prop_map(|(q, v)| Action::Answer(q, v)),
        (0..12usize).prop_map(Action::Flag),
        Just(Action::Tick),
        Just(Action::Finalize),
    ]
}

fn apply(session: &mut QuizSession, action: &Action) {
    match action {
        Action::GoTo(i) => {
            session.go_to(*i);
        }
        Action::Next => {
            session.next();
        }
        Action::Previous => {
            session.previous();
        }
        Action::Answer(q, v) => {
            let id = QuestionId::new(format!("q{q}")).unwrap();
            session.select_answer(&id, AnswerValue::Numerical(f64::from(*v)));
        }
        Action::Flag(q) => {
            session.toggle_flag(&QuestionId::new(format!("q{q}")).unwrap());
        }
        Action::Tick => {
            session.tick();
        }
        Action::Finalize => {
            session.finalize();
        }
    }
}

proptest! {
    #[test]
    fn toggling_a_flag_twice_is_identity(len in 1..8usize, target in 0..8usize) {
        let mut session = QuizSession::new(quiz(len), SessionSettings::untimed()).unwrap();
        let id = QuestionId::new(format!("q{target}")).unwrap();
        let before = session.is_flagged(&id);
        session.toggle_flag(&id);
        session.toggle_flag(&id);
        prop_assert_eq!(session.is_flagged(&id), before);
    }

    #[test]
    fn out_of_range_go_to_never_moves(len in 1..8usize, extra in 0..100usize) {
        let mut session = QuizSession::new(quiz(len), SessionSettings::untimed()).unwrap();
        session.go_to(len - 1);
        prop_assert_eq!(session.go_to(len + extra), Navigation::Stayed);
        prop_assert_eq!(session.current_index(), len - 1);
    }

    #[test]
    fn index_stays_in_bounds_under_any_actions(
        len in 1..8usize,
        actions in prop::collection::vec(action(), 0..40),
    ) {
        let mut session = QuizSession::new(quiz(len), SessionSettings::new(Some(1), true)).unwrap();
        for action in &actions {
            apply(&mut session, action);
            prop_assert!(session.current_index() < len);
            prop_assert!(session.progress().answered <= len);
        }
    }

    #[test]
    fn completed_session_never_changes(
        len in 1..8usize,
        actions in prop::collection::vec(action(), 0..40),
    ) {
        let mut session = QuizSession::new(quiz(len), SessionSettings::untimed()).unwrap();
        let result = session.finalize().clone();
        let index = session.current_index();
        let answers = session.answers().clone();

        for action in &actions {
            apply(&mut session, action);
        }
        prop_assert_eq!(session.state(), SessionState::Completed);
        prop_assert_eq!(session.current_index(), index);
        prop_assert_eq!(session.answers(), &answers);
        prop_assert_eq!(session.result(), Some(&result));
    }

    #[test]
    fn next_from_last_completes_exactly_once(len in 1..8usize, extra_calls in 0..5usize) {
        let mut session = QuizSession::new(quiz(len), SessionSettings::untimed()).unwrap();
        session.go_to(len - 1);
        prop_assert_eq!(session.next(), Navigation::Finished);
        for _ in 0..extra_calls {
            prop_assert_eq!(session.next(), Navigation::Stayed);
            prop_assert_eq!(session.tick(), TickOutcome::Ignored);
        }
        prop_assert_eq!(
            session.result().map(|r| r.finish_reason),
            Some(FinishReason::LastQuestion)
        );
    }

    #[test]
    fn time_up_fires_once(minutes in 1..4u32, overshoot in 0..30usize) {
        let mut session =
            QuizSession::new(quiz(3), SessionSettings::new(Some(minutes), false)).unwrap();
        session.start();
        let ticks = usize::try_from(minutes * 60).unwrap() + overshoot;
        let time_ups = (0..ticks)
            .filter(|_| session.tick() == TickOutcome::TimeUp)
            .count();
        prop_assert_eq!(time_ups, 1);
        prop_assert_eq!(session.elapsed_seconds(), u64::from(minutes) * 60);
    }
}
