use proptest::prelude::*;
use quiz_core::model::{
    AnswerMap, AnswerValue, OptionId, Question, QuestionId, QuestionOption, Quiz, QuizId,
};
use quiz_core::scoring::{ScoringPolicy, compute_score, is_correct};

#[derive(Debug, Clone)]
enum Shape {
    Choice { correct: usize, pc: u8, pi: u8 },
    Numerical { answer: i32, pc: u8, pi: u8 },
}

#[derive(Debug, Clone)]
enum Submission {
    None,
    Option(usize),
    Number(i32),
}

const OPTION_IDS: [&str; 4] = ["a", "b", "c", "d"];

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        (0..4usize, 1..10u8, 0..5u8).prop_map(|(correct, pc, pi)| Shape::Choice { correct, pc, pi }),
        (-20..20i32, 1..10u8, 0..5u8).prop_map(|(answer, pc, pi)| Shape::Numerical { answer, pc, pi }),
    ]
}

fn submission_strategy() -> impl Strategy<Value = Submission> {
    prop_oneof![
        Just(Submission::None),
        (0..4usize).prop_map(Submission::Option),
        (-20..20i32).prop_map(Submission::Number),
    ]
}

fn build(shapes: &[Shape]) -> Quiz {
    let questions = shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let id = QuestionId::new(format!("q{i}")).unwrap();
            match shape {
                Shape::Choice { correct, pc, pi } => {
                    let options = OPTION_IDS
                        .iter()
                        .map(|o| QuestionOption {
                            id: OptionId::new(*o).unwrap(),
                            text: o.to_string(),
                        })
                        .collect();
                    Question::choice(
                        id,
                        "S",
                        "T",
                        f64::from(*pc),
                        f64::from(*pi),
                        options,
                        OptionId::new(OPTION_IDS[*correct]).unwrap(),
                    )
                    .unwrap()
                }
                Shape::Numerical { answer, pc, pi } => Question::numerical(
                    id,
                    "S",
                    "T",
                    f64::from(*pc),
                    f64::from(*pi),
                    f64::from(*answer),
                    None,
                )
                .unwrap(),
            }
        })
        .collect();
    Quiz::new(QuizId::new("prop").unwrap(), "Prop", None, None, questions).unwrap()
}

fn to_answers(quiz: &Quiz, submissions: &[Submission]) -> AnswerMap {
    quiz.questions()
        .iter()
        .zip(submissions)
        .filter_map(|(q, s)| {
            let value = match s {
                Submission::None => return None,
                Submission::Option(i) => AnswerValue::Choice(OptionId::new(OPTION_IDS[*i]).unwrap()),
                Submission::Number(n) => AnswerValue::Numerical(f64::from(*n)),
            };
            Some((q.id().clone(), value))
        })
        .collect()
}

proptest! {
    #[test]
    fn score_is_sum_of_per_question_deltas(
        shapes in prop::collection::vec(shape_strategy(), 1..12),
        subs in prop::collection::vec(submission_strategy(), 12),
    ) {
        let quiz = build(&shapes);
        let answers = to_answers(&quiz, &subs);

        let mut expected_on = 0.0;
        let mut expected_off = 0.0;
        for q in quiz.questions() {
            if let Some(value) = answers.get(q.id()) {
                if is_correct(q, value) {
                    expected_on += q.points_correct();
                    expected_off += q.points_correct();
                } else {
                    expected_on -= q.points_incorrect();
                }
            }
        }

        prop_assert_eq!(compute_score(&quiz, &answers, ScoringPolicy::new(true)), expected_on);
        prop_assert_eq!(compute_score(&quiz, &answers, ScoringPolicy::new(false)), expected_off);
    }

    #[test]
    fn disabling_negative_marking_never_lowers_the_score(
        shapes in prop::collection::vec(shape_strategy(), 1..12),
        subs in prop::collection::vec(submission_strategy(), 12),
    ) {
        let quiz = build(&shapes);
        let answers = to_answers(&quiz, &subs);
        let on = compute_score(&quiz, &answers, ScoringPolicy::new(true));
        let off = compute_score(&quiz, &answers, ScoringPolicy::new(false));
        prop_assert!(off >= on);
        prop_assert!(off >= 0.0);
    }
}
