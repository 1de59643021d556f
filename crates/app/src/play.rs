use std::time::Duration;

use quiz_core::model::{AttemptResult, QuestionKind, Quiz, QuizId, SessionSettings};
use services::{
    ActiveSession, AttemptOutcome, Navigation, QuestionStatus, SessionLoopService, SessionView,
    TickOutcome, Ticker,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

/// One line of participant input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Answer(String),
    Next,
    Previous,
    /// Zero-based target; the prompt is one-based.
    GoTo(usize),
    Flag,
    Submit,
    Quit,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandError {
    #[error("type a command, or `h` for help")]
    Empty,
    #[error("unknown command `{0}`, type `h` for help")]
    Unknown(String),
    #[error("`{0}` needs a value")]
    MissingValue(&'static str),
    #[error("`{0}` is not a question number")]
    InvalidIndex(String),
}

pub const HELP: &str = "\
commands:
  a <value>  answer the current question (option id or number)
  n          next question (submits after the last one)
  p          previous question
  g <n>      go to question n
  f          flag or unflag the current question
  s          submit now
  q          quit without saving";

/// Parse a line of input.
///
/// # Errors
///
/// Returns `CommandError` for empty, unknown or incomplete commands.
pub fn parse_command(line: &str) -> Result<PlayCommand, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" => Err(CommandError::Empty),
        "a" | "answer" if rest.is_empty() => Err(CommandError::MissingValue("a")),
        "a" | "answer" => Ok(PlayCommand::Answer(rest.to_string())),
        "n" | "next" => Ok(PlayCommand::Next),
        "p" | "prev" | "previous" => Ok(PlayCommand::Previous),
        "g" | "goto" if rest.is_empty() => Err(CommandError::MissingValue("g")),
        "g" | "goto" => rest
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(PlayCommand::GoTo)
            .ok_or_else(|| CommandError::InvalidIndex(rest.to_string())),
        "f" | "flag" => Ok(PlayCommand::Flag),
        "s" | "submit" => Ok(PlayCommand::Submit),
        "q" | "quit" => Ok(PlayCommand::Quit),
        "h" | "help" | "?" => Ok(PlayCommand::Help),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn status_marker(status: QuestionStatus) -> char {
    match status {
        QuestionStatus::Current => '>',
        QuestionStatus::Flagged => '?',
        QuestionStatus::Answered => '*',
        QuestionStatus::Visited => '.',
        QuestionStatus::Unvisited => ' ',
    }
}

/// Render the current question and the navigation palette.
#[must_use]
pub fn render_view(view: &SessionView<'_>, statuses: &[QuestionStatus]) -> String {
    let question = view.question;

    let mut header = format!(
        "[{}/{}] {}",
        view.current_index + 1,
        view.total_questions,
        question.subject()
    );
    if view.is_flagged {
        header.push_str("  (flagged)");
    }
    header.push_str(&format!("  elapsed {}", clock(view.elapsed_seconds)));
    if let Some(remaining) = view.remaining_seconds {
        header.push_str(&format!("  remaining {}", clock(remaining)));
    }

    let mut lines = vec![
        header,
        format!(
            "{}  (+{} / -{})",
            question.text(),
            question.points_correct(),
            question.points_incorrect()
        ),
    ];
    match question.kind() {
        QuestionKind::Choice { options, .. } => {
            lines.extend(
                options
                    .iter()
                    .map(|option| format!("  {}) {}", option.id, option.text)),
            );
        }
        QuestionKind::Numerical { .. } => lines.push("  (enter a number)".to_string()),
    }
    lines.push(match view.answer {
        Some(answer) => format!("your answer: {answer}"),
        None => "your answer: -".to_string(),
    });

    let palette: String = statuses
        .iter()
        .enumerate()
        .map(|(index, status)| format!(" {}{}", index + 1, status_marker(*status)))
        .collect();
    lines.push(format!("palette:{palette}"));
    lines.join("\n")
}

/// Text shown before the first question: description, instructions and settings.
#[must_use]
pub fn render_intro(quiz: &Quiz, settings: SessionSettings) -> String {
    let mut lines = vec![quiz.title().to_string()];
    lines.extend(quiz.description().map(str::to_string));
    lines.extend(quiz.instructions().map(str::to_string));
    let limit = settings
        .time_limit_minutes()
        .map_or_else(|| "none".to_string(), |minutes| format!("{minutes} min"));
    let marking = if settings.negative_marking() { "on" } else { "off" };
    lines.push(format!("time limit: {limit}  negative marking: {marking}"));
    lines.join("\n")
}

/// Render a finished attempt, with explanations when the quiz is at hand.
#[must_use]
pub fn render_result(title: &str, result: &AttemptResult, quiz: Option<&Quiz>) -> String {
    let mut lines = vec![
        format!("{title}: finished ({})", result.finish_reason.as_str()),
        format!(
            "score {} / {}  correct {}  incorrect {}  unanswered {}  time {}",
            result.score,
            result.total_possible,
            result.correct(),
            result.incorrect(),
            result.unanswered(),
            clock(result.elapsed_seconds)
        ),
    ];
    for (index, outcome) in result.breakdown.iter().enumerate() {
        let submitted = outcome
            .submitted
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let verdict = match (outcome.is_answered(), outcome.correct) {
            (false, _) => "skipped",
            (true, true) => "correct",
            (true, false) => "wrong",
        };
        lines.push(format!(
            "  {:>2}. {:<10} {:<8} {:<10} {:+}",
            index + 1,
            outcome.question_id,
            verdict,
            submitted,
            outcome.points_delta
        ));

        let explanation = quiz
            .and_then(|quiz| quiz.find(&outcome.question_id))
            .and_then(|(_, question)| question.explanation());
        if let Some(explanation) = explanation {
            lines.push(format!("      {explanation}"));
        }
    }
    lines.join("\n")
}

//
// ─── LOOP ──────────────────────────────────────────────────────────────────────
//

enum Step {
    Continue,
    Redraw,
    Finish,
    Quit,
}

fn apply(loop_svc: &SessionLoopService, active: &mut ActiveSession, command: PlayCommand) -> Step {
    match command {
        PlayCommand::Answer(raw) => {
            let question_id = active.session().current_question().id().clone();
            match loop_svc.answer_raw(active, &question_id, &raw) {
                Ok(()) => Step::Redraw,
                Err(err) => {
                    println!("{err}");
                    Step::Continue
                }
            }
        }
        PlayCommand::Next => match active.session_mut().next() {
            Navigation::Finished => Step::Finish,
            Navigation::Moved(_) | Navigation::Stayed => Step::Redraw,
        },
        PlayCommand::Previous => match active.session_mut().previous() {
            Navigation::Stayed => {
                println!("already at the first question");
                Step::Continue
            }
            Navigation::Moved(_) | Navigation::Finished => Step::Redraw,
        },
        PlayCommand::GoTo(index) => match active.session_mut().go_to(index) {
            Navigation::Stayed => {
                println!("no question {}", index + 1);
                Step::Continue
            }
            Navigation::Moved(_) | Navigation::Finished => Step::Redraw,
        },
        PlayCommand::Flag => {
            let question_id = active.session().current_question().id().clone();
            active.session_mut().toggle_flag(&question_id);
            Step::Redraw
        }
        PlayCommand::Submit => Step::Finish,
        PlayCommand::Quit => Step::Quit,
        PlayCommand::Help => {
            println!("{HELP}");
            Step::Continue
        }
    }
}

fn redraw(active: &ActiveSession) {
    let session = active.session();
    println!();
    println!("{}", render_view(&session.view(), &session.question_statuses()));
}

/// Run an interactive session on stdin/stdout.
///
/// Returns the persisted outcome, or `None` when the participant quit.
///
/// # Errors
///
/// Returns an error if the session cannot start, stdin fails, or the
/// attempt cannot be saved.
pub async fn play(
    loop_svc: &SessionLoopService,
    quiz_id: &QuizId,
    settings: SessionSettings,
) -> Result<Option<AttemptOutcome>, Box<dyn std::error::Error>> {
    let mut active = loop_svc.start_session(quiz_id, settings).await?;
    let (mut ticker, mut ticks) = Ticker::spawn(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render_intro(active.session().quiz(), settings));
    println!("{HELP}");
    redraw(&active);

    let finish = loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break false;
                };
                let step = match parse_command(&line) {
                    Ok(command) => apply(loop_svc, &mut active, command),
                    Err(err) => {
                        println!("{err}");
                        Step::Continue
                    }
                };
                match step {
                    Step::Continue => {}
                    Step::Redraw => redraw(&active),
                    Step::Finish => break true,
                    Step::Quit => break false,
                }
            }
            Some(_) = ticks.recv() => {
                if active.session_mut().tick() == TickOutcome::TimeUp {
                    println!("\ntime is up");
                    break true;
                }
            }
        }
    };
    ticker.cancel();

    if !finish {
        loop_svc.abandon(active);
        println!("quit without saving");
        return Ok(None);
    }

    let outcome = loop_svc.finish(&mut active).await?;
    println!();
    println!(
        "{}",
        render_result(
            outcome.attempt.quiz_title(),
            outcome.attempt.result(),
            Some(active.session().quiz())
        )
    );
    println!("saved as attempt #{}", outcome.attempt_id);
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerValue, FinishReason, OptionId, Question, QuestionId, QuestionOption};
    use services::QuizSession;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command(" n "), Ok(PlayCommand::Next));
        assert_eq!(parse_command("p"), Ok(PlayCommand::Previous));
        assert_eq!(
            parse_command("a  3.14 "),
            Ok(PlayCommand::Answer("3.14".into()))
        );
        assert_eq!(parse_command("g 2"), Ok(PlayCommand::GoTo(1)));
        assert_eq!(parse_command("f"), Ok(PlayCommand::Flag));
        assert_eq!(parse_command("s"), Ok(PlayCommand::Submit));
        assert_eq!(parse_command("q"), Ok(PlayCommand::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("a"), Err(CommandError::MissingValue("a")));
        assert_eq!(
            parse_command("g 0"),
            Err(CommandError::InvalidIndex("0".into()))
        );
        assert_eq!(
            parse_command("g two"),
            Err(CommandError::InvalidIndex("two".into()))
        );
        assert_eq!(
            parse_command("jump"),
            Err(CommandError::Unknown("jump".into()))
        );
    }

    fn session() -> QuizSession {
        let options = vec![
            QuestionOption {
                id: OptionId::new("a").unwrap(),
                text: "Newton".into(),
            },
            QuestionOption {
                id: OptionId::new("b").unwrap(),
                text: "Joule".into(),
            },
        ];
        let q1 = Question::choice(
            QuestionId::new("Q1").unwrap(),
            "Physics",
            "Unit of force?",
            4.0,
            1.0,
            options,
            OptionId::new("a").unwrap(),
        )
        .unwrap()
        .with_explanation(Some("Force is measured in newtons.".into()));
        let q2 = Question::numerical(
            QuestionId::new("Q2").unwrap(),
            "Maths",
            "2 + 3?",
            3.0,
            2.0,
            5.0,
            None,
        )
        .unwrap();
        let quiz = Quiz::new(QuizId::new("t").unwrap(), "T", None, None, vec![q1, q2])
            .unwrap()
            .with_instructions(Some("Answer with a letter or a number.".into()));
        QuizSession::new(quiz, SessionSettings::new(Some(45), true)).unwrap()
    }

    #[test]
    fn intro_shows_instructions_and_settings() {
        let s = session();
        let text = render_intro(s.quiz(), s.settings());
        assert!(text.starts_with("T\nAnswer with a letter or a number."));
        assert!(text.ends_with("time limit: 45 min  negative marking: on"));
    }

    #[test]
    fn view_shows_options_timer_and_palette() {
        let mut s = session();
        s.select_answer(&QuestionId::new("Q1").unwrap(), AnswerValue::Choice(OptionId::new("b").unwrap()));
        s.toggle_flag(&QuestionId::new("Q1").unwrap());
        s.tick();

        let text = render_view(&s.view(), &s.question_statuses());
        assert!(text.starts_with("[1/2] Physics  (flagged)  elapsed 00:01  remaining 44:59"));
        assert!(text.contains("  a) Newton"));
        assert!(text.contains("your answer: b"));
        assert!(text.ends_with("palette: 1> 2 "));
    }

    #[test]
    fn result_lists_each_question_with_explanations() {
        let mut s = session();
        s.select_answer(&QuestionId::new("Q2").unwrap(), AnswerValue::Numerical(5.0));
        let result = s.finalize().clone();
        assert_eq!(result.finish_reason, FinishReason::Submitted);

        let text = render_result("T", &result, Some(s.quiz()));
        assert!(text.contains("score 3 / 7"));
        assert!(text.contains("skipped"));
        assert!(text.contains("correct"));
        assert!(text.contains("      Force is measured in newtons."));

        let without_quiz = render_result("T", &result, None);
        assert!(!without_quiz.contains("newtons"));
    }
}
