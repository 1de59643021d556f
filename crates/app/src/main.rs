use std::sync::Arc;

use clap::Parser;
use quiz_core::model::{Difficulty, QuizId};
use services::{AttemptHistoryService, Clock, QuizService, QuizServiceError, SessionLoopService};
use storage::repository::Storage;

mod cli;
mod db;
mod logging;
mod play;

use cli::{Cli, Command};

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    let db_url = db::normalize_sqlite_url(&cli.db_url);
    db::prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    tracing::debug!(db_url = %db_url, "storage ready");

    let clock = Clock::system();
    let quizzes = QuizService::new(Arc::clone(&storage.quizzes));
    let history = AttemptHistoryService::new(Arc::clone(&storage.attempts));

    match cli.command {
        Command::Seed => {
            for id in quizzes.seed_examples().await? {
                println!("seeded {id}");
            }
        }
        Command::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            for id in quizzes.import_json(&json).await? {
                println!("imported {id}");
            }
        }
        Command::List { limit } => {
            let items = quizzes.list(limit).await?;
            if items.is_empty() {
                println!("no quizzes yet, run `quizcraft seed` or `quizcraft import <FILE>`");
            }
            for item in items {
                let difficulty = item.difficulty.map_or("-", Difficulty::as_str);
                println!(
                    "{:<16} {:<32} {:>3} questions  {:>6} points  {difficulty}",
                    item.id, item.title, item.question_count, item.total_possible
                );
            }
        }
        Command::Play(args) => {
            let quiz_id = QuizId::new(args.quiz_id.as_str())?;
            let settings = args.settings(quizzes.get(&quiz_id).await?.settings());
            let session_loop = SessionLoopService::new(
                clock,
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.attempts),
            );
            play::play(&session_loop, &quiz_id, settings).await?;
        }
        Command::Results { quiz_id, limit } => {
            let quiz_id = quiz_id.map(QuizId::new).transpose()?;
            let items = history.list(quiz_id.as_ref(), limit).await?;
            if items.is_empty() {
                println!("no attempts yet");
            }
            for item in items {
                println!(
                    "#{:<5} {} {:<16} {:>6} / {:<6} correct {:>2}  wrong {:>2}  skipped {:>2}  {}",
                    item.id,
                    item.completed_at.format("%Y-%m-%d %H:%M"),
                    item.quiz_id,
                    item.score,
                    item.total_possible,
                    item.correct,
                    item.incorrect,
                    item.unanswered,
                    item.finish_reason.as_str()
                );
            }
        }
        Command::Show { attempt_id } => {
            let attempt = history.get(attempt_id).await?;
            // The quiz may have been deleted since; explanations are then skipped.
            let quiz = match quizzes.get(attempt.quiz_id()).await {
                Ok(quiz) => Some(quiz),
                Err(QuizServiceError::NotFound(_)) => None,
                Err(err) => return Err(err.into()),
            };
            println!(
                "{}",
                play::render_result(attempt.quiz_title(), attempt.result(), quiz.as_ref())
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing();

    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
