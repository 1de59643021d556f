use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiz_core::model::{SessionSettings, TIME_LIMIT_PRESETS};

#[derive(Debug, Parser)]
#[command(name = "quizcraft", version, about = "Take timed quizzes in the terminal")]
pub struct Cli {
    /// SQLite database URL or path.
    #[arg(
        long = "db",
        global = true,
        env = "QUIZCRAFT_DB_URL",
        default_value = "sqlite://quizcraft.sqlite3"
    )]
    pub db_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the bundled example quizzes
    Seed,
    /// Validate and store quizzes from a JSON file
    Import {
        file: PathBuf,
    },
    /// List stored quizzes
    List {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Take a quiz interactively
    Play(PlayArgs),
    /// Show attempt history, newest first
    Results {
        #[arg(long = "quiz", value_name = "QUIZ_ID")]
        quiz_id: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Show one attempt with its per-question breakdown
    Show {
        attempt_id: i64,
    },
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    pub quiz_id: String,
    #[arg(long = "time-limit", value_name = "MIN", help = time_limit_help())]
    pub time_limit: Option<u32>,
    /// Deduct points for incorrect answers, whatever the quiz default.
    #[arg(long, overrides_with = "no_negative_marking")]
    pub negative_marking: bool,
    /// Never deduct points, whatever the quiz default.
    #[arg(long, overrides_with = "negative_marking")]
    pub no_negative_marking: bool,
}

impl PlayArgs {
    /// Apply the flags given on the command line over the quiz defaults.
    #[must_use]
    pub fn settings(&self, defaults: SessionSettings) -> SessionSettings {
        let mut settings = defaults;
        if let Some(minutes) = self.time_limit {
            settings = settings.with_time_limit_minutes(minutes);
        }
        if self.negative_marking {
            settings = settings.with_negative_marking(true);
        } else if self.no_negative_marking {
            settings = settings.with_negative_marking(false);
        }
        settings
    }
}

fn time_limit_help() -> String {
    let presets = TIME_LIMIT_PRESETS
        .iter()
        .map(|minutes| match minutes {
            0 => "0 (none)".to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("Time limit in minutes, overriding the quiz default. Presets: {presets}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn play_parses_flags() {
        let cli = Cli::try_parse_from([
            "quizcraft",
            "--db",
            "sqlite::memory:",
            "play",
            "sci-mock-1",
            "--time-limit",
            "45",
            "--negative-marking",
        ])
        .unwrap();
        assert_eq!(cli.db_url, "sqlite::memory:");
        match cli.command {
            Command::Play(args) => {
                assert_eq!(args.quiz_id, "sci-mock-1");
                assert_eq!(args.time_limit, Some(45));
                assert!(args.negative_marking);
                assert!(!args.no_negative_marking);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn play_args(extra: &[&str]) -> PlayArgs {
        let argv = ["quizcraft", "play", "sci-mock-1"].into_iter().chain(extra.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Play(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn play_falls_back_to_quiz_defaults() {
        let defaults = SessionSettings::new(Some(30), true);
        assert_eq!(play_args(&[]).settings(defaults), defaults);
        assert_eq!(
            play_args(&["--time-limit", "60"]).settings(defaults),
            SessionSettings::new(Some(60), true)
        );
        assert_eq!(
            play_args(&["--time-limit", "0", "--no-negative-marking"]).settings(defaults),
            SessionSettings::untimed()
        );
        assert!(
            play_args(&["--negative-marking"])
                .settings(SessionSettings::untimed())
                .negative_marking()
        );
    }

    #[test]
    fn last_marking_flag_wins() {
        let args = play_args(&["--negative-marking", "--no-negative-marking"]);
        assert!(!args.negative_marking);
        assert!(!args.settings(SessionSettings::new(None, true)).negative_marking());
    }

    #[test]
    fn time_limit_help_lists_presets() {
        let help = time_limit_help();
        for minutes in TIME_LIMIT_PRESETS {
            assert!(help.contains(&minutes.to_string()), "{help}");
        }
        assert!(help.contains("0 (none)"));
    }

    #[test]
    fn results_defaults() {
        let cli = Cli::try_parse_from(["quizcraft", "results"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Results { quiz_id: None, limit: 20 }
        ));
    }
}
