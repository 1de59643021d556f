#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{AttemptHistoryError, QuizServiceError, SessionError};
pub use quiz_service::{QuizListItem, QuizService};

pub use sessions::{
    ActiveSession, AttemptHistoryService, AttemptListItem, AttemptOutcome, Navigation,
    QuestionStatus, QuizSession, SessionLoopService, SessionProgress, SessionState, SessionView,
    Tick, TickHandle, TickOutcome, TickStream, Ticker,
};
