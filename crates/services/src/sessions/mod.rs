mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{
    Navigation, QuestionStatus, QuizSession, SessionState, SessionView, TickOutcome,
};
pub use timer::{Tick, TickHandle, TickStream, Ticker};
pub use view::{AttemptHistoryService, AttemptListItem};
pub use workflow::{ActiveSession, AttemptOutcome, SessionLoopService};
