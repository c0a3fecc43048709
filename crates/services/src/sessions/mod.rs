mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionState, Step};
pub use view::ReviewFeed;
pub use workflow::{AdvanceOutcome, QuizLoopService};
