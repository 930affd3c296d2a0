pub mod event;
pub mod feedback;
pub mod game;
pub mod round;

pub use event::{GameEvent, Question};
pub use feedback::{FeedbackSink, SilentFeedback};
pub use game::{GameMode, Session, SessionState};
