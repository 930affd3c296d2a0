pub mod clock;
pub mod deck;
pub mod options;
pub mod outcome;
pub mod scoring;

pub use clock::{Clock, ClockSignal};
pub use outcome::{Mood, Outcome};
