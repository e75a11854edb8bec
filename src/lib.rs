//! Scheduling and sampling for topic-based spaced repetition.
//!
//! [`sample_card`] picks which card of a topic to show, weighted by each
//! card's intrinsic weight. [`process_review`] turns a graded review into the
//! topic's new stability, difficulty and next review time. Both are pure:
//! randomness and time are passed in, and nothing is persisted.

pub mod card;
pub mod clock;
pub mod error;
pub mod grade;
pub mod rand;
pub mod sample;
pub mod schedule;

pub use card::Card;
pub use card::CardPayload;
pub use card::Weighted;
pub use clock::Clock;
pub use clock::Scheduler;
pub use clock::UtcClock;
pub use error::Error;
pub use error::Result;
pub use grade::Grade;
pub use sample::sample_card;
pub use schedule::calculate_next_review;
pub use schedule::due_topics;
pub use schedule::process_review;
pub use schedule::update_difficulty;
pub use schedule::update_stability;
pub use schedule::SchedulingResult;
pub use schedule::Topic;
