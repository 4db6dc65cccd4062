//! Spaced-repetition scheduling for vocabulary review.
//!
//! - `interval`: next-review computation
//! - `scheduler`: the New / Learning / Mastered state machine
//! - `selector`, `stats`: read-side queries
//! - `service`: wires the above to a store, a word catalog and a clock

pub mod clock;
pub mod errors;
pub mod interval;
pub mod rating;
pub mod scheduler;
pub mod selector;
pub mod service;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::SrsError;
pub use rating::Rating;
pub use selector::DueQuery;
pub use service::SrsService;
