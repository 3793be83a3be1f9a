pub mod access;
pub mod outcome;
pub mod scripts;
pub mod wait;

pub use access::{ElementAccess, ScrollTarget, ViewportMetrics};
pub use outcome::Outcome;
pub use wait::{WaitError, WaitPolicy};
